//! # Pipeline
//!
//! Runs extraction, rendering and writing in sequence for one configuration.
//!
//! ```rust,ignore
//! use dispatchgen::config::Config;
//! use dispatchgen::pipeline::{run, Mode, RunOptions};
//!
//! let report = run(&Config::default(), &RunOptions::default())?;
//! println!("{} entities", report.entities.len());
//! ```
//!
//! From a host crate's `build.rs`:
//!
//! ```rust,ignore
//! fn main() {
//!     let config = dispatchgen::config::Config::resolve(None, std::path::Path::new(".")).unwrap();
//!     dispatchgen::pipeline::run_for_build_script(&config).unwrap();
//! }
//! ```

use std::path::PathBuf;

use tracing::{debug, info, info_span};

use crate::config::Config;
use crate::error::Result;
use crate::extract::EntityName;
use crate::generator::{check_up_to_date, format_source, render_dispatch, write_atomic, DispatchTable};

/// What to do with the rendered text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Replace the output file
    #[default]
    Write,
    /// Render only; the caller decides what to do with the text
    DryRun,
    /// Fail with `Stale` if the output file differs from the rendered text
    Check,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub mode: Mode,
    /// Pipe the rendered text through `rustfmt` first
    pub format: bool,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Extracted names in emission order
    pub entities: Vec<EntityName>,
    pub rendered: String,
    pub mode: Mode,
}

/// Extract the entity names named in the configured input file.
pub fn extract(config: &Config) -> Result<Vec<EntityName>> {
    let pattern = config.marker_pattern()?;
    let names = pattern.extract_file(&config.paths.input)?;
    Ok(names.into_iter().collect())
}

/// Extract and render without touching the output file.
pub fn render(config: &Config) -> Result<(Vec<EntityName>, String)> {
    config.validate()?;
    let entities = extract(config)?;
    for entity in &entities {
        debug!(entity = %entity, "dispatch arm");
    }
    let table = DispatchTable::build(&entities, &config.generate);
    let rendered = render_dispatch(&table, &config.generate, Some(&config.paths.input))?;
    Ok((entities, rendered))
}

/// Run the full pipeline.
///
/// # Errors
///
/// Any extraction, formatting or I/O failure aborts the run; in [`Mode::Check`] an
/// out-of-date output is reported as [`crate::DispatchGenError::Stale`].
pub fn run(config: &Config, options: &RunOptions) -> Result<GenerationReport> {
    let span = info_span!("generate", input = %config.paths.input.display());
    let _enter = span.enter();

    let (entities, mut rendered) = render(config)?;
    if options.format {
        rendered = format_source(&rendered)?;
    }

    let output = &config.paths.output;
    match options.mode {
        Mode::Write => {
            write_atomic(output, &rendered)?;
            info!(output = %output.display(), entities = entities.len(), "dispatch function written");
        }
        Mode::Check => {
            check_up_to_date(output, &rendered)?;
            info!(output = %output.display(), "dispatch function up to date");
        }
        Mode::DryRun => {
            info!(entities = entities.len(), "dry run, nothing written");
        }
    }

    Ok(GenerationReport {
        input: config.paths.input.clone(),
        output: output.clone(),
        entities,
        rendered,
        mode: options.mode,
    })
}

/// Entry point for `build.rs`: registers the input for change tracking, then writes.
pub fn run_for_build_script(config: &Config) -> Result<GenerationReport> {
    println!("cargo:rerun-if-changed={}", config.paths.input.display());
    run(config, &RunOptions::default())
}
