use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::config::{Config, Overrides};
use crate::logging::{init_logging, LogConfig, LogFormat};
use crate::pipeline::{self, Mode, RunOptions};

/// Command-line interface for dispatchgen
#[derive(Parser)]
#[command(name = "dispatchgen")]
#[command(about = "Generate string-keyed entity dispatch functions from marker macros", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log level: trace, debug, info, warn, error (RUST_LOG overrides)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormatArg::Pretty)]
    pub log_format: LogFormatArg,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Generate the dispatch function from the marker source file
    Generate {
        /// Path to the config file (default: ./dispatchgen.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Source file scanned for marker occurrences
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// File the dispatch function is written to
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Name of the generated function
        #[arg(long)]
        function_name: Option<String>,

        /// Print the generated code to stdout instead of writing it
        #[arg(long, default_value_t = false, conflicts_with = "check")]
        dry_run: bool,

        /// Exit with an error if the output file is missing or out of date
        #[arg(long, default_value_t = false)]
        check: bool,

        /// Run rustfmt over the generated code
        #[arg(long, default_value_t = false)]
        format: bool,
    },
    /// List the entity names found in the marker source file
    List {
        /// Path to the config file (default: ./dispatchgen.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Source file scanned for marker occurrences
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print a JSON array instead of one name per line
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

/// Parse arguments from the process and execute the command
///
/// # Errors
///
/// Returns an error if:
/// - The config file cannot be loaded or is invalid
/// - The marker source file cannot be read
/// - The output file cannot be written, or is stale under `--check`
pub fn run_cli() -> anyhow::Result<()> {
    run(Cli::parse())
}

/// Execute an already parsed command line
pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(&LogConfig {
        log_level: cli.log_level.clone(),
        format: match cli.log_format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Json => LogFormat::Json,
        },
        include_location: false,
    })?;

    match cli.command {
        Commands::Generate {
            config,
            input,
            output,
            function_name,
            dry_run,
            check,
            format,
        } => {
            let config = load_config(
                config.as_deref(),
                &Overrides {
                    input,
                    output,
                    function_name,
                },
            )?;
            let mode = match (dry_run, check) {
                (true, _) => Mode::DryRun,
                (false, true) => Mode::Check,
                (false, false) => Mode::Write,
            };
            let report = pipeline::run(&config, &RunOptions { mode, format })
                .with_context(|| format!("Failed to generate {}", config.paths.output.display()))?;

            match mode {
                Mode::DryRun => print!("{}", report.rendered),
                Mode::Check => println!("{} is up to date", report.output.display()),
                Mode::Write => println!("Code generated in {}", report.output.display()),
            }
            Ok(())
        }
        Commands::List {
            config,
            input,
            json,
        } => {
            let config = load_config(
                config.as_deref(),
                &Overrides {
                    input,
                    ..Overrides::default()
                },
            )?;
            let entities = pipeline::extract(&config).with_context(|| {
                format!("Failed to read {}", config.paths.input.display())
            })?;
            let names: Vec<&str> = entities.iter().map(|e| e.as_str()).collect();
            if json {
                println!("{}", serde_json::to_string(&names)?);
            } else {
                for name in names {
                    println!("{name}");
                }
            }
            Ok(())
        }
    }
}

fn load_config(explicit: Option<&Path>, overrides: &Overrides) -> anyhow::Result<Config> {
    let cwd = std::env::current_dir().context("Failed to determine working directory")?;
    let mut config = Config::resolve(explicit, &cwd).context("Failed to load configuration")?;
    config.apply(overrides);
    config.validate().context("Invalid configuration")?;
    Ok(config)
}
