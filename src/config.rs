//! Generator configuration
//!
//! Settings are read from a `dispatchgen.toml` file. Every field is optional and the
//! defaults reproduce the layout the tool was first written for:
//!
//! ```toml
//! [paths]
//! input = "src/embed/collections.rs"
//! output = "src/entities/string_convert.rs"
//!
//! [marker]
//! name = "embeddable_entity"
//! qualifier = "Entity"
//!
//! [generate]
//! function_name = "dynamic_import_embeddings"
//! key_param = "entity_name"
//! import_fn = "crate::embed::import::import_embeddings"
//! error_type = "crate::embed::import::ImportEmbeddingsError"
//! unknown_variant = "UnknownCombination"
//! module_prefix = "super"
//! entity_type = "Entity"
//! column_type = "Column"
//! header = true
//! forward_args = [{ name = "start_from", ty = "Option<u64>" }]
//! ```
//!
//! Resolution order for the file itself:
//! 1. Explicitly provided path (via CLI), which must exist
//! 2. `dispatchgen.toml` in the working directory
//! 3. None (built-in defaults)

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{DispatchGenError, Result};
use crate::extract::{is_identifier, MarkerPattern, DEFAULT_MARKER, DEFAULT_QUALIFIER};

/// File name looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "dispatchgen.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub paths: PathsConfig,
    pub marker: MarkerConfig,
    pub generate: GenerateConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Source file scanned for marker occurrences
    pub input: PathBuf,
    /// File the dispatch function is written to
    pub output: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("src/embed/collections.rs"),
            output: PathBuf::from("src/entities/string_convert.rs"),
        }
    }
}

/// Marker macro recognised by the extractor.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct MarkerConfig {
    /// Macro name, without the `!`
    pub name: String,
    /// Type name following the captured module (`<module>::<qualifier>`)
    pub qualifier: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MARKER.to_string(),
            qualifier: DEFAULT_QUALIFIER.to_string(),
        }
    }
}

/// Extra parameter threaded from the dispatch function into every import call.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ForwardArg {
    pub name: String,
    pub ty: String,
}

/// Names used in the generated function.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct GenerateConfig {
    pub function_name: String,
    pub key_param: String,
    /// Path of the generic import routine, called as `import_fn::<Entity, Column>(..)`
    pub import_fn: String,
    /// Error type returned by the dispatch function
    pub error_type: String,
    /// Variant of `error_type` built by the fallback arm
    pub unknown_variant: String,
    /// Path the entity modules are reached through (`super::<module>::Entity`); may be empty
    pub module_prefix: String,
    pub entity_type: String,
    pub column_type: String,
    /// Emit the `@generated` header comment
    pub header: bool,
    pub forward_args: Vec<ForwardArg>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            function_name: "dynamic_import_embeddings".to_string(),
            key_param: "entity_name".to_string(),
            import_fn: "crate::embed::import::import_embeddings".to_string(),
            error_type: "crate::embed::import::ImportEmbeddingsError".to_string(),
            unknown_variant: "UnknownCombination".to_string(),
            module_prefix: "super".to_string(),
            entity_type: "Entity".to_string(),
            column_type: "Column".to_string(),
            header: true,
            forward_args: Vec::new(),
        }
    }
}

/// Command-line values that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub function_name: Option<String>,
}

impl Config {
    /// Parse configuration from TOML text. `origin` is only used for error messages.
    pub fn from_toml_str(contents: &str, origin: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|source| DispatchGenError::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load and validate a configuration file.
    ///
    /// # Errors
    ///
    /// `FileNotFound`/`Io` if the file cannot be read, `Config` if it does not parse,
    /// `InvalidToken` if a name fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| DispatchGenError::from_read(path, e))?;
        let config = Self::from_toml_str(&contents, path)?;
        config.validate()?;
        debug!(config = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Resolve and load the configuration, falling back to defaults.
    pub fn resolve(explicit_path: Option<&Path>, working_dir: &Path) -> Result<Self> {
        match resolve_config_path(explicit_path, working_dir) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Apply CLI overrides on top of loaded values.
    pub fn apply(&mut self, overrides: &Overrides) {
        if let Some(input) = &overrides.input {
            self.paths.input = input.clone();
        }
        if let Some(output) = &overrides.output {
            self.paths.output = output.clone();
        }
        if let Some(name) = &overrides.function_name {
            self.generate.function_name = name.clone();
        }
    }

    /// Check that every configured name can be spliced into generated code.
    pub fn validate(&self) -> Result<()> {
        MarkerPattern::new(&self.marker.name, &self.marker.qualifier)?;

        let g = &self.generate;
        check_ident("generate.function_name", &g.function_name)?;
        check_ident("generate.key_param", &g.key_param)?;
        check_ident("generate.unknown_variant", &g.unknown_variant)?;
        check_ident("generate.entity_type", &g.entity_type)?;
        check_ident("generate.column_type", &g.column_type)?;
        check_path("generate.import_fn", &g.import_fn)?;
        check_path("generate.error_type", &g.error_type)?;
        // Empty means entity modules are in scope where the file is included.
        if !g.module_prefix.is_empty() {
            check_path("generate.module_prefix", &g.module_prefix)?;
        }

        for arg in &g.forward_args {
            check_ident("generate.forward_args.name", &arg.name)?;
            if arg.name == g.key_param || arg.name == crate::generator::FALLBACK_BINDING {
                return Err(DispatchGenError::InvalidToken {
                    field: "generate.forward_args.name",
                    value: arg.name.clone(),
                });
            }
            if arg.ty.trim().is_empty() || arg.ty.contains(['\n', '{', '}', ';']) {
                return Err(DispatchGenError::InvalidToken {
                    field: "generate.forward_args.ty",
                    value: arg.ty.clone(),
                });
            }
        }
        Ok(())
    }

    /// Compiled marker pattern for this configuration.
    pub fn marker_pattern(&self) -> Result<MarkerPattern> {
        MarkerPattern::new(&self.marker.name, &self.marker.qualifier)
    }
}

fn check_ident(field: &'static str, value: &str) -> Result<()> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(DispatchGenError::InvalidToken {
            field,
            value: value.to_string(),
        })
    }
}

/// `a::b::c`, optionally rooted with `::`.
fn check_path(field: &'static str, value: &str) -> Result<()> {
    let body = value.strip_prefix("::").unwrap_or(value);
    if !body.is_empty() && body.split("::").all(is_identifier) {
        Ok(())
    } else {
        Err(DispatchGenError::InvalidToken {
            field,
            value: value.to_string(),
        })
    }
}

/// Resolve the config file path
///
/// Priority:
/// 1. Explicitly provided path (returned even if missing so the load reports it)
/// 2. `dispatchgen.toml` in `working_dir`
/// 3. None
pub fn resolve_config_path(explicit_path: Option<&Path>, working_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }
    let candidate = working_dir.join(DEFAULT_CONFIG_FILE);
    candidate.exists().then_some(candidate)
}
