//! Error types for extraction, rendering and writing.
//!
//! Library functions return [`Result`]; the CLI wraps these in `anyhow` with context.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, DispatchGenError>;

#[derive(Error, Debug)]
pub enum DispatchGenError {
    /// The marker source file does not exist.
    #[error("marker source file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Any other read or write failure.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be parsed.
    #[error("invalid config file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configured name is not a valid identifier or path.
    #[error("invalid value for `{field}`: {value:?}")]
    InvalidToken { field: &'static str, value: String },

    #[error(transparent)]
    Render(#[from] askama::Error),

    /// `rustfmt` could not be run or rejected the generated code.
    #[error("rustfmt failed: {detail}")]
    Format { detail: String },

    /// `--check` found an output file that does not match the generated text.
    #[error("generated file is out of date: {}", path.display())]
    Stale { path: PathBuf },
}

impl DispatchGenError {
    /// Wrap an I/O error for `path`, mapping `NotFound` to [`DispatchGenError::FileNotFound`].
    pub fn from_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            DispatchGenError::FileNotFound { path }
        } else {
            DispatchGenError::Io { path, source }
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DispatchGenError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_maps_to_file_not_found() {
        let err = DispatchGenError::from_read("missing.rs", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(err, DispatchGenError::FileNotFound { .. }));
        assert!(err.to_string().contains("missing.rs"));
    }

    #[test]
    fn test_other_read_errors_stay_io() {
        let err = DispatchGenError::from_read(
            "locked.rs",
            io::Error::from(io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, DispatchGenError::Io { .. }));
    }
}
