//! # CLI Module
//!
//! Command-line interface for the `dispatchgen` binary.
//!
//! ## Commands
//!
//! ### `generate`
//!
//! Extract entity names and write the dispatch function:
//!
//! ```bash
//! dispatchgen generate --input src/embed/collections.rs --output src/entities/string_convert.rs
//! ```
//!
//! Options:
//! - `--config <FILE>` - Config file (default: `./dispatchgen.toml` if present)
//! - `--input <FILE>` / `--output <FILE>` - Override the configured paths
//! - `--function-name <NAME>` - Override the generated function's name
//! - `--dry-run` - Print the generated code instead of writing it
//! - `--check` - Fail if the output file is missing or out of date (for CI)
//! - `--format` - Run `rustfmt` over the generated code
//!
//! ### `list`
//!
//! Print the entity names found in the marker file:
//!
//! ```bash
//! dispatchgen list --json
//! ```

mod commands;

#[cfg(test)]
mod tests;

pub use commands::{run, run_cli, Cli, Commands, LogFormatArg};
