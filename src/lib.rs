//! # dispatchgen
//!
//! **dispatchgen** generates a string-keyed dispatch function from the entities registered
//! through a marker macro, so the `match` that routes a runtime name to a statically typed
//! import routine never has to be maintained by hand.
//!
//! ## Overview
//!
//! Given a source file containing registrations such as
//!
//! ```text
//! embeddable_entity!(contents::Entity, contents::Column, ...);
//! embeddable_entity!(uploaded_files::Entity, uploaded_files::Column, ...);
//! ```
//!
//! dispatchgen writes
//!
//! ```text
//! pub async fn dynamic_import_embeddings(
//!     entity_name: &str,
//! ) -> Result<(), crate::embed::import::ImportEmbeddingsError> {
//!     match entity_name {
//!         "contents" => { import_embeddings::<super::contents::Entity, super::contents::Column>().await }
//!         "uploaded_files" => { ... }
//!         other => Err(ImportEmbeddingsError::UnknownCombination(other.to_string())),
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - **[`extract`]** - Regex-based scan for marker occurrences; sorted, deduplicated names
//! - **[`generator`]** - Dispatch table, Askama template, rustfmt pass and atomic writer
//! - **[`pipeline`]** - Extract → render → write, plus `--check`/`--dry-run` modes and a
//!   `build.rs` entry point
//! - **[`config`]** - `dispatchgen.toml` loading and CLI overrides
//! - **[`cli`]** - The `dispatchgen` binary
//! - **[`logging`]** - `tracing` subscriber setup
//!
//! Output is deterministic: arms are emitted in lexicographic order, so regenerating from
//! an unchanged input leaves the file byte-identical.

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod logging;
pub mod pipeline;

pub use config::Config;
pub use error::{DispatchGenError, Result};
pub use extract::{EntityName, MarkerPattern};
pub use pipeline::{run, GenerationReport, Mode, RunOptions};
