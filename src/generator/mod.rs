//! # Generator Module
//!
//! Turns a set of entity names into the source of a string-keyed dispatch function and
//! writes it to disk.
//!
//! ## Architecture
//!
//! ```text
//! entity names → DispatchTable → Askama template → (rustfmt) → atomic write
//! ```
//!
//! 1. **Table** - [`DispatchTable::build`] sorts and deduplicates the names and derives
//!    the entity/column type paths for every arm
//! 2. **Rendering** - [`render_dispatch`] feeds the table to `templates/dispatch.rs.txt`
//! 3. **Formatting** - [`format_source`] optionally pipes the text through `rustfmt`
//! 4. **Writing** - [`write_atomic`] replaces the output file via temp file + rename
//!
//! ## Generated Code
//!
//! For entities `order` and `user` with the default configuration:
//!
//! ```text
//! pub async fn dynamic_import_embeddings(
//!     entity_name: &str,
//! ) -> Result<(), crate::embed::import::ImportEmbeddingsError> {
//!     match entity_name {
//!         "order" => {
//!             crate::embed::import::import_embeddings::<super::order::Entity, super::order::Column>()
//!                 .await
//!         }
//!         "user" => { ... }
//!         other => Err(crate::embed::import::ImportEmbeddingsError::UnknownCombination(other.to_string())),
//!     }
//! }
//! ```
//!
//! Rendering never touches the filesystem, so the table and template can be tested in
//! isolation.

mod format;
mod table;
mod templates;
mod writer;

pub use format::{format_source, RUSTFMT_BIN_ENV};
pub use table::{DispatchEntry, DispatchTable, Fallback, FALLBACK_BINDING};
pub use templates::{render_dispatch, DispatchTemplateData};
pub use writer::{check_up_to_date, write_atomic};
