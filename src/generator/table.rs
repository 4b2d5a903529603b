use std::collections::BTreeSet;

use tracing::warn;

use crate::config::GenerateConfig;
use crate::extract::EntityName;

/// Binding used by the fallback arm for the unmatched key.
pub const FALLBACK_BINDING: &str = "other";

/// One named arm of the dispatch function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchEntry {
    /// String literal matched against the runtime key
    pub key: String,
    /// Entity type passed to the import routine (e.g. `super::user::Entity`)
    pub entity_type: String,
    /// Companion column type derived from the same module (e.g. `super::user::Column`)
    pub column_type: String,
}

/// The trailing catch-all arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fallback {
    pub binding: &'static str,
    pub error_type: String,
    pub unknown_variant: String,
}

/// Ordered arms of a dispatch function plus its fallback.
///
/// Entries are sorted by key and unique, whatever order the names were supplied in.
/// Keys are pasted into the output unescaped, so every key is an [`EntityName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchTable {
    pub entries: Vec<DispatchEntry>,
    pub fallback: Fallback,
}

impl DispatchTable {
    /// Build the table from `names`, skipping any that are not identifiers.
    pub fn build<I, S>(names: I, config: &GenerateConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sorted = BTreeSet::new();
        for name in names {
            let name = name.as_ref();
            match EntityName::new(name) {
                Some(entity) => {
                    sorted.insert(entity.as_str().to_string());
                }
                None => warn!(entity = name, "skipping name that is not an identifier"),
            }
        }

        let entries = sorted
            .into_iter()
            .map(|key| {
                let module = module_path(&config.module_prefix, &key);
                DispatchEntry {
                    entity_type: format!("{module}::{}", config.entity_type),
                    column_type: format!("{module}::{}", config.column_type),
                    key,
                }
            })
            .collect();

        DispatchTable {
            entries,
            fallback: Fallback {
                binding: FALLBACK_BINDING,
                error_type: config.error_type.clone(),
                unknown_variant: config.unknown_variant.clone(),
            },
        }
    }

    /// Named arms plus the fallback.
    pub fn arm_count(&self) -> usize {
        self.entries.len() + 1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.key.as_str())
    }
}

fn module_path(prefix: &str, module: &str) -> String {
    if prefix.is_empty() {
        module.to_string()
    } else {
        format!("{prefix}::{module}")
    }
}
