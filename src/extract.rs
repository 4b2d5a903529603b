//! # Marker Extraction
//!
//! Finds the entity names registered through a marker macro in a Rust source file.
//!
//! A marker occurrence looks like:
//!
//! ```text
//! embeddable_entity!(
//!     contents::Entity,
//!     contents::Column,
//!     ...
//! );
//! ```
//!
//! Only the module segment in front of the qualifier (`contents` above) is captured.
//! Extraction is plain pattern matching over the raw text: occurrences inside comments or
//! strings are picked up too, and nothing checks that the named module actually exists.
//!
//! ## Ordering
//!
//! Names are collected into a [`BTreeSet`], so the result is deduplicated and sorted
//! lexicographically. Downstream rendering relies on this to keep generated files
//! byte-identical between runs.

use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{DispatchGenError, Result};

/// Default marker macro name.
pub const DEFAULT_MARKER: &str = "embeddable_entity";

/// Default type name expected after the captured module segment.
pub const DEFAULT_QUALIFIER: &str = "Entity";

/// Pattern fragment for a single identifier (ASCII letters, digits, `_`; no leading digit).
const IDENT: &str = r"[A-Za-z_][A-Za-z0-9_]*";

#[allow(clippy::expect_used)]
static IDENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{IDENT}$")).expect("identifier regex is valid"));

/// Whether `s` satisfies the identifier grammar.
pub fn is_identifier(s: &str) -> bool {
    IDENT_REGEX.is_match(s)
}

/// A module name captured from a marker occurrence.
///
/// Always satisfies [`is_identifier`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityName(String);

impl EntityName {
    /// Build an entity name, rejecting anything outside the identifier grammar.
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        is_identifier(&name).then_some(EntityName(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Compiled marker pattern: `<marker>!( <ident>::<qualifier> ,`
#[derive(Debug, Clone)]
pub struct MarkerPattern {
    marker: String,
    qualifier: String,
    regex: Regex,
}

impl MarkerPattern {
    /// Compile a pattern for the given marker macro and qualifier type name.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchGenError::InvalidToken`] if either token is not an identifier.
    pub fn new(marker: &str, qualifier: &str) -> Result<Self> {
        if !is_identifier(marker) {
            return Err(DispatchGenError::InvalidToken {
                field: "marker.name",
                value: marker.to_string(),
            });
        }
        if !is_identifier(qualifier) {
            return Err(DispatchGenError::InvalidToken {
                field: "marker.qualifier",
                value: qualifier.to_string(),
            });
        }

        // `\b` keeps `my_embeddable_entity!` from matching; `path::embeddable_entity!` still does.
        let pattern = format!(
            r"\b{marker}!\(\s*({IDENT})::{qualifier}\s*,",
            marker = regex::escape(marker),
            qualifier = regex::escape(qualifier),
        );
        let regex = Regex::new(&pattern).map_err(|_| DispatchGenError::InvalidToken {
            field: "marker.name",
            value: marker.to_string(),
        })?;

        Ok(MarkerPattern {
            marker: marker.to_string(),
            qualifier: qualifier.to_string(),
            regex,
        })
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Collect the distinct entity names in `source`, sorted.
    pub fn extract(&self, source: &str) -> BTreeSet<EntityName> {
        let mut names = BTreeSet::new();
        for caps in self.regex.captures_iter(source) {
            let Some(m) = caps.get(1) else { continue };
            if let Some(name) = EntityName::new(m.as_str()) {
                if !names.insert(name) {
                    debug!(entity = m.as_str(), "duplicate marker occurrence ignored");
                }
            }
        }
        names
    }

    /// Read `path` and extract entity names from its contents.
    ///
    /// # Errors
    ///
    /// [`DispatchGenError::FileNotFound`] if the file is missing, otherwise
    /// [`DispatchGenError::Io`] for read failures.
    pub fn extract_file(&self, path: &Path) -> Result<BTreeSet<EntityName>> {
        let source =
            std::fs::read_to_string(path).map_err(|e| DispatchGenError::from_read(path, e))?;
        let names = self.extract(&source);
        if names.is_empty() {
            warn!(
                input = %path.display(),
                marker = %self.marker,
                "no marker occurrences found"
            );
        }
        Ok(names)
    }
}

impl Default for MarkerPattern {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        MarkerPattern::new(DEFAULT_MARKER, DEFAULT_QUALIFIER).expect("default tokens are identifiers")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn names(set: &BTreeSet<EntityName>) -> Vec<&str> {
        set.iter().map(EntityName::as_str).collect()
    }

    const COLLECTIONS: &str = r#"
use crate::entities::{contents, uploaded_files};

embeddable_entity!(
    contents::Entity,
    contents::Column,
    contents::Column::Id,
    None,
);

embeddable_entity!(
    uploaded_files::Entity,
    uploaded_files::Column,
    Some(uploaded_files::Column::UserId),
);
"#;

    #[test]
    fn test_extracts_multiline_occurrences() {
        let found = MarkerPattern::default().extract(COLLECTIONS);
        assert_eq!(names(&found), vec!["contents", "uploaded_files"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let src = "embeddable_entity!(user::Entity, a);\n\
                   embeddable_entity!(order::Entity, b);\n\
                   embeddable_entity!(user::Entity, c);";
        let found = MarkerPattern::default().extract(src);
        assert_eq!(names(&found), vec!["order", "user"]);
    }

    #[test]
    fn test_empty_source_yields_empty_set() {
        assert!(MarkerPattern::default().extract("").is_empty());
        assert!(MarkerPattern::default()
            .extract("fn main() { println!(\"hi\"); }")
            .is_empty());
    }

    #[test]
    fn test_malformed_occurrences_are_skipped() {
        let src = r#"
embeddable_entity!(missing_qualifier, x);
embeddable_entity!(9starts_with_digit::Entity, x);
embeddable_entity!(nested::path::Entity, x);
embeddable_entity!(wrong::Column, x);
embeddable_entity!(no_separator::Entity);
embeddable_entity(no_bang::Entity, x);
my_embeddable_entity!(prefixed::Entity, x);
embeddable_entity!(café::Entity, x);
embeddable_entity!(名前::Entity, x);
embeddable_entity!(ok::Entity, x);
"#;
        let found = MarkerPattern::default().extract(src);
        assert_eq!(names(&found), vec!["ok"]);
    }

    #[test]
    fn test_unrelated_text_does_not_change_result() {
        let base = "embeddable_entity!(a::Entity,)\nembeddable_entity!(b::Entity,)";
        let noisy = "// header\nstruct X;\nembeddable_entity!(a::Entity,)\n\
                     fn y() {}\n/* comment */\nembeddable_entity!(b::Entity,)\nconst Z: u8 = 1;";
        let pattern = MarkerPattern::default();
        assert_eq!(pattern.extract(base), pattern.extract(noisy));
    }

    #[test]
    fn test_whitespace_between_tokens() {
        let src = "embeddable_entity!(\n\t  spaced::Entity   ,\n)";
        let found = MarkerPattern::default().extract(src);
        assert_eq!(names(&found), vec!["spaced"]);
    }

    #[test]
    fn test_custom_marker_and_qualifier() {
        let pattern = MarkerPattern::new("register", "Model").unwrap();
        assert_eq!((pattern.marker(), pattern.qualifier()), ("register", "Model"));
        let src = "register!(invoice::Model, 1); embeddable_entity!(user::Entity, 2);";
        assert_eq!(names(&pattern.extract(src)), vec!["invoice"]);
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        assert!(matches!(
            MarkerPattern::new("bad-marker", "Entity"),
            Err(DispatchGenError::InvalidToken { field: "marker.name", .. })
        ));
        assert!(matches!(
            MarkerPattern::new("ok", "1Entity"),
            Err(DispatchGenError::InvalidToken { field: "marker.qualifier", .. })
        ));
    }

    #[test]
    fn test_identifier_grammar() {
        assert!(is_identifier("user"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("order_items2"));
        assert!(!is_identifier("2fast"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("kebab-case"));
        assert!(EntityName::new("with space").is_none());
        // ASCII only, although Rust itself accepts these
        assert!(!is_identifier("café"));
        assert!(!is_identifier("名前"));
    }

    #[test]
    fn test_extract_file_missing_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = MarkerPattern::default()
            .extract_file(&dir.path().join("nope.rs"))
            .unwrap_err();
        assert!(matches!(err, DispatchGenError::FileNotFound { .. }));
    }

    #[test]
    fn test_extract_file_reads_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collections.rs");
        std::fs::write(&path, COLLECTIONS).unwrap();
        let found = MarkerPattern::default().extract_file(&path).unwrap();
        assert_eq!(found.len(), 2);
    }
}
