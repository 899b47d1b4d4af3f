//! Concept identity and catalog records.
//!
//! A `ConceptKey` uniquely identifies one header item within a catalog
//! snapshot. Spreadsheets repeat header text freely ("Bonus" can appear
//! three times), so identity is the pair of header text and occurrence
//! ordinal, kept as a struct. Joining the two into a display string would
//! collide for headers that themselves contain the separator.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Unique identifier for a concept within one catalog snapshot.
///
/// `occurrence` counts repeats of the same header text in reading order,
/// starting at 1. Ordinals are assigned per snapshot and may shift when the
/// source sheet changes; a key is only meaningful against the catalog that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConceptKey {
    /// Header text as it appears in the source sheet (trimmed).
    pub header: String,
    /// 1-based occurrence ordinal among equal headers.
    pub occurrence: u32,
}

impl ConceptKey {
    pub fn new(header: impl Into<String>, occurrence: u32) -> Self {
        Self {
            header: header.into(),
            occurrence,
        }
    }
}

impl std::fmt::Display for ConceptKey {
    /// Log form only. Identity stays structural.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.header, self.occurrence)
    }
}

/// A server-computed classification hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: Category,
    /// How many prior closings classified an equal header this way.
    pub frequency: u32,
}

/// One header item of the closing, as loaded from the server.
///
/// Immutable inside a loaded catalog, with one exception: a successful
/// commit folds the committed category into `server_category`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub key: ConceptKey,
    /// Raw header text for display, untrimmed.
    pub display_name: String,
    /// Category already persisted on the server, if any.
    pub server_category: Option<Category>,
    pub suggestion: Option<Suggestion>,
    /// True when the header text appears more than once in the sheet.
    pub is_duplicate: bool,
}

impl Concept {
    /// A concept with no server state, as produced from a bare header row.
    pub fn new(key: ConceptKey, display_name: impl Into<String>) -> Self {
        Self {
            key,
            display_name: display_name.into(),
            server_category: None,
            suggestion: None,
            is_duplicate: false,
        }
    }
}

/// One entry of a suggestion feed, keyed like the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuggestionRecord {
    pub key: ConceptKey,
    pub category: Category,
    pub frequency: u32,
}
