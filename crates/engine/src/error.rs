use std::fmt;

use crate::concept::ConceptKey;

/// Local invariant violation. Returned synchronously, nothing mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Key not present in the current catalog snapshot.
    UnknownConcept(ConceptKey),
    /// Catalog construction saw the same key twice.
    DuplicateConcept(ConceptKey),
    /// `move_to_pending` on a concept with no committed category.
    NoCommittedCategory(ConceptKey),
    /// Selection op on a concept that is not pending in the effective view.
    NotPending(ConceptKey),
    /// Header row could not be read from the uploaded sheet.
    HeaderParse(String),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownConcept(key) => write!(f, "unknown concept: {key}"),
            Self::DuplicateConcept(key) => write!(f, "duplicate concept key: {key}"),
            Self::NoCommittedCategory(key) => {
                write!(f, "concept '{key}' has no committed category to re-open")
            }
            Self::NotPending(key) => write!(f, "concept '{key}' is not pending"),
            Self::HeaderParse(msg) => write!(f, "header row parse error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}
