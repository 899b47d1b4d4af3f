//! Applying server suggestions to pending concepts.
//!
//! Suggestions are hints, so application never clobbers: a concept with a
//! pending entry or an effective category keeps what it has. Accepting a
//! suggestion routes through the same pending-write path as a manual
//! assignment.

use crate::category::Category;
use crate::concept::ConceptKey;
use crate::error::EngineError;
use crate::store::ClassificationStore;

impl ClassificationStore {
    /// Accept the suggestion for one concept.
    ///
    /// Applies only when the concept is pending in the effective view, has
    /// a suggestion, and has no pending entry. Returns whether anything was
    /// written; unknown keys are an error.
    pub fn apply_suggestion(&mut self, key: &ConceptKey) -> Result<bool, EngineError> {
        let concept = self
            .catalog
            .get(key)
            .ok_or_else(|| EngineError::UnknownConcept(key.clone()))?;

        let Some(suggestion) = concept.suggestion else {
            return Ok(false);
        };
        if self.effective_of(concept).is_some() {
            return Ok(false);
        }

        self.assign(&[key.clone()], suggestion.category)?;
        Ok(true)
    }

    /// Accept every applicable suggestion in one pass.
    ///
    /// Applicable means: effectively pending, suggestion present, no pending
    /// entry. Returns the number of concepts written.
    pub fn apply_all_suggestions(&mut self) -> usize {
        let applicable: Vec<(ConceptKey, Category)> = self
            .catalog
            .iter()
            .filter(|c| self.effective_of(c).is_none())
            .filter_map(|c| c.suggestion.map(|s| (c.key.clone(), s.category)))
            .collect();

        let mut applied = 0;
        for (key, category) in applicable {
            self.pending.insert(key.clone(), category);
            self.moved_to_pending.remove(&key);
            self.selection.remove(&key);
            applied += 1;
        }
        applied
    }
}
