//! Multi-select over pending concepts.
//!
//! The selection is owned by the store and only ever holds keys that are
//! pending in the effective view; every store mutation that reclassifies a
//! key prunes it here. Collaborators get read access.

use rustc_hash::FxHashSet;

use crate::concept::ConceptKey;

/// Set of currently selected pending concepts.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    keys: FxHashSet<ConceptKey>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &ConceptKey) -> bool {
        self.keys.contains(key)
    }

    /// Arbitrary order; use `sorted_keys` when order matters.
    pub fn iter(&self) -> impl Iterator<Item = &ConceptKey> {
        self.keys.iter()
    }

    pub fn sorted_keys(&self) -> Vec<ConceptKey> {
        let mut keys: Vec<ConceptKey> = self.keys.iter().cloned().collect();
        keys.sort();
        keys
    }

    pub(crate) fn insert(&mut self, key: ConceptKey) -> bool {
        self.keys.insert(key)
    }

    pub(crate) fn remove(&mut self, key: &ConceptKey) -> bool {
        self.keys.remove(key)
    }

    pub(crate) fn clear(&mut self) {
        self.keys.clear();
    }

    pub(crate) fn replace(&mut self, keys: FxHashSet<ConceptKey>) {
        self.keys = keys;
    }
}
