//! Classification store: the pending overlay over a catalog snapshot.
//!
//! The store is the single owner of everything the user has done since the
//! last successful commit: pending assignments, re-opened concepts, and the
//! multi-select. Reads go through the effective view; nothing here talks to
//! the network (the commit driver in `commit` does, through the gateway).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::catalog::Catalog;
use crate::category::Category;
use crate::concept::{Concept, ConceptKey};
use crate::error::EngineError;
use crate::events::{CatalogReloadedEvent, EngineEvent, EventCollector};
use crate::progress::Progress;
use crate::selection::Selection;

/// Outcome of a catalog refresh.
///
/// Local edits whose keys are absent from the new snapshot are dropped, and
/// everything dropped is reported here so the host can tell the user what
/// was lost. Keys are never remapped onto a shifted ordinal.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RefreshReport {
    /// Concepts in the new snapshot.
    pub total: usize,
    /// Pending assignments dropped, with the category that was lost.
    pub orphaned_assignments: Vec<(ConceptKey, Category)>,
    /// Re-opened concepts dropped.
    pub orphaned_reopens: Vec<ConceptKey>,
}

impl RefreshReport {
    pub fn is_clean(&self) -> bool {
        self.orphaned_assignments.is_empty() && self.orphaned_reopens.is_empty()
    }

    pub fn orphan_count(&self) -> usize {
        self.orphaned_assignments.len() + self.orphaned_reopens.len()
    }
}

/// Local classification state for one closing.
///
/// INVARIANT: `pending` and `moved_to_pending` never share a key.
/// INVARIANT: every selected key is pending in the effective view.
#[derive(Debug, Default)]
pub struct ClassificationStore {
    pub(crate) catalog: Catalog,
    /// Uncommitted assignments. Wins over everything in the effective view.
    pub(crate) pending: FxHashMap<ConceptKey, Category>,
    /// Committed concepts the user re-opened for reclassification.
    pub(crate) moved_to_pending: FxHashSet<ConceptKey>,
    pub(crate) selection: Selection,
    /// Token of the outstanding commit batch, if any.
    pub(crate) in_flight: Option<u64>,
    pub(crate) commit_seq: u64,
    pub(crate) events: EventCollector,
}

impl ClassificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// True while a commit batch is outstanding.
    pub fn commit_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// True when there are uncommitted assignments.
    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// True when any local edit exists (assignments or re-opens).
    pub fn is_dirty(&self) -> bool {
        !self.pending.is_empty() || !self.moved_to_pending.is_empty()
    }

    // ── Effective view ─────────────────────────────────────────────────────

    /// Category a concept effectively has right now.
    ///
    /// Precedence: pending entry wins; a re-opened concept is unclassified
    /// regardless of its committed category; otherwise the committed category.
    pub fn effective_category(
        &self,
        key: &ConceptKey,
    ) -> Result<Option<Category>, EngineError> {
        let concept = self
            .catalog
            .get(key)
            .ok_or_else(|| EngineError::UnknownConcept(key.clone()))?;
        Ok(self.effective_of(concept))
    }

    pub(crate) fn effective_of(&self, concept: &Concept) -> Option<Category> {
        if let Some(cat) = self.pending.get(&concept.key) {
            return Some(*cat);
        }
        if self.moved_to_pending.contains(&concept.key) {
            return None;
        }
        concept.server_category
    }

    /// Keys with no effective category, in sheet order.
    pub fn pending_keys(&self) -> Vec<ConceptKey> {
        self.catalog
            .iter()
            .filter(|c| self.effective_of(c).is_none())
            .map(|c| c.key.clone())
            .collect()
    }

    /// Keys effectively assigned to `category`, in sheet order.
    pub fn assigned_to(&self, category: Category) -> Vec<ConceptKey> {
        self.catalog
            .iter()
            .filter(|c| self.effective_of(c) == Some(category))
            .map(|c| c.key.clone())
            .collect()
    }

    pub fn progress(&self) -> Progress {
        let total = self.catalog.len();
        let classified = self
            .catalog
            .iter()
            .filter(|c| self.effective_of(c).is_some())
            .count();
        Progress::from_counts(total, classified)
    }

    // ── Mutations ──────────────────────────────────────────────────────────

    /// Record uncommitted assignments for every key in `keys`.
    ///
    /// Validates the whole batch against the catalog before touching
    /// anything: one unknown key rejects the call with nothing mutated.
    /// Assigned keys leave `moved_to_pending` and the selection.
    pub fn assign(&mut self, keys: &[ConceptKey], category: Category) -> Result<(), EngineError> {
        for key in keys {
            if !self.catalog.contains_key(key) {
                return Err(EngineError::UnknownConcept(key.clone()));
            }
        }

        for key in keys {
            self.pending.insert(key.clone(), category);
            self.moved_to_pending.remove(key);
            self.selection.remove(key);
        }
        Ok(())
    }

    /// Re-open a committed concept for reclassification.
    ///
    /// Requires a committed category (there is nothing to re-open
    /// otherwise). Drops any pending entry for the key; a key is never in
    /// both collections at once.
    pub fn move_to_pending(&mut self, key: &ConceptKey) -> Result<(), EngineError> {
        let concept = self
            .catalog
            .get(key)
            .ok_or_else(|| EngineError::UnknownConcept(key.clone()))?;
        if concept.server_category.is_none() {
            return Err(EngineError::NoCommittedCategory(key.clone()));
        }

        self.pending.remove(key);
        self.moved_to_pending.insert(key.clone());
        Ok(())
    }

    /// Undo a `move_to_pending`. Returns false when the key was not moved.
    ///
    /// The concept becomes classified again, so it is pruned from the
    /// selection.
    pub fn restore(&mut self, key: &ConceptKey) -> Result<bool, EngineError> {
        if !self.catalog.contains_key(key) {
            return Err(EngineError::UnknownConcept(key.clone()));
        }
        if !self.moved_to_pending.remove(key) {
            return Ok(false);
        }
        self.selection.remove(key);
        Ok(true)
    }

    /// Throw away every local edit. The catalog is untouched.
    pub fn discard(&mut self) {
        self.pending.clear();
        self.moved_to_pending.clear();
        self.selection.clear();
    }

    // ── Selection ──────────────────────────────────────────────────────────

    /// Flip selection membership for a pending concept.
    /// Returns the new membership state.
    pub fn toggle_selected(&mut self, key: &ConceptKey) -> Result<bool, EngineError> {
        self.ensure_pending(key)?;
        if self.selection.remove(key) {
            Ok(false)
        } else {
            self.selection.insert(key.clone());
            Ok(true)
        }
    }

    /// Replace the selection with exactly `keys`.
    ///
    /// Every key must be pending in the effective view; the empty slice
    /// clears the selection. Returns the selection size.
    pub fn set_selection(&mut self, keys: &[ConceptKey]) -> Result<usize, EngineError> {
        let mut next: FxHashSet<ConceptKey> = FxHashSet::default();
        for key in keys {
            self.ensure_pending(key)?;
            next.insert(key.clone());
        }
        let len = next.len();
        self.selection.replace(next);
        Ok(len)
    }

    /// Select every currently-pending concept. Returns the selection size.
    pub fn select_all_pending(&mut self) -> usize {
        let pending: FxHashSet<ConceptKey> = self.pending_keys().into_iter().collect();
        let len = pending.len();
        self.selection.replace(pending);
        len
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    fn ensure_pending(&self, key: &ConceptKey) -> Result<(), EngineError> {
        match self.effective_category(key)? {
            None => Ok(()),
            Some(_) => Err(EngineError::NotPending(key.clone())),
        }
    }

    // ── Catalog refresh ────────────────────────────────────────────────────

    /// Replace the base snapshot, keeping local edits whose keys survive.
    ///
    /// Edits keyed by concepts that left the catalog are dropped and
    /// reported; a repeated header whose ordinal shifted counts as a new
    /// concept. The selection keeps only keys that are still effectively
    /// pending.
    pub fn load_catalog(&mut self, catalog: Catalog) -> RefreshReport {
        let mut orphaned_assignments: Vec<(ConceptKey, Category)> = Vec::new();
        self.pending.retain(|key, category| {
            if catalog.contains_key(key) {
                true
            } else {
                orphaned_assignments.push((key.clone(), *category));
                false
            }
        });
        orphaned_assignments.sort_by(|a, b| a.0.cmp(&b.0));

        let mut orphaned_reopens: Vec<ConceptKey> = Vec::new();
        self.moved_to_pending.retain(|key| {
            if catalog.contains_key(key) {
                true
            } else {
                orphaned_reopens.push(key.clone());
                false
            }
        });
        orphaned_reopens.sort();

        self.catalog = catalog;

        let surviving: FxHashSet<ConceptKey> = self
            .selection
            .iter()
            .filter(|key| {
                self.catalog
                    .get(key)
                    .map(|c| self.effective_of(c).is_none())
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        self.selection.replace(surviving);

        let report = RefreshReport {
            total: self.catalog.len(),
            orphaned_assignments,
            orphaned_reopens,
        };

        if !report.is_clean() {
            log::warn!(
                "catalog refresh dropped {} local edit(s) for vanished concepts",
                report.orphan_count()
            );
        }

        let mut orphaned: Vec<ConceptKey> = report
            .orphaned_assignments
            .iter()
            .map(|(key, _)| key.clone())
            .chain(report.orphaned_reopens.iter().cloned())
            .collect();
        orphaned.sort();
        self.emit(EngineEvent::CatalogReloaded(CatalogReloadedEvent {
            total: report.total,
            orphaned,
        }));

        report
    }

    // ── Events ─────────────────────────────────────────────────────────────

    /// Take every queued event, oldest first.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.events.drain()
    }

    pub(crate) fn emit(&mut self, event: EngineEvent) {
        self.events.push(event);
    }
}
