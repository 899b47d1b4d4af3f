//! Event types for classification change notifications.
//!
//! The store queues events as commits resolve and catalogs reload; the
//! hosting UI drains them after driving an operation and turns them into
//! toasts or banners. Tests use the collector to verify ordering.

use crate::commit::CommitRecord;
use crate::concept::ConceptKey;
use crate::gateway::GatewayError;

/// Events emitted by `ClassificationStore`.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A commit round-trip persisted its batch.
    CommitSucceeded(CommitSucceededEvent),

    /// A commit round-trip failed; the overlay is untouched.
    CommitFailed(CommitFailedEvent),

    /// A new catalog snapshot replaced the previous one.
    CatalogReloaded(CatalogReloadedEvent),
}

/// Emitted after a successful commit fold.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitSucceededEvent {
    /// Records the server accepted.
    pub committed: Vec<CommitRecord>,
    /// Pending entries that were re-edited while the commit was in flight
    /// and therefore survive into the next batch.
    pub carried_over: usize,
    /// Committed records whose concepts left the catalog before the fold.
    pub detached: usize,
}

/// Emitted when a commit round-trip fails.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitFailedEvent {
    pub error: GatewayError,
    /// Size of the batch that failed.
    pub batch_size: usize,
}

/// Emitted once per `load_catalog`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogReloadedEvent {
    /// Concepts in the new snapshot.
    pub total: usize,
    /// Local edits dropped because their keys left the catalog.
    pub orphaned: Vec<ConceptKey>,
}

/// Ordered event buffer. The store pushes, hosts drain.
#[derive(Debug, Default)]
pub struct EventCollector {
    events: Vec<EngineEvent>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: EngineEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[EngineEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Filter to only CommitSucceeded events.
    pub fn commit_succeeded(&self) -> Vec<&CommitSucceededEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::CommitSucceeded(ev) => Some(ev),
                _ => None,
            })
            .collect()
    }

    /// Filter to only CommitFailed events.
    pub fn commit_failed(&self) -> Vec<&CommitFailedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::CommitFailed(ev) => Some(ev),
                _ => None,
            })
            .collect()
    }

    /// Filter to only CatalogReloaded events.
    pub fn catalog_reloaded(&self) -> Vec<&CatalogReloadedEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                EngineEvent::CatalogReloaded(ev) => Some(ev),
                _ => None,
            })
            .collect()
    }
}
