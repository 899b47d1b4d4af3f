//! Commit lifecycle: snapshot the pending set, round-trip it through the
//! gateway, fold the result back.
//!
//! The store stays usable while a batch is on the wire, so commit is split
//! into phases: `begin_commit` freezes the batch and flags the store,
//! `apply_commit_success` / `apply_commit_failure` resolve it. Hosts with an
//! executor at hand can use the `commit` driver, which runs all phases
//! around a single await. Batches carry a generation token; a result that
//! arrives for anything but the outstanding batch is ignored.

use std::fmt;

use serde::Serialize;

use crate::category::Category;
use crate::concept::ConceptKey;
use crate::events::{CommitFailedEvent, CommitSucceededEvent, EngineEvent};
use crate::gateway::{GatewayError, PersistenceGateway};
use crate::store::ClassificationStore;

/// One pending assignment, as sent to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub key: ConceptKey,
    pub category: Category,
}

/// Frozen snapshot of the pending set, taken by `begin_commit`.
///
/// Hand it back to exactly one of `apply_commit_success` or
/// `apply_commit_failure` once the gateway call resolves.
#[derive(Debug, Clone)]
pub struct CommitBatch {
    records: Vec<CommitRecord>,
    token: u64,
}

impl CommitBatch {
    /// Records in key order.
    pub fn records(&self) -> &[CommitRecord] {
        &self.records
    }
}

/// What a successful commit did to local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitOutcome {
    /// Records the server accepted. Zero means there was nothing to commit.
    pub committed: usize,
    /// Pending entries kept because they were re-assigned while the batch
    /// was on the wire.
    pub carried_over: usize,
    /// Accepted records whose concepts left the catalog before the fold.
    pub detached: usize,
}

/// Commit-path failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitError {
    /// A commit batch is already outstanding. Not queued; try again after
    /// it resolves.
    InFlight,
    /// The gateway could not persist the batch. The overlay is untouched
    /// and an identical retry is valid.
    Gateway(GatewayError),
}

impl fmt::Display for CommitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InFlight => write!(f, "a commit is already in flight"),
            Self::Gateway(err) => write!(f, "commit failed: {err}"),
        }
    }
}

impl std::error::Error for CommitError {}

impl ClassificationStore {
    /// Freeze the pending set into a batch and mark the commit in flight.
    ///
    /// `Ok(None)` when there is nothing to commit. Rejects with
    /// `CommitError::InFlight` while a batch is outstanding.
    pub fn begin_commit(&mut self) -> Result<Option<CommitBatch>, CommitError> {
        if self.in_flight.is_some() {
            return Err(CommitError::InFlight);
        }
        if self.pending.is_empty() {
            return Ok(None);
        }

        let mut records: Vec<CommitRecord> = self
            .pending
            .iter()
            .map(|(key, category)| CommitRecord {
                key: key.clone(),
                category: *category,
            })
            .collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));

        self.commit_seq += 1;
        let token = self.commit_seq;
        self.in_flight = Some(token);

        log::info!("commit started: {} record(s)", records.len());
        Ok(Some(CommitBatch { records, token }))
    }

    /// Fold a persisted batch into the base snapshot.
    ///
    /// For every record: the committed category becomes the concept's
    /// `server_category`, and the matching pending entry is dropped. A
    /// pending entry that no longer matches was re-assigned while the batch
    /// was on the wire and survives into the next commit; a re-open made in
    /// flight survives the same way. Records whose concepts left the catalog
    /// are counted as detached.
    ///
    /// Returns `None` for a batch that is not the outstanding one; such a
    /// result has already been superseded and folding it would clobber
    /// newer state.
    pub fn apply_commit_success(&mut self, batch: CommitBatch) -> Option<CommitOutcome> {
        if self.in_flight != Some(batch.token) {
            log::warn!(
                "ignoring stale commit result ({} record(s))",
                batch.records.len()
            );
            return None;
        }
        self.in_flight = None;

        let mut carried_over = 0;
        let mut detached = 0;
        for record in &batch.records {
            if !self.catalog.set_server_category(&record.key, record.category) {
                detached += 1;
                continue;
            }
            match self.pending.get(&record.key) {
                Some(current) if *current == record.category => {
                    self.pending.remove(&record.key);
                }
                Some(_) => carried_over += 1,
                // Entry gone: re-opened or discarded in flight. The fold
                // keeps whatever the user did after begin_commit.
                None => {}
            }
            // The concept is effectively classified now unless it was
            // re-opened in flight, so it may not stay selected.
            if !self.moved_to_pending.contains(&record.key) {
                self.selection.remove(&record.key);
            }
        }

        let outcome = CommitOutcome {
            committed: batch.records.len(),
            carried_over,
            detached,
        };
        log::info!(
            "commit succeeded: {} record(s), {} carried over, {} detached",
            outcome.committed,
            outcome.carried_over,
            outcome.detached
        );
        self.emit(EngineEvent::CommitSucceeded(CommitSucceededEvent {
            committed: batch.records,
            carried_over,
            detached,
        }));
        Some(outcome)
    }

    /// Resolve a failed round-trip. Every local edit stays put; the same
    /// batch can be retried with a fresh `begin_commit`.
    ///
    /// Returns false for a batch that is not the outstanding one.
    pub fn apply_commit_failure(&mut self, batch: CommitBatch, error: GatewayError) -> bool {
        if self.in_flight != Some(batch.token) {
            log::warn!("ignoring stale commit failure: {error}");
            return false;
        }
        self.in_flight = None;

        log::warn!("commit failed: {error}");
        self.emit(EngineEvent::CommitFailed(CommitFailedEvent {
            error,
            batch_size: batch.records.len(),
        }));
        true
    }

    /// Full commit round-trip through `gateway`.
    ///
    /// No-op success when nothing is pending. The gateway either persists
    /// the whole batch or none of it; there is no partial outcome.
    pub async fn commit<G>(&mut self, gateway: &G) -> Result<CommitOutcome, CommitError>
    where
        G: PersistenceGateway + ?Sized,
    {
        let batch = match self.begin_commit()? {
            Some(batch) => batch,
            None => return Ok(CommitOutcome::default()),
        };

        match gateway.persist_batch(batch.records()).await {
            Ok(()) => Ok(self.apply_commit_success(batch).unwrap_or_default()),
            Err(error) => {
                self.apply_commit_failure(batch, error.clone());
                Err(CommitError::Gateway(error))
            }
        }
    }
}
