//! Persistence seam between the engine and whatever stores classifications.
//!
//! The engine never talks HTTP itself. Hosts hand it a `PersistenceGateway`
//! (the production one wraps the PayClose API; tests use in-memory fakes)
//! and the commit driver calls through it.

use std::fmt;

use async_trait::async_trait;

use crate::commit::CommitRecord;

/// Error surfaced by a gateway when a batch could not be persisted.
///
/// Variants are string-backed so outcomes can be cloned into events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// No credentials configured.
    NotAuthenticated,
    /// Transport-level failure (DNS, TLS, timeouts).
    Network(String),
    /// Non-success HTTP status with response body.
    Http(u16, String),
    /// Server rejected the batch contents.
    Validation(String),
    /// Response could not be decoded.
    Parse(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "not authenticated"),
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http(code, msg) => write!(f, "HTTP {code}: {msg}"),
            Self::Validation(msg) => write!(f, "batch rejected: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for GatewayError {}

/// Destination for classification batches.
///
/// `persist_batch` is all-or-nothing: either every record in the batch is
/// applied remotely or none is. The engine's commit fold relies on that and
/// has no partial-application path.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn persist_batch(&self, records: &[CommitRecord]) -> Result<(), GatewayError>;
}
