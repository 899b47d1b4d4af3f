//! `payclose-engine`: payroll classification engine.
//!
//! Pure state crate: owns the concept catalog, the pending-changes overlay
//! and everything derived from them. No UI or transport dependencies;
//! persistence goes through the `PersistenceGateway` trait.

pub mod catalog;
pub mod category;
pub mod commit;
pub mod concept;
pub mod error;
pub mod events;
pub mod gateway;
pub mod progress;
pub mod selection;
pub mod shortcuts;
pub mod store;
mod suggest;
pub mod transfer;

pub use catalog::Catalog;
pub use category::Category;
pub use commit::{CommitBatch, CommitError, CommitOutcome, CommitRecord};
pub use concept::{Concept, ConceptKey, Suggestion, SuggestionRecord};
pub use error::EngineError;
pub use events::EngineEvent;
pub use gateway::{GatewayError, PersistenceGateway};
pub use progress::Progress;
pub use store::{ClassificationStore, RefreshReport};
pub use transfer::TransferCoordinator;
