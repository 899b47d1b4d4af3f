//! PayClose API client: shared between desktop and CLI.
//!
//! This crate is the single source of truth for the PayClose wire contract:
//! auth, concept catalog, suggestion feed, classification batches.
//!
//! No GUI concepts. No retries. No caching.

mod auth;
mod client;
mod gateway;

pub use auth::{AuthCredentials, auth_file_path, load_auth, save_auth, delete_auth, is_authenticated};
pub use client::{
    ApiClient, ApiError, UserInfo,
    ConceptDto, SuggestionDto, ClassificationDto,
};
pub use gateway::RemoteClosing;
