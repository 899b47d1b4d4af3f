//! Engine gateway backed by the PayClose API.

use async_trait::async_trait;

use payclose_engine::{CommitRecord, GatewayError, PersistenceGateway};

use crate::client::{ApiClient, ApiError};

/// One closing on the server, addressable as a commit target.
pub struct RemoteClosing {
    client: ApiClient,
    closing_id: String,
}

impl RemoteClosing {
    pub fn new(client: ApiClient, closing_id: impl Into<String>) -> Self {
        Self {
            client,
            closing_id: closing_id.into(),
        }
    }

    pub fn closing_id(&self) -> &str {
        &self.closing_id
    }
}

impl From<ApiError> for GatewayError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotAuthenticated => GatewayError::NotAuthenticated,
            ApiError::Network(msg) => GatewayError::Network(msg),
            ApiError::Http(code, msg) => GatewayError::Http(code, msg),
            ApiError::Validation(msg) => GatewayError::Validation(msg),
            ApiError::Parse(msg) => GatewayError::Parse(msg),
        }
    }
}

#[async_trait]
impl PersistenceGateway for RemoteClosing {
    async fn persist_batch(&self, records: &[CommitRecord]) -> Result<(), GatewayError> {
        self.client
            .persist_batch(&self.closing_id, records)
            .await
            .map_err(GatewayError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            GatewayError::from(ApiError::NotAuthenticated),
            GatewayError::NotAuthenticated
        );
        assert_eq!(
            GatewayError::from(ApiError::Validation("bad category".into())),
            GatewayError::Validation("bad category".into())
        );
        assert_eq!(
            GatewayError::from(ApiError::Http(503, "unavailable".into())),
            GatewayError::Http(503, "unavailable".into())
        );
        assert_eq!(
            GatewayError::from(ApiError::Network("timeout".into())),
            GatewayError::Network("timeout".into())
        );
        assert_eq!(
            GatewayError::from(ApiError::Parse("truncated".into())),
            GatewayError::Parse("truncated".into())
        );
    }
}
