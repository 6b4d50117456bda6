//! OAuth token boundary.

use async_trait::async_trait;

use crate::error::ApiError;

/// Source of bearer tokens for Data API calls.
///
/// The interactive OAuth flow itself lives with the host (the browser's
/// identity API in the original environment); this crate only asks for a
/// currently valid token before each call.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String, ApiError>;
}

/// Fixed-token provider for tests and short-lived sessions.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, ApiError> {
        if self.token.is_empty() {
            return Err(ApiError::Auth("no access token configured".to_string()));
        }
        Ok(self.token.clone())
    }
}
