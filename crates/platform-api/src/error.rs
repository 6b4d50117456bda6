//! Platform API error types.

use thiserror::Error;

/// Errors raised while talking to the platform's Data API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable access token.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Transport-level failure (DNS, TLS, connection reset, ...).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// A looked-up entity does not exist (channel, video, playlist).
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}
