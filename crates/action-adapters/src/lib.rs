//! Capability boundaries consumed by the plan executor.
//!
//! The executor owns the control flow (ordering, the readiness wait, the
//! checkpoint protocol, failure isolation) and delegates every side effect
//! through the traits here: one adapter call per action, a page probe for
//! readiness, a navigator for the irreversible location change, and a
//! fire-and-forget notification sink. The executor treats all adapters
//! uniformly; it neither inspects failure variants nor retries.

use async_trait::async_trait;
use thiserror::Error;

use tubepilot_core_types::{NotificationKind, StepParameters};

/// Failure raised by an action adapter.
///
/// Idempotent end states ("already subscribed", "already saved") are *not*
/// errors: when the end state already satisfies the user's intent, adapters
/// must return a successful informational string instead.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Authentication with the platform failed or was refused.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The platform API rejected the call.
    #[error("{0}")]
    Api(String),

    /// The action has no usable target (not on a video page, no query, ...).
    #[error("{0}")]
    MissingTarget(String),

    /// Anything else worth surfacing to the user verbatim.
    #[error("{0}")]
    Other(String),
}

impl AdapterError {
    pub fn api(message: impl Into<String>) -> Self {
        Self::Api(message.into())
    }

    pub fn missing_target(message: impl Into<String>) -> Self {
        Self::MissingTarget(message.into())
    }
}

/// One async capability per plan action.
///
/// Every method performs its side effect and resolves to a human-readable
/// result string; `search` and `play` trigger a navigation that is expected
/// to tear down the calling context.
#[async_trait]
pub trait ActionAdapters: Send + Sync {
    /// Navigate to the search-results page for the query.
    async fn search(&self, parameters: &StepParameters) -> Result<String, AdapterError>;

    /// Resolve and navigate to a video (by query or direct URL).
    async fn play(&self, parameters: &StepParameters) -> Result<String, AdapterError>;

    /// Like the currently open video.
    async fn like(&self, parameters: &StepParameters) -> Result<String, AdapterError>;

    /// Dislike the currently open video.
    async fn dislike(&self, parameters: &StepParameters) -> Result<String, AdapterError>;

    /// Save the currently open video to the user's saved playlist.
    async fn save(&self, parameters: &StepParameters) -> Result<String, AdapterError>;

    /// Post a comment on the currently open video.
    async fn comment(&self, parameters: &StepParameters) -> Result<String, AdapterError>;

    /// Subscribe to a channel (named, or the current video's).
    async fn subscribe(&self, parameters: &StepParameters) -> Result<String, AdapterError>;
}

/// Read-only view of the page the executor is driving.
#[async_trait]
pub trait PageProbe: Send + Sync {
    /// Current location of the page.
    async fn current_url(&self) -> String;

    /// Whether the document has finished loading.
    async fn is_loaded(&self) -> bool;
}

/// The navigation side effect.
///
/// Calling `goto` is irreversible from the executor's point of view: the
/// page context that issued it (and all in-memory state) will not survive.
#[async_trait]
pub trait Navigator: Send + Sync {
    async fn goto(&self, url: &str) -> Result<(), AdapterError>;
}

/// Fire-and-forget message sink towards the user interface.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, kind: NotificationKind, text: &str);
}
