//! Persistent storage for the plan executor's checkpoint slot.
//!
//! The executor needs one durable fact across a page navigation: the
//! remaining steps and where to resume. [`KeyValueStore`] is the boundary to
//! whatever durability the host provides (the extension's local storage in
//! the original environment); [`CheckpointStore`] layers the single-slot
//! discipline on top: write before navigating, read once on load, clear
//! after one resumption attempt.

pub mod checkpoint;
pub mod file;
pub mod memory;

pub use checkpoint::{CheckpointStore, CHECKPOINT_KEY};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors raised by store backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store backend error: {0}")]
    Backend(String),
}

/// Durable key-value storage surviving a page reload within one profile.
///
/// Not shared across concurrently executing unrelated sessions; the single
/// checkpoint slot relies on one page context being active at a time.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
