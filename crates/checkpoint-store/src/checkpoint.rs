//! Single-slot checkpoint persistence.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use tubepilot_core_types::Checkpoint;

use crate::{KeyValueStore, StoreError};

/// Key under which the pending checkpoint lives.
pub const CHECKPOINT_KEY: &str = "pending_checkpoint";

/// The single checkpoint slot.
///
/// Exactly one checkpoint exists at a time; `save` overwrites any previous
/// one. There is no queue of pending plans.
#[derive(Clone)]
pub struct CheckpointStore {
    store: Arc<dyn KeyValueStore>,
}

impl CheckpointStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Reads the pending checkpoint, if any.
    ///
    /// A payload that fails to decode is reported as absent: a corrupted
    /// slot must degrade to "nothing to resume", never to a resumption loop.
    pub async fn load(&self) -> Result<Option<Checkpoint>, StoreError> {
        let Some(value) = self.store.get(CHECKPOINT_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_value::<Checkpoint>(value) {
            Ok(checkpoint) => Ok(Some(checkpoint)),
            Err(err) => {
                warn!(error = %err, "discarding undecodable checkpoint payload");
                Ok(None)
            }
        }
    }

    /// Persists a checkpoint, overwriting any existing slot.
    pub async fn save(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        debug!(
            next_index = checkpoint.next_index,
            steps = checkpoint.steps.len(),
            "persisting checkpoint"
        );
        let value: Value = serde_json::to_value(checkpoint)?;
        self.store.set(CHECKPOINT_KEY, value).await
    }

    /// Removes the slot; a no-op when already empty.
    pub async fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(CHECKPOINT_KEY).await
    }
}
