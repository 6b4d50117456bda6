//! Per-step execution outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one executed step: a result message plus a failure flag.
///
/// Outcomes accumulate for the duration of a single executor invocation and
/// are discarded after the final summary; they are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepOutcome {
    /// Zero-based index of the step within its plan.
    pub index: usize,
    /// Human-readable result or failure description.
    pub message: String,
    pub failed: bool,
    pub recorded_at: DateTime<Utc>,
}

impl StepOutcome {
    pub fn success(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            message: message.into(),
            failed: false,
            recorded_at: Utc::now(),
        }
    }

    /// Formats the failure entry the way the user sees it.
    pub fn failure(index: usize, reason: impl std::fmt::Display) -> Self {
        Self {
            index,
            message: format!("Step {} failed: {}", index + 1, reason),
            failed: true,
            recorded_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_is_one_based() {
        let outcome = StepOutcome::failure(0, "rate limit");
        assert!(outcome.failed);
        assert_eq!(outcome.message, "Step 1 failed: rate limit");
    }

    #[test]
    fn success_keeps_raw_message() {
        let outcome = StepOutcome::success(3, "Video liked successfully!");
        assert!(!outcome.failed);
        assert_eq!(outcome.message, "Video liked successfully!");
        assert_eq!(outcome.index, 3);
    }
}
