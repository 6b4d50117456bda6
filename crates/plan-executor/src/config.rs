//! Timing knobs for plan execution.

use std::time::Duration;

/// Delays and timeouts used by the executor and the resumption loader.
///
/// The defaults are the empirically tuned values from the original agent:
/// generous enough for the platform's async UI to settle, short enough that
/// a plan never feels stuck.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Upper bound on the video-ready poll; execution proceeds regardless
    /// once this elapses.
    pub ready_timeout: Duration,
    /// Interval between readiness checks.
    pub ready_poll_interval: Duration,
    /// Extra pause after the page reports ready, for player initialization.
    pub ready_settle_delay: Duration,
    /// Pause between consecutive in-page steps.
    pub inter_step_delay: Duration,
    /// Pause after a page activation before replaying a checkpoint.
    pub resume_delay: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            ready_timeout: Duration::from_secs(5),
            ready_poll_interval: Duration::from_millis(200),
            ready_settle_delay: Duration::from_secs(1),
            inter_step_delay: Duration::from_millis(800),
            resume_delay: Duration::from_secs(1),
        }
    }
}
