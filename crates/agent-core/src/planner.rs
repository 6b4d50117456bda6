use async_trait::async_trait;

use tubepilot_core_types::Plan;

use crate::error::PlannerError;

/// What a command translates to.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    /// Runnable plan, in execution order.
    Plan(Plan),
    /// The command cannot be expressed in the action set; the explanation
    /// carries manual instructions to show the user instead.
    Fallback { explanation: String },
}

/// Command-to-plan boundary, so LLM-backed and deterministic planners are
/// interchangeable.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn plan(&self, command: &str) -> Result<PlanOutcome, PlannerError>;
}
