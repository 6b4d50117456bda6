//! Turns a free-form user command into an executable action plan.
//!
//! Two planners implement the same [`Planner`] boundary: [`GeminiPlanner`]
//! asks a hosted language model to emit the JSON plan shape, and
//! [`RuleBasedPlanner`] covers the common phrasings deterministically for
//! tests and offline use. Both resolve to a [`PlanOutcome`], which is either
//! a runnable [`Plan`](tubepilot_core_types::Plan) or a fallback with manual
//! instructions when the command cannot be expressed in the action set.

pub mod error;
pub mod gemini;
pub mod planner;
pub mod rule_based;
pub mod wire;

pub use error::PlannerError;
pub use gemini::GeminiPlanner;
pub use planner::{PlanOutcome, Planner};
pub use rule_based::RuleBasedPlanner;
