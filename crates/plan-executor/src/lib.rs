//! Multi-step plan execution.
//!
//! This crate owns the one genuinely stateful piece of the agent: running an
//! ordered action plan against a page that may navigate away mid-plan. A
//! navigation destroys the executing context, so the executor persists a
//! checkpoint (remaining steps + resume index) *before* triggering the
//! navigation side effect and returns immediately; on the next page
//! activation the [`ResumptionLoader`] detects the checkpoint, waits for the
//! page to settle, and re-enters the executor at the stored index.
//!
//! Failure of any single step never aborts the rest of the plan: execution
//! is best-effort, one result entry per step, with everything surfaced to
//! the user as it happens.

pub mod config;
pub mod executor;
pub mod loader;

pub use config::ExecutorConfig;
pub use executor::{PlanExecutor, PlanSummary};
pub use loader::ResumptionLoader;
