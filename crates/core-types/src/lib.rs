//! Shared primitives for the TubePilot agent core.
//!
//! Holds the plan/step/checkpoint data model exchanged between the planner,
//! the plan executor, and the persistent checkpoint slot, plus the small
//! URL helpers every layer needs when reasoning about video pages.

pub mod outcome;
pub mod plan;
pub mod urls;

pub use outcome::StepOutcome;
pub use plan::{Action, Checkpoint, Plan, PlanId, PlanStep, Priority, StepParameters};
pub use urls::{is_video_page_url, search_results_url, video_id_from_url, watch_url};

use serde::{Deserialize, Serialize};

/// Category of a message surfaced to the user.
///
/// Mirrors the chat sidebar's message classes: `User` echoes the operator,
/// `System` narrates progress, `Agent` carries action results, and `Info`
/// renders manual-instruction lines from fallback plans.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    User,
    System,
    Agent,
    Info,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            NotificationKind::User => "user",
            NotificationKind::System => "system",
            NotificationKind::Agent => "agent",
            NotificationKind::Info => "info",
        };
        f.write_str(label)
    }
}
