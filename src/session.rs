//! One conversational agent session.

use std::sync::Arc;

use tracing::info;

use tubepilot_action_adapters::Notifier;
use tubepilot_agent_core::{PlanOutcome, Planner, PlannerError};
use tubepilot_core_types::NotificationKind;
use tubepilot_plan_executor::{PlanExecutor, PlanSummary, ResumptionLoader};

/// What a handled command amounted to.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The plan ran (possibly up to a navigation boundary).
    Executed(PlanSummary),
    /// The command is outside the action set; the user got manual
    /// instructions instead.
    ManualInstructions(String),
}

/// Planner, executor and loader bundled behind one command entry point.
pub struct AgentSession {
    planner: Arc<dyn Planner>,
    executor: Arc<PlanExecutor>,
    loader: ResumptionLoader,
    notifier: Arc<dyn Notifier>,
}

impl AgentSession {
    pub fn new(
        planner: Arc<dyn Planner>,
        executor: Arc<PlanExecutor>,
        loader: ResumptionLoader,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            planner,
            executor,
            loader,
            notifier,
        }
    }

    /// Replays a checkpoint left by a previous navigation, if one exists.
    ///
    /// Call once per page activation, before handling new commands.
    pub async fn activate(&self) -> Option<PlanSummary> {
        self.loader.resume_pending().await
    }

    /// Plans and executes one user command.
    pub async fn handle_command(&self, command: &str) -> Result<SessionOutcome, PlannerError> {
        info!(command, "handling command");
        match self.planner.plan(command).await? {
            PlanOutcome::Fallback { explanation } => {
                self.notifier
                    .notify(
                        NotificationKind::Agent,
                        "I can't do that directly, but here's how to do it yourself:",
                    )
                    .await;
                for line in explanation.lines().filter(|line| !line.trim().is_empty()) {
                    self.notifier.notify(NotificationKind::Info, line).await;
                }
                Ok(SessionOutcome::ManualInstructions(explanation))
            }
            PlanOutcome::Plan(plan) => {
                let summary = self.executor.run_plan(&plan).await;
                if !summary.navigation_pending {
                    self.notifier
                        .notify(NotificationKind::Agent, &summary.message)
                        .await;
                }
                Ok(SessionOutcome::Executed(summary))
            }
        }
    }
}
