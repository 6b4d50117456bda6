use thiserror::Error;

/// Errors emitted while producing a plan from a command.
#[derive(Debug, Error)]
pub enum PlannerError {
    /// The command is empty or otherwise unusable.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The planning backend could not be reached.
    #[error("planner request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered but the reply was not usable.
    #[error("planner backend error: {0}")]
    Provider(String),

    /// The reply did not contain a decodable plan.
    #[error("malformed plan: {0}")]
    MalformedPlan(String),
}

impl PlannerError {
    pub fn invalid_command(message: impl Into<String>) -> Self {
        Self::InvalidCommand(message.into())
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::Provider(message.into())
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedPlan(message.into())
    }
}
