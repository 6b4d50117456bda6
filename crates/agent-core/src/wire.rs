//! Decoding of the JSON plan shape the planner prompt teaches the model.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

use tubepilot_core_types::{Plan, PlanStep};

use crate::error::PlannerError;
use crate::planner::PlanOutcome;

/// Model replies wrap the JSON in prose or code fences; take the outermost
/// brace-delimited span.
static JSON_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex"));

#[derive(Debug, Deserialize)]
struct WirePlan {
    #[serde(default)]
    steps: Vec<PlanStep>,
    #[serde(default)]
    fallback: bool,
    #[serde(default)]
    explanation: Option<String>,
}

/// Decodes a model reply into a plan or a fallback.
///
/// An empty step list without the fallback flag is a malformed reply, not an
/// empty plan.
pub fn decode_reply(reply: &str) -> Result<PlanOutcome, PlannerError> {
    let span = JSON_SPAN
        .find(reply)
        .ok_or_else(|| PlannerError::malformed("reply contains no JSON object"))?;
    let wire: WirePlan = serde_json::from_str(span.as_str())
        .map_err(|err| PlannerError::malformed(err.to_string()))?;

    if wire.fallback {
        let explanation = wire
            .explanation
            .unwrap_or_else(|| "This request is not supported.".to_string());
        return Ok(PlanOutcome::Fallback { explanation });
    }
    if wire.steps.is_empty() {
        return Err(PlannerError::malformed(
            "reply has no steps and no fallback flag",
        ));
    }
    debug!(steps = wire.steps.len(), "decoded plan");
    Ok(PlanOutcome::Plan(Plan::new(wire.steps)))
}
