//! Deterministic planner covering the common command phrasings.
//!
//! Used for tests and offline sessions. It honors the same contract as the
//! model-backed planner: navigation steps first at tier 1, interactions
//! after at tier 2, fallback for anything outside the action set.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use tubepilot_core_types::{Action, Plan, PlanStep, Priority, StepParameters};

use crate::error::PlannerError;
use crate::planner::{PlanOutcome, Planner};

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("static regex"));

static PLAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:play|watch)\s+(.+)").expect("static regex"));

static SEARCH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:search for|search|find)\s+(.+)").expect("static regex"));

static COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bcomment\s+['"]([^'"]+)['"]"#).expect("static regex"));

static SUBSCRIBE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bsubscribe\s+to\s+(.+)").expect("static regex"));

/// Word-boundary "like" that does not fire inside "dislike".
static LIKE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\blike\b").expect("static regex"));

const UNSUPPORTED: &[(&str, &str)] = &[
    (
        "download",
        "Downloading videos is not supported. Use the platform's official \
         offline feature instead:\n1. Open the video\n2. Use the Download \
         button below the player (requires a premium subscription)",
    ),
    (
        "quality",
        "Changing video quality is not automated. To do it manually:\n1. Click \
         the Settings (gear) icon in the player\n2. Select 'Quality'\n3. Choose \
         the resolution you want",
    ),
];

/// Rule-based planner for the supported command phrasings.
#[derive(Debug, Default, Clone)]
pub struct RuleBasedPlanner;

impl RuleBasedPlanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Planner for RuleBasedPlanner {
    async fn plan(&self, command: &str) -> Result<PlanOutcome, PlannerError> {
        let command = command.trim();
        if command.is_empty() {
            return Err(PlannerError::invalid_command("empty command"));
        }
        let lower = command.to_lowercase();

        for (keyword, instructions) in UNSUPPORTED {
            if lower.contains(keyword) {
                return Ok(PlanOutcome::Fallback {
                    explanation: (*instructions).to_string(),
                });
            }
        }

        let mut steps = Vec::new();

        if let Some(step) = navigation_step(command, &lower) {
            steps.push(step);
        }
        steps.extend(interaction_steps(command, &lower));

        if steps.is_empty() {
            return Ok(PlanOutcome::Fallback {
                explanation: format!(
                    "I couldn't map \"{command}\" to a supported action. I can \
                     play or search for videos, and like, dislike, save, \
                     comment on, or subscribe to what's on screen."
                ),
            });
        }
        debug!(steps = steps.len(), "rule-based plan built");
        Ok(PlanOutcome::Plan(Plan::new(steps)))
    }
}

fn navigation_step(command: &str, lower: &str) -> Option<PlanStep> {
    if let Some(url) = URL_RE.find(command) {
        let url = url.as_str().trim_end_matches([',', '.']);
        return Some(
            PlanStep::new(Action::Play, Priority::Navigation)
                .with_parameters(StepParameters {
                    url: Some(url.to_string()),
                    ..StepParameters::default()
                })
                .with_explanation("Playing the linked video"),
        );
    }
    if let Some(captures) = PLAY_RE.captures(lower) {
        let query = clause(&captures[1]);
        if !query.is_empty() {
            return Some(
                PlanStep::new(Action::Play, Priority::Navigation)
                    .with_parameters(StepParameters::with_query(&query))
                    .with_explanation(format!("Playing {query}")),
            );
        }
    }
    if let Some(captures) = SEARCH_RE.captures(lower) {
        let query = clause(&captures[1]);
        if !query.is_empty() {
            return Some(
                PlanStep::new(Action::Search, Priority::Navigation)
                    .with_parameters(StepParameters::with_query(&query))
                    .with_explanation(format!("Searching for {query}")),
            );
        }
    }
    None
}

fn interaction_steps(command: &str, lower: &str) -> Vec<PlanStep> {
    let mut steps = Vec::new();

    if lower.contains("dislike") {
        steps.push(
            PlanStep::new(Action::Dislike, Priority::Interaction)
                .with_explanation("Disliking the video"),
        );
    } else if LIKE_RE.is_match(lower) {
        steps.push(
            PlanStep::new(Action::Like, Priority::Interaction)
                .with_explanation("Liking the video"),
        );
    }

    if lower.contains("save") {
        steps.push(
            PlanStep::new(Action::Save, Priority::Interaction)
                .with_explanation("Saving the video to the Saved Videos playlist"),
        );
    }

    // Comment text keeps the user's original casing, so capture from the
    // untouched command.
    if let Some(captures) = COMMENT_RE.captures(command) {
        steps.push(
            PlanStep::new(Action::Comment, Priority::Interaction)
                .with_parameters(StepParameters::with_text(&captures[1]))
                .with_explanation("Commenting on the video"),
        );
    }

    if lower.contains("subscribe") {
        let mut parameters = StepParameters::default();
        if let Some(captures) = SUBSCRIBE_RE.captures(command) {
            let name = channel_name(&captures[1]);
            if !name.is_empty() {
                parameters = StepParameters::with_channel_name(name);
            }
        }
        steps.push(
            PlanStep::new(Action::Subscribe, Priority::Interaction)
                .with_parameters(parameters)
                .with_explanation("Subscribing to the channel"),
        );
    }

    steps
}

/// First clause of a compound command: everything before ", " or " and ".
fn clause(raw: &str) -> String {
    let raw = raw.trim();
    let cut = raw
        .find(", ")
        .into_iter()
        .chain(raw.find(" and "))
        .min()
        .unwrap_or(raw.len());
    raw[..cut].trim().to_string()
}

/// Channel name from a "subscribe to ..." clause, shorn of trailing
/// possessives and the word "channel".
fn channel_name(raw: &str) -> String {
    let mut name = clause(raw);
    for suffix in ["'s channel", " channel", "the channel"] {
        if let Some(stripped) = name.strip_suffix(suffix) {
            name = stripped.trim().to_string();
        }
    }
    if let Some(stripped) = name.strip_prefix("the ") {
        name = stripped.to_string();
    }
    name
}
