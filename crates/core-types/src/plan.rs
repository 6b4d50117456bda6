//! Plan, step, and checkpoint model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier assigned to a plan when the planner produces it.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PlanId(pub String);

impl PlanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for PlanId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PlanId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of actions a plan step can request.
///
/// Serialized with the wire names the planner prompt teaches the model;
/// anything outside the known set deserializes to [`Action::Unknown`], the
/// explicit "not implemented" variant, so a creative model reply can never
/// abort a plan at parse time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Action {
    #[serde(rename = "search")]
    Search,
    #[serde(rename = "play_video")]
    Play,
    #[serde(rename = "like_video")]
    Like,
    #[serde(rename = "dislike_video")]
    Dislike,
    #[serde(rename = "save_video")]
    Save,
    #[serde(rename = "comment_video")]
    Comment,
    #[serde(rename = "subscribe_channel")]
    Subscribe,
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl Action {
    /// Navigation actions tear down the page context when they run.
    pub fn is_navigation(&self) -> bool {
        matches!(self, Action::Search | Action::Play)
    }

    /// Wire name as taught to the planner model.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Action::Search => "search",
            Action::Play => "play_video",
            Action::Like => "like_video",
            Action::Dislike => "dislike_video",
            Action::Save => "save_video",
            Action::Comment => "comment_video",
            Action::Subscribe => "subscribe_channel",
            Action::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Priority tier of a step.
///
/// Not a sort key: the plan's list order stays authoritative. The tier only
/// gates transition behavior: the executor waits for page readiness when
/// moving from a `Navigation` step to an `Interaction` step, and paces
/// consecutive `Interaction` steps with a short delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Priority {
    /// Tier 1: causes a navigation (search, play).
    Navigation,
    /// Tier 2: acts on the already-loaded page.
    Interaction,
}

impl From<u8> for Priority {
    fn from(tier: u8) -> Self {
        match tier {
            1 => Priority::Navigation,
            // The original runtime defaulted missing/odd tiers to 2.
            _ => Priority::Interaction,
        }
    }
}

impl From<Priority> for u8 {
    fn from(priority: Priority) -> Self {
        match priority {
            Priority::Navigation => 1,
            Priority::Interaction => 2,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Interaction
    }
}

/// Action-specific parameters; validity is action-dependent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepParameters {
    /// Search term for `search`/`play_video`, or channel lookup term.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Direct video URL when the user supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Comment body for `comment_video`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Channel name for `subscribe_channel`.
    #[serde(default, rename = "channelName", skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
}

impl StepParameters {
    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn with_channel_name(name: impl Into<String>) -> Self {
        Self {
            channel_name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// One planned action with its priority tier and narration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanStep {
    pub action: Action,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub parameters: StepParameters,
    /// Human-readable progress narration shown to the user.
    #[serde(default)]
    pub explanation: String,
}

impl PlanStep {
    pub fn new(action: Action, priority: Priority) -> Self {
        Self {
            action,
            priority,
            parameters: StepParameters::default(),
            explanation: String::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: StepParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = explanation.into();
        self
    }
}

/// Ordered sequence of steps produced from one user command.
///
/// Immutable once execution begins; a different result means issuing a new
/// plan, never mutating a running one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    pub id: PlanId,
    pub steps: Vec<PlanStep>,
}

impl Plan {
    pub fn new(steps: Vec<PlanStep>) -> Self {
        Self {
            id: PlanId::new(),
            steps,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// The one piece of state that outlives a page navigation.
///
/// Written immediately before a navigation step fires when further steps
/// remain, read once on the next page activation, and cleared after a single
/// resumption attempt. At most one checkpoint exists at a time; later writes
/// overwrite earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Checkpoint {
    pub steps: Vec<PlanStep>,
    pub next_index: usize,
}

impl Checkpoint {
    pub fn new(steps: Vec<PlanStep>, next_index: usize) -> Self {
        Self { steps, next_index }
    }

    /// Whether this checkpoint still points at executable steps.
    ///
    /// A stale or corrupted slot (index past the end, empty step list) must
    /// be treated as "nothing to resume" rather than replayed.
    pub fn is_resumable(&self) -> bool {
        !self.steps.is_empty() && self.next_index < self.steps.len()
    }
}
