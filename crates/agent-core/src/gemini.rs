//! LLM-backed planner against the Gemini generateContent endpoint.

use serde_json::{json, Value};
use tracing::debug;

use async_trait::async_trait;

use crate::error::PlannerError;
use crate::planner::{PlanOutcome, Planner};
use crate::wire::decode_reply;

const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash-exp:generateContent";

/// Planner that asks a Gemini model to produce the JSON plan shape.
pub struct GeminiPlanner {
    http: reqwest::Client,
    api_key: String,
    endpoint: String,
}

impl GeminiPlanner {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Override the endpoint, used by tests pointed at a local server.
    pub fn with_endpoint(api_key: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn extract_text(body: &Value) -> Result<&str, PlannerError> {
        body["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| PlannerError::provider("reply has no candidate text"))
    }
}

#[async_trait]
impl Planner for GeminiPlanner {
    async fn plan(&self, command: &str) -> Result<PlanOutcome, PlannerError> {
        if command.trim().is_empty() {
            return Err(PlannerError::invalid_command("empty command"));
        }
        if self.api_key.is_empty() {
            return Err(PlannerError::provider("no API key configured"));
        }

        let prompt = planning_prompt(command);
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        let response = self
            .http
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PlannerError::provider(format!(
                "model endpoint returned {status}"
            )));
        }
        let parsed: Value = response.json().await?;
        let text = Self::extract_text(&parsed)?;
        debug!(reply_len = text.len(), "model replied");
        decode_reply(text)
    }
}

/// Prompt teaching the model the action vocabulary, the two priority tiers,
/// the ordering rules, and the fallback shape for unsupported requests.
fn planning_prompt(command: &str) -> String {
    format!(
        r#"You are a video platform automation assistant. Analyze this user command and convert it into a sequence of actions with proper ordering.

User command: "{command}"

Available actions with hierarchical priority:
1. NAVIGATION ACTIONS (Priority 1 - Execute first):
   - "search": Search for videos/channels (navigates to search results page)
   - "play_video": Play a video by search term or URL (navigates to video page)

2. VIDEO INTERACTION ACTIONS (Priority 2 - Execute after navigation completes):
   - "like_video": Like the current video
   - "dislike_video": Dislike the current video
   - "save_video": Save the current video to a playlist
   - "comment_video": Post a comment on the current video
   - "subscribe_channel": Subscribe to a channel

CRITICAL ORDERING RULES:
- "search" or "play_video" MUST come BEFORE like/dislike/save/comment actions
- If user says "play X and like it", the order is: [play_video, like_video]
- If standalone like/dislike/save/comment (without play), they execute on the current video
- Multiple interaction actions can follow a single navigation action

IMPORTANT: If the user's request CANNOT be fulfilled with the available actions (e.g., "download video", "change video quality", "create playlist"), return:
{{"steps": [], "fallback": true, "explanation": "Step-by-step manual instructions for achieving this task"}}

Return JSON format:
{{"steps": [{{"action": "action_name", "priority": 1 or 2, "parameters": {{"query": "search term", "url": "direct URL if provided", "text": "comment text", "channelName": "channel name for subscribe"}}, "explanation": "Brief explanation of this step"}}]}}

Examples:
- "Play Despacito" -> {{"steps": [{{"action": "play_video", "priority": 1, "parameters": {{"query": "Despacito"}}, "explanation": "Searching and playing Despacito"}}]}}
- "Like this video" -> {{"steps": [{{"action": "like_video", "priority": 2, "parameters": {{}}, "explanation": "Liking the current video"}}]}}
- "Play Despacito and like it" -> {{"steps": [{{"action": "play_video", "priority": 1, "parameters": {{"query": "Despacito"}}, "explanation": "Playing Despacito"}}, {{"action": "like_video", "priority": 2, "parameters": {{}}, "explanation": "Liking the video"}}]}}

Remember: ALWAYS put search/play_video FIRST (priority 1), then all other actions SECOND (priority 2). For unsupported actions, use fallback mode."#
    )
}
