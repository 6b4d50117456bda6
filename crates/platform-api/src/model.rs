//! Request/response models for the Data API surface this crate uses.

use serde::Deserialize;

/// What a search should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Any,
    Video,
    Channel,
}

impl SearchKind {
    /// Value for the API's `type` filter; `Any` sends no filter.
    pub fn type_param(&self) -> Option<&'static str> {
        match self {
            SearchKind::Any => None,
            SearchKind::Video => Some("video"),
            SearchKind::Channel => Some("channel"),
        }
    }
}

/// A video rating as accepted by the `videos/rate` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rating {
    Like,
    Dislike,
    /// Removes an existing rating.
    None,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Like => "like",
            Rating::Dislike => "dislike",
            Rating::None => "none",
        }
    }
}

/// One search hit, flattened from the API's nested shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Video id or channel id depending on the hit's kind.
    pub id: String,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub channel_title: String,
    pub channel_id: String,
}

/// Search results for one query.
#[derive(Debug, Clone, Default)]
pub struct SearchResponse {
    pub query: String,
    pub total_results: u64,
    pub results: Vec<SearchResult>,
}

/// A resolved channel reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    pub channel_id: String,
    pub channel_title: String,
}

/// Result of saving a video to the agent's "Saved Videos" playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { video_id: String },
    /// The video was already in the playlist; the user's intent is met.
    AlreadySaved,
}

impl SaveOutcome {
    pub fn message(&self) -> String {
        match self {
            SaveOutcome::Saved { video_id } => {
                format!("Video saved to \"Saved Videos\" playlist! (ID: {video_id})")
            }
            SaveOutcome::AlreadySaved => {
                "Video is already in your \"Saved Videos\" playlist.".to_string()
            }
        }
    }
}

/// Result of a subscription attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscribeOutcome {
    Subscribed { channel_title: String },
    /// Already subscribed; informational, not a failure.
    AlreadySubscribed,
}

impl SubscribeOutcome {
    pub fn message(&self) -> String {
        match self {
            SubscribeOutcome::Subscribed { channel_title } => {
                format!("Subscribed to {channel_title}!")
            }
            SubscribeOutcome::AlreadySubscribed => {
                "You are already subscribed to this channel.".to_string()
            }
        }
    }
}

// Wire shapes, kept private to the crate and flattened into the public
// models above.

#[derive(Debug, Deserialize)]
pub(crate) struct WireSearchResponse {
    #[serde(default)]
    pub items: Vec<WireSearchItem>,
    #[serde(rename = "pageInfo")]
    pub page_info: Option<WirePageInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePageInfo {
    #[serde(rename = "totalResults", default)]
    pub total_results: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSearchItem {
    pub id: WireSearchId,
    pub snippet: WireSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSearchId {
    #[serde(default)]
    pub kind: String,
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "channelTitle", default)]
    pub channel_title: String,
    #[serde(rename = "channelId", default)]
    pub channel_id: String,
}

impl WireSearchItem {
    pub fn flatten(self) -> SearchResult {
        SearchResult {
            id: self
                .id
                .video_id
                .or(self.id.channel_id)
                .unwrap_or_default(),
            kind: self.id.kind.replace("youtube#", ""),
            title: self.snippet.title,
            description: self.snippet.description,
            channel_title: self.snippet.channel_title,
            channel_id: self.snippet.channel_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePlaylistList {
    #[serde(default)]
    pub items: Vec<WirePlaylist>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePlaylist {
    pub id: String,
    pub snippet: WirePlaylistSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePlaylistSnippet {
    #[serde(default)]
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePlaylistItems {
    #[serde(default)]
    pub items: Vec<WirePlaylistItem>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePlaylistItem {
    pub snippet: WirePlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WirePlaylistItemSnippet {
    #[serde(rename = "resourceId")]
    pub resource_id: Option<WireResourceId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireResourceId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVideoList {
    #[serde(default)]
    pub items: Vec<WireVideo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireVideo {
    pub snippet: WireSnippet,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireCommentThread {
    #[serde(default)]
    pub id: String,
}

/// Body for a comment-thread insert.
pub(crate) fn comment_insert_body(video_id: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "snippet": {
            "videoId": video_id,
            "topLevelComment": { "snippet": { "textOriginal": text } },
        }
    })
}

/// Body for a playlist-item insert.
pub(crate) fn playlist_item_body(playlist_id: &str, video_id: &str) -> serde_json::Value {
    serde_json::json!({
        "snippet": {
            "playlistId": playlist_id,
            "resourceId": { "kind": "youtube#video", "videoId": video_id },
        }
    })
}

/// Body for a subscription insert.
pub(crate) fn subscription_body(channel_id: &str) -> serde_json::Value {
    serde_json::json!({
        "snippet": {
            "resourceId": { "kind": "youtube#channel", "channelId": channel_id },
        }
    })
}

/// Body for creating the agent's private "Saved Videos" playlist.
pub(crate) fn saved_playlist_body() -> serde_json::Value {
    serde_json::json!({
        "snippet": {
            "title": super::client::SAVED_PLAYLIST_TITLE,
            "description": "Videos saved via TubePilot",
            "defaultLanguage": "en",
        },
        "status": { "privacyStatus": "private" },
    })
}
