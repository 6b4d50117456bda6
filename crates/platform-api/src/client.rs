//! Data API v3 client.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::model::{
    self, ChannelRef, Rating, SaveOutcome, SearchKind, SearchResponse, SearchResult,
    SubscribeOutcome, WireCommentThread, WirePlaylist, WirePlaylistItems, WirePlaylistList,
    WireSearchResponse, WireVideoList,
};
use crate::token::TokenProvider;

pub(crate) const SAVED_PLAYLIST_TITLE: &str = "Saved Videos";

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const SEARCH_PAGE_SIZE: u32 = 10;

/// Platform operations the action adapters need.
///
/// [`DataApiClient`] is the production implementation; tests substitute an
/// in-memory fake.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    async fn search(&self, query: &str, kind: SearchKind) -> Result<SearchResponse, ApiError>;

    async fn rate_video(&self, video_id: &str, rating: Rating) -> Result<(), ApiError>;

    async fn post_comment(&self, video_id: &str, text: &str) -> Result<String, ApiError>;

    async fn save_video(&self, video_id: &str) -> Result<SaveOutcome, ApiError>;

    async fn subscribe(&self, channel_id: &str) -> Result<SubscribeOutcome, ApiError>;

    /// Resolve a channel by display name via a channel-typed search.
    async fn find_channel(&self, name: &str) -> Result<ChannelRef, ApiError>;

    /// Resolve the channel that uploaded a video.
    async fn channel_of_video(&self, video_id: &str) -> Result<ChannelRef, ApiError>;
}

/// HTTP client for the Data API v3.
pub struct DataApiClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
    base_url: String,
    /// Resolved "Saved Videos" playlist id, cached for the session.
    saved_playlist_id: Mutex<Option<String>>,
}

impl DataApiClient {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self::with_base_url(tokens, DEFAULT_BASE_URL)
    }

    /// Override the endpoint, used by tests pointed at a local server.
    pub fn with_base_url(tokens: Arc<dyn TokenProvider>, base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            tokens,
            base_url: base_url.into(),
            saved_playlist_id: Mutex::new(None),
        }
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<reqwest::Response, ApiError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "GET");
        Ok(self
            .http
            .get(&url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await?)
    }

    async fn post(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let token = self.tokens.access_token().await?;
        let url = format!("{}/{path}", self.base_url);
        debug!(%url, "POST");
        let mut req = self.http.post(&url).query(query).bearer_auth(token);
        if let Some(body) = body {
            req = req.json(body);
        }
        Ok(req.send().await?)
    }

    /// Collapse a non-success response into `ApiError::Status`, preserving
    /// the body so callers can inspect API reason codes.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "API call failed");
        Err(ApiError::status(status.as_u16(), body))
    }

    async fn fetch_search(
        &self,
        query: &str,
        kind: SearchKind,
    ) -> Result<SearchResponse, ApiError> {
        let max_results = SEARCH_PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "snippet"),
            ("q", query),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(type_param) = kind.type_param() {
            params.push(("type", type_param));
        }
        let response = Self::check(self.get("search", &params).await?).await?;
        let wire: WireSearchResponse = response.json().await?;
        let total_results = wire.page_info.map(|p| p.total_results).unwrap_or_default();
        let results: Vec<SearchResult> = wire
            .items
            .into_iter()
            .map(|item| item.flatten())
            .collect();
        debug!(query, hits = results.len(), "search complete");
        Ok(SearchResponse {
            query: query.to_string(),
            total_results,
            results,
        })
    }

    /// Find the session's "Saved Videos" playlist, creating it on first use.
    ///
    /// A cached id can go stale if the playlist is deleted out of band; the
    /// save path handles that by dropping the cache and retrying once.
    async fn ensure_saved_playlist(&self) -> Result<String, ApiError> {
        let mut cached = self.saved_playlist_id.lock().await;
        if let Some(id) = cached.as_ref() {
            return Ok(id.clone());
        }

        let response = Self::check(
            self.get(
                "playlists",
                &[("part", "snippet"), ("mine", "true"), ("maxResults", "50")],
            )
            .await?,
        )
        .await?;
        let wire: WirePlaylistList = response.json().await?;
        if let Some(existing) = wire
            .items
            .into_iter()
            .find(|p| p.snippet.title == SAVED_PLAYLIST_TITLE)
        {
            debug!(playlist_id = %existing.id, "found existing saved playlist");
            *cached = Some(existing.id.clone());
            return Ok(existing.id);
        }

        let body = model::saved_playlist_body();
        let response = Self::check(
            self.post("playlists", &[("part", "snippet,status")], Some(&body))
                .await?,
        )
        .await?;
        let created: WirePlaylist = response.json().await?;
        info!(playlist_id = %created.id, "created saved playlist");
        *cached = Some(created.id.clone());
        Ok(created.id)
    }

    async fn playlist_contains(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<bool, ApiError> {
        let response = Self::check(
            self.get(
                "playlistItems",
                &[
                    ("part", "snippet"),
                    ("playlistId", playlist_id),
                    ("videoId", video_id),
                ],
            )
            .await?,
        )
        .await?;
        let wire: WirePlaylistItems = response.json().await?;
        Ok(wire.items.iter().any(|item| {
            item.snippet
                .resource_id
                .as_ref()
                .and_then(|r| r.video_id.as_deref())
                == Some(video_id)
        }))
    }

    async fn insert_playlist_item(
        &self,
        playlist_id: &str,
        video_id: &str,
    ) -> Result<reqwest::Response, ApiError> {
        let body = model::playlist_item_body(playlist_id, video_id);
        self.post("playlistItems", &[("part", "snippet")], Some(&body))
            .await
    }
}

/// True when an error body carries the given API reason code.
fn has_reason(body: &str, reason: &str) -> bool {
    body.contains(reason)
}

#[async_trait]
impl PlatformApi for DataApiClient {
    async fn search(&self, query: &str, kind: SearchKind) -> Result<SearchResponse, ApiError> {
        self.fetch_search(query, kind).await
    }

    async fn rate_video(&self, video_id: &str, rating: Rating) -> Result<(), ApiError> {
        let response = self
            .post(
                "videos/rate",
                &[("id", video_id), ("rating", rating.as_str())],
                None,
            )
            .await?;
        Self::check(response).await?;
        info!(video_id, rating = rating.as_str(), "video rated");
        Ok(())
    }

    async fn post_comment(&self, video_id: &str, text: &str) -> Result<String, ApiError> {
        let body = model::comment_insert_body(video_id, text);
        let response = Self::check(
            self.post("commentThreads", &[("part", "snippet")], Some(&body))
                .await?,
        )
        .await?;
        let thread: WireCommentThread = response.json().await?;
        info!(video_id, thread_id = %thread.id, "comment posted");
        Ok(thread.id)
    }

    async fn save_video(&self, video_id: &str) -> Result<SaveOutcome, ApiError> {
        let playlist_id = self.ensure_saved_playlist().await?;

        if self.playlist_contains(&playlist_id, video_id).await? {
            return Ok(SaveOutcome::AlreadySaved);
        }

        let response = self.insert_playlist_item(&playlist_id, video_id).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(SaveOutcome::Saved {
                video_id: video_id.to_string(),
            });
        }

        let body = response.text().await.unwrap_or_default();
        if status == StatusCode::CONFLICT || has_reason(&body, "videoAlreadyInPlaylist") {
            return Ok(SaveOutcome::AlreadySaved);
        }
        if status == StatusCode::NOT_FOUND && has_reason(&body, "playlistNotFound") {
            // The cached playlist was deleted out of band. Recreate and
            // retry the insert once.
            warn!(playlist_id, "cached playlist gone, recreating");
            self.saved_playlist_id.lock().await.take();
            let playlist_id = self.ensure_saved_playlist().await?;
            let retry = Self::check(self.insert_playlist_item(&playlist_id, video_id).await?)
                .await;
            return match retry {
                Ok(_) => Ok(SaveOutcome::Saved {
                    video_id: video_id.to_string(),
                }),
                Err(err) => Err(err),
            };
        }
        Err(ApiError::status(status.as_u16(), body))
    }

    async fn subscribe(&self, channel_id: &str) -> Result<SubscribeOutcome, ApiError> {
        let body = model::subscription_body(channel_id);
        let response = self
            .post("subscriptions", &[("part", "snippet")], Some(&body))
            .await?;
        let status = response.status();
        if status.is_success() {
            let parsed: Value = response.json().await?;
            let channel_title = parsed["snippet"]["title"]
                .as_str()
                .unwrap_or(channel_id)
                .to_string();
            info!(channel_id, "subscribed");
            return Ok(SubscribeOutcome::Subscribed { channel_title });
        }
        let text = response.text().await.unwrap_or_default();
        if has_reason(&text, "subscriptionDuplicate") {
            return Ok(SubscribeOutcome::AlreadySubscribed);
        }
        Err(ApiError::status(status.as_u16(), text))
    }

    async fn find_channel(&self, name: &str) -> Result<ChannelRef, ApiError> {
        let response = self.fetch_search(name, SearchKind::Channel).await?;
        let hit = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("Channel not found: {name}")))?;
        Ok(ChannelRef {
            channel_id: hit.id,
            channel_title: hit.title,
        })
    }

    async fn channel_of_video(&self, video_id: &str) -> Result<ChannelRef, ApiError> {
        let response = Self::check(
            self.get("videos", &[("part", "snippet"), ("id", video_id)])
                .await?,
        )
        .await?;
        let wire: WireVideoList = response.json().await?;
        let video = wire
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiError::NotFound(format!("Video not found: {video_id}")))?;
        Ok(ChannelRef {
            channel_id: video.snippet.channel_id,
            channel_title: video.snippet.channel_title,
        })
    }
}
