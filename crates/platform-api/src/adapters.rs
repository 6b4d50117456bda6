//! API-backed implementation of the action capabilities.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use tubepilot_action_adapters::{ActionAdapters, AdapterError, Navigator, PageProbe};
use tubepilot_core_types::urls::{search_results_url, video_id_from_url, watch_url};
use tubepilot_core_types::StepParameters;

use crate::client::PlatformApi;
use crate::error::ApiError;
use crate::model::{Rating, SearchKind};

const NOT_ON_VIDEO_PAGE: &str =
    "Could not determine video ID. Make sure you're on a video page.";

/// Adapters that satisfy plan actions through the Data API and a navigator.
///
/// In-page actions (like, save, comment, subscribe) target whatever video
/// the probed page currently shows; navigation actions hand a URL to the
/// [`Navigator`] and expect not to outlive the page change.
pub struct ApiAdapters {
    api: Arc<dyn PlatformApi>,
    page: Arc<dyn PageProbe>,
    navigator: Arc<dyn Navigator>,
}

impl ApiAdapters {
    pub fn new(
        api: Arc<dyn PlatformApi>,
        page: Arc<dyn PageProbe>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            page,
            navigator,
        }
    }

    /// Video id of the page the executor is currently on.
    async fn current_video_id(&self) -> Result<String, AdapterError> {
        let url = self.page.current_url().await;
        video_id_from_url(&url).ok_or_else(|| AdapterError::missing_target(NOT_ON_VIDEO_PAGE))
    }

    async fn rate_current(&self, rating: Rating) -> Result<String, AdapterError> {
        let video_id = self.current_video_id().await?;
        self.api
            .rate_video(&video_id, rating)
            .await
            .map_err(map_api_error)?;
        Ok(match rating {
            Rating::Like => "Video liked!".to_string(),
            Rating::Dislike => "Video disliked.".to_string(),
            Rating::None => "Rating removed.".to_string(),
        })
    }
}

fn map_api_error(err: ApiError) -> AdapterError {
    match err {
        ApiError::Auth(message) => AdapterError::Auth(message),
        ApiError::NotFound(message) => AdapterError::missing_target(message),
        other => AdapterError::api(other.to_string()),
    }
}

#[async_trait]
impl ActionAdapters for ApiAdapters {
    async fn search(&self, parameters: &StepParameters) -> Result<String, AdapterError> {
        let query = parameters
            .query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AdapterError::missing_target("No search query provided."))?;
        self.navigator.goto(&search_results_url(query)).await?;
        Ok(format!("Navigating to search results for \"{query}\""))
    }

    async fn play(&self, parameters: &StepParameters) -> Result<String, AdapterError> {
        if let Some(url) = parameters.url.as_deref().filter(|u| !u.is_empty()) {
            self.navigator.goto(url).await?;
            return Ok("Playing video.".to_string());
        }

        let query = parameters
            .query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| {
                AdapterError::missing_target("No video specified. Provide a query or a URL.")
            })?;
        let response = self
            .api
            .search(query, SearchKind::Video)
            .await
            .map_err(map_api_error)?;
        let hit = response
            .results
            .into_iter()
            .find(|r| r.kind == "video")
            .ok_or_else(|| {
                AdapterError::missing_target(format!("No videos found for \"{query}\"."))
            })?;
        debug!(video_id = %hit.id, title = %hit.title, "playing top search hit");
        self.navigator.goto(&watch_url(&hit.id)).await?;
        Ok(format!("Playing: \"{}\" by {}", hit.title, hit.channel_title))
    }

    async fn like(&self, _parameters: &StepParameters) -> Result<String, AdapterError> {
        self.rate_current(Rating::Like).await
    }

    async fn dislike(&self, _parameters: &StepParameters) -> Result<String, AdapterError> {
        self.rate_current(Rating::Dislike).await
    }

    async fn save(&self, _parameters: &StepParameters) -> Result<String, AdapterError> {
        let video_id = self.current_video_id().await?;
        let outcome = self
            .api
            .save_video(&video_id)
            .await
            .map_err(map_api_error)?;
        Ok(outcome.message())
    }

    async fn comment(&self, parameters: &StepParameters) -> Result<String, AdapterError> {
        let text = parameters
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| AdapterError::missing_target("No comment text provided."))?;
        let video_id = self.current_video_id().await?;
        let thread_id = self
            .api
            .post_comment(&video_id, text)
            .await
            .map_err(map_api_error)?;
        Ok(format!("Comment posted (id: {thread_id})"))
    }

    async fn subscribe(&self, parameters: &StepParameters) -> Result<String, AdapterError> {
        // A named channel wins; otherwise fall back to the current video's
        // uploader.
        let channel = match parameters
            .channel_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
        {
            Some(name) => self.api.find_channel(name).await.map_err(map_api_error)?,
            None => {
                let video_id = self.current_video_id().await.map_err(|_| {
                    AdapterError::missing_target(
                        "No channel specified and not on a video page.",
                    )
                })?;
                self.api
                    .channel_of_video(&video_id)
                    .await
                    .map_err(map_api_error)?
            }
        };
        let outcome = self
            .api
            .subscribe(&channel.channel_id)
            .await
            .map_err(map_api_error)?;
        Ok(outcome.message())
    }
}
