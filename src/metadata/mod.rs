use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod models;

pub use models::{ChannelInfo, Thumbnails, VideoRecord};

use crate::resolver::{ChannelLookup, ChannelRef};
use crate::{InsightsError, Result};
use models::{ApiErrorResponse, ApiVideo, ChannelId, ListResponse, PlaylistItem, SearchResult};

/// Largest page / id batch the Data API accepts
const MAX_PAGE_SIZE: usize = 50;

const CHANNEL_PARTS: &str = "snippet,statistics,brandingSettings,contentDetails,status";
const VIDEO_PARTS: &str = "snippet,statistics,contentDetails,status";

/// Connection settings for the metadata service
#[derive(Debug, Clone)]
pub struct MetadataSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Read-only client for the YouTube Data API v3
pub struct MetadataClient {
    client: Client,
    settings: MetadataSettings,
}

impl MetadataClient {
    pub fn new(settings: MetadataSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(InsightsError::MissingCredential);
        }

        let client = Client::builder().timeout(settings.timeout).build()?;

        Ok(Self { client, settings })
    }

    /// Fetch channel snippet, statistics, branding, content details and status
    pub async fn get_channel(&self, channel: &ChannelRef) -> Result<ChannelInfo> {
        let response: ListResponse<ChannelInfo> = self
            .get_json("channels", &[("part", CHANNEL_PARTS), ("id", channel.as_str())])
            .await?;

        response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| InsightsError::NotFound(format!("channel {}", channel)))
    }

    /// List up to `limit` uploads of a channel with full video details.
    ///
    /// Reads the uploads playlist from `channel`'s content details, so no extra channel
    /// request is made. A channel without an uploads playlist yields an empty list.
    pub async fn list_uploaded_videos(&self, channel: &ChannelInfo, limit: usize) -> Result<Vec<VideoRecord>> {
        let Some(playlist_id) = channel.uploads_playlist() else {
            tracing::debug!("Channel {} has no uploads playlist", channel.id);
            return Ok(Vec::new());
        };

        let items: Vec<PlaylistItem> = self
            .collect_pages("playlistItems", &[("part", "snippet"), ("playlistId", playlist_id)], limit)
            .await?;

        let ids: Vec<String> = items
            .into_iter()
            .filter_map(|item| item.snippet.resource_id.video_id)
            .collect();

        tracing::debug!("Found {} uploads in playlist {}", ids.len(), playlist_id);
        self.get_videos(&ids).await
    }

    /// Search a channel for videos the service classes as short, then keep the ones
    /// [`is_likely_short`] accepts.
    ///
    /// The result is an approximation; see [`is_likely_short`].
    pub async fn find_likely_shorts(&self, channel: &ChannelRef, limit: usize) -> Result<Vec<VideoRecord>> {
        let results: Vec<SearchResult> = self
            .collect_pages(
                "search",
                &[
                    ("part", "snippet"),
                    ("channelId", channel.as_str()),
                    ("type", "video"),
                    ("videoDuration", "short"),
                ],
                limit,
            )
            .await?;

        let ids: Vec<String> = results.into_iter().filter_map(|r| r.id.video_id).collect();
        let videos = self.get_videos(&ids).await?;

        Ok(videos
            .into_iter()
            .filter(|video| is_likely_short(&video.duration))
            .collect())
    }

    /// Batch-fetch video details, one request per 50 ids
    async fn get_videos(&self, ids: &[String]) -> Result<Vec<VideoRecord>> {
        let mut videos = Vec::with_capacity(ids.len());

        for chunk in ids.chunks(MAX_PAGE_SIZE) {
            let joined = chunk.join(",");
            let response: ListResponse<ApiVideo> = self
                .get_json("videos", &[("part", VIDEO_PARTS), ("id", joined.as_str())])
                .await?;
            videos.extend(response.items.into_iter().map(VideoRecord::from));
        }

        Ok(videos)
    }

    /// Follow `nextPageToken` until `limit` items have been collected
    async fn collect_pages<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, &str)],
        limit: usize,
    ) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page_token: Option<String> = None;

        while items.len() < limit {
            let page_size = (limit - items.len()).min(MAX_PAGE_SIZE).to_string();
            let mut query: Vec<(&str, &str)> = params.to_vec();
            query.push(("maxResults", page_size.as_str()));
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: ListResponse<T> = self.get_json(resource, &query).await?;
            let received = page.items.len();
            items.extend(page.items);

            match page.next_page_token {
                Some(token) if received > 0 => page_token = Some(token),
                _ => break,
            }
        }

        items.truncate(limit);
        Ok(items)
    }

    async fn get_json<T: DeserializeOwned>(&self, resource: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.endpoint(resource);
        tracing::debug!("GET {} {:?}", url, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.settings.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|err| err.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
            return Err(InsightsError::FetchFailed(format!(
                "{} returned HTTP {}: {}",
                resource,
                status.as_u16(),
                message
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| InsightsError::FetchFailed(format!("unexpected {} response: {}", resource, e)))
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), resource)
    }
}

#[async_trait]
impl ChannelLookup for MetadataClient {
    async fn channel_id_for_username(&self, username: &str) -> Result<Option<String>> {
        let response: ListResponse<ChannelId> = self
            .get_json("channels", &[("part", "id"), ("forUsername", username)])
            .await?;
        Ok(response.items.into_iter().next().map(|item| item.id))
    }

    async fn channel_id_for_handle(&self, handle: &str) -> Result<Option<String>> {
        let response: ListResponse<SearchResult> = self
            .get_json("search", &[("part", "snippet"), ("type", "channel"), ("q", handle)])
            .await?;
        Ok(response.items.into_iter().find_map(|item| {
            item.snippet
                .and_then(|snippet| snippet.channel_id)
                .or(item.id.channel_id)
        }))
    }
}

/// Heuristic short-form check on an ISO-8601 duration.
///
/// True when the duration has no hour component and contains `30S`, `20S`, `10S`,
/// `15S` or `M1`. This is an approximation, not an authoritative classifier: substring
/// matches mean `PT12M10S` counts as short while `PT45S` does not.
pub fn is_likely_short(duration: &str) -> bool {
    const MARKERS: [&str; 5] = ["30S", "20S", "10S", "15S", "M1"];

    !duration.contains('H') && MARKERS.iter().any(|marker| duration.contains(marker))
}
