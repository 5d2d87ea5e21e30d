//! YouTube Data API resources and the domain values built from them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Generic list response envelope
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub next_page_token: Option<String>,
}

/// Error envelope returned with non-success statuses
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorResponse {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub message: String,
}

/// Channel resource with snippet, statistics, branding, content details and status
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub id: String,
    pub snippet: ChannelSnippet,
    #[serde(default)]
    pub statistics: ChannelStatistics,
    #[serde(default)]
    pub branding_settings: BrandingSettings,
    #[serde(default)]
    pub content_details: ChannelContentDetails,
    #[serde(default)]
    pub status: ChannelStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub custom_url: Option<String>,
    pub published_at: DateTime<Utc>,
    pub country: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default, deserialize_with = "count")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "count")]
    pub subscriber_count: Option<u64>,
    #[serde(default)]
    pub hidden_subscriber_count: bool,
    #[serde(default, deserialize_with = "count")]
    pub video_count: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingSettings {
    pub image: Option<BrandingImage>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandingImage {
    pub banner_external_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    #[serde(default)]
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatus {
    pub privacy_status: Option<String>,
    pub made_for_kids: Option<bool>,
}

impl ChannelInfo {
    /// Total channel views, zero when the statistics part is missing
    pub fn total_views(&self) -> u64 {
        self.statistics.view_count.unwrap_or(0)
    }

    /// Subscriber count, `None` when the channel hides it
    pub fn subscribers(&self) -> Option<u64> {
        if self.statistics.hidden_subscriber_count {
            None
        } else {
            self.statistics.subscriber_count
        }
    }

    pub fn banner_url(&self) -> Option<&str> {
        self.branding_settings
            .image
            .as_ref()
            .and_then(|image| image.banner_external_url.as_deref())
    }

    pub fn uploads_playlist(&self) -> Option<&str> {
        self.content_details.related_playlists.uploads.as_deref()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thumbnails {
    pub default: Option<Thumbnail>,
    pub medium: Option<Thumbnail>,
    pub high: Option<Thumbnail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

impl Thumbnails {
    pub fn medium_url(&self) -> Option<&str> {
        self.medium.as_ref().map(|t| t.url.as_str())
    }

    pub fn high_url(&self) -> Option<&str> {
        self.high.as_ref().map(|t| t.url.as_str())
    }
}

/// One video with its statistics, as returned by the videos endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    /// ISO-8601 duration, e.g. `PT4M13S`
    pub duration: String,
    pub thumbnails: Thumbnails,
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiVideo {
    pub id: String,
    pub snippet: ApiVideoSnippet,
    #[serde(default)]
    pub statistics: ApiVideoStatistics,
    #[serde(default)]
    pub content_details: ApiVideoContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiVideoSnippet {
    pub title: String,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiVideoStatistics {
    #[serde(default, deserialize_with = "count")]
    pub view_count: Option<u64>,
    #[serde(default, deserialize_with = "count")]
    pub like_count: Option<u64>,
    #[serde(default, deserialize_with = "count")]
    pub comment_count: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiVideoContentDetails {
    #[serde(default)]
    pub duration: String,
}

impl From<ApiVideo> for VideoRecord {
    fn from(video: ApiVideo) -> Self {
        Self {
            id: video.id,
            title: video.snippet.title,
            published_at: video.snippet.published_at,
            view_count: video.statistics.view_count.unwrap_or(0),
            like_count: video.statistics.like_count.unwrap_or(0),
            comment_count: video.statistics.comment_count.unwrap_or(0),
            duration: video.content_details.duration,
            thumbnails: video.snippet.thumbnails,
            tags: video.snippet.tags,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItemSnippet {
    pub resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResourceId {
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResult {
    pub id: ResourceId,
    pub snippet: Option<SearchSnippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchSnippet {
    pub channel_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelId {
    pub id: String,
}

/// Counters arrive as decimal strings; accept plain numbers too
fn count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) => s.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
