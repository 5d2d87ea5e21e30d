//! Channel and video URL resolution.
//!
//! Canonical channel links and video links resolve with pure string parsing. Legacy
//! `/user/<name>` links and `@handle` links need a lookup against the metadata service,
//! which goes through the [`ChannelLookup`] seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::{InsightsError, Result};

const VIDEO_ID_LEN: usize = 11;

/// Identifier of a channel, produced by [`resolve_channel`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelRef(String);

impl ChannelRef {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lookups the resolver needs for legacy usernames and handles
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChannelLookup: Send + Sync {
    /// Channel id registered for a legacy username, if any
    async fn channel_id_for_username(&self, username: &str) -> Result<Option<String>>;

    /// Channel id of the first channel search result for a handle, if any
    async fn channel_id_for_handle(&self, handle: &str) -> Result<Option<String>>;
}

/// Resolve a channel URL to its channel id.
///
/// Only whole path segments count: `channel` or `user` followed by a segment, or a
/// segment starting with `@`. The first such segment in the path decides the shape.
pub async fn resolve_channel(url: &str, lookup: &dyn ChannelLookup) -> Result<ChannelRef> {
    let input = url.trim();
    let invalid = || InsightsError::InvalidUrl(input.to_string());

    let path = input.split(['?', '#']).next().unwrap_or_default();
    let segments: Vec<&str> = path.split('/').collect();

    for (idx, segment) in segments.iter().enumerate() {
        let next = segments.get(idx + 1).copied().unwrap_or_default();

        match *segment {
            "channel" => {
                if next.is_empty() {
                    return Err(invalid());
                }
                return Ok(ChannelRef::new(next));
            }
            "user" => {
                if next.is_empty() {
                    return Err(invalid());
                }
                tracing::debug!("Resolving legacy username: {}", next);
                return lookup
                    .channel_id_for_username(next)
                    .await?
                    .map(ChannelRef::new)
                    .ok_or_else(|| InsightsError::NotFound(format!("no channel for username '{}'", next)));
            }
            handle if handle.starts_with('@') => {
                let raw = &handle[1..];
                let handle = urlencoding::decode(raw)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| raw.to_string());
                if handle.is_empty() {
                    return Err(invalid());
                }
                tracing::debug!("Resolving handle: @{}", handle);
                return lookup
                    .channel_id_for_handle(&handle)
                    .await?
                    .map(ChannelRef::new)
                    .ok_or_else(|| InsightsError::NotFound(format!("no channel for handle '@{}'", handle)));
            }
            _ => {}
        }
    }

    Err(invalid())
}

/// Extract the video id from a watch, youtu.be or shorts URL
pub fn resolve_video(url: &str) -> Result<String> {
    let invalid = || InsightsError::InvalidUrl(url.to_string());
    let parsed = Url::parse(url.trim()).map_err(|_| invalid())?;
    let host = parsed.host_str().unwrap_or_default().to_lowercase();

    let id = if host.contains("youtube.com") {
        let path = parsed.path();
        if path.contains("/watch") {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "v")
                .map(|(_, value)| value.into_owned())
        } else if let Some(rest) = path.split("/shorts/").nth(1) {
            Some(leading_segment(rest).to_string())
        } else {
            None
        }
    } else if host.contains("youtu.be") {
        Some(parsed.path().trim_start_matches('/').to_string())
    } else {
        None
    };

    id.filter(|id| !id.is_empty()).ok_or_else(invalid)
}

/// Accept either a video URL or a bare video id
pub fn resolve_video_input(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if is_bare_video_id(trimmed) {
        return Ok(trimmed.to_string());
    }
    resolve_video(trimmed)
}

/// Video ids are 11 characters from the URL-safe base64 alphabet
fn is_bare_video_id(value: &str) -> bool {
    value.len() == VIDEO_ID_LEN
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn leading_segment(rest: &str) -> &str {
    rest.split(['/', '?', '#']).next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unused_lookup() -> MockChannelLookup {
        let mut lookup = MockChannelLookup::new();
        lookup.expect_channel_id_for_username().never();
        lookup.expect_channel_id_for_handle().never();
        lookup
    }

    #[tokio::test]
    async fn test_canonical_channel_url() {
        let lookup = unused_lookup();
        let resolved = resolve_channel("https://www.youtube.com/channel/UC123abc/videos", &lookup)
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "UC123abc");

        let resolved = resolve_channel("https://youtube.com/channel/UCxyz?view=0", &lookup)
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "UCxyz");
    }

    #[tokio::test]
    async fn test_username_lookup() {
        let mut lookup = MockChannelLookup::new();
        lookup
            .expect_channel_id_for_username()
            .times(1)
            .returning(|name| Ok((name == "somebody").then(|| "UCfromuser".to_string())));
        lookup.expect_channel_id_for_handle().never();

        let resolved = resolve_channel("https://www.youtube.com/user/somebody", &lookup)
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "UCfromuser");
    }

    #[tokio::test]
    async fn test_username_not_found() {
        let mut lookup = MockChannelLookup::new();
        lookup
            .expect_channel_id_for_username()
            .returning(|_| Ok(None));

        let err = resolve_channel("https://www.youtube.com/user/ghost", &lookup)
            .await
            .unwrap_err();
        assert!(matches!(err, InsightsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_handle_lookup_strips_path_and_query() {
        let mut lookup = MockChannelLookup::new();
        lookup
            .expect_channel_id_for_handle()
            .times(1)
            .returning(|handle| Ok((handle == "creator").then(|| "UChandle".to_string())));

        let resolved = resolve_channel("https://www.youtube.com/@creator/videos?si=x", &lookup)
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "UChandle");
    }

    #[tokio::test]
    async fn test_handle_with_reserved_word_in_path_uses_handle_lookup() {
        for (url, expected) in [
            ("https://www.youtube.com/@poweruser/videos", "poweruser"),
            ("https://www.youtube.com/@mychannel/videos", "mychannel"),
            ("https://www.youtube.com/@userchannel/user/other", "userchannel"),
            ("https://www.youtube.com/@chan/channel/UCnotthis", "chan"),
        ] {
            let mut lookup = MockChannelLookup::new();
            lookup.expect_channel_id_for_username().never();
            lookup
                .expect_channel_id_for_handle()
                .times(1)
                .returning(|handle| Ok(Some(format!("UC-{}", handle))));

            let resolved = resolve_channel(url, &lookup).await.unwrap();
            assert_eq!(resolved.as_str(), format!("UC-{}", expected), "{url}");
        }
    }

    #[tokio::test]
    async fn test_markers_must_be_whole_segments() {
        let lookup = unused_lookup();
        for url in [
            "https://www.youtube.com/mychannel/videos",
            "https://www.youtube.com/poweruser/videos",
            "https://www.youtube.com/c/somechannel",
        ] {
            let err = resolve_channel(url, &lookup).await.unwrap_err();
            assert!(matches!(err, InsightsError::InvalidUrl(_)), "{url}");
        }
    }

    #[tokio::test]
    async fn test_handle_is_percent_decoded() {
        let mut lookup = MockChannelLookup::new();
        lookup
            .expect_channel_id_for_handle()
            .times(1)
            .returning(|handle| Ok((handle == "café").then(|| "UCcafe".to_string())));

        let resolved = resolve_channel("https://www.youtube.com/@caf%C3%A9", &lookup)
            .await
            .unwrap();
        assert_eq!(resolved.as_str(), "UCcafe");
    }

    #[tokio::test]
    async fn test_handle_not_found() {
        let mut lookup = MockChannelLookup::new();
        lookup.expect_channel_id_for_handle().returning(|_| Ok(None));

        let err = resolve_channel("https://www.youtube.com/@nobody", &lookup)
            .await
            .unwrap_err();
        assert!(matches!(err, InsightsError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_lookup_failure_propagates() {
        let mut lookup = MockChannelLookup::new();
        lookup
            .expect_channel_id_for_handle()
            .returning(|_| Err(InsightsError::FetchFailed("HTTP 403".to_string())));

        let err = resolve_channel("https://www.youtube.com/@creator", &lookup)
            .await
            .unwrap_err();
        assert!(matches!(err, InsightsError::FetchFailed(_)));
    }

    #[tokio::test]
    async fn test_unrecognized_channel_url() {
        let lookup = unused_lookup();
        for url in [
            "https://www.youtube.com/watch?v=abc",
            "https://example.com/about",
            "https://www.youtube.com/channel/",
            "https://www.youtube.com/@",
            "",
        ] {
            let err = resolve_channel(url, &lookup).await.unwrap_err();
            assert!(matches!(err, InsightsError::InvalidUrl(_)), "{url}");
        }
    }

    #[test]
    fn test_video_urls() {
        assert_eq!(resolve_video("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            resolve_video("https://www.youtube.com/watch?feature=share&v=dQw4w9WgXcQ&t=10").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(resolve_video("https://youtu.be/dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(resolve_video("https://youtube.com/shorts/abcDEF12345?feature=share").unwrap(), "abcDEF12345");
        assert_eq!(resolve_video("https://m.youtube.com/shorts/abcDEF12345/").unwrap(), "abcDEF12345");
    }

    #[test]
    fn test_invalid_video_urls() {
        for url in [
            "https://www.youtube.com/watch",
            "https://www.youtube.com/channel/UC123",
            "https://vimeo.com/12345",
            "https://youtu.be/",
            "not a url",
        ] {
            assert!(matches!(resolve_video(url), Err(InsightsError::InvalidUrl(_))), "{url}");
        }
    }

    #[test]
    fn test_video_input_accepts_bare_ids() {
        assert_eq!(resolve_video_input("dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(resolve_video_input(" https://youtu.be/dQw4w9WgXcQ ").unwrap(), "dQw4w9WgXcQ");
        assert!(resolve_video_input("https://example.com/x").is_err());
        assert!(resolve_video_input("").is_err());
    }

    #[test]
    fn test_video_input_rejects_plain_words() {
        for input in ["hello", "report", "dQw4w9WgXcQx", "dQw4w9WgXc!"] {
            assert!(
                matches!(resolve_video_input(input), Err(InsightsError::InvalidUrl(_))),
                "{input}"
            );
        }
    }
}
