use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, COOKIE, ORIGIN, REFERER};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

pub mod batch;
pub mod parser;

pub use batch::{fetch_all, TranscriptBatch};
pub use parser::parse_transcript_page;

use crate::Result;

/// Body used when the page carries no transcript segments
pub const NO_TRANSCRIPT: &str = "No transcript found for this video.";

/// Consent cookie the transcript site expects before serving results
const CONSENT_COOKIE: &str = "CookieConsent={stamp:%27-1%27%2Cnecessary:true%2Cpreferences:true%2Cstatistics:true%2Cmarketing:true%2Cmethod:%27implied%27%2Cver:1%2Cutc:1758037169904%2Ciab2:%27%27%2Cregion:%27IN%27}";

/// Transcript scraped from the transcript site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub title: String,
    pub author: String,
    pub lines: Vec<TranscriptLine>,
}

/// One transcript segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Start offset in seconds, when the page carries one
    pub start: Option<f64>,
    pub text: String,
}

impl TranscriptLine {
    /// `[MM:SS] text` when timed, otherwise the bare text
    pub fn render(&self) -> String {
        match self.start {
            Some(seconds) => format!("{} {}", format_timestamp(seconds), self.text),
            None => self.text.clone(),
        }
    }
}

impl Transcript {
    /// Transcript text, one segment per line; [`NO_TRANSCRIPT`] when empty
    pub fn body(&self) -> String {
        if self.lines.is_empty() {
            return NO_TRANSCRIPT.to_string();
        }

        self.lines
            .iter()
            .map(|line| format!("{}\n", line.render()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Result of fetching one transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranscriptOutcome {
    Found(Transcript),
    Failed { reason: String },
}

impl TranscriptOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        TranscriptOutcome::Failed { reason: reason.into() }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, TranscriptOutcome::Failed { .. })
    }

    pub fn title(&self) -> &str {
        match self {
            TranscriptOutcome::Found(transcript) => &transcript.title,
            TranscriptOutcome::Failed { .. } => "Error",
        }
    }

    pub fn author(&self) -> &str {
        match self {
            TranscriptOutcome::Found(transcript) => &transcript.author,
            TranscriptOutcome::Failed { .. } => "Error",
        }
    }

    pub fn body(&self) -> String {
        match self {
            TranscriptOutcome::Found(transcript) => transcript.body(),
            TranscriptOutcome::Failed { reason } => format!("Error retrieving transcript: {}", reason),
        }
    }
}

/// Anything that can produce a transcript for a video id
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch a transcript. Failures are reported in the outcome, never as `Err`.
    async fn fetch(&self, video_id: &str) -> TranscriptOutcome;
}

/// Connection settings for the transcript site
#[derive(Debug, Clone)]
pub struct TranscriptSettings {
    pub endpoint: String,
    pub timeout: Duration,
    pub user_agent: String,
}

/// Scrapes transcripts from the transcript site, one POST per video
pub struct TranscriptFetcher {
    client: Client,
    endpoint: String,
}

impl TranscriptFetcher {
    pub fn new(settings: &TranscriptSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert(COOKIE, HeaderValue::from_static(CONSENT_COOKIE));

        if let Ok(site) = Url::parse(&settings.endpoint) {
            let origin = site.origin().ascii_serialization();
            if let Ok(value) = HeaderValue::from_str(&origin) {
                headers.insert(ORIGIN, value);
            }
            if let Ok(value) = HeaderValue::from_str(&format!("{}/", origin)) {
                headers.insert(REFERER, value);
            }
        }

        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
        })
    }

    async fn request_page(&self, video_id: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("youtube_url", watch_url(video_id))])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

#[async_trait]
impl TranscriptSource for TranscriptFetcher {
    async fn fetch(&self, video_id: &str) -> TranscriptOutcome {
        tracing::debug!("Fetching transcript for video: {}", video_id);

        match self.request_page(video_id).await {
            Ok(html) => {
                let transcript = parse_transcript_page(&html);
                tracing::debug!("Parsed {} transcript segments for {}", transcript.lines.len(), video_id);
                TranscriptOutcome::Found(transcript)
            }
            Err(err) => {
                tracing::warn!("Transcript request for {} failed: {}", video_id, err);
                TranscriptOutcome::failed(err.to_string())
            }
        }
    }
}

/// Canonical watch URL for a video id
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}

/// Format an offset in seconds as `[MM:SS]`
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("[{:02}:{:02}]", minutes, secs)
}
