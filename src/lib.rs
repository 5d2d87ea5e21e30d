//! Channel Insights - A Rust CLI tool for analysing YouTube channels
//!
//! This library resolves channel and video URLs, reads channel statistics and uploads
//! through the YouTube Data API, scrapes video transcripts from a third-party transcript
//! site, and derives simple report metrics (income estimate, contacts, growth buckets).

pub mod cli;
pub mod config;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod transcript;
pub mod utils;

#[cfg(test)]
pub(crate) mod stub_http;

pub use cli::{Cli, Commands, ReportFormat, TranscriptFormat};
pub use config::Config;
pub use metadata::{ChannelInfo, MetadataClient, VideoRecord};
pub use pipeline::{ChannelAnalysis, ChannelPipeline};
pub use report::{ChannelReport, ReportAssembler};
pub use resolver::{ChannelLookup, ChannelRef};
pub use transcript::{Transcript, TranscriptBatch, TranscriptFetcher, TranscriptOutcome, TranscriptSource};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, InsightsError>;

/// Error types specific to channel insights
#[derive(thiserror::Error, Debug)]
pub enum InsightsError {
    #[error("Invalid YouTube URL: {0}")]
    InvalidUrl(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    #[error("YouTube API key is not configured (set YOUTUBE_API_KEY or api.api_key)")]
    MissingCredential,

    #[error("Export failed: {0}")]
    Export(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for InsightsError {
    fn from(err: reqwest::Error) -> Self {
        InsightsError::FetchFailed(err.to_string())
    }
}

impl From<csv::Error> for InsightsError {
    fn from(err: csv::Error) -> Self {
        InsightsError::Export(err.to_string())
    }
}

impl From<serde_json::Error> for InsightsError {
    fn from(err: serde_json::Error) -> Self {
        InsightsError::Export(err.to_string())
    }
}
