use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "channel-insights",
    about = "Channel Insights - Analyse YouTube channels and fetch video transcripts",
    version,
    long_about = "A CLI tool for pulling public statistics for a YouTube channel and its uploads, deriving simple metrics (income estimate, contacts, growth), and fetching video transcripts. Reports can be exported as text, JSON, CSV or HTML."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a configuration file (defaults to ./config.yaml or the user config dir)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// YouTube Data API key (overrides the configuration file)
    #[arg(long, global = true, env = "YOUTUBE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a report for a channel
    Report {
        /// Channel URL (/channel/<id>, /user/<name> or /@handle)
        #[arg(value_name = "CHANNEL_URL")]
        url: String,

        /// Output file path (prints to console if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ReportFormat,

        /// Maximum number of uploads to fetch (overrides config)
        #[arg(long, value_name = "COUNT")]
        max_videos: Option<usize>,

        /// Maximum number of short-form search results to fetch (overrides config)
        #[arg(long, value_name = "COUNT")]
        max_shorts: Option<usize>,
    },

    /// Fetch transcripts for one or more videos
    Transcript {
        /// Video URLs (watch, youtu.be, shorts) or bare video IDs
        #[arg(value_name = "URL_OR_ID", required = true)]
        inputs: Vec<String>,

        /// Output file (single video) or directory (several videos)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: TranscriptFormat,
    },

    /// Resolve a channel or video URL to its identifier
    Resolve {
        /// Channel or video URL
        #[arg(value_name = "URL")]
        url: String,

        /// Treat the URL as a video URL
        #[arg(long)]
        video: bool,
    },

    /// Show or initialise the configuration
    Config {
        /// Show current configuration
        #[arg(short, long, conflicts_with = "init")]
        show: bool,

        /// Write the default configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportFormat {
    /// Plain text summary
    Text,
    /// JSON document
    Json,
    /// CSV spreadsheet with one row per upload
    Csv,
    /// Standalone HTML page
    Html,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
            ReportFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Json => write!(f, "json"),
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Html => write!(f, "html"),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum TranscriptFormat {
    /// Plain text with title and author header
    Text,
    /// JSON document
    Json,
    /// Standalone HTML page
    Html,
}

impl TranscriptFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            TranscriptFormat::Text => "txt",
            TranscriptFormat::Json => "json",
            TranscriptFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for TranscriptFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptFormat::Text => write!(f, "text"),
            TranscriptFormat::Json => write!(f, "json"),
            TranscriptFormat::Html => write!(f, "html"),
        }
    }
}
