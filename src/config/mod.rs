use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::metadata::MetadataSettings;
use crate::report::{CpmRates, ReportSettings};
use crate::transcript::TranscriptSettings;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// YouTube Data API configuration
    pub api: ApiConfig,

    /// Transcript site configuration
    pub transcript: TranscriptConfig,

    /// Report settings
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key sent with every request
    pub api_key: Option<String>,

    /// Base URL of the Data API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Transcript page endpoint (receives the `youtube_url` form field)
    pub endpoint: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// User agent presented to the transcript site
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Uploads fetched per report
    pub max_videos: usize,

    /// Short-form search results fetched per report
    pub max_shorts: usize,

    /// Uploads shown in the "latest videos" section
    pub latest_videos: usize,

    /// Low estimate in USD per 1000 views
    pub cpm_low: f64,

    /// High estimate in USD per 1000 views
    pub cpm_high: f64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://youtubetotranscript.com/transcript".to_string(),
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/107.0.0.0 Safari/537.36".to_string(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            max_videos: 100,
            max_shorts: 20,
            latest_videos: 10,
            cpm_low: 0.5,
            cpm_high: 3.0,
        }
    }
}

impl Config {
    /// Load configuration from `path`, the default locations, or built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(explicit) => {
                if !explicit.exists() {
                    anyhow::bail!("Config file not found: {}", explicit.display());
                }
                explicit.to_path_buf()
            }
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            tracing::debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs_err::read_to_string(&config_path)
            .context("Failed to read config file")?;

        let config: Config = serde_yaml::from_str(&content)
            .context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, or to the default config path
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let config_path = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => Self::config_path()?,
        };

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs_err::create_dir_all(parent)?;
            }
        }

        let content = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs_err::write(&config_path, content)
            .context("Failed to write config file")?;

        Ok(config_path)
    }

    /// Get configuration file path
    pub fn config_path() -> Result<PathBuf> {
        // First try current directory for easy testing
        let local_config = PathBuf::from("config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?;

        Ok(config_dir.join("channel-insights").join("config.yaml"))
    }

    /// Replace the API key when one was given on the command line or in the environment
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api.api_key = Some(key);
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("api.base_url", &self.api.base_url),
            ("transcript.endpoint", &self.transcript.endpoint),
        ] {
            let parsed = url::Url::parse(value)
                .with_context(|| format!("{} is not a valid URL: {}", name, value))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("{} must use HTTP or HTTPS protocol", name);
            }
        }

        if self.api.timeout_secs == 0 || self.transcript.timeout_secs == 0 {
            anyhow::bail!("Timeouts must be greater than zero");
        }

        if self.report.max_videos == 0 || self.report.latest_videos == 0 {
            anyhow::bail!("report.max_videos and report.latest_videos must be greater than zero");
        }

        if self.report.cpm_low < 0.0 || self.report.cpm_low > self.report.cpm_high {
            anyhow::bail!(
                "CPM rates must satisfy 0 <= cpm_low <= cpm_high (got {} and {})",
                self.report.cpm_low,
                self.report.cpm_high
            );
        }

        Ok(())
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("Current Configuration:");
        println!("  API Key: {}", mask_key(self.api.api_key.as_deref()));
        println!("  API Base URL: {}", self.api.base_url);
        println!("  API Timeout: {}s", self.api.timeout_secs);
        println!("  Transcript endpoint: {}", self.transcript.endpoint);
        println!("  Transcript Timeout: {}s", self.transcript.timeout_secs);
        println!("  Max Videos: {}", self.report.max_videos);
        println!("  Max Shorts: {}", self.report.max_shorts);
        println!("  Latest Videos Shown: {}", self.report.latest_videos);
        println!("  CPM Range: ${} - ${}", self.report.cpm_low, self.report.cpm_high);
    }

    pub fn metadata_settings(&self) -> MetadataSettings {
        MetadataSettings {
            api_key: self.api.api_key.clone().unwrap_or_default(),
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs),
        }
    }

    pub fn transcript_settings(&self) -> TranscriptSettings {
        TranscriptSettings {
            endpoint: self.transcript.endpoint.clone(),
            timeout: Duration::from_secs(self.transcript.timeout_secs),
            user_agent: self.transcript.user_agent.clone(),
        }
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            latest_videos: self.report.latest_videos,
            rates: CpmRates {
                low: self.report.cpm_low,
                high: self.report.cpm_high,
            },
        }
    }
}

fn mask_key(key: Option<&str>) -> String {
    match key {
        None | Some("") => "(not set)".to_string(),
        Some(key) if key.chars().count() <= 6 => "******".to_string(),
        Some(key) => format!("{}******", key.chars().take(4).collect::<String>()),
    }
}
