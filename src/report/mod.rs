use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub mod contacts;
pub mod growth;
pub mod income;

pub use contacts::{extract_email, extract_social_links};
pub use growth::{growth_report, GrowthReport, GrowthSeries, GrowthWindow};
pub use income::{estimate_income, CpmRates, IncomeEstimate, IncomeRange};

use crate::metadata::{is_likely_short, ChannelInfo, VideoRecord};

/// Knobs for report assembly
#[derive(Debug, Clone, Copy)]
pub struct ReportSettings {
    /// Size of the "latest videos" section
    pub latest_videos: usize,
    pub rates: CpmRates,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            latest_videos: 10,
            rates: CpmRates::default(),
        }
    }
}

/// A video annotated with the short-form heuristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportVideo {
    #[serde(flatten)]
    pub video: VideoRecord,
    pub is_short: bool,
}

/// Everything shown for one channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelReport {
    pub id: String,
    pub title: String,
    pub description: String,
    /// `None` when the channel hides its subscriber count
    pub subscribers: Option<u64>,
    pub views: u64,
    pub video_count: Option<u64>,
    /// Shorts among `videos`
    pub shorts_count: usize,
    pub created: DateTime<Utc>,
    pub country: Option<String>,
    pub thumbnail: Option<String>,
    pub banner: Option<String>,
    pub income: IncomeEstimate,
    pub email: String,
    pub social_links: BTreeMap<String, Vec<String>>,
    /// Most recent uploads, newest first
    pub videos: Vec<ReportVideo>,
    pub shorts: Vec<VideoRecord>,
    pub growth: GrowthReport,
    pub generated_at: DateTime<Utc>,
}

/// Turns channel metadata and video listings into a [`ChannelReport`]
#[derive(Debug, Clone, Default)]
pub struct ReportAssembler {
    settings: ReportSettings,
}

impl ReportAssembler {
    pub fn new(settings: ReportSettings) -> Self {
        Self { settings }
    }

    /// Assemble a report relative to the current time
    pub fn assemble(&self, channel: &ChannelInfo, videos: &[VideoRecord], shorts: &[VideoRecord]) -> ChannelReport {
        self.assemble_at(channel, videos, shorts, Utc::now())
    }

    /// Assemble a report with growth windows ending at `now`
    pub fn assemble_at(
        &self,
        channel: &ChannelInfo,
        videos: &[VideoRecord],
        shorts: &[VideoRecord],
        now: DateTime<Utc>,
    ) -> ChannelReport {
        let views = channel.total_views();
        let description = channel.snippet.description.clone();

        let latest = latest_videos(videos, self.settings.latest_videos);
        let shorts_count = latest.iter().filter(|v| v.is_short).count();

        ChannelReport {
            id: channel.id.clone(),
            title: channel.snippet.title.clone(),
            subscribers: channel.subscribers(),
            views,
            video_count: channel.statistics.video_count,
            shorts_count,
            created: channel.snippet.published_at,
            country: channel.snippet.country.clone(),
            thumbnail: channel.snippet.thumbnails.high_url().map(str::to_string),
            banner: channel.banner_url().map(str::to_string),
            income: estimate_income(views, self.settings.rates),
            email: extract_email(&description),
            social_links: extract_social_links(&description),
            videos: latest,
            shorts: shorts.to_vec(),
            growth: growth_report(videos, now),
            generated_at: now,
            description,
        }
    }
}

/// Newest `limit` videos, annotated with [`is_likely_short`]
fn latest_videos(videos: &[VideoRecord], limit: usize) -> Vec<ReportVideo> {
    let mut sorted: Vec<&VideoRecord> = videos.iter().collect();
    sorted.sort_by(|a, b| b.published_at.cmp(&a.published_at));

    sorted
        .into_iter()
        .take(limit)
        .map(|video| ReportVideo {
            video: video.clone(),
            is_short: is_likely_short(&video.duration),
        })
        .collect()
}
