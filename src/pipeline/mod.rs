use crate::config::Config;
use crate::metadata::{ChannelInfo, MetadataClient, VideoRecord};
use crate::report::{ChannelReport, ReportAssembler};
use crate::resolver::{resolve_channel, ChannelRef};
use crate::Result;

/// Everything fetched and derived for one channel
#[derive(Debug, Clone)]
pub struct ChannelAnalysis {
    pub channel: ChannelRef,
    pub info: ChannelInfo,
    /// Every fetched upload, used for CSV export
    pub videos: Vec<VideoRecord>,
    pub report: ChannelReport,
}

/// Resolve a channel, read its metadata and assemble the report
pub struct ChannelPipeline {
    metadata: MetadataClient,
    assembler: ReportAssembler,
    max_videos: usize,
    max_shorts: usize,
}

impl ChannelPipeline {
    /// Create a new pipeline; fails when no API key is configured
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            metadata: MetadataClient::new(config.metadata_settings())?,
            assembler: ReportAssembler::new(config.report_settings()),
            max_videos: config.report.max_videos,
            max_shorts: config.report.max_shorts,
        })
    }

    pub fn with_limits(mut self, max_videos: Option<usize>, max_shorts: Option<usize>) -> Self {
        if let Some(limit) = max_videos {
            self.max_videos = limit;
        }
        if let Some(limit) = max_shorts {
            self.max_shorts = limit;
        }
        self
    }

    /// Resolve a channel URL without fetching anything else
    pub async fn resolve(&self, url: &str) -> Result<ChannelRef> {
        resolve_channel(url, &self.metadata).await
    }

    /// Run the full analysis for a channel URL
    pub async fn analyze(&self, url: &str) -> Result<ChannelAnalysis> {
        tracing::info!("Resolving channel URL: {}", url);
        let channel = self.resolve(url).await?;

        tracing::info!("Fetching channel information for {}", channel);
        let info = self.metadata.get_channel(&channel).await?;

        tracing::info!("Listing up to {} uploads", self.max_videos);
        let videos = self.metadata.list_uploaded_videos(&info, self.max_videos).await?;

        let shorts = if self.max_shorts > 0 {
            tracing::info!("Searching up to {} short-form videos", self.max_shorts);
            self.metadata.find_likely_shorts(&channel, self.max_shorts).await?
        } else {
            Vec::new()
        };

        tracing::info!(
            "Assembling report from {} uploads and {} shorts",
            videos.len(),
            shorts.len()
        );
        let report = self.assembler.assemble(&info, &videos, &shorts);

        Ok(ChannelAnalysis {
            channel,
            info,
            videos,
            report,
        })
    }
}
