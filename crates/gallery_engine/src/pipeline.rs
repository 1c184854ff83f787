use std::sync::Arc;

use gallery_logging::gallery_info;

use crate::feed::{FeedFetcher, FeedSettings, ReqwestFeedFetcher};
use crate::filter::{FilterReport, FilterSettings, ImageAvailabilityFilter};
use crate::probe::{ProbeSettings, ProgressSink, ReqwestProber};
use crate::{EngineError, EngineEvent, FeedError};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    pub feed: FeedSettings,
    pub probe: ProbeSettings,
    pub filter: FilterSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    pub username: String,
    pub report: FilterReport,
}

/// Fetch the feed, then sieve its candidates.
pub struct GalleryPipeline {
    fetcher: Arc<dyn FeedFetcher>,
    filter: ImageAvailabilityFilter,
}

impl GalleryPipeline {
    pub fn new(fetcher: Arc<dyn FeedFetcher>, filter: ImageAvailabilityFilter) -> Self {
        Self { fetcher, filter }
    }

    pub fn from_settings(settings: EngineSettings) -> Result<Self, EngineError> {
        let fetcher = ReqwestFeedFetcher::new(settings.feed)?;
        let prober = ReqwestProber::new(settings.probe)?;
        let filter = ImageAvailabilityFilter::new(Arc::new(prober), settings.filter);
        Ok(Self::new(Arc::new(fetcher), filter))
    }

    /// Feed failures are returned unchanged; probe failures only drop candidates.
    pub async fn run(&self, sink: &dyn ProgressSink) -> Result<PipelineOutput, FeedError> {
        self.fetcher.check_health().await?;
        let feed = self.fetcher.fetch_feed().await?;
        gallery_info!(
            "feed for @{} returned {} candidates",
            feed.username,
            feed.images.len()
        );
        sink.emit(EngineEvent::FeedFetched {
            username: feed.username.clone(),
            candidates: feed.images.len(),
        });

        let report = self.filter.probe_all(&feed.images, sink).await;
        Ok(PipelineOutput {
            username: feed.username,
            report,
        })
    }
}
