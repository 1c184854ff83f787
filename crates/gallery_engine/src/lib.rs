//! Gallery engine: feed fetching, image probing and timer execution.
mod engine;
mod feed;
mod filter;
mod pipeline;
mod probe;
mod timer;
mod types;

pub use engine::EngineHandle;
pub use feed::{Feed, FeedFetcher, FeedSettings, ReqwestFeedFetcher, MAX_FEED_COUNT};
pub use filter::{FilterReport, FilterSettings, ImageAvailabilityFilter};
pub use pipeline::{EngineSettings, GalleryPipeline, PipelineOutput};
pub use probe::{ChannelProgressSink, ProbeSettings, Prober, ProgressSink, ReqwestProber};
pub use timer::{Sleeper, TimerHandle, TokioSleeper};
pub use types::{
    EngineError, EngineEvent, FailureKind, FeedError, ProbeError, ProbeResult, TimerId,
};
