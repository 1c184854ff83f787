use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gallery_core::{CarouselSettings, CoreSettings, DEFAULT_MAX_DISPLAY};
use gallery_engine::{EngineSettings, FeedSettings, FilterSettings, ProbeSettings, MAX_FEED_COUNT};
use gallery_logging::{gallery_info, gallery_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const DEFAULT_CONFIG_FILENAME: &str = "gallery.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub user: String,
    pub count: u32,
    pub request_timeout_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        let defaults = FeedSettings::default();
        Self {
            base_url: defaults.base_url,
            user: defaults.user,
            count: defaults.count,
            request_timeout_ms: defaults.request_timeout.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    pub batch_size: usize,
    pub timeout_ms: u64,
    pub inter_batch_delay_ms: u64,
    pub connect_timeout_ms: u64,
    pub max_image_bytes: u64,
    pub require_image_content_type: bool,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        let filter = FilterSettings::default();
        let probe = ProbeSettings::default();
        Self {
            batch_size: filter.batch_size,
            timeout_ms: filter.probe_timeout.as_millis() as u64,
            inter_batch_delay_ms: filter.inter_batch_delay.as_millis() as u64,
            connect_timeout_ms: probe.connect_timeout.as_millis() as u64,
            max_image_bytes: probe.max_bytes,
            require_image_content_type: probe.require_image_content_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_display: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_display: DEFAULT_MAX_DISPLAY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowConfig {
    pub autoplay_interval_ms: u64,
    pub animation_lock_ms: u64,
    /// Autoplay advances to show before exiting. Zero skips the slideshow.
    pub advances: u32,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        let carousel = CarouselSettings::default();
        Self {
            autoplay_interval_ms: carousel.autoplay_interval.as_millis() as u64,
            animation_lock_ms: carousel.animation_lock.as_millis() as u64,
            advances: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Include every probe outcome in the report.
    pub list_all: bool,
    pub log_destination: LogDestination,
    /// Truncated at startup when the destination includes a file.
    pub log_file: PathBuf,
    pub verbose: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            list_all: false,
            log_destination: LogDestination::default(),
            log_file: PathBuf::from("gallery.log"),
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    pub probe: ProbeConfig,
    pub display: DisplayConfig,
    pub slideshow: SlideshowConfig,
    pub output: OutputConfig,
}

impl AppConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            feed: FeedSettings {
                base_url: self.feed.base_url.clone(),
                user: self.feed.user.clone(),
                count: self.feed.count,
                request_timeout: Duration::from_millis(self.feed.request_timeout_ms),
            },
            probe: ProbeSettings {
                connect_timeout: Duration::from_millis(self.probe.connect_timeout_ms),
                max_bytes: self.probe.max_image_bytes,
                require_image_content_type: self.probe.require_image_content_type,
                ..ProbeSettings::default()
            },
            filter: FilterSettings {
                batch_size: self.probe.batch_size,
                probe_timeout: Duration::from_millis(self.probe.timeout_ms),
                inter_batch_delay: Duration::from_millis(self.probe.inter_batch_delay_ms),
            },
        }
    }

    pub fn core_settings(&self) -> CoreSettings {
        CoreSettings {
            max_display: self.display.max_display,
            carousel: CarouselSettings {
                animation_lock: Duration::from_millis(self.slideshow.animation_lock_ms),
                autoplay_interval: Duration::from_millis(self.slideshow.autoplay_interval_ms),
            },
        }
    }

    fn validate(mut self) -> Result<Self, ConfigError> {
        if self.probe.batch_size == 0 {
            return Err(ConfigError::Invalid("probe.batch_size must be at least 1".into()));
        }
        if self.display.max_display == 0 {
            return Err(ConfigError::Invalid(
                "display.max_display must be at least 1".into(),
            ));
        }
        if self.feed.user.trim().is_empty() {
            return Err(ConfigError::Invalid("feed.user must not be empty".into()));
        }
        if self.feed.count > MAX_FEED_COUNT {
            gallery_warn!(
                "feed.count {} exceeds {}; clamping",
                self.feed.count,
                MAX_FEED_COUNT
            );
            self.feed.count = MAX_FEED_COUNT;
        }
        Ok(self)
    }
}

/// Load and validate the config at `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            gallery_info!("No config at {:?}; using defaults", path);
            return AppConfig::default().validate();
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let config: AppConfig = ron::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()
}
