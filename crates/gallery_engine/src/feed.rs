use std::time::Duration;

use gallery_logging::{gallery_info, gallery_warn};
use serde::Deserialize;
use url::Url;

use crate::FeedError;

/// The feed server refuses to return more entries than this.
pub const MAX_FEED_COUNT: u32 = 50;

#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Server root. Needs a trailing slash when it carries a path.
    pub base_url: String,
    pub user: String,
    pub count: u32,
    pub request_timeout: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/".to_string(),
            user: "driven34".to_string(),
            count: 18,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Candidate list returned by the feed server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feed {
    pub username: String,
    pub images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FeedPayload {
    username: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: String,
}

#[async_trait::async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn check_health(&self) -> Result<(), FeedError>;
    async fn fetch_feed(&self) -> Result<Feed, FeedError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFeedFetcher {
    client: reqwest::Client,
    base: Url,
    settings: FeedSettings,
}

impl ReqwestFeedFetcher {
    pub fn new(settings: FeedSettings) -> Result<Self, FeedError> {
        let base = Url::parse(&settings.base_url)
            .map_err(|err| FeedError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FeedError::Network(err.to_string()))?;
        Ok(Self {
            client,
            base,
            settings,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, FeedError> {
        self.base
            .join(path)
            .map_err(|err| FeedError::InvalidUrl(format!("{path}: {err}")))
    }

    /// Feed URL with the requested count capped at [`MAX_FEED_COUNT`].
    pub fn feed_url(&self) -> Result<Url, FeedError> {
        let mut url = self.endpoint("insta_feed")?;
        url.query_pairs_mut()
            .append_pair("user", &self.settings.user)
            .append_pair("count", &self.settings.count.min(MAX_FEED_COUNT).to_string());
        Ok(url)
    }
}

#[async_trait::async_trait]
impl FeedFetcher for ReqwestFeedFetcher {
    async fn check_health(&self) -> Result<(), FeedError> {
        let url = self.endpoint("health")?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            gallery_warn!("health check returned {}", status);
            Err(FeedError::Unhealthy(status.to_string()))
        }
    }

    async fn fetch_feed(&self) -> Result<Feed, FeedError> {
        let url = self.feed_url()?;
        gallery_info!("fetching feed {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorPayload>(&body)
                .map(|payload| payload.error)
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(FeedError::Server {
                status: status.as_u16(),
                message,
            });
        }

        let payload: FeedPayload =
            serde_json::from_str(&body).map_err(|err| FeedError::Malformed(err.to_string()))?;
        Ok(Feed {
            username: payload
                .username
                .unwrap_or_else(|| self.settings.user.clone()),
            images: payload.images,
        })
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FeedError {
    if err.is_timeout() {
        FeedError::Timeout(err.to_string())
    } else {
        FeedError::Network(err.to_string())
    }
}
