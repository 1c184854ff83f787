use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::CONTENT_TYPE;

use crate::{EngineEvent, FailureKind, ProbeError};

#[derive(Debug, Clone)]
pub struct ProbeSettings {
    pub connect_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Reject responses whose Content-Type is present but not `image/*`.
    pub require_image_content_type: bool,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            redirect_limit: 5,
            max_bytes: 20 * 1024 * 1024,
            require_image_content_type: true,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// One attempt to confirm that a URL loads as an image.
#[async_trait::async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, url: &str) -> Result<(), ProbeError>;
}

/// Probes by downloading the whole image, like a browser `<img>` load.
///
/// Some image hosts reject HEAD requests, so no metadata-only shortcut is taken.
/// The body is counted and discarded.
#[derive(Debug, Clone)]
pub struct ReqwestProber {
    client: reqwest::Client,
    settings: ProbeSettings,
}

impl ReqwestProber {
    pub fn new(settings: ProbeSettings) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()
            .map_err(|err| ProbeError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    fn check_content_type(&self, content_type: Option<&str>) -> Result<(), ProbeError> {
        if !self.settings.require_image_content_type {
            return Ok(());
        }
        // A missing header is left to content sniffing, as browsers do.
        let Some(content_type) = content_type else {
            return Ok(());
        };
        let mime = content_type
            .split(';')
            .next()
            .unwrap_or(content_type)
            .trim();
        let is_image = mime
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"));
        if is_image {
            Ok(())
        } else {
            Err(ProbeError::new(
                FailureKind::NotAnImage {
                    content_type: content_type.to_string(),
                },
                "unexpected content type",
            ))
        }
    }

    fn too_large(&self, actual: u64) -> ProbeError {
        ProbeError::new(
            FailureKind::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Prober for ReqwestProber {
    async fn probe(&self, url: &str) -> Result<(), ProbeError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| ProbeError::new(FailureKind::InvalidUrl, err.to_string()))?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.to_string());
        self.check_content_type(content_type.as_deref())?;

        let mut received: u64 = 0;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            received += chunk.len() as u64;
            if received > self.settings.max_bytes {
                return Err(self.too_large(received));
            }
        }

        if received == 0 {
            return Err(ProbeError::new(FailureKind::EmptyBody, "no image data"));
        }
        Ok(())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> ProbeError {
    if err.is_timeout() {
        return ProbeError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return ProbeError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    ProbeError::new(FailureKind::Network, err.to_string())
}
