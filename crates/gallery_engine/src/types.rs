use std::fmt;

pub type TimerId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    FeedFetched { username: String, candidates: usize },
    ProbeSettled(ProbeResult),
    /// Every candidate settled; `verified` keeps feed order.
    ProbesFinished { verified: Vec<String> },
    LoadFailed(FeedError),
    TimerFired { timer_id: TimerId },
}

/// Liveness of one candidate URL. `index` is its position in the feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub index: usize,
    pub url: String,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeError {
    pub kind: FailureKind,
    pub message: String,
}

impl ProbeError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ProbeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ProbeError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    NotAnImage { content_type: String },
    EmptyBody,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::NotAnImage { content_type } => {
                write!(f, "not an image ({content_type})")
            }
            FailureKind::EmptyBody => write!(f, "empty body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}

/// Failure to obtain the candidate list. Returned to the caller unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("invalid feed url: {0}")]
    InvalidUrl(String),
    #[error("feed server is unhealthy: {0}")]
    Unhealthy(String),
    #[error("feed server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("feed request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed feed payload: {0}")]
    Malformed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to build probe client: {0}")]
    Probe(#[from] ProbeError),
    #[error("failed to build feed client: {0}")]
    Feed(#[from] FeedError),
}
