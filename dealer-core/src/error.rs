use std::fmt;

use thiserror::Error;

/// Infrastructure errors raised while building clients, loading config or
/// preparing the classifier. Request handling never returns these.
#[derive(Error, Debug)]
pub enum DealerError {
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lexicon error: {0}")]
    Lexicon(String),
}

/// The two network collaborators this service talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    ReviewSource,
    SentimentService,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Upstream::ReviewSource => f.write_str("review source"),
            Upstream::SentimentService => f.write_str("sentiment service"),
        }
    }
}

/// Outcome of any failed upstream call. Transport errors, bad statuses and
/// undecodable bodies all collapse into this; the detail is logged at the
/// call site.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("{service} unavailable")]
pub struct Unavailable {
    pub service: Upstream,
}

impl Unavailable {
    pub fn review_source() -> Self {
        Self {
            service: Upstream::ReviewSource,
        }
    }

    pub fn sentiment_service() -> Self {
        Self {
            service: Upstream::SentimentService,
        }
    }
}

/// Coarse classification of a [`ServiceError`], stable across variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    BadRequest,
    Unauthorized,
    NotFound,
    UpstreamUnavailable,
    Internal,
}

/// Which read failed, so the caller-facing message names the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTarget {
    Reviews,
    Dealerships,
    Dealer,
}

/// Request-level errors surfaced by the pipeline, submission flow and
/// dealer directory.
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("not found: {0}")]
    NotFound(String),

    #[error("fetch of {target:?} failed: {source}")]
    FetchFailed {
        target: FetchTarget,
        #[source]
        source: Unavailable,
    },

    #[error("enrichment of review {review_id} failed: {source}")]
    EnrichmentFailed {
        review_id: i64,
        #[source]
        source: Unavailable,
    },

    #[error("submission failed: {0}")]
    SubmissionFailed(#[source] Unavailable),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::BadRequest(_) => ErrorKind::BadRequest,
            ServiceError::Unauthorized => ErrorKind::Unauthorized,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::FetchFailed { .. }
            | ServiceError::EnrichmentFailed { .. }
            | ServiceError::SubmissionFailed(_) => ErrorKind::UpstreamUnavailable,
            ServiceError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Numeric status reported to consumers.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::BadRequest => 400,
            ErrorKind::Unauthorized => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::UpstreamUnavailable | ErrorKind::Internal => 500,
        }
    }

    /// Message safe to hand to a consumer. Internal detail never leaks.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::BadRequest(msg) | ServiceError::NotFound(msg) => msg.clone(),
            ServiceError::Unauthorized => "Unauthorized".to_string(),
            ServiceError::FetchFailed { target, .. } => match target {
                FetchTarget::Reviews => "Failed to get reviews".to_string(),
                FetchTarget::Dealerships => "Failed to fetch dealerships".to_string(),
                FetchTarget::Dealer => "Failed to get dealer".to_string(),
            },
            ServiceError::EnrichmentFailed { .. } => {
                "Failed to analyze review sentiment".to_string()
            }
            ServiceError::SubmissionFailed(_) => "Failed to add review".to_string(),
            ServiceError::Internal(_) => "Internal server error".to_string(),
        }
    }
}
