use std::path::PathBuf;

use thiserror::Error;

/// Transport-level failures from the scraping backend.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP 429 from the backend.
    #[error("scraping backend rate limit hit (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// HTTP 401/403: the API key was rejected.
    #[error("scraping backend rejected the API key (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Non-2xx status, or a 2xx body with `success: false`.
    #[error("scraping backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid scraping backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("API key is empty")]
    Empty,

    #[error("credential storage error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of a coverage lookup that did not produce a classification.
#[derive(Debug, Error)]
pub enum CoverageError {
    #[error("address \"{address}\" / city \"{city}\" is too short to look up")]
    InvalidAddress { address: String, city: String },

    #[error("no scraping API key configured; run `covscan key save <KEY>`")]
    MissingCredential,

    #[error("scraping API key was rejected")]
    InvalidCredential,

    /// The backend throttled the request. Never cached.
    #[error("rate limited by the scraping backend; try again shortly")]
    RateLimited,

    #[error("scrape returned no content")]
    EmptyContent,

    #[error("scrape failed: {0}")]
    ScrapeFailed(#[source] ScrapeError),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl CoverageError {
    /// Whether the failure comes from a missing or rejected API key.
    #[must_use]
    pub fn is_credential(&self) -> bool {
        matches!(
            self,
            CoverageError::MissingCredential | CoverageError::InvalidCredential
        )
    }
}

impl From<ScrapeError> for CoverageError {
    fn from(err: ScrapeError) -> Self {
        match err {
            ScrapeError::RateLimited { .. } => CoverageError::RateLimited,
            ScrapeError::Unauthorized { .. } => CoverageError::InvalidCredential,
            other => CoverageError::ScrapeFailed(other),
        }
    }
}
