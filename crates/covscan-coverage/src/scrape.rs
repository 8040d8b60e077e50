//! HTTP client for a Firecrawl-compatible scraping backend.
//!
//! Every non-success outcome is mapped to a typed [`ScrapeError`] here, so
//! callers never inspect error message text. A rate limit shows up either as
//! HTTP 429 or as an error payload whose message carries the token `429`.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::{Client, Url};

use crate::error::ScrapeError;
use crate::types::{ScrapeData, ScrapeRequest, ScrapeResponse};

const MAX_ERROR_BODY: usize = 300;

static RATE_LIMIT_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b429\b").expect("valid rate-limit regex"));

/// Authenticated handle to the scraping backend.
pub struct ScrapeClient {
    client: Client,
    scrape_url: Url,
    api_key: String,
}

impl std::fmt::Debug for ScrapeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrapeClient")
            .field("scrape_url", &self.scrape_url.as_str())
            .field("api_key", &"[redacted]")
            .finish_non_exhaustive()
    }
}

impl ScrapeClient {
    /// Creates a client for the backend rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ScrapeError::InvalidUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let scrape_url = Url::parse(&normalised)
            .and_then(|base| base.join("v1/scrape"))
            .map_err(|e| ScrapeError::InvalidUrl {
                url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            scrape_url,
            api_key: api_key.to_owned(),
        })
    }

    /// Scrapes one page.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::RateLimited`] on HTTP 429, or when a non-2xx body or a
    ///   `success: false` payload reports `429` in its error message.
    /// - [`ScrapeError::Unauthorized`] on HTTP 401/403.
    /// - [`ScrapeError::Backend`] on any other non-2xx status or `success: false`.
    /// - [`ScrapeError::Http`] on network failure.
    /// - [`ScrapeError::Deserialize`] if the body is not the expected JSON.
    pub async fn scrape(&self, request: &ScrapeRequest) -> Result<ScrapeData, ScrapeError> {
        tracing::debug!(target_url = %request.url, wait_for = request.wait_for, "dispatching scrape");

        let response = self
            .client
            .post(self.scrape_url.clone())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok());

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(ScrapeError::RateLimited { retry_after_secs });
        }

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(ScrapeError::Unauthorized {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(backend_failure(
                status.as_u16(),
                error_message(&body),
                retry_after_secs,
            ));
        }

        let parsed = serde_json::from_str::<ScrapeResponse>(&body).map_err(|e| {
            ScrapeError::Deserialize {
                context: format!("scrape of {}", request.url),
                source: e,
            }
        })?;

        if !parsed.success {
            let message = parsed
                .error
                .unwrap_or_else(|| "success=false without error message".to_owned());
            return Err(backend_failure(status.as_u16(), message, retry_after_secs));
        }

        Ok(parsed.data.unwrap_or_default())
    }
}

/// Pull `error` out of a JSON error body, falling back to the truncated raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<ScrapeResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .unwrap_or_else(|| body.chars().take(MAX_ERROR_BODY).collect())
}

/// Whether a backend error message reports a rate limit.
fn reports_rate_limit(message: &str) -> bool {
    RATE_LIMIT_TOKEN.is_match(message)
}

fn backend_failure(status: u16, message: String, retry_after_secs: Option<u64>) -> ScrapeError {
    if reports_rate_limit(&message) {
        tracing::debug!(status, %message, "backend reported a rate limit");
        ScrapeError::RateLimited { retry_after_secs }
    } else {
        ScrapeError::Backend { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_url_is_joined_onto_base() {
        let client =
            ScrapeClient::with_base_url("k", "https://api.example.com/", 5, "covscan-test").unwrap();
        assert_eq!(client.scrape_url.as_str(), "https://api.example.com/v1/scrape");

        let client =
            ScrapeClient::with_base_url("k", "http://127.0.0.1:8080", 5, "covscan-test").unwrap();
        assert_eq!(client.scrape_url.as_str(), "http://127.0.0.1:8080/v1/scrape");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ScrapeClient::with_base_url("k", "::nope::", 5, "covscan-test").unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl { .. }));
    }

    #[test]
    fn debug_redacts_api_key() {
        let client =
            ScrapeClient::with_base_url("secret-key", "https://api.example.com", 5, "covscan-test")
                .unwrap();
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("secret-key"));
    }

    #[test]
    fn error_message_prefers_json_error_field() {
        assert_eq!(
            error_message(r#"{"success":false,"error":"Payment required"}"#),
            "Payment required"
        );
        assert_eq!(error_message("gateway down"), "gateway down");
    }

    #[test]
    fn rate_limit_token_must_stand_alone() {
        assert!(reports_rate_limit("Request failed with status code 429"));
        assert!(reports_rate_limit("Rate limit exceeded (429). Retry later."));
        assert!(!reports_rate_limit("4290 credits remaining"));
        assert!(!reports_rate_limit("job 14291 failed"));
    }

    #[test]
    fn backend_failure_maps_rate_limit_messages() {
        assert!(matches!(
            backend_failure(500, "upstream said 429".to_owned(), Some(3)),
            ScrapeError::RateLimited {
                retry_after_secs: Some(3)
            }
        ));
        assert!(matches!(
            backend_failure(500, "internal error".to_owned(), None),
            ScrapeError::Backend { status: 500, .. }
        ));
    }
}
