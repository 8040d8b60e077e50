//! HTTP client for the Overpass API interpreter endpoint.

use std::time::Duration;

use covscan_core::{BusinessRecord, DEFAULT_OVERPASS_MAX_RETRIES, DEFAULT_OVERPASS_TIMEOUT_SECS};
use reqwest::{Client, Url};

use crate::error::OverpassError;
use crate::query::{compose_query, QueryClause};
use crate::retry::retry_with_backoff;
use crate::types::OverpassResponse;

/// First retry delay; doubles on every further attempt.
pub const DEFAULT_BACKOFF_BASE_MS: u64 = 1_000;
/// Longest error body kept in [`OverpassError::Query`].
const MAX_ERROR_BODY: usize = 300;

/// Client for an Overpass API interpreter.
///
/// Built with [`OverpassClient::with_base_url`] from the configured interpreter
/// URL, which may be the public instance, a mirror or a mock server.
pub struct OverpassClient {
    client: Client,
    endpoint: Url,
    query_timeout_secs: u64,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl OverpassClient {
    /// Creates a client for a custom interpreter URL.
    ///
    /// # Errors
    ///
    /// Returns [`OverpassError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`OverpassError::InvalidUrl`] if `endpoint` does not parse.
    pub fn with_base_url(
        endpoint: &str,
        request_timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, OverpassError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let endpoint = Url::parse(endpoint).map_err(|e| OverpassError::InvalidUrl {
            url: endpoint.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            endpoint,
            query_timeout_secs: DEFAULT_OVERPASS_TIMEOUT_SECS,
            max_retries: DEFAULT_OVERPASS_MAX_RETRIES,
            backoff_base_ms: DEFAULT_BACKOFF_BASE_MS,
        })
    }

    /// Server-side timeout written into the query header.
    #[must_use]
    pub fn with_query_timeout(mut self, secs: u64) -> Self {
        self.query_timeout_secs = secs;
        self
    }

    /// Retry policy for transient failures. `max_retries = 0` disables retries.
    #[must_use]
    pub fn with_retries(mut self, max_retries: u32, backoff_base_ms: u64) -> Self {
        self.max_retries = max_retries;
        self.backoff_base_ms = backoff_base_ms;
        self
    }

    /// Runs the clauses as one batch query and returns the matching businesses.
    ///
    /// Elements without coordinates are skipped.
    ///
    /// # Errors
    ///
    /// - [`OverpassError::EmptyQuery`] if `clauses` is empty (no request is sent).
    /// - [`OverpassError::Query`] on a non-2xx status after retries.
    /// - [`OverpassError::Http`] on network failure after retries.
    /// - [`OverpassError::Deserialize`] if the body is not Overpass JSON.
    pub async fn search(&self, clauses: &[QueryClause]) -> Result<Vec<BusinessRecord>, OverpassError> {
        if clauses.is_empty() {
            return Err(OverpassError::EmptyQuery);
        }
        let query = compose_query(clauses, self.query_timeout_secs);
        tracing::debug!(clauses = clauses.len(), query, "sending Overpass query");

        let response = retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.post_query(&query)
        })
        .await?;

        let total = response.elements.len();
        let businesses: Vec<BusinessRecord> = response
            .elements
            .into_iter()
            .filter_map(|el| {
                let id = el.id;
                let business = el.into_business();
                if business.is_none() {
                    tracing::debug!(id, "skipping element without coordinates");
                }
                business
            })
            .collect();

        tracing::info!(
            elements = total,
            businesses = businesses.len(),
            "Overpass query complete"
        );
        Ok(businesses)
    }

    async fn post_query(&self, query: &str) -> Result<OverpassResponse, OverpassError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[("data", query)])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let body = body.chars().take(MAX_ERROR_BODY).collect();
            return Err(OverpassError::Query {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str::<OverpassResponse>(&body).map_err(|e| OverpassError::Deserialize {
            context: format!("Overpass response from {}", self.endpoint),
            source: e,
        })
    }
}
