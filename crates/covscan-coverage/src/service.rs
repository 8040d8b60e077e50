//! Coverage lookup service.
//!
//! Owns the credential store, the lazily built scraping client, the result
//! cache and the rate limiter. Every outbound scrape goes through the same
//! limiter, whether it comes from the enrichment loop or an ad-hoc lookup.

use std::sync::Arc;
use std::time::Duration;

use covscan_core::{
    encode_component, AppConfig, CoverageStatus, DEFAULT_COVERAGE_URL_TEMPLATE,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCRAPER_BASE_URL, DEFAULT_SCRAPE_WAIT_FOR_MS,
    DEFAULT_USER_AGENT,
};
use tokio::sync::Mutex;

use crate::cache::{CoverageCache, CoverageCacheEntry};
use crate::classify::classify_text;
use crate::credential::CredentialStore;
use crate::error::{CoverageError, ScrapeError};
use crate::locate::extract_address;
use crate::rate_limit::RateLimiter;
use crate::scrape::ScrapeClient;
use crate::types::{ScrapeData, ScrapeRequest};

/// Page fetched by [`CoverageService::test_credential`].
const CREDENTIAL_CHECK_URL: &str = "https://example.com";
const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/";

/// Tunables for [`CoverageService`].
#[derive(Debug, Clone)]
pub struct CoverageSettings {
    pub scraper_base_url: String,
    /// Coverage-checker URL with a `{query}` placeholder.
    pub coverage_url_template: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub min_interval: Duration,
    /// Render settle delay requested from the backend for coverage pages.
    pub wait_for_ms: u64,
}

impl Default for CoverageSettings {
    fn default() -> Self {
        Self {
            scraper_base_url: DEFAULT_SCRAPER_BASE_URL.to_owned(),
            coverage_url_template: DEFAULT_COVERAGE_URL_TEMPLATE.to_owned(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            min_interval: crate::rate_limit::DEFAULT_MIN_INTERVAL,
            wait_for_ms: DEFAULT_SCRAPE_WAIT_FOR_MS,
        }
    }
}

impl CoverageSettings {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            scraper_base_url: config.scraper_base_url.clone(),
            coverage_url_template: config.coverage_url_template.clone(),
            request_timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            min_interval: Duration::from_millis(config.scrape_min_interval_ms),
            wait_for_ms: config.scrape_wait_for_ms,
        }
    }
}

/// Whether an address/city pair is worth a lookup: address of at least three
/// characters with one alphanumeric, city of at least two characters.
#[must_use]
pub fn is_valid_lookup(address: &str, city: &str) -> bool {
    let address = address.trim();
    let city = city.trim();
    address.chars().count() >= 3
        && address.chars().any(char::is_alphanumeric)
        && city.chars().count() >= 2
}

pub struct CoverageService {
    settings: CoverageSettings,
    store: CredentialStore,
    client: Mutex<Option<Arc<ScrapeClient>>>,
    cache: CoverageCache,
    limiter: RateLimiter,
}

impl CoverageService {
    #[must_use]
    pub fn new(settings: CoverageSettings, store: CredentialStore) -> Self {
        Self {
            limiter: RateLimiter::new(settings.min_interval),
            settings,
            store,
            client: Mutex::new(None),
            cache: CoverageCache::new(),
        }
    }

    #[must_use]
    pub fn cache(&self) -> &CoverageCache {
        &self.cache
    }

    fn build_client(&self, api_key: &str) -> Result<ScrapeClient, ScrapeError> {
        ScrapeClient::with_base_url(
            api_key,
            &self.settings.scraper_base_url,
            self.settings.request_timeout_secs,
            &self.settings.user_agent,
        )
    }

    /// Live client handle, built from storage on first use.
    async fn client_handle(&self) -> Result<Arc<ScrapeClient>, CoverageError> {
        let mut slot = self.client.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }
        let api_key = self
            .store
            .get()
            .await?
            .ok_or(CoverageError::MissingCredential)?;
        let client = Arc::new(self.build_client(&api_key)?);
        *slot = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Read the stored key without touching the client handle.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::Credential`] if storage cannot be read.
    pub async fn get(&self) -> Result<Option<String>, CoverageError> {
        Ok(self.store.get().await?)
    }

    /// Persist `api_key` and replace the live client handle.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::Credential`] for a blank key or storage failure,
    /// or [`CoverageError::ScrapeFailed`] if the client cannot be built.
    pub async fn save(&self, api_key: &str) -> Result<(), CoverageError> {
        self.store.save(api_key).await?;
        let client = self.build_client(api_key.trim())?;
        *self.client.lock().await = Some(Arc::new(client));
        Ok(())
    }

    /// Remove the stored key and discard the client handle.
    ///
    /// # Errors
    ///
    /// Returns [`CoverageError::Credential`] if storage cannot be cleared.
    pub async fn clear(&self) -> Result<(), CoverageError> {
        self.store.clear().await?;
        *self.client.lock().await = None;
        Ok(())
    }

    /// One rate-limited scrape through `client`.
    async fn dispatch(
        &self,
        client: &ScrapeClient,
        request: &ScrapeRequest,
    ) -> Result<ScrapeData, ScrapeError> {
        let permit = self.limiter.acquire().await;
        let result = client.scrape(request).await;
        drop(permit);
        result
    }

    /// Coverage-checker URL for an address.
    #[must_use]
    pub fn coverage_url(&self, address: &str, city: &str) -> String {
        let query = format!("{}, {}", address.trim(), city.trim());
        self.settings
            .coverage_url_template
            .replace("{query}", &encode_component(&query))
    }

    pub async fn cache_len(&self) -> usize {
        self.cache.len().await
    }

    /// Previously cached classification and when it was made, without any network call.
    pub async fn cached(&self, city: &str, address: &str) -> Option<CoverageCacheEntry> {
        self.cache.get(address, city).await
    }

    /// Classify internet coverage at `address` in `city`.
    ///
    /// Cached results return immediately. Successful classifications are
    /// cached; failures never are.
    ///
    /// # Errors
    ///
    /// - [`CoverageError::InvalidAddress`] when the input fails validation (no network call).
    /// - [`CoverageError::MissingCredential`] when no API key is stored.
    /// - [`CoverageError::InvalidCredential`] when the backend rejects the key.
    /// - [`CoverageError::RateLimited`] when the backend throttles the request.
    /// - [`CoverageError::EmptyContent`] when the scrape returns no text.
    /// - [`CoverageError::ScrapeFailed`] for any other backend or transport failure.
    pub async fn classify(&self, city: &str, address: &str) -> Result<CoverageStatus, CoverageError> {
        if !is_valid_lookup(address, city) {
            return Err(CoverageError::InvalidAddress {
                address: address.trim().to_owned(),
                city: city.trim().to_owned(),
            });
        }

        if let Some(entry) = self.cache.get(address, city).await {
            tracing::debug!(address, city, status = %entry.status, "coverage cache hit");
            return Ok(entry.status);
        }

        let client = self.client_handle().await?;
        let url = self.coverage_url(address, city);
        let request = ScrapeRequest::rendered(url, self.settings.wait_for_ms);

        let data = match self.dispatch(&client, &request).await {
            Ok(data) => data,
            Err(err) => {
                let err = CoverageError::from(err);
                match &err {
                    CoverageError::RateLimited => {
                        tracing::warn!(address, city, "coverage lookup rate limited");
                    }
                    other => tracing::warn!(address, city, error = %other, "coverage lookup failed"),
                }
                return Err(err);
            }
        };

        let text = data.combined_text();
        if text.trim().is_empty() {
            tracing::warn!(address, city, "coverage page scraped without content");
            return Err(CoverageError::EmptyContent);
        }

        let status = classify_text(&text);
        self.cache.insert(address, city, status).await;
        tracing::info!(address, city, %status, "coverage classified");
        Ok(status)
    }

    /// Best-effort address for a business, scraped from a map-search page near
    /// `(lat, lon)`. Returns an empty string when nothing address-like is found.
    ///
    /// # Errors
    ///
    /// Credential and scrape failures as for [`Self::classify`].
    pub async fn locate_address(
        &self,
        business_name: &str,
        lat: f64,
        lon: f64,
    ) -> Result<String, CoverageError> {
        let name = business_name.trim();
        if name.is_empty() {
            return Ok(String::new());
        }

        let client = self.client_handle().await?;
        let url = format!(
            "{MAP_SEARCH_BASE}{}/@{lat},{lon},17z",
            encode_component(name)
        );
        let request = ScrapeRequest::rendered(url, self.settings.wait_for_ms);
        let data = self.dispatch(&client, &request).await?;

        let address = extract_address(&data.combined_text());
        tracing::debug!(business = name, address, "address lookup finished");
        Ok(address)
    }

    /// Check `api_key` with one light scrape on a temporary client. Nothing is persisted.
    pub async fn test_credential(&self, api_key: &str) -> bool {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return false;
        }
        let client = match self.build_client(api_key) {
            Ok(client) => client,
            Err(err) => {
                tracing::warn!(error = %err, "could not build client for credential test");
                return false;
            }
        };
        match self
            .dispatch(&client, &ScrapeRequest::light(CREDENTIAL_CHECK_URL))
            .await
        {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(error = %err, "credential test failed");
                false
            }
        }
    }
}
