use std::sync::Arc;
use std::time::Duration;

use covscan_core::AppConfig;
use covscan_coverage::{CoverageService, CoverageSettings, CredentialStore};
use covscan_overpass::{OverpassClient, DEFAULT_BACKOFF_BASE_MS};

/// Long-lived clients shared by every command.
pub(crate) struct AppContext {
    pub(crate) config: AppConfig,
    pub(crate) overpass: OverpassClient,
    pub(crate) coverage: Arc<CoverageService>,
}

impl AppContext {
    pub(crate) fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let overpass = OverpassClient::with_base_url(
            &config.overpass_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_query_timeout(config.overpass_timeout_secs)
        .with_retries(config.overpass_max_retries, DEFAULT_BACKOFF_BASE_MS);

        let coverage = Arc::new(CoverageService::new(
            CoverageSettings::from_config(&config),
            CredentialStore::new(config.credential_path.clone()),
        ));

        Ok(Self {
            config,
            overpass,
            coverage,
        })
    }

    pub(crate) fn enrich_pause(&self) -> Duration {
        Duration::from_millis(self.config.enrich_pause_ms)
    }
}
