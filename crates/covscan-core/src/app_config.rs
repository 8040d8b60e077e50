use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub overpass_url: String,
    /// Server-side timeout placed in the Overpass query header.
    pub overpass_timeout_secs: u64,
    pub overpass_max_retries: u32,
    pub scraper_base_url: String,
    /// Coverage-checker page URL with a `{query}` placeholder for the address.
    pub coverage_url_template: String,
    pub credential_path: PathBuf,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub scrape_min_interval_ms: u64,
    pub scrape_wait_for_ms: u64,
    pub enrich_pause_ms: u64,
}
