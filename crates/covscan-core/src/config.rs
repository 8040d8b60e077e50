use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_OVERPASS_TIMEOUT_SECS: u64 = 25;
pub const DEFAULT_OVERPASS_MAX_RETRIES: u32 = 2;
pub const DEFAULT_SCRAPER_BASE_URL: &str = "https://api.firecrawl.dev";
/// Coverage checker page; `{query}` is replaced by the encoded "address, city".
pub const DEFAULT_COVERAGE_URL_TEMPLATE: &str =
    "https://openfiber.it/verifica-copertura/?indirizzo={query}";
pub const DEFAULT_USER_AGENT: &str = "covscan/0.1 (coverage-survey)";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SCRAPE_MIN_INTERVAL_MS: u64 = 2000;
pub const DEFAULT_SCRAPE_WAIT_FOR_MS: u64 = 3000;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or no credential path can be
/// determined.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is invalid or no credential path can be
/// determined.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key), dirs::config_dir())
}

/// Build configuration from an env-var lookup and the platform config directory.
fn build_app_config<F>(lookup: F, config_dir: Option<PathBuf>) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let log_level = or_default("COVSCAN_LOG_LEVEL", "info");
    let overpass_url = or_default("COVSCAN_OVERPASS_URL", DEFAULT_OVERPASS_URL);
    let overpass_timeout_secs = parse_u64(
        "COVSCAN_OVERPASS_TIMEOUT_SECS",
        &DEFAULT_OVERPASS_TIMEOUT_SECS.to_string(),
    )?;
    let overpass_max_retries = parse_u32(
        "COVSCAN_OVERPASS_MAX_RETRIES",
        &DEFAULT_OVERPASS_MAX_RETRIES.to_string(),
    )?;
    let scraper_base_url = or_default("COVSCAN_SCRAPER_BASE_URL", DEFAULT_SCRAPER_BASE_URL);

    let coverage_url_template =
        or_default("COVSCAN_COVERAGE_URL_TEMPLATE", DEFAULT_COVERAGE_URL_TEMPLATE);
    if !coverage_url_template.contains("{query}") {
        return Err(ConfigError::InvalidEnvVar {
            var: "COVSCAN_COVERAGE_URL_TEMPLATE".to_string(),
            reason: "template must contain a {query} placeholder".to_string(),
        });
    }

    let credential_path = match lookup("COVSCAN_CREDENTIAL_PATH") {
        Ok(path) => PathBuf::from(path),
        Err(_) => config_dir
            .map(|dir| dir.join("covscan").join("api_key"))
            .ok_or_else(|| ConfigError::MissingEnvVar("COVSCAN_CREDENTIAL_PATH".to_string()))?,
    };

    let request_timeout_secs = parse_u64(
        "COVSCAN_REQUEST_TIMEOUT_SECS",
        &DEFAULT_REQUEST_TIMEOUT_SECS.to_string(),
    )?;
    let user_agent = or_default("COVSCAN_USER_AGENT", DEFAULT_USER_AGENT);
    let scrape_min_interval_ms = parse_u64(
        "COVSCAN_SCRAPE_MIN_INTERVAL_MS",
        &DEFAULT_SCRAPE_MIN_INTERVAL_MS.to_string(),
    )?;
    let scrape_wait_for_ms = parse_u64(
        "COVSCAN_SCRAPE_WAIT_FOR_MS",
        &DEFAULT_SCRAPE_WAIT_FOR_MS.to_string(),
    )?;
    let enrich_pause_ms = parse_u64("COVSCAN_ENRICH_PAUSE_MS", "1000")?;

    Ok(AppConfig {
        log_level,
        overpass_url,
        overpass_timeout_secs,
        overpass_max_retries,
        scraper_base_url,
        coverage_url_template,
        credential_path,
        request_timeout_secs,
        user_agent,
        scrape_min_interval_ms,
        scrape_wait_for_ms,
        enrich_pause_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
