pub mod address;
pub mod app_config;
pub mod business;
pub mod config;
pub mod geo;
pub mod links;

pub use address::{format_address, street_address};
pub use app_config::AppConfig;
pub use business::{BusinessRecord, CategorySelection, CoverageState, CoverageStatus};
pub use config::{
    load_app_config, load_app_config_from_env, DEFAULT_COVERAGE_URL_TEMPLATE,
    DEFAULT_OVERPASS_MAX_RETRIES, DEFAULT_OVERPASS_TIMEOUT_SECS, DEFAULT_OVERPASS_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_SCRAPER_BASE_URL,
    DEFAULT_SCRAPE_MIN_INTERVAL_MS, DEFAULT_SCRAPE_WAIT_FOR_MS, DEFAULT_USER_AGENT,
};
pub use geo::{estimate_radius_m, estimate_radius_text, radius_hint, LatLon, SearchParameters};
pub use links::{encode_component, map_search_url, web_search_url};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// User input that cannot be turned into a search.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("select at least one category (lodging, commercial, industrial)")]
    NoCategorySelected,

    #[error("coordinates must be \"lat, lon\", got \"{0}\"")]
    MalformedCoordinates(String),

    #[error("coordinates out of range: {lat}, {lon}")]
    CoordinatesOutOfRange { lat: f64, lon: f64 },

    #[error("invalid radius \"{0}\"")]
    InvalidRadius(String),

    #[error("search radius must be positive; enter a valid antenna height or a manual radius")]
    ZeroRadius,
}
