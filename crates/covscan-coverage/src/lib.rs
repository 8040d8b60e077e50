//! Coverage lookup: scraping-backend client, rate limiter, result cache,
//! text classification, and the sequential enrichment driver.

pub mod cache;
pub mod classify;
pub mod credential;
pub mod enrich;
pub mod error;
pub mod locate;
pub mod rate_limit;
pub mod scrape;
pub mod service;
pub mod types;

pub use cache::{CoverageCache, CoverageCacheEntry};
pub use classify::classify_text;
pub use credential::CredentialStore;
pub use enrich::{EnrichmentPhase, EnrichmentSummary, EnrichmentTask, EnrichmentUpdate};
pub use error::{CoverageError, CredentialError, ScrapeError};
pub use locate::extract_address;
pub use rate_limit::RateLimiter;
pub use scrape::ScrapeClient;
pub use service::{is_valid_lookup, CoverageService, CoverageSettings};
