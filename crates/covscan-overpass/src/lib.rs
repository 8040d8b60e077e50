//! Overpass API access: area query construction and the map-data client.

pub mod client;
pub mod error;
pub mod query;
mod retry;
pub mod types;

pub use client::{OverpassClient, DEFAULT_BACKOFF_BASE_MS};
pub use error::OverpassError;
pub use query::{build_query, compose_query, ElementKind, QueryClause};
