use thiserror::Error;

/// Errors returned by the Overpass map-data client.
#[derive(Debug, Error)]
pub enum OverpassError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("map-data query failed with HTTP {status}: {body}")]
    Query { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no query clauses to send")]
    EmptyQuery,

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
