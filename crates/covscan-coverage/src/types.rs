//! Wire types for the scraping backend's `/v1/scrape` endpoint.

use serde::{Deserialize, Serialize};

/// Body of a scrape request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    pub formats: Vec<String>,
    /// Milliseconds the backend waits for client-side rendering before capture.
    pub wait_for: u64,
    pub only_main_content: bool,
}

impl ScrapeRequest {
    /// Full-page markdown and HTML after a render settle delay.
    #[must_use]
    pub fn rendered(url: impl Into<String>, wait_for_ms: u64) -> Self {
        Self {
            url: url.into(),
            formats: vec!["markdown".to_owned(), "html".to_owned()],
            wait_for: wait_for_ms,
            only_main_content: false,
        }
    }

    /// Markdown-only capture, no settle delay.
    #[must_use]
    pub fn light(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            formats: vec!["markdown".to_owned()],
            wait_for: 0,
            only_main_content: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub success: bool,
    pub data: Option<ScrapeData>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScrapeData {
    pub content: Option<String>,
    pub markdown: Option<String>,
    pub html: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl ScrapeData {
    /// Content, markdown and HTML joined with newlines, skipping absent parts.
    #[must_use]
    pub fn combined_text(&self) -> String {
        [&self.content, &self.markdown, &self.html]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
