//! Outbound deep links for a business (web search and map search).

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

const WEB_SEARCH_BASE: &str = "https://www.google.com/search?q=";
const MAP_SEARCH_BASE: &str = "https://www.google.com/maps/search/?api=1&query=";

/// Characters left unescaped in query values, matching `encodeURIComponent`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a single query value.
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

fn search_terms(name: &str, address: &str) -> String {
    [name.trim(), address.trim()]
        .iter()
        .filter(|s| !s.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}

#[must_use]
pub fn web_search_url(name: &str, address: &str) -> String {
    format!(
        "{WEB_SEARCH_BASE}{}",
        encode_component(&search_terms(name, address))
    )
}

#[must_use]
pub fn map_search_url(name: &str, address: &str) -> String {
    format!(
        "{MAP_SEARCH_BASE}{}",
        encode_component(&search_terms(name, address))
    )
}
