//! Plain-text rendering of result tables, coverage badges and deep links.

use std::fmt::Write as _;

use covscan_core::{map_search_url, web_search_url, BusinessRecord, CoverageState};
use covscan_coverage::EnrichmentSummary;

const NAME_WIDTH: usize = 28;
const CATEGORY_WIDTH: usize = 22;
const ADDRESS_WIDTH: usize = 36;
const PHONE_WIDTH: usize = 16;

/// Badge shown in the coverage column; empty when no lookup has happened.
pub(crate) fn badge(business: &BusinessRecord) -> String {
    match business.coverage {
        None => String::new(),
        Some(CoverageState::Checking) => "[checking...]".to_owned(),
        Some(CoverageState::Classified(status)) => format!("[{status}]"),
        Some(CoverageState::Error) => "[error]".to_owned(),
    }
}

/// Truncate to `width` characters, marking the cut with `...`.
fn fit(value: &str, width: usize) -> String {
    if value.chars().count() > width {
        format!("{}...", value.chars().take(width - 3).collect::<String>())
    } else {
        value.to_owned()
    }
}

fn dash_if_empty(value: &str) -> &str {
    if value.is_empty() {
        "\u{2014}"
    } else {
        value
    }
}

pub(crate) fn render_table(businesses: &[BusinessRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<4}{:<w1$}  {:<w2$}  {:<w3$}  {:<w4$}  COVERAGE",
        "#",
        "NAME",
        "CATEGORY",
        "ADDRESS",
        "PHONE",
        w1 = NAME_WIDTH,
        w2 = CATEGORY_WIDTH,
        w3 = ADDRESS_WIDTH,
        w4 = PHONE_WIDTH,
    );
    for (i, business) in businesses.iter().enumerate() {
        let category = business.category().unwrap_or_default();
        let address = business.address();
        let _ = writeln!(
            out,
            "{:<4}{:<w1$}  {:<w2$}  {:<w3$}  {:<w4$}  {}",
            i + 1,
            fit(business.name(), NAME_WIDTH),
            fit(dash_if_empty(&category), CATEGORY_WIDTH),
            fit(dash_if_empty(&address), ADDRESS_WIDTH),
            fit(dash_if_empty(business.phone().unwrap_or_default()), PHONE_WIDTH),
            badge(business),
            w1 = NAME_WIDTH,
            w2 = CATEGORY_WIDTH,
            w3 = ADDRESS_WIDTH,
            w4 = PHONE_WIDTH,
        );
    }
    out
}

/// Web-search and map-search links for one business.
pub(crate) fn render_links(position: usize, business: &BusinessRecord) -> String {
    let address = business.address();
    let mut out = format!("{position}. {}\n", business.name());
    let _ = writeln!(out, "   web: {}", web_search_url(business.name(), &address));
    let _ = writeln!(out, "   map: {}", map_search_url(business.name(), &address));
    if let Some(error) = &business.coverage_error {
        let _ = writeln!(out, "   coverage error: {error}");
    }
    out
}

/// One progress line for an enrichment snapshot.
pub(crate) fn render_progress(index: usize, business: &BusinessRecord) -> String {
    let mut line = format!("[{}] {} {}", index + 1, business.name(), badge(business));
    if let Some(error) = &business.coverage_error {
        let _ = write!(line, " ({error})");
    }
    line
}

pub(crate) fn render_summary(summary: &EnrichmentSummary) -> String {
    format!(
        "coverage checked: {} of {} classified, {} skipped, {} failed",
        summary.classified, summary.total, summary.skipped, summary.failed
    )
}

/// Show only the edges of an API key.
pub(crate) fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}{}{tail}", "*".repeat(chars.len() - 7))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use covscan_core::CoverageStatus;

    use super::*;

    fn hotel() -> BusinessRecord {
        let tags: BTreeMap<String, String> = [
            ("name", "Hotel Roma"),
            ("tourism", "hotel"),
            ("addr:street", "Via Roma"),
            ("addr:housenumber", "1"),
            ("addr:postcode", "00100"),
            ("addr:city", "Roma"),
            ("phone", "+39 06 1234567"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v.to_owned()))
        .collect();
        BusinessRecord::new(1, 41.9, 12.5, tags)
    }

    #[test]
    fn badge_per_state() {
        let mut b = hotel();
        assert_eq!(badge(&b), "");
        b.set_coverage(CoverageState::Checking, None);
        assert_eq!(badge(&b), "[checking...]");
        b.set_coverage(CoverageState::Classified(CoverageStatus::NotCovered), None);
        assert_eq!(badge(&b), "[Not Covered]");
        b.set_coverage(CoverageState::Error, Some("boom".to_owned()));
        assert_eq!(badge(&b), "[error]");
    }

    #[test]
    fn table_has_header_and_one_row_per_business() {
        let mut b = hotel();
        b.set_coverage(CoverageState::Classified(CoverageStatus::Ftth), None);
        let table = render_table(&[b]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("#   NAME"));
        assert!(lines[1].contains("Hotel Roma"));
        assert!(lines[1].contains("tourism=hotel"));
        assert!(lines[1].contains("Via Roma 1, 00100 Roma"));
        assert!(lines[1].ends_with("[FTTH]"));
    }

    #[test]
    fn long_values_are_truncated() {
        assert_eq!(fit("abcdefghij", 8), "abcde...");
        assert_eq!(fit("abc", 8), "abc");
    }

    #[test]
    fn links_are_encoded() {
        let links = render_links(1, &hotel());
        assert!(links.contains("https://www.google.com/search?q=Hotel%20Roma%20Via%20Roma%201%2C%2000100%20Roma"));
        assert!(links.contains("https://www.google.com/maps/search/?api=1&query=Hotel%20Roma"));
    }

    #[test]
    fn progress_includes_error_text() {
        let mut b = hotel();
        b.set_coverage(CoverageState::Error, Some("scrape returned no content".to_owned()));
        assert_eq!(
            render_progress(0, &b),
            "[1] Hotel Roma [error] (scrape returned no content)"
        );
    }

    #[test]
    fn mask_key_hides_the_middle() {
        assert_eq!(mask_key("fc-1234567890abcd"), "fc-**********abcd");
        assert_eq!(mask_key("short"), "*****");
    }
}
