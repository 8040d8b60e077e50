//! Coverage classification over scraped page text.
//!
//! Marker groups are checked in fixed priority: FTTH, then FWA, then explicit
//! "not covered". Text matching none of them is classified as not covered.

use covscan_core::CoverageStatus;

const FTTH_MARKERS: &[&str] = &[
    "ftth",
    "fiber to the home",
    "fibra fino a casa",
    "fibra ottica fino a casa",
    "fibra fino all'abitazione",
    "fibra ultraveloce fino a casa",
];

const FWA_MARKERS: &[&str] = &[
    "fwa",
    "fixed wireless",
    "wireless access",
    "fibra misto radio",
    "misto radio",
    "connessione radio",
];

const NOT_COVERED_MARKERS: &[&str] = &[
    "non coperto",
    "non coperta",
    "non è coperto",
    "non e' coperto",
    "nessuna copertura",
    "non raggiunto",
    "copertura non disponibile",
    "not covered",
    "no coverage",
];

fn first_marker(text: &str, markers: &[&'static str]) -> Option<&'static str> {
    markers.iter().copied().find(|m| text.contains(m))
}

/// Classify scraped text; matching is case-insensitive.
#[must_use]
pub fn classify_text(text: &str) -> CoverageStatus {
    let lowered = text.to_lowercase();

    if let Some(marker) = first_marker(&lowered, FTTH_MARKERS) {
        tracing::debug!(marker, "classified as FTTH");
        return CoverageStatus::Ftth;
    }
    if let Some(marker) = first_marker(&lowered, FWA_MARKERS) {
        tracing::debug!(marker, "classified as FWA");
        return CoverageStatus::Fwa;
    }
    match first_marker(&lowered, NOT_COVERED_MARKERS) {
        Some(marker) => tracing::debug!(marker, "classified as not covered"),
        None => tracing::debug!("no coverage marker found; defaulting to not covered"),
    }
    CoverageStatus::NotCovered
}
