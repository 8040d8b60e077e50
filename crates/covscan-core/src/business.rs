use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::{format_address, street_address};

/// Which groups of map features a search asks for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySelection {
    pub lodging: bool,
    pub commercial: bool,
    pub industrial: bool,
}

impl CategorySelection {
    #[must_use]
    pub fn any(&self) -> bool {
        self.lodging || self.commercial || self.industrial
    }
}

/// Coverage classification produced by the coverage checker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverageStatus {
    Ftth,
    Fwa,
    NotCovered,
}

impl fmt::Display for CoverageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageStatus::Ftth => write!(f, "FTTH"),
            CoverageStatus::Fwa => write!(f, "FWA"),
            CoverageStatus::NotCovered => write!(f, "Not Covered"),
        }
    }
}

/// Per-business coverage annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoverageState {
    /// A lookup for this business is in flight.
    Checking,
    Classified(CoverageStatus),
    Error,
}

impl CoverageState {
    /// Whether this state carries a definitive classification.
    #[must_use]
    pub fn is_definitive(&self) -> bool {
        matches!(self, CoverageState::Classified(_))
    }
}

impl fmt::Display for CoverageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoverageState::Checking => write!(f, "checking"),
            CoverageState::Classified(status) => write!(f, "{status}"),
            CoverageState::Error => write!(f, "error"),
        }
    }
}

/// A map feature returned by an area search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub coverage: Option<CoverageState>,
    #[serde(default)]
    pub coverage_error: Option<String>,
}

/// Tag keys that define what kind of business a record is, in display priority.
const CATEGORY_KEYS: [&str; 5] = ["tourism", "amenity", "shop", "office", "landuse"];

impl BusinessRecord {
    #[must_use]
    pub fn new(id: i64, lat: f64, lon: f64, tags: BTreeMap<String, String>) -> Self {
        Self {
            id,
            lat,
            lon,
            tags,
            coverage: None,
            coverage_error: None,
        }
    }

    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.tag("name").unwrap_or("(unnamed)")
    }

    #[must_use]
    pub fn phone(&self) -> Option<&str> {
        self.tag("phone").or_else(|| self.tag("contact:phone"))
    }

    #[must_use]
    pub fn city(&self) -> &str {
        self.tag("addr:city").unwrap_or_default()
    }

    /// `key=value` of the first category-defining tag present.
    #[must_use]
    pub fn category(&self) -> Option<String> {
        CATEGORY_KEYS
            .iter()
            .find_map(|key| self.tag(key).map(|value| format!("{key}={value}")))
    }

    /// Full display address.
    #[must_use]
    pub fn address(&self) -> String {
        format_address(&self.tags)
    }

    /// Street and house number only, used as the coverage lookup address.
    #[must_use]
    pub fn lookup_address(&self) -> String {
        street_address(&self.tags)
    }

    pub fn set_coverage(&mut self, state: CoverageState, error: Option<String>) {
        self.coverage = Some(state);
        self.coverage_error = error;
    }

    pub fn clear_coverage(&mut self) {
        self.coverage = None;
        self.coverage_error = None;
    }
}
