//! Wire types for Overpass API JSON responses.

use std::collections::BTreeMap;

use covscan_core::BusinessRecord;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    pub id: i64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Present for ways and relations when the query ends in `out center`.
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

impl OverpassElement {
    /// Convert into a [`BusinessRecord`]; `None` when the element has no coordinates.
    #[must_use]
    pub fn into_business(self) -> Option<BusinessRecord> {
        let (lat, lon) = match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => (lat, lon),
            (_, _, Some(c)) => (c.lat, c.lon),
            _ => return None,
        };
        Some(BusinessRecord::new(self.id, lat, lon, self.tags))
    }
}
