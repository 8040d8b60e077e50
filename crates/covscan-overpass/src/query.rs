//! Overpass QL construction for area searches.
//!
//! Each enabled category expands into one `around` clause per tag filter.
//! Clause order is fixed (lodging, then commercial, then industrial) so the
//! composed query is reproducible.

use std::fmt;

use covscan_core::{CategorySelection, LatLon};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Node,
    /// Area features such as land use polygons.
    Way,
}

impl ElementKind {
    fn as_str(self) -> &'static str {
        match self {
            ElementKind::Node => "node",
            ElementKind::Way => "way",
        }
    }
}

/// One `around` filter, e.g. `node["tourism"="hotel"](around:500,41.9,12.5);`.
///
/// A `None` value matches any value of `key`.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryClause {
    pub element: ElementKind,
    pub key: &'static str,
    pub value: Option<&'static str>,
    pub center: LatLon,
    pub radius_m: f64,
}

impl fmt::Display for QueryClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[\"{}\"", self.element.as_str(), self.key)?;
        if let Some(value) = self.value {
            write!(f, "=\"{value}\"")?;
        }
        // Rounded up so a sub-metre radius never renders as `around:0`.
        write!(
            f,
            "](around:{:.0},{},{});",
            self.radius_m.ceil(),
            self.center.lat,
            self.center.lon
        )
    }
}

type Filter = (ElementKind, &'static str, Option<&'static str>);

const LODGING: [Filter; 3] = [
    (ElementKind::Node, "tourism", Some("hotel")),
    (ElementKind::Node, "tourism", Some("guest_house")),
    (ElementKind::Node, "tourism", Some("hostel")),
];

const COMMERCIAL: [Filter; 3] = [
    (ElementKind::Node, "amenity", Some("restaurant")),
    (ElementKind::Node, "shop", None),
    (ElementKind::Node, "office", None),
];

const INDUSTRIAL: [Filter; 1] = [(ElementKind::Way, "landuse", Some("industrial"))];

/// Expand a category selection into query clauses around `center`.
///
/// Returns an empty vector when no category is enabled; callers treat that as
/// a validation error.
#[must_use]
pub fn build_query(selection: CategorySelection, center: LatLon, radius_m: f64) -> Vec<QueryClause> {
    let groups: [(bool, &[Filter]); 3] = [
        (selection.lodging, &LODGING),
        (selection.commercial, &COMMERCIAL),
        (selection.industrial, &INDUSTRIAL),
    ];

    groups
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .flat_map(|(_, filters)| filters.iter())
        .map(|&(element, key, value)| QueryClause {
            element,
            key,
            value,
            center,
            radius_m,
        })
        .collect()
}

/// Wrap clauses into a single batch query that returns JSON with element
/// centers for non-node results.
#[must_use]
pub fn compose_query(clauses: &[QueryClause], timeout_secs: u64) -> String {
    let body: String = clauses.iter().map(ToString::to_string).collect();
    format!("[out:json][timeout:{timeout_secs}];({body});out center;")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROME: LatLon = LatLon {
        lat: 41.9,
        lon: 12.5,
    };

    #[test]
    fn no_category_gives_empty_query() {
        assert!(build_query(CategorySelection::default(), ROME, 1000.0).is_empty());
    }

    #[test]
    fn lodging_expands_to_three_tourism_clauses() {
        let clauses = build_query(
            CategorySelection {
                lodging: true,
                ..Default::default()
            },
            ROME,
            1000.0,
        );
        let values: Vec<_> = clauses.iter().map(|c| c.value).collect();
        assert_eq!(
            values,
            vec![Some("hotel"), Some("guest_house"), Some("hostel")]
        );
        assert!(clauses.iter().all(|c| c.key == "tourism"));
    }

    #[test]
    fn ordering_is_lodging_commercial_industrial() {
        let all = CategorySelection {
            lodging: true,
            commercial: true,
            industrial: true,
        };
        let keys: Vec<_> = build_query(all, ROME, 500.0)
            .iter()
            .map(|c| c.key)
            .collect();
        assert_eq!(
            keys,
            vec!["tourism", "tourism", "tourism", "amenity", "shop", "office", "landuse"]
        );
    }

    #[test]
    fn clause_renders_overpass_ql() {
        let clauses = build_query(
            CategorySelection {
                commercial: true,
                ..Default::default()
            },
            ROME,
            1234.4,
        );
        assert_eq!(
            clauses[0].to_string(),
            "node[\"amenity\"=\"restaurant\"](around:1235,41.9,12.5);"
        );
        assert_eq!(clauses[1].to_string(), "node[\"shop\"](around:1235,41.9,12.5);");
    }

    #[test]
    fn industrial_uses_way_elements() {
        let clauses = build_query(
            CategorySelection {
                industrial: true,
                ..Default::default()
            },
            ROME,
            2000.0,
        );
        assert_eq!(
            clauses[0].to_string(),
            "way[\"landuse\"=\"industrial\"](around:2000,41.9,12.5);"
        );
    }

    #[test]
    fn compose_wraps_clauses() {
        let clauses = build_query(
            CategorySelection {
                industrial: true,
                ..Default::default()
            },
            ROME,
            2000.0,
        );
        assert_eq!(
            compose_query(&clauses, 25),
            "[out:json][timeout:25];(way[\"landuse\"=\"industrial\"](around:2000,41.9,12.5););out center;"
        );
    }

    #[test]
    fn fractional_radius_rounds_up() {
        let lodging = CategorySelection {
            lodging: true,
            ..Default::default()
        };
        let tiny = build_query(lodging, ROME, 0.4);
        assert_eq!(
            tiny[0].to_string(),
            "node[\"tourism\"=\"hotel\"](around:1,41.9,12.5);"
        );
        let wide = build_query(lodging, ROME, 999.2);
        assert!(wide[0].to_string().contains("(around:1000,"));
    }
}
