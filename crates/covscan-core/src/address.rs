//! Postal address formatting from map-feature tags.

use std::collections::BTreeMap;

fn tag_value<'a>(tags: &'a BTreeMap<String, String>, key: &str) -> &'a str {
    tags.get(&format!("addr:{key}"))
        .or_else(|| tags.get(key))
        .map_or("", String::as_str)
}

/// Join non-empty parts with single spaces, collapsing inner whitespace.
fn join_words(parts: &[&str]) -> String {
    parts
        .iter()
        .flat_map(|p| p.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Street and house number, e.g. `"Via Roma 1"`.
#[must_use]
pub fn street_address(tags: &BTreeMap<String, String>) -> String {
    join_words(&[tag_value(tags, "street"), tag_value(tags, "housenumber")])
}

/// Human-readable address, e.g. `"Via Roma 1, 00100 Roma"`.
///
/// Accepts both `addr:`-prefixed and bare keys. Returns an empty string when
/// no address tag is present.
#[must_use]
pub fn format_address(tags: &BTreeMap<String, String>) -> String {
    let street = street_address(tags);
    let locality = join_words(&[tag_value(tags, "postcode"), tag_value(tags, "city")]);

    match (street.is_empty(), locality.is_empty()) {
        (false, false) => format!("{street}, {locality}"),
        (false, true) => street,
        (true, _) => locality,
    }
}
