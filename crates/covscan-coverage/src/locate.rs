//! Postal address extraction from free text (map-search result pages).
//!
//! Matches Italian-style addresses built from a street-type keyword, a street
//! name, a house number, a five-digit postal code and a locality, in a few
//! token orders. The longest match across all patterns wins.

use std::sync::LazyLock;

use regex::Regex;

const STREET_TYPE: &str = r"\b(?i:via|viale|piazza|piazzale|corso|largo|vicolo|vico|strada|contrada|lungomare|borgo|località|localita)";
const STREET_NAME: &str = r"[\p{L}\d'.]+(?:\s+[\p{L}\d'.]+){0,5}?";
const HOUSE_NUMBER: &str = r"\d{1,4}[a-zA-Z]?(?:/\d{1,3})?\b";
const POSTCODE: &str = r"\b\d{5}\b";
const LOCALITY: &str = r"\p{Lu}[\p{L}']*(?:[ \-]\p{Lu}[\p{L}']*){0,3}";
const PROVINCE: &str = r"(?:\s*\([A-Z]{2}\))?";
const SEP: &str = r"\s*[,\-–]?\s*";

static ADDRESS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    let street = format!("{STREET_TYPE}\\s+{STREET_NAME}");
    let orders = [
        // Via Roma, 1, 00100 Roma (RM)
        format!("{street}{SEP}{HOUSE_NUMBER}{SEP}{POSTCODE}\\s+{LOCALITY}{PROVINCE}"),
        // 00100 Roma (RM), Via Roma 1
        format!("{POSTCODE}\\s+{LOCALITY}{PROVINCE}{SEP}{street}{SEP}{HOUSE_NUMBER}"),
        // Via Roma 1, Roma 00100
        format!("{street}{SEP}{HOUSE_NUMBER}{SEP}{LOCALITY}{SEP}{POSTCODE}"),
    ];
    orders
        .iter()
        .map(|pattern| Regex::new(pattern).expect("valid address regex"))
        .collect()
});

/// Longest address-like span in `text`, whitespace-collapsed; empty when none match.
#[must_use]
pub fn extract_address(text: &str) -> String {
    ADDRESS_PATTERNS
        .iter()
        .flat_map(|re| re.find_iter(text))
        .map(|m| m.as_str())
        .max_by_key(|s| s.len())
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn street_number_postcode_locality() {
        let text = "Hotel Roma\nVia Roma, 1, 00100 Roma (RM)\nAperto ora";
        assert_eq!(extract_address(text), "Via Roma, 1, 00100 Roma (RM)");
    }

    #[test]
    fn postcode_locality_first() {
        let text = "Indirizzo: 00184 Roma, Via Nazionale 5 - Telefono";
        assert_eq!(extract_address(text), "00184 Roma, Via Nazionale 5");
    }

    #[test]
    fn locality_before_postcode() {
        let text = "Piazza del Duomo 12, Milano 20122";
        assert_eq!(extract_address(text), "Piazza del Duomo 12, Milano 20122");
    }

    #[test]
    fn multi_word_street_with_ordinal() {
        let text = "Sede: Corso XX Settembre 44 16121 Genova";
        assert_eq!(extract_address(text), "Corso XX Settembre 44 16121 Genova");
    }

    #[test]
    fn picks_longest_match() {
        let text = "Via Po 3, 10124 Torino. Oppure Viale della Repubblica 120, 59100 Prato (PO)";
        assert_eq!(
            extract_address(text),
            "Viale della Repubblica 120, 59100 Prato (PO)"
        );
    }

    #[test]
    fn collapses_whitespace() {
        let text = "Via   Roma   1,\n  00100   Roma";
        assert_eq!(extract_address(text), "Via Roma 1, 00100 Roma");
    }

    #[test]
    fn no_address_gives_empty_string() {
        assert_eq!(extract_address("Nessun risultato trovato"), "");
        assert_eq!(extract_address(""), "");
    }
}
