//! Identifier shape patterns.
//!
//! Beacon identifiers are CURIEs (`prefix:reference`). A record whose id is
//! not CURIE-shaped is still usable as a filter, so a bad shape is only ever
//! reported as a warning.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Compact URI: an NCName-like prefix, a colon, and a non-empty local part
    /// without whitespace. Blank nodes (`_:b0`) are not CURIEs.
    pub static ref CURIE_PATTERN: Regex = Regex::new(
        r"^[A-Za-z][A-Za-z0-9_.\-]*:[^\s]+$"
    ).unwrap();
}

/// Check if an identifier is CURIE-shaped.
pub fn is_curie(id: &str) -> bool {
    CURIE_PATTERN.is_match(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curie_detection() {
        assert!(is_curie("NCBIGene:1017"));
        assert!(is_curie("CHEBI:15365"));
        assert!(is_curie("wd:Q12345"));
        assert!(is_curie("UMLS:C0011849"));

        assert!(!is_curie("1017"));
        assert!(!is_curie("_:b0"));
        assert!(!is_curie("NCBIGene:"));
        assert!(!is_curie("NCBI Gene:1017"));
        assert!(!is_curie(""));
    }
}
