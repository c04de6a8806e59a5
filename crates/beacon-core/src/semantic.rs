//! Semantic group vocabulary.
//!
//! The closed set of category codes a beacon may assign to a concept. The
//! list is configuration data shipped with the validator; it is never
//! discovered from the service at run time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown semantic group: {0}")]
pub struct UnknownSemanticGroup(pub String);

/// Coarse category tag assigned to a concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SemanticGroup {
    Activities,
    Anatomy,
    Chemicals,
    Concepts,
    Devices,
    Disorders,
    Genes,
    Geography,
    LivingBeings,
    Objects,
    Occupations,
    Organizations,
    Phenomena,
    Physiology,
    Procedures,
}

impl SemanticGroup {
    /// Every group, in code order. Probed by the semantic filter checks.
    pub const ALL: [SemanticGroup; 15] = [
        SemanticGroup::Activities,
        SemanticGroup::Anatomy,
        SemanticGroup::Chemicals,
        SemanticGroup::Concepts,
        SemanticGroup::Devices,
        SemanticGroup::Disorders,
        SemanticGroup::Genes,
        SemanticGroup::Geography,
        SemanticGroup::LivingBeings,
        SemanticGroup::Objects,
        SemanticGroup::Occupations,
        SemanticGroup::Organizations,
        SemanticGroup::Phenomena,
        SemanticGroup::Physiology,
        SemanticGroup::Procedures,
    ];

    /// Code sent as the `semgroups` filter and compared against records.
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticGroup::Activities => "ACTI",
            SemanticGroup::Anatomy => "ANAT",
            SemanticGroup::Chemicals => "CHEM",
            SemanticGroup::Concepts => "CONC",
            SemanticGroup::Devices => "DEVI",
            SemanticGroup::Disorders => "DISO",
            SemanticGroup::Genes => "GENE",
            SemanticGroup::Geography => "GEOG",
            SemanticGroup::LivingBeings => "LIVB",
            SemanticGroup::Objects => "OBJC",
            SemanticGroup::Occupations => "OCCU",
            SemanticGroup::Organizations => "ORGA",
            SemanticGroup::Phenomena => "PHEN",
            SemanticGroup::Physiology => "PHYS",
            SemanticGroup::Procedures => "PROC",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SemanticGroup::Activities => "Activities & Behaviors",
            SemanticGroup::Anatomy => "Anatomy",
            SemanticGroup::Chemicals => "Chemicals & Drugs",
            SemanticGroup::Concepts => "Concepts & Ideas",
            SemanticGroup::Devices => "Devices",
            SemanticGroup::Disorders => "Disorders",
            SemanticGroup::Genes => "Genes & Molecular Sequences",
            SemanticGroup::Geography => "Geographic Areas",
            SemanticGroup::LivingBeings => "Living Beings",
            SemanticGroup::Objects => "Objects",
            SemanticGroup::Occupations => "Occupations",
            SemanticGroup::Organizations => "Organizations",
            SemanticGroup::Phenomena => "Phenomena",
            SemanticGroup::Physiology => "Physiology",
            SemanticGroup::Procedures => "Procedures",
        }
    }

    /// Whether a record's raw group string names this group.
    ///
    /// Comparison is case-insensitive; beacons are inconsistent about case.
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for SemanticGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SemanticGroup {
    type Err = UnknownSemanticGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SemanticGroup::ALL
            .iter()
            .copied()
            .find(|group| group.matches(s))
            .ok_or_else(|| UnknownSemanticGroup(s.to_string()))
    }
}

impl TryFrom<String> for SemanticGroup {
    type Error = UnknownSemanticGroup;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SemanticGroup> for String {
    fn from(group: SemanticGroup) -> Self {
        group.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_is_case_insensitive() {
        assert!(SemanticGroup::Genes.matches("GENE"));
        assert!(SemanticGroup::Genes.matches("gene"));
        assert!(SemanticGroup::Genes.matches("Gene"));
        assert!(!SemanticGroup::Genes.matches("DISO"));
        assert!(!SemanticGroup::Genes.matches(""));
    }

    #[test]
    fn test_parse_round_trip_for_every_group() {
        for group in SemanticGroup::ALL {
            assert_eq!(group.as_str().parse::<SemanticGroup>().unwrap(), group);
            assert_eq!(group.as_str().to_lowercase().parse::<SemanticGroup>().unwrap(), group);
        }
    }

    #[test]
    fn test_unknown_group_rejected() {
        let err = "disease".parse::<SemanticGroup>().unwrap_err();
        assert_eq!(err, UnknownSemanticGroup("disease".to_string()));
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&SemanticGroup::Chemicals).unwrap();
        assert_eq!(json, "\"CHEM\"");

        let parsed: SemanticGroup = serde_json::from_str("\"diso\"").unwrap();
        assert_eq!(parsed, SemanticGroup::Disorders);

        assert!(serde_json::from_str::<SemanticGroup>("\"XXXX\"").is_err());
    }
}
