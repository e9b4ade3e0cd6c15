use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How a canonical field's raw value is normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Trimmed free text
    Text,
    /// Person or place name, punctuation stripped
    Name,
    /// Single-letter sex code
    Sex,
    /// Four-digit year with uncertainty annotation
    Year,
    /// Calendar date with uncertainty annotation
    Date,
}

/// The fixed set of normalized record attributes every source convention maps onto
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    CensusRecord,
    IndigenousName,
    FamilyName,
    GivenName,
    Alias,
    Sex,
    YearOfBirth,
    ArrivalDate,
    DepartureDate,
    Nation,
    Band,
    Agency,
    Trade,
    Source,
    Comments,
    CauseOfDeath,
    BurialLocation,
    RelatedLinks,
}

impl CanonicalField {
    /// All canonical fields, in storage column order
    pub const ALL: [CanonicalField; 18] = [
        CanonicalField::CensusRecord,
        CanonicalField::IndigenousName,
        CanonicalField::FamilyName,
        CanonicalField::GivenName,
        CanonicalField::Alias,
        CanonicalField::Sex,
        CanonicalField::YearOfBirth,
        CanonicalField::ArrivalDate,
        CanonicalField::DepartureDate,
        CanonicalField::Nation,
        CanonicalField::Band,
        CanonicalField::Agency,
        CanonicalField::Trade,
        CanonicalField::Source,
        CanonicalField::Comments,
        CanonicalField::CauseOfDeath,
        CanonicalField::BurialLocation,
        CanonicalField::RelatedLinks,
    ];

    /// Storage key of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::CensusRecord => "census_record",
            CanonicalField::IndigenousName => "indigenous_name",
            CanonicalField::FamilyName => "family_name",
            CanonicalField::GivenName => "given_name",
            CanonicalField::Alias => "alias",
            CanonicalField::Sex => "sex",
            CanonicalField::YearOfBirth => "year_of_birth",
            CanonicalField::ArrivalDate => "arrival_date",
            CanonicalField::DepartureDate => "departure_date",
            CanonicalField::Nation => "nation",
            CanonicalField::Band => "band",
            CanonicalField::Agency => "agency",
            CanonicalField::Trade => "trade",
            CanonicalField::Source => "source",
            CanonicalField::Comments => "comments",
            CanonicalField::CauseOfDeath => "cause_of_death",
            CanonicalField::BurialLocation => "burial_location",
            CanonicalField::RelatedLinks => "related_links",
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            CanonicalField::IndigenousName
            | CanonicalField::FamilyName
            | CanonicalField::GivenName
            | CanonicalField::Alias => FieldKind::Name,
            CanonicalField::Sex => FieldKind::Sex,
            CanonicalField::YearOfBirth => FieldKind::Year,
            CanonicalField::ArrivalDate | CanonicalField::DepartureDate => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self.kind(), FieldKind::Year | FieldKind::Date)
    }

    /// Maximum stored length in characters; `None` for unbounded text
    pub fn max_len(&self) -> Option<usize> {
        match self {
            CanonicalField::CensusRecord => Some(100),
            CanonicalField::IndigenousName | CanonicalField::BurialLocation => Some(500),
            CanonicalField::FamilyName
            | CanonicalField::GivenName
            | CanonicalField::Alias
            | CanonicalField::Nation
            | CanonicalField::Band
            | CanonicalField::Agency
            | CanonicalField::Trade => Some(200),
            CanonicalField::Sex => Some(1),
            _ => None,
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        CanonicalField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == key)
            .ok_or_else(|| format!("unknown canonical field '{}'", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_keys_are_unique() {
        let mut keys: Vec<&str> = CanonicalField::ALL.iter().map(|f| f.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), CanonicalField::ALL.len());
    }

    #[test]
    fn test_from_str_roundtrip() {
        assert_eq!(
            "year_of_birth".parse::<CanonicalField>(),
            Ok(CanonicalField::YearOfBirth)
        );
        assert_eq!(" Family_Name ".parse::<CanonicalField>(), Ok(CanonicalField::FamilyName));
        assert!("notes".parse::<CanonicalField>().is_err());
    }

    #[test]
    fn test_temporal_fields() {
        let temporal: Vec<_> = CanonicalField::ALL
            .iter()
            .filter(|f| f.is_temporal())
            .collect();
        assert_eq!(
            temporal,
            vec![
                &CanonicalField::YearOfBirth,
                &CanonicalField::ArrivalDate,
                &CanonicalField::DepartureDate
            ]
        );
    }

    #[test]
    fn test_max_len() {
        assert_eq!(CanonicalField::Sex.max_len(), Some(1));
        assert_eq!(CanonicalField::Comments.max_len(), None);
    }
}
