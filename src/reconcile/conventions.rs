use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::fields::CanonicalField;
use CanonicalField::*;

/// A source-column labeling style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingConvention {
    /// Human labels with spaces ("Year of birth")
    Spaced,
    /// camelCase ("yearOfBirth")
    Camel,
    /// snake_case ("year_of_birth")
    Snake,
    /// Single abbreviated words ("birth")
    Short,
    /// Numeric column positions ("5") from the reworked export
    Positional,
}

impl NamingConvention {
    /// Declaration order; earlier conventions win ties
    pub const ALL: [NamingConvention; 5] = [
        NamingConvention::Spaced,
        NamingConvention::Camel,
        NamingConvention::Snake,
        NamingConvention::Short,
        NamingConvention::Positional,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NamingConvention::Spaced => "spaced",
            NamingConvention::Camel => "camel",
            NamingConvention::Snake => "snake",
            NamingConvention::Short => "short",
            NamingConvention::Positional => "positional",
        }
    }

    /// Label table of the convention, in declaration order
    pub fn labels(&self) -> &'static [(&'static str, CanonicalField)] {
        match self {
            NamingConvention::Spaced => SPACED,
            NamingConvention::Camel => CAMEL,
            NamingConvention::Snake => SNAKE,
            NamingConvention::Short => SHORT,
            NamingConvention::Positional => POSITIONAL,
        }
    }

    /// Whether the convention's labels carry meaning beyond an exact match.
    /// Bare column numbers do not.
    pub fn allows_partial(&self) -> bool {
        !matches!(self, NamingConvention::Positional)
    }
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamingConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "spaced" => Ok(NamingConvention::Spaced),
            "camel" | "camelcase" => Ok(NamingConvention::Camel),
            "snake" | "underscore" | "snake_case" => Ok(NamingConvention::Snake),
            "short" => Ok(NamingConvention::Short),
            "positional" | "reworked" => Ok(NamingConvention::Positional),
            _ => Err(format!(
                "unknown naming convention '{}' (expected spaced, camel, snake, short, or positional)",
                s
            )),
        }
    }
}

const SPACED: &[(&str, CanonicalField)] = &[
    ("Census Record 1900", CensusRecord),
    ("Census Record", CensusRecord),
    ("Indian Name", IndigenousName),
    ("Tribal Name", IndigenousName),
    ("Indigenous Name", IndigenousName),
    ("Family Name", FamilyName),
    ("English given name", GivenName),
    ("Given Name", GivenName),
    ("Alias", Alias),
    ("Sex", Sex),
    ("Year of birth", YearOfBirth),
    ("Arrival at Lincoln", ArrivalDate),
    ("Arrival Date", ArrivalDate),
    ("Departure from Lincoln", DepartureDate),
    ("Departure Date", DepartureDate),
    ("Nation", Nation),
    ("Band", Band),
    ("Agency", Agency),
    ("Trade", Trade),
    ("Source", Source),
    ("Comments", Comments),
    ("Cause of Death", CauseOfDeath),
    ("Cemetery / Burial", BurialLocation),
    ("Cemetery / Burial with protective quotes", BurialLocation),
    ("Relevant Links", RelatedLinks),
];

const CAMEL: &[(&str, CanonicalField)] = &[
    ("censusRecord1900", CensusRecord),
    ("censusRecord", CensusRecord),
    ("tribalName", IndigenousName),
    ("indianName", IndigenousName),
    ("familyName", FamilyName),
    ("englishGivenName", GivenName),
    ("givenName", GivenName),
    ("alias", Alias),
    ("sex", Sex),
    ("yearOfBirth", YearOfBirth),
    ("arrivalAtLincoln", ArrivalDate),
    ("departureFromLincoln", DepartureDate),
    ("nation", Nation),
    ("band", Band),
    ("agency", Agency),
    ("trade", Trade),
    ("source", Source),
    ("comments", Comments),
    ("causeOfDeath", CauseOfDeath),
    ("cemeteryBurial", BurialLocation),
    ("relevantLinks", RelatedLinks),
];

// Source labels first, then the storage keys so that normalized output can be re-imported
const SNAKE: &[(&str, CanonicalField)] = &[
    ("census_record_1900", CensusRecord),
    ("indian_name", IndigenousName),
    ("family_name", FamilyName),
    ("english_given_name", GivenName),
    ("alias", Alias),
    ("sex", Sex),
    ("year_of_birth", YearOfBirth),
    ("arrival_at_lincoln", ArrivalDate),
    ("departure_from_lincoln", DepartureDate),
    ("nation", Nation),
    ("band", Band),
    ("agency", Agency),
    ("trade", Trade),
    ("source", Source),
    ("comments", Comments),
    ("cause_of_death", CauseOfDeath),
    ("cemetery_burial", BurialLocation),
    ("relevant_links", RelatedLinks),
    ("census_record", CensusRecord),
    ("indigenous_name", IndigenousName),
    ("given_name", GivenName),
    ("arrival_date", ArrivalDate),
    ("departure_date", DepartureDate),
    ("burial_location", BurialLocation),
    ("related_links", RelatedLinks),
];

const SHORT: &[(&str, CanonicalField)] = &[
    ("census", CensusRecord),
    ("tribal", IndigenousName),
    ("family", FamilyName),
    ("english", GivenName),
    ("alias", Alias),
    ("sex", Sex),
    ("birth", YearOfBirth),
    ("arrival", ArrivalDate),
    ("departure", DepartureDate),
    ("nation", Nation),
    ("band", Band),
    ("agency", Agency),
    ("trade", Trade),
    ("source", Source),
    ("comments", Comments),
    ("death", CauseOfDeath),
    ("burial", BurialLocation),
    ("links", RelatedLinks),
];

// The reworked export has no census record column
const POSITIONAL: &[(&str, CanonicalField)] = &[
    ("0", IndigenousName),
    ("1", FamilyName),
    ("2", GivenName),
    ("3", Alias),
    ("4", Sex),
    ("5", YearOfBirth),
    ("6", ArrivalDate),
    ("7", DepartureDate),
    ("8", Nation),
    ("9", Band),
    ("10", Agency),
    ("11", Trade),
    ("12", Source),
    ("13", Comments),
    ("14", CauseOfDeath),
    ("15", BurialLocation),
    ("16", RelatedLinks),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_field_has_a_label_in_each_named_convention() {
        for convention in NamingConvention::ALL {
            for field in CanonicalField::ALL {
                if convention == NamingConvention::Positional && field == CensusRecord {
                    continue;
                }
                assert!(
                    convention.labels().iter().any(|(_, f)| *f == field),
                    "{} has no label for {}",
                    convention,
                    field
                );
            }
        }
    }

    #[test]
    fn test_labels_are_unique_within_a_convention() {
        for convention in NamingConvention::ALL {
            let mut labels: Vec<String> = convention
                .labels()
                .iter()
                .map(|(l, _)| l.to_lowercase())
                .collect();
            let total = labels.len();
            labels.sort();
            labels.dedup();
            assert_eq!(labels.len(), total, "duplicate label in {}", convention);
        }
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Camel".parse::<NamingConvention>(), Ok(NamingConvention::Camel));
        assert_eq!(
            "reworked".parse::<NamingConvention>(),
            Ok(NamingConvention::Positional)
        );
        assert!("kebab".parse::<NamingConvention>().is_err());
    }
}
