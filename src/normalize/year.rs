use chrono::Datelike;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::date::{parse_exact, parse_generic};
use super::patterns::{classify, find_year, is_approximate, is_infinity, is_missing};
use crate::types::{
    NormalizedTemporal, NormalizedYear, RawValue, UncertaintyKind, CENSUS_ANCHOR_YEAR,
    MAX_BIRTH_YEAR, MIN_YEAR,
};

/// "1890" or "1890.0" (spreadsheet float exports)
static SIMPLE_YEAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{4})(?:\.0+)?$").unwrap());

static AGE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\baged?\b").unwrap());

static AGE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\baged?\s*:?\s*(\d{1,3})\b").unwrap());

static OR_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bor\b").unwrap());

/// "1890/1891", "1890-1891", or the abbreviated "1890/91" as the whole value.
/// A hyphen with a two-digit tail reads as year-month and is not a pair.
static YEAR_PAIR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})\s*(?:[-\u{2013}/]\s*\d{4}|/\s*\d{2})$").unwrap()
});

/// Normalize a year-of-birth field from a raw scalar
pub fn normalize_year(raw: &RawValue) -> NormalizedYear {
    match raw {
        RawValue::Missing => NormalizedTemporal::empty(),
        RawValue::Integer(i) => {
            let value = i32::try_from(*i).ok().filter(|y| in_year_range(*y));
            NormalizedTemporal::new(value, None, i.to_string())
        }
        RawValue::Float(f) => normalize_year_float(*f, raw),
        RawValue::Bool(_) | RawValue::Text(_) => match raw.as_text() {
            Some(text) => normalize_year_str(&text),
            None => NormalizedTemporal::empty(),
        },
    }
}

/// Normalize a year-of-birth field given as text
pub fn normalize_year_str(text: &str) -> NormalizedYear {
    if is_missing(text) {
        return NormalizedTemporal::empty();
    }

    let (value, kind) = extract_year(text);
    if value.is_none() {
        debug!(text, kind = ?kind, "could not parse year");
    }
    NormalizedTemporal::new(value, kind, text.to_string())
}

/// Only whole, finite floats convert; a fractional year is rejected, never truncated
fn normalize_year_float(f: f64, raw: &RawValue) -> NormalizedYear {
    if f.is_nan() {
        return NormalizedTemporal::empty();
    }
    let text = raw.as_text().map(|t| t.into_owned()).unwrap_or_default();

    let value = if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
            .and_then(|i| i32::try_from(i).ok())
            .filter(|y| in_year_range(*y))
    } else {
        None
    };
    NormalizedTemporal::new(value, None, text)
}

/// Apply the year rules in order; the first rule whose pattern matches decides
/// both the value and the uncertainty kind.
fn extract_year(text: &str) -> (Option<i32>, Option<UncertaintyKind>) {
    let lower = text.trim().to_lowercase();

    if is_infinity(&lower) {
        return (None, None);
    }

    if let Some(caps) = SIMPLE_YEAR.captures(&lower) {
        let year = caps[1].parse::<i32>().ok().filter(|y| in_year_range(*y));
        return (year, None);
    }

    if AGE_WORD.is_match(&lower) {
        return (year_from_age(&lower), Some(UncertaintyKind::EstimatedFromAge));
    }

    if is_approximate(&lower) {
        return (
            find_year(&lower, MIN_YEAR, MAX_BIRTH_YEAR),
            Some(UncertaintyKind::Approximate),
        );
    }

    if let Some(first) = first_of_range(&lower) {
        return (
            find_year(first, MIN_YEAR, MAX_BIRTH_YEAR),
            Some(UncertaintyKind::Range),
        );
    }

    if let Some(date) = parse_exact(&lower).or_else(|| parse_generic(&lower)) {
        return (Some(date.year()).filter(|y| in_year_range(*y)), None);
    }

    (None, classify(&lower))
}

/// An explicit year wins; otherwise the stated age is subtracted from the census year
fn year_from_age(lower: &str) -> Option<i32> {
    if let Some(year) = find_year(lower, MIN_YEAR, MAX_BIRTH_YEAR) {
        return Some(year);
    }

    let age: i32 = AGE_NUMBER.captures(lower)?[1].parse().ok()?;
    let estimated = CENSUS_ANCHOR_YEAR - age;
    if in_year_range(estimated) {
        debug!(age, estimated, "estimated birth year from age");
        Some(estimated)
    } else {
        None
    }
}

/// First element of "Y1 or Y2", "Y1/Y2", or "Y1-Y2"
fn first_of_range(lower: &str) -> Option<&str> {
    if let Some(m) = OR_SPLIT.find(lower) {
        return Some(&lower[..m.start()]);
    }
    YEAR_PAIR
        .captures(lower.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn in_year_range(year: i32) -> bool {
    (MIN_YEAR..=MAX_BIRTH_YEAR).contains(&year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_years() {
        assert_eq!(normalize_year(&RawValue::Integer(1890)).value, Some(1890));
        assert_eq!(normalize_year(&RawValue::Integer(1799)).value, None);
        assert_eq!(normalize_year(&RawValue::Integer(2001)).value, None);
        assert_eq!(normalize_year(&RawValue::Integer(i64::MAX)).value, None);
    }

    #[test]
    fn test_whole_number_floats_only() {
        let whole = normalize_year(&RawValue::Float(1890.0));
        assert_eq!(whole.value, Some(1890));
        assert!(!whole.is_uncertain);
        assert_eq!(whole.original_text.as_deref(), Some("1890.0"));

        let fractional = normalize_year(&RawValue::Float(1890.5));
        assert_eq!(fractional.value, None);
        assert_eq!(fractional.original_text.as_deref(), Some("1890.5"));
    }

    #[test]
    fn test_non_finite_floats() {
        assert!(normalize_year(&RawValue::Float(f64::NAN)).is_empty());

        let inf = normalize_year(&RawValue::Float(f64::INFINITY));
        assert_eq!(inf.value, None);
        assert!(!inf.is_uncertain);
        assert!(inf.original_text.is_some());

        assert_eq!(normalize_year_str("Infinity").value, None);
        assert_eq!(normalize_year_str("-inf").value, None);
    }

    #[test]
    fn test_simple_year_strings() {
        assert_eq!(normalize_year_str("1890").value, Some(1890));
        assert_eq!(normalize_year_str(" 1890.0 ").value, Some(1890));
        assert_eq!(normalize_year_str("1750").value, None);
        assert_eq!(normalize_year_str("1890.5").value, None);
    }

    #[test]
    fn test_age_derivation() {
        let result = normalize_year_str("age 20");
        assert_eq!(result.value, Some(1880));
        assert!(result.is_uncertain);
        assert_eq!(result.uncertainty_kind, Some(UncertaintyKind::EstimatedFromAge));
    }

    #[test]
    fn test_age_variants() {
        assert_eq!(normalize_year_str("Age: 12").value, Some(1888));
        assert_eq!(normalize_year_str("aged 9").value, Some(1891));
        // An explicit year beats the census anchor
        let explicit = normalize_year_str("1885 (age 15)");
        assert_eq!(explicit.value, Some(1885));
        assert_eq!(explicit.uncertainty_kind, Some(UncertaintyKind::EstimatedFromAge));
        // Ages that land outside the window are rejected
        assert_eq!(normalize_year_str("age 150").value, None);
    }

    #[test]
    fn test_page_is_not_age() {
        assert_ne!(
            normalize_year_str("see page 12").uncertainty_kind,
            Some(UncertaintyKind::EstimatedFromAge)
        );
    }

    #[test]
    fn test_approximate() {
        for text in ["about 1890", "c. 1890", "circa 1890", "c.1890"] {
            let result = normalize_year_str(text);
            assert_eq!(result.value, Some(1890), "{}", text);
            assert_eq!(result.uncertainty_kind, Some(UncertaintyKind::Approximate));
        }
    }

    #[test]
    fn test_ranges_take_first() {
        let or = normalize_year_str("1890 or 1891");
        assert_eq!(or.value, Some(1890));
        assert_eq!(or.uncertainty_kind, Some(UncertaintyKind::Range));

        let slash = normalize_year_str("1890/1891");
        assert_eq!(slash.value, Some(1890));
        assert_eq!(slash.uncertainty_kind, Some(UncertaintyKind::Range));

        let hyphen = normalize_year_str("1890-1891");
        assert_eq!(hyphen.value, Some(1890));
        assert_eq!(hyphen.uncertainty_kind, Some(UncertaintyKind::Range));
    }

    #[test]
    fn test_abbreviated_second_year() {
        let result = normalize_year_str("1890/91");
        assert_eq!(result.value, Some(1890));
        assert!(result.is_uncertain);
        assert_eq!(result.uncertainty_kind, Some(UncertaintyKind::Range));
        assert_eq!(result.original_text.as_deref(), Some("1890/91"));

        assert_eq!(normalize_year_str("1890 / 91").value, Some(1890));
    }

    #[test]
    fn test_range_first_year_out_of_window() {
        let result = normalize_year_str("1790 or 1891");
        assert_eq!(result.value, None);
        assert_eq!(result.uncertainty_kind, Some(UncertaintyKind::Range));
    }

    #[test]
    fn test_full_dates() {
        assert_eq!(normalize_year_str("1890-05-12").value, Some(1890));
        assert_eq!(normalize_year_str("05/12/1890").value, Some(1890));
        assert_eq!(normalize_year_str("1890/05/12").uncertainty_kind, None);
        assert_eq!(normalize_year_str("March 5, 1890").value, Some(1890));
    }

    #[test]
    fn test_unmatched_strings_keep_qualifier_kind() {
        let before = normalize_year_str("before 1890");
        assert_eq!(before.value, None);
        assert_eq!(before.uncertainty_kind, Some(UncertaintyKind::Before));

        let garbage = normalize_year_str("unknown");
        assert_eq!(garbage.value, None);
        assert!(!garbage.is_uncertain);
        assert_eq!(garbage.original_text.as_deref(), Some("unknown"));
    }

    #[test]
    fn test_empty() {
        assert!(normalize_year(&RawValue::Missing).is_empty());
        assert!(normalize_year_str("").is_empty());
        assert!(normalize_year_str("nan").is_empty());
    }
}
