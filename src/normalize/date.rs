use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::patterns::{classify, find_year, first_of_sequence, is_missing, strip_qualifiers};
use crate::types::{
    NormalizedDate, NormalizedTemporal, RawValue, UncertaintyKind, MAX_BIRTH_YEAR, MAX_DATE_YEAR,
    MIN_YEAR,
};

/// How a matched shape is turned into a full date
#[derive(Debug, Clone, Copy)]
enum DateShape {
    /// Complete day-precision format
    Full(&'static str),
    /// Year and month only; the first of the month is assumed
    YearMonth(&'static str),
    /// Bare year; January 1st is assumed
    Year,
}

// Exact formats, tried in order. US month-first comes before European day-first.
static EXACT_FORMATS: Lazy<Vec<(Regex, DateShape)>> = Lazy::new(|| {
    vec![
        // ISO: 1890-05-12
        (
            Regex::new(r"^\d{4}-\d{1,2}-\d{1,2}$").unwrap(),
            DateShape::Full("%Y-%m-%d"),
        ),
        // 1890/05/12
        (
            Regex::new(r"^\d{4}/\d{1,2}/\d{1,2}$").unwrap(),
            DateShape::Full("%Y/%m/%d"),
        ),
        // US: 05/12/1890
        (
            Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(),
            DateShape::Full("%m/%d/%Y"),
        ),
        // European: 12/05/1890
        (
            Regex::new(r"^\d{1,2}/\d{1,2}/\d{4}$").unwrap(),
            DateShape::Full("%d/%m/%Y"),
        ),
        // 1890-05
        (
            Regex::new(r"^\d{4}-\d{1,2}$").unwrap(),
            DateShape::YearMonth("%Y-%m-%d"),
        ),
        // 1890/05
        (
            Regex::new(r"^\d{4}/\d{1,2}$").unwrap(),
            DateShape::YearMonth("%Y/%m/%d"),
        ),
        // 1890
        (Regex::new(r"^\d{4}$").unwrap(), DateShape::Year),
    ]
});

/// Day-precision formats for the permissive fallback, applied to cleaned text
const GENERIC_FORMATS: &[&str] = &[
    "%B %d %Y",  // March 5 1890, Mar 5 1890
    "%d %B %Y",  // 5 March 1890
    "%d-%B-%Y",  // 05-Mar-1890
    "%d-%m-%Y",  // 05-03-1890
    "%m-%d-%Y",  // 03-25-1890
    "%d.%m.%Y",  // 05.03.1890
    "%Y.%m.%d",  // 1890.03.05
    "%Y %m %d",  // 1890 03 05
];

/// Month-and-year formats; parsed by prefixing a day of 1
const GENERIC_MONTH_FORMATS: &[&str] = &["%d %B %Y", "%d %m %Y"];

const GENERIC_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
];

static ORDINAL_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d{1,2})(?:st|nd|rd|th)\b").unwrap());

static SEPT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bsept\b").unwrap());

static MONTH_ABBREV_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"([A-Za-z]{3,})\.").unwrap());

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[,\s]+").unwrap());

/// Normalize a free-text date field.
///
/// The qualifier rules classify the text first; extraction then runs on the
/// text with qualifiers removed. A classified value that cannot be parsed
/// keeps its uncertainty kind with an absent date.
pub fn normalize_date(text: &str) -> NormalizedDate {
    if is_missing(text) {
        return NormalizedTemporal::empty();
    }

    let kind = classify(text);
    let candidate = match kind {
        Some(UncertaintyKind::Range) | Some(UncertaintyKind::MultipleDates) => {
            first_of_sequence(text)
        }
        _ => text,
    };

    let value = extract_date(candidate);
    if value.is_none() {
        debug!(text, kind = ?kind, "could not parse date");
    }

    NormalizedTemporal::new(value, kind, text.to_string())
}

/// Normalize a date field from any raw scalar
pub fn normalize_date_value(raw: &RawValue) -> NormalizedDate {
    match raw.as_text() {
        Some(text) => normalize_date(&text),
        None => NormalizedTemporal::empty(),
    }
}

/// Extract a date from text with qualifiers already classified.
///
/// Order: exact formats, generic formats, then a bare four-digit year anywhere
/// in the text (synthesized as January 1st).
pub fn extract_date(text: &str) -> Option<NaiveDate> {
    let cleaned = strip_qualifiers(text);
    if cleaned.is_empty() {
        return None;
    }

    if let Some(date) = parse_exact(&cleaned) {
        return Some(date);
    }

    if let Some(date) = parse_generic(&cleaned) {
        return Some(date);
    }

    let year = find_year(&cleaned, MIN_YEAR, MAX_BIRTH_YEAR)?;
    trace!(text, year, "synthesized date from bare year");
    NaiveDate::from_ymd_opt(year, 1, 1)
}

/// Parse against the exact format table, discarding dates outside the validity window
pub fn parse_exact(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    EXACT_FORMATS
        .iter()
        .filter(|(pattern, _)| pattern.is_match(trimmed))
        .filter_map(|(_, shape)| parse_shape(trimmed, *shape))
        .find(|date| is_valid_date(*date))
}

/// Permissive parse of month-name, dotted, dashed, and date-time forms
pub fn parse_generic(text: &str) -> Option<NaiveDate> {
    let cleaned = clean_generic(text);
    if cleaned.is_empty() {
        return None;
    }

    let full = GENERIC_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(&cleaned, fmt).ok());

    let month_only = GENERIC_MONTH_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(&format!("1 {}", cleaned), fmt).ok());

    let datetime = GENERIC_DATETIME_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDateTime::parse_from_str(text.trim(), fmt).ok())
        .map(|dt| dt.date());

    full.chain(month_only)
        .chain(datetime)
        .find(|date| is_valid_date(*date))
}

/// A parsed date is kept only inside `[MIN_YEAR, MAX_DATE_YEAR]`
pub fn is_valid_date(date: NaiveDate) -> bool {
    (MIN_YEAR..=MAX_DATE_YEAR).contains(&date.year())
}

fn parse_shape(text: &str, shape: DateShape) -> Option<NaiveDate> {
    match shape {
        DateShape::Full(fmt) => NaiveDate::parse_from_str(text, fmt).ok(),
        DateShape::YearMonth(fmt) => {
            let sep = if text.contains('/') { '/' } else { '-' };
            NaiveDate::parse_from_str(&format!("{}{}01", text, sep), fmt).ok()
        }
        DateShape::Year => text
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
    }
}

/// Drop ordinal suffixes and abbreviation dots, fold "Sept", and collapse commas and spaces
fn clean_generic(text: &str) -> String {
    let cleaned = ORDINAL_SUFFIX.replace_all(text, "$1");
    let cleaned = SEPT.replace_all(&cleaned, "Sep");
    let cleaned = MONTH_ABBREV_DOT.replace_all(&cleaned, "$1");
    SEPARATORS.replace_all(cleaned.trim(), " ").to_string()
}
