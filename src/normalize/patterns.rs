//! Vocabulary shared by the date and year normalizers: missing-value markers,
//! the ordered qualifier rules, and four-digit-year scanning.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::UncertaintyKind;

/// Missing value tokens (case-insensitive)
pub const MISSING_TOKENS: &[&str] = &[
    "", "NA", "N/A", "na", "n/a", "NULL", "null", "NaN", "nan", "NaT", "nat", ".", "-", "--",
    "missing", "MISSING", "None", "none", "#N/A", "#VALUE!", "#REF!", "#DIV/0!", "#NUM!",
    "#NAME?", "#NULL!",
];

/// Spellings of infinity produced by spreadsheet and dataframe exports
const INFINITY_TOKENS: &[&str] = &["inf", "-inf", "+inf", "infinity", "-infinity", "+infinity"];

/// Words stripped from a qualified value before its date is extracted
const QUALIFIER_WORDS: &[&str] = &["about", "circa", "before", "after", "early", "mid", "late"];

static APPROX_C: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:^|[^a-z])c\.").unwrap());

static OR_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bor\b").unwrap());

/// Two four-digit years joined by a hyphen, en dash, or slash
static YEAR_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s*[-\u{2013}/]\s*(\d{4})").unwrap());

static QUALIFIER_WORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", QUALIFIER_WORDS.join("|"))).unwrap()
});

static C_DOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(^|[^a-z])c\.").unwrap());

static DECADE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{4})'?s\b").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// One step of the qualifier decision list
pub struct QualifierRule {
    pub name: &'static str,
    pub kind: UncertaintyKind,
    pub matches: fn(&str) -> bool,
}

/// Qualifier rules in precedence order; the first match classifies the value.
///
/// Predicates receive lower-cased text.
pub static QUALIFIER_RULES: &[QualifierRule] = &[
    QualifierRule {
        name: "approximate",
        kind: UncertaintyKind::Approximate,
        matches: is_approximate,
    },
    QualifierRule {
        name: "before",
        kind: UncertaintyKind::Before,
        matches: |s| s.contains("before"),
    },
    QualifierRule {
        name: "after",
        kind: UncertaintyKind::After,
        matches: |s| s.contains("after"),
    },
    QualifierRule {
        name: "period",
        kind: UncertaintyKind::PeriodQualifier,
        matches: |s| ["early", "mid", "late"].iter().any(|q| s.contains(q)),
    },
    QualifierRule {
        name: "multiple",
        kind: UncertaintyKind::MultipleDates,
        matches: |s| s.contains(';'),
    },
    QualifierRule {
        name: "range",
        kind: UncertaintyKind::Range,
        matches: is_range,
    },
];

/// Check if a value represents a missing value
pub fn is_missing(value: &str) -> bool {
    let trimmed = value.trim();
    MISSING_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// Check if a value spells out infinity
pub fn is_infinity(value: &str) -> bool {
    let trimmed = value.trim();
    INFINITY_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t))
}

/// "about", "circa", or a "c." abbreviation.
///
/// A "c." directly after a letter is deliberately not approximate, so month
/// abbreviations like "Dec. 1890" stay exact.
pub fn is_approximate(lower: &str) -> bool {
    lower.contains("about") || lower.contains("circa") || APPROX_C.is_match(lower)
}

/// "Y1-Y2", "Y1/Y2", or anything joined by the word "or"
pub fn is_range(lower: &str) -> bool {
    YEAR_RANGE.is_match(lower) || OR_WORD.is_match(lower)
}

/// Classify the uncertainty a qualified value carries, if any
pub fn classify(text: &str) -> Option<UncertaintyKind> {
    let lower = text.to_lowercase();
    QUALIFIER_RULES
        .iter()
        .find(|rule| (rule.matches)(&lower))
        .map(|rule| rule.kind)
}

/// The first element of a sequence: text before ';', before the word "or",
/// or the first year of a "Y1-Y2" range. Other text is returned unchanged.
pub fn first_of_sequence(text: &str) -> &str {
    if let Some((first, _)) = text.split_once(';') {
        return first.trim();
    }
    if let Some(m) = OR_WORD.find(&text.to_lowercase()) {
        // Lower-casing can shift byte offsets for non-ASCII text
        if let Some(first) = text.get(..m.start()) {
            return first.trim();
        }
    }
    if let Some(caps) = YEAR_RANGE.captures(text) {
        if let Some(first) = caps.get(1) {
            return first.as_str();
        }
    }
    text.trim()
}

/// Remove qualifier words, "c." abbreviations, and decade suffixes ("1890s"),
/// leaving the bare date text for format parsing.
pub fn strip_qualifiers(text: &str) -> String {
    let stripped = QUALIFIER_WORD.replace_all(text, " ");
    let stripped = C_DOT.replace_all(&stripped, "$1 ");
    let stripped = DECADE.replace_all(&stripped, "$1");
    let collapsed = WHITESPACE.replace_all(&stripped, " ");
    collapsed
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_string()
}

/// Find the first run of exactly four digits whose value lies in `[min, max]`
pub fn find_year(text: &str, min: i32, max: i32) -> Option<i32> {
    DIGIT_RUN
        .find_iter(text)
        .filter(|m| m.as_str().len() == 4)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .find(|year| (min..=max).contains(year))
}
