use once_cell::sync::Lazy;
use regex::Regex;

use super::patterns::is_missing;
use crate::types::RawValue;

/// Whitespace that is a control character (tab, newline, vertical tab, ...)
static CONTROL_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s&&\P{Zs}]").unwrap());

/// Anything that is not a letter, combining mark, digit, space separator, period, or hyphen
static NAME_DISALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}_\p{Zs}.\-]").unwrap());

/// Strip punctuation and control characters from a name, keeping non-Latin
/// letters and diacritics intact. Empty or null-marker input yields `None`.
pub fn normalize_name(text: &str) -> Option<String> {
    if is_missing(text) {
        return None;
    }
    let spaced = CONTROL_WHITESPACE.replace_all(text, " ");
    let cleaned = NAME_DISALLOWED.replace_all(&spaced, "");
    let trimmed = cleaned.trim();
    // "N/A" cleans down to "NA"
    if is_missing(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_name_value(raw: &RawValue) -> Option<String> {
    raw.as_text().and_then(|text| normalize_name(&text))
}

/// Trimmed free text; missing markers become `None`
pub fn clean_text(raw: &RawValue) -> Option<String> {
    let text = raw.as_text()?;
    if is_missing(&text) {
        return None;
    }
    Some(text.trim().to_string())
}

/// Single upper-case letter for the sex column
pub fn clean_sex(raw: &RawValue) -> Option<String> {
    let text = clean_text(raw)?;
    text.chars().next().map(|c| c.to_uppercase().collect())
}

/// Truncate to at most `max` characters, never splitting a character.
///
/// Returns whether anything was cut.
pub fn truncate_chars(value: &mut String, max: usize) -> bool {
    match value.char_indices().nth(max) {
        Some((idx, _)) => {
            value.truncate(idx);
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(normalize_name("Smith, John!"), Some("Smith John".to_string()));
        assert_eq!(normalize_name("  Mary-Ann St. Clair  "), Some("Mary-Ann St. Clair".to_string()));
        assert_eq!(normalize_name("(Red Cloud)"), Some("Red Cloud".to_string()));
    }

    #[test]
    fn test_control_whitespace_becomes_space() {
        assert_eq!(normalize_name("Red\tCloud\n"), Some("Red Cloud".to_string()));
        assert_eq!(normalize_name("Red\u{000B}Cloud"), Some("Red Cloud".to_string()));
        assert_eq!(normalize_name("Red\r\nCloud\u{000C}"), Some("Red  Cloud".to_string()));
        assert_eq!(normalize_name("\t\n"), None);
    }

    #[test]
    fn test_keeps_non_latin_letters() {
        assert_eq!(normalize_name("Wašíču"), Some("Wašíču".to_string()));
        assert_eq!(normalize_name("Ésa Ŋa"), Some("Ésa Ŋa".to_string()));
        // Combining marks survive alongside their base letters
        assert_eq!(normalize_name("Ta\u{0301}te"), Some("Ta\u{0301}te".to_string()));
    }

    #[test]
    fn test_empty_names() {
        assert_eq!(normalize_name(""), None);
        assert_eq!(normalize_name("   "), None);
        assert_eq!(normalize_name("nan"), None);
        assert_eq!(normalize_name("?!"), None);
        assert_eq!(normalize_name_value(&RawValue::Missing), None);
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(
            clean_text(&RawValue::from("  Rosebud  ")),
            Some("Rosebud".to_string())
        );
        assert_eq!(clean_text(&RawValue::from("N/A")), None);
        assert_eq!(clean_text(&RawValue::Integer(42)), Some("42".to_string()));
    }

    #[test]
    fn test_clean_sex() {
        assert_eq!(clean_sex(&RawValue::from(" female ")), Some("F".to_string()));
        assert_eq!(clean_sex(&RawValue::from("m")), Some("M".to_string()));
        assert_eq!(clean_sex(&RawValue::from("")), None);
    }

    #[test]
    fn test_truncate_chars() {
        let mut s = "Wašíču".to_string();
        assert!(truncate_chars(&mut s, 3));
        assert_eq!(s, "Waš");

        let mut short = "Band".to_string();
        assert!(!truncate_chars(&mut short, 200));
        assert_eq!(short, "Band");
    }
}
