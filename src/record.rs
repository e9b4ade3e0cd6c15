use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::warn;

use crate::fields::{CanonicalField, FieldKind};
use crate::normalize::{
    clean_sex, clean_text, normalize_date_value, normalize_name_value, normalize_year,
    truncate_chars,
};
use crate::reconcile::ColumnMapping;
use crate::types::{NormalizedDate, NormalizedTemporal, NormalizedYear, RawValue, UncertaintyKind};

/// Sibling-key suffixes that carry a temporal field's annotation
pub const UNCERTAIN_SUFFIX: &str = "_uncertain";
pub const UNCERTAINTY_TYPE_SUFFIX: &str = "_uncertainty_type";
pub const ORIGINAL_TEXT_SUFFIX: &str = "_original_text";

/// Annotation of one temporal field, independent of its value type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalStatus<'a> {
    pub has_value: bool,
    pub is_uncertain: bool,
    pub kind: Option<UncertaintyKind>,
    pub original_text: Option<&'a str>,
}

impl<'a, T> From<&'a NormalizedTemporal<T>> for TemporalStatus<'a> {
    fn from(t: &'a NormalizedTemporal<T>) -> Self {
        Self {
            has_value: t.value.is_some(),
            is_uncertain: t.is_uncertain,
            kind: t.uncertainty_kind,
            original_text: t.original_text.as_deref(),
        }
    }
}

/// One source row after normalization, keyed by canonical field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecord {
    /// Zero-based data row in the source
    pub row: usize,
    text: BTreeMap<CanonicalField, String>,
    pub year_of_birth: NormalizedYear,
    pub arrival_date: NormalizedDate,
    pub departure_date: NormalizedDate,
    /// Text fields cut to their storage limit
    pub truncated: Vec<CanonicalField>,
}

impl NormalizedRecord {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            ..Default::default()
        }
    }

    /// Value of a non-temporal field
    pub fn text(&self, field: CanonicalField) -> Option<&str> {
        self.text.get(&field).map(String::as_str)
    }

    /// Annotation of a temporal field; `None` for non-temporal fields
    pub fn temporal(&self, field: CanonicalField) -> Option<TemporalStatus<'_>> {
        match field {
            CanonicalField::YearOfBirth => Some((&self.year_of_birth).into()),
            CanonicalField::ArrivalDate => Some((&self.arrival_date).into()),
            CanonicalField::DepartureDate => Some((&self.departure_date).into()),
            _ => None,
        }
    }

    /// Whether the field ended up with a value
    pub fn is_present(&self, field: CanonicalField) -> bool {
        match self.temporal(field) {
            Some(status) => status.has_value,
            None => self.text.contains_key(&field),
        }
    }

    /// Normalize one raw value into the field it was mapped to
    pub fn set(&mut self, field: CanonicalField, raw: &RawValue, truncate: bool) {
        let cleaned = match field.kind() {
            FieldKind::Year => {
                self.year_of_birth = normalize_year(raw);
                return;
            }
            FieldKind::Date => {
                let date = normalize_date_value(raw);
                match field {
                    CanonicalField::DepartureDate => self.departure_date = date,
                    _ => self.arrival_date = date,
                }
                return;
            }
            FieldKind::Name => normalize_name_value(raw),
            FieldKind::Sex => clean_sex(raw),
            FieldKind::Text => clean_text(raw),
        };

        let Some(mut value) = cleaned.filter(|v| !v.is_empty()) else {
            self.text.remove(&field);
            return;
        };

        if truncate {
            if let Some(max) = field.max_len() {
                if truncate_chars(&mut value, max) {
                    warn!(row = self.row, field = %field, max, "value truncated to storage limit");
                    self.truncated.push(field);
                }
            }
        }
        self.text.insert(field, value);
    }

    /// Flatten into storage keys, in canonical column order.
    ///
    /// Temporal fields expand to the value plus `_uncertain`,
    /// `_uncertainty_type`, and `_original_text` siblings.
    pub fn storage_entries(&self) -> Vec<(String, Value)> {
        let mut entries = Vec::with_capacity(CanonicalField::ALL.len() + 9);
        for field in CanonicalField::ALL {
            let key = field.as_str();
            match field {
                CanonicalField::YearOfBirth => {
                    let value = self.year_of_birth.value.map(Value::from).unwrap_or(Value::Null);
                    push_temporal(&mut entries, key, value, (&self.year_of_birth).into());
                }
                CanonicalField::ArrivalDate | CanonicalField::DepartureDate => {
                    let date = if field == CanonicalField::ArrivalDate {
                        &self.arrival_date
                    } else {
                        &self.departure_date
                    };
                    let value = date
                        .value
                        .map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
                        .unwrap_or(Value::Null);
                    push_temporal(&mut entries, key, value, date.into());
                }
                _ => {
                    let value = self
                        .text(field)
                        .map(|s| Value::String(s.to_string()))
                        .unwrap_or(Value::Null);
                    entries.push((key.to_string(), value));
                }
            }
        }
        entries
    }
}

fn push_temporal(
    entries: &mut Vec<(String, Value)>,
    key: &str,
    value: Value,
    status: TemporalStatus<'_>,
) {
    entries.push((key.to_string(), value));
    entries.push((
        format!("{}{}", key, UNCERTAIN_SUFFIX),
        Value::Bool(status.is_uncertain),
    ));
    entries.push((
        format!("{}{}", key, UNCERTAINTY_TYPE_SUFFIX),
        status
            .kind
            .map(|k| Value::String(k.as_str().to_string()))
            .unwrap_or(Value::Null),
    ));
    entries.push((
        format!("{}{}", key, ORIGINAL_TEXT_SUFFIX),
        status
            .original_text
            .map(|t| Value::String(t.to_string()))
            .unwrap_or(Value::Null),
    ));
}

impl Serialize for NormalizedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries = self.storage_entries();
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for (key, value) in &entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Normalize one source row through a column mapping
pub fn normalize_row(
    mapping: &ColumnMapping,
    row_index: usize,
    row: &[RawValue],
    truncate: bool,
) -> NormalizedRecord {
    let missing = RawValue::Missing;
    let mut record = NormalizedRecord::new(row_index);
    for entry in &mapping.entries {
        let raw = row.get(entry.index).unwrap_or(&missing);
        record.set(entry.field, raw, truncate);
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::reconcile;
    use chrono::NaiveDate;

    fn mapping_for(headers: &[&str]) -> ColumnMapping {
        reconcile(headers, &CanonicalField::ALL)
    }

    #[test]
    fn test_normalize_row_routes_by_field_kind() {
        let mapping = mapping_for(&[
            "Family Name",
            "Sex",
            "Year of birth",
            "Arrival at Lincoln",
            "Nation",
        ]);
        let row = vec![
            RawValue::from("O'Neil,"),
            RawValue::from("female"),
            RawValue::from("age 20"),
            RawValue::from("c. 1885"),
            RawValue::from("  Lakota "),
        ];
        let record = normalize_row(&mapping, 0, &row, true);

        assert_eq!(record.text(CanonicalField::FamilyName), Some("ONeil"));
        assert_eq!(record.text(CanonicalField::Sex), Some("F"));
        assert_eq!(record.text(CanonicalField::Nation), Some("Lakota"));
        assert_eq!(record.year_of_birth.value, Some(1880));
        assert_eq!(
            record.arrival_date.value,
            NaiveDate::from_ymd_opt(1885, 1, 1)
        );
        assert!(record.departure_date.is_empty());
    }

    #[test]
    fn test_short_rows_read_as_missing() {
        let mapping = mapping_for(&["Family Name", "Nation"]);
        let record = normalize_row(&mapping, 3, &[RawValue::from("Smith")], true);
        assert_eq!(record.row, 3);
        assert!(record.is_present(CanonicalField::FamilyName));
        assert!(!record.is_present(CanonicalField::Nation));
    }

    #[test]
    fn test_truncation() {
        let mut record = NormalizedRecord::new(0);
        let long = "x".repeat(150);
        record.set(CanonicalField::CensusRecord, &RawValue::from(long.as_str()), true);
        assert_eq!(record.text(CanonicalField::CensusRecord).map(|s| s.len()), Some(100));
        assert_eq!(record.truncated, vec![CanonicalField::CensusRecord]);

        let mut untouched = NormalizedRecord::new(0);
        untouched.set(CanonicalField::CensusRecord, &RawValue::from(long.as_str()), false);
        assert_eq!(untouched.text(CanonicalField::CensusRecord).map(|s| s.len()), Some(150));
        assert!(untouched.truncated.is_empty());
    }

    #[test]
    fn test_storage_entries_layout() {
        let mut record = NormalizedRecord::new(0);
        record.set(CanonicalField::YearOfBirth, &RawValue::from("1890 or 1891"), true);
        let entries: BTreeMap<String, Value> = record.storage_entries().into_iter().collect();

        assert_eq!(entries["year_of_birth"], Value::from(1890));
        assert_eq!(entries["year_of_birth_uncertain"], Value::Bool(true));
        assert_eq!(entries["year_of_birth_uncertainty_type"], Value::from("range"));
        assert_eq!(entries["year_of_birth_original_text"], Value::from("1890 or 1891"));
        assert_eq!(entries["arrival_date"], Value::Null);
        assert_eq!(entries["arrival_date_uncertain"], Value::Bool(false));
        assert_eq!(entries["comments"], Value::Null);
        // 15 plain fields plus 3 temporal fields with 4 keys each
        assert_eq!(entries.len(), 15 + 3 * 4);
    }

    #[test]
    fn test_serialize_preserves_column_order() {
        let record = NormalizedRecord::new(0);
        let json = serde_json::to_string(&record).unwrap();
        let census = json.find("\"census_record\"").unwrap();
        let year = json.find("\"year_of_birth\"").unwrap();
        let links = json.find("\"related_links\"").unwrap();
        assert!(census < year && year < links);
    }

    #[test]
    fn test_blank_values_are_absent() {
        let mut record = NormalizedRecord::new(0);
        record.set(CanonicalField::Comments, &RawValue::from("   "), true);
        record.set(CanonicalField::Alias, &RawValue::from("!!"), true);
        assert!(!record.is_present(CanonicalField::Comments));
        assert!(!record.is_present(CanonicalField::Alias));
    }
}
