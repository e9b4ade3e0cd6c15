use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::reconcile::NamingConvention;

/// Reference year used to derive a birth year from a stated age
pub const CENSUS_ANCHOR_YEAR: i32 = 1900;

/// Earliest year accepted for any date or year field
pub const MIN_YEAR: i32 = 1800;

/// Latest plausible year of birth
pub const MAX_BIRTH_YEAR: i32 = 2000;

/// Latest year accepted for arrival/departure dates
pub const MAX_DATE_YEAR: i32 = 2100;

/// An untyped scalar as read from a source file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    #[default]
    Missing,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Convert a JSON value into a raw scalar.
    ///
    /// Arrays and objects are rejected: a non-scalar field value is a caller defect.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;

        match value {
            Value::Null => Ok(RawValue::Missing),
            Value::Bool(b) => Ok(RawValue::Bool(*b)),
            Value::Number(n) => Ok(match n.as_i64() {
                Some(i) => RawValue::Integer(i),
                None => n.as_f64().map(RawValue::Float).unwrap_or(RawValue::Missing),
            }),
            Value::String(s) => Ok(RawValue::Text(s.clone())),
            Value::Array(_) => Err(Error::NonScalarValue { kind: "array" }),
            Value::Object(_) => Err(Error::NonScalarValue { kind: "object" }),
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Missing)
    }

    /// Render the value as text, the way it would appear in the source.
    ///
    /// Whole floats keep their ".0" so that the audit text distinguishes 1890 from 1890.0.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            RawValue::Missing => None,
            RawValue::Bool(b) => Some(Cow::Owned(b.to_string())),
            RawValue::Integer(i) => Some(Cow::Owned(i.to_string())),
            RawValue::Float(f) if f.is_nan() => None,
            RawValue::Float(f) if f.is_finite() && f.fract() == 0.0 => {
                Some(Cow::Owned(format!("{:.1}", f)))
            }
            RawValue::Float(f) => Some(Cow::Owned(f.to_string())),
            RawValue::Text(s) => Some(Cow::Borrowed(s.as_str())),
        }
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<String> for RawValue {
    fn from(s: String) -> Self {
        RawValue::Text(s)
    }
}

impl From<i64> for RawValue {
    fn from(i: i64) -> Self {
        RawValue::Integer(i)
    }
}

impl From<f64> for RawValue {
    fn from(f: f64) -> Self {
        RawValue::Float(f)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawValue::Missing)
    }
}

/// Why a normalized value is uncertain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UncertaintyKind {
    Approximate,
    Before,
    After,
    Range,
    MultipleDates,
    PeriodQualifier,
    EstimatedFromAge,
}

impl UncertaintyKind {
    pub const ALL: [UncertaintyKind; 7] = [
        UncertaintyKind::Approximate,
        UncertaintyKind::Before,
        UncertaintyKind::After,
        UncertaintyKind::Range,
        UncertaintyKind::MultipleDates,
        UncertaintyKind::PeriodQualifier,
        UncertaintyKind::EstimatedFromAge,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UncertaintyKind::Approximate => "approximate",
            UncertaintyKind::Before => "before",
            UncertaintyKind::After => "after",
            UncertaintyKind::Range => "range",
            UncertaintyKind::MultipleDates => "multiple_dates",
            UncertaintyKind::PeriodQualifier => "period_qualifier",
            UncertaintyKind::EstimatedFromAge => "estimated_from_age",
        }
    }
}

impl fmt::Display for UncertaintyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized date or year together with its uncertainty annotation.
///
/// `uncertainty_kind` is only ever set together with `is_uncertain`, and
/// `original_text` is kept for every non-empty input whether or not it parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTemporal<T> {
    pub value: Option<T>,
    pub is_uncertain: bool,
    pub uncertainty_kind: Option<UncertaintyKind>,
    pub original_text: Option<String>,
}

impl<T> NormalizedTemporal<T> {
    /// Result for empty or null-marker input
    pub fn empty() -> Self {
        Self {
            value: None,
            is_uncertain: false,
            uncertainty_kind: None,
            original_text: None,
        }
    }

    pub fn new(value: Option<T>, kind: Option<UncertaintyKind>, original_text: String) -> Self {
        Self {
            value,
            is_uncertain: kind.is_some(),
            uncertainty_kind: kind,
            original_text: Some(original_text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_none() && !self.is_uncertain && self.original_text.is_none()
    }
}

impl<T> Default for NormalizedTemporal<T> {
    fn default() -> Self {
        Self::empty()
    }
}

pub type NormalizedDate = NormalizedTemporal<NaiveDate>;
pub type NormalizedYear = NormalizedTemporal<i32>;

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Tsv,
    Excel,
    Json,
}

impl FileFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "csv" | "txt" => Some(FileFormat::Csv),
            "tsv" | "tab" => Some(FileFormat::Tsv),
            "xlsx" | "xls" | "xlsm" | "xlsb" => Some(FileFormat::Excel),
            "json" => Some(FileFormat::Json),
            _ => None,
        }
    }
}

/// Options for one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Use this naming convention instead of detecting one
    pub convention: Option<NamingConvention>,

    /// Treat any unmapped canonical field as fatal
    pub strict: bool,

    /// Record the SHA-256 of the source file
    pub hash_file: bool,

    /// Field delimiter; sniffed when absent
    pub delimiter: Option<u8>,

    /// Enforce storage length limits on text fields
    pub truncate: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            convention: None,
            strict: false,
            hash_file: true,
            delimiter: None,
            truncate: true,
        }
    }
}

/// Result type for the application
pub type Result<T> = std::result::Result<T, Error>;
