//! Column reconciliation: map a source's column headers onto canonical fields.
//!
//! The best-matching naming convention is picked once per source by counting
//! exact (case- and whitespace-insensitive) header matches. Fields the chosen
//! convention leaves unmapped get a second chance through substring matching
//! against every convention's labels. Gaps are reported, never raised.

pub mod conventions;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::fields::CanonicalField;
pub use conventions::NamingConvention;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// How a source column was matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Exact,
    Partial,
}

/// One source column mapped onto a canonical field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedColumn {
    /// Header as it appears in the source
    pub source: String,
    /// Position of the column in the source
    pub index: usize,
    pub field: CanonicalField,
    pub match_kind: MatchKind,
}

/// A later source column that matched a field an earlier column already claimed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub source: String,
    pub index: usize,
    pub field: CanonicalField,
}

/// Result of reconciling one source's headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ColumnMapping {
    /// Convention used for exact matching; `None` when nothing matched exactly
    pub convention: Option<NamingConvention>,
    /// Whether the convention was forced by the caller
    pub forced: bool,
    pub exact_matches: usize,
    /// Mapped columns, in source order
    pub entries: Vec<MappedColumn>,
    /// Requested fields no column could be matched to
    pub unmapped_fields: Vec<CanonicalField>,
    /// Source columns left unmapped
    pub unmatched_columns: Vec<String>,
    pub collisions: Vec<Collision>,
    /// Blank and `Unnamed: N` columns that were skipped
    pub ignored: Vec<String>,
}

impl ColumnMapping {
    /// Mapped column for a canonical field
    pub fn column_for(&self, field: CanonicalField) -> Option<&MappedColumn> {
        self.entries.iter().find(|e| e.field == field)
    }

    /// Canonical field a source header was mapped to
    pub fn field_for(&self, source: &str) -> Option<CanonicalField> {
        self.entries
            .iter()
            .find(|e| e.source == source)
            .map(|e| e.field)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.unmapped_fields.is_empty()
    }
}

/// Reconcile headers against the requested canonical fields, detecting the convention
pub fn reconcile<S: AsRef<str>>(headers: &[S], fields: &[CanonicalField]) -> ColumnMapping {
    reconcile_with(headers, fields, None)
}

/// Reconcile headers, optionally forcing a naming convention instead of detecting one
pub fn reconcile_with<S: AsRef<str>>(
    headers: &[S],
    fields: &[CanonicalField],
    forced: Option<NamingConvention>,
) -> ColumnMapping {
    let mut mapping = ColumnMapping {
        forced: forced.is_some(),
        ..Default::default()
    };

    // (index, original header, normalized header) of every usable column
    let mut columns: Vec<(usize, &str, String)> = Vec::with_capacity(headers.len());
    for (index, header) in headers.iter().enumerate() {
        let original = header.as_ref();
        let normalized = normalize_header(original);
        if is_ignored(&normalized) {
            debug!(column = original, "ignoring column");
            mapping.ignored.push(original.to_string());
        } else {
            columns.push((index, original, normalized));
        }
    }

    let convention = forced.or_else(|| detect_convention(&columns, fields));
    mapping.convention = convention;

    // Columns consumed by exact matching or collisions are not offered to the fallback
    let mut consumed = vec![false; columns.len()];

    if let Some(convention) = convention {
        for (slot, (index, original, normalized)) in columns.iter().enumerate() {
            let Some(field) = exact_match(convention, normalized, fields) else {
                continue;
            };
            consumed[slot] = true;
            if mapping.column_for(field).is_some() {
                warn!(column = *original, field = %field, "column collides with an earlier match");
                mapping.collisions.push(Collision {
                    source: original.to_string(),
                    index: *index,
                    field,
                });
            } else {
                mapping.entries.push(MappedColumn {
                    source: original.to_string(),
                    index: *index,
                    field,
                    match_kind: MatchKind::Exact,
                });
            }
        }
        mapping.exact_matches = mapping.entries.len();
        info!(
            convention = %convention,
            forced = mapping.forced,
            matches = mapping.exact_matches,
            "selected naming convention"
        );
    }

    for (slot, (index, original, normalized)) in columns.iter().enumerate() {
        if consumed[slot] {
            continue;
        }
        let claimed: Vec<CanonicalField> = mapping.entries.iter().map(|e| e.field).collect();
        let candidate = fields
            .iter()
            .copied()
            .filter(|field| !claimed.contains(field))
            .find(|field| partial_match(normalized, *field));

        match candidate {
            Some(field) => {
                debug!(column = *original, field = %field, "partial column match");
                mapping.entries.push(MappedColumn {
                    source: original.to_string(),
                    index: *index,
                    field,
                    match_kind: MatchKind::Partial,
                });
            }
            None => mapping.unmatched_columns.push(original.to_string()),
        }
    }

    mapping.entries.sort_by_key(|e| e.index);
    mapping.unmapped_fields = fields
        .iter()
        .copied()
        .filter(|field| mapping.column_for(*field).is_none())
        .collect();

    if !mapping.unmapped_fields.is_empty() {
        let names: Vec<&str> = mapping.unmapped_fields.iter().map(|f| f.as_str()).collect();
        warn!(fields = ?names, "canonical fields without a source column");
    }

    mapping
}

/// Trim, drop quote characters, collapse inner whitespace, lower-case
pub fn normalize_header(header: &str) -> String {
    let unquoted: String = header.chars().filter(|c| *c != '"' && *c != '\'').collect();
    WHITESPACE
        .replace_all(unquoted.trim(), " ")
        .to_lowercase()
}

fn is_ignored(normalized: &str) -> bool {
    normalized.is_empty() || normalized.starts_with("unnamed:")
}

fn normalize_label(label: &str) -> String {
    normalize_header(label)
}

/// Convention with the most exact matches; the earliest declared wins a tie
fn detect_convention(
    columns: &[(usize, &str, String)],
    fields: &[CanonicalField],
) -> Option<NamingConvention> {
    let mut best: Option<(NamingConvention, usize)> = None;
    for convention in NamingConvention::ALL {
        let count = columns
            .iter()
            .filter(|(_, _, normalized)| exact_match(convention, normalized, fields).is_some())
            .count();
        debug!(convention = %convention, count, "convention exact matches");
        if count > best.map_or(0, |(_, c)| c) {
            best = Some((convention, count));
        }
    }
    best.map(|(convention, _)| convention)
}

fn exact_match(
    convention: NamingConvention,
    normalized: &str,
    fields: &[CanonicalField],
) -> Option<CanonicalField> {
    convention
        .labels()
        .iter()
        .find(|(label, _)| normalize_label(label) == normalized)
        .map(|(_, field)| *field)
        .filter(|field| fields.contains(field))
}

/// Either string contains the other, against any label of the field
fn partial_match(normalized: &str, field: CanonicalField) -> bool {
    NamingConvention::ALL
        .iter()
        .filter(|c| c.allows_partial())
        .flat_map(|c| c.labels().iter())
        .filter(|(_, f)| *f == field)
        .map(|(label, _)| normalize_label(label))
        .any(|label| label.contains(normalized) || normalized.contains(label.as_str()))
}
