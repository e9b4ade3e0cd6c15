//! Per-load data quality metrics.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::fields::CanonicalField;
use crate::reconcile::{ColumnMapping, NamingConvention};
use crate::record::NormalizedRecord;
use crate::types::UncertaintyKind;

/// Counts for one temporal field
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemporalCounts {
    /// Rows whose value parsed
    pub parsed: u64,
    /// Rows with text that did not parse
    pub unparsed: u64,
    pub uncertain: u64,
    pub by_kind: BTreeMap<UncertaintyKind, u64>,
}

/// Data quality summary of one import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QualityReport {
    pub total_rows: u64,
    pub convention: Option<NamingConvention>,
    pub exact_matches: usize,
    pub unmapped_fields: Vec<CanonicalField>,
    pub unmatched_columns: Vec<String>,
    pub collisions: Vec<String>,
    pub ignored_columns: Vec<String>,
    /// Absent values per canonical field
    pub null_counts: BTreeMap<CanonicalField, u64>,
    pub temporal: BTreeMap<CanonicalField, TemporalCounts>,
    pub truncated_values: u64,
}

impl QualityReport {
    /// Start a report from the column mapping of the load
    pub fn new(mapping: &ColumnMapping) -> Self {
        Self {
            convention: mapping.convention,
            exact_matches: mapping.exact_matches,
            unmapped_fields: mapping.unmapped_fields.clone(),
            unmatched_columns: mapping.unmatched_columns.clone(),
            collisions: mapping.collisions.iter().map(|c| c.source.clone()).collect(),
            ignored_columns: mapping.ignored.clone(),
            null_counts: CanonicalField::ALL.iter().map(|f| (*f, 0)).collect(),
            temporal: CanonicalField::ALL
                .iter()
                .filter(|f| f.is_temporal())
                .map(|f| (*f, TemporalCounts::default()))
                .collect(),
            ..Default::default()
        }
    }

    /// Fold one normalized record into the counts
    pub fn update(&mut self, record: &NormalizedRecord) {
        self.total_rows += 1;
        self.truncated_values += record.truncated.len() as u64;

        for field in CanonicalField::ALL {
            if !record.is_present(field) {
                *self.null_counts.entry(field).or_insert(0) += 1;
            }

            let Some(status) = record.temporal(field) else {
                continue;
            };
            let counts = self.temporal.entry(field).or_default();
            if status.has_value {
                counts.parsed += 1;
            } else if status.original_text.is_some() {
                counts.unparsed += 1;
            }
            if status.is_uncertain {
                counts.uncertain += 1;
            }
            if let Some(kind) = status.kind {
                *counts.by_kind.entry(kind).or_insert(0) += 1;
            }
        }
    }

    /// Fraction of rows with a value for the field
    pub fn completeness(&self, field: CanonicalField) -> Option<f64> {
        if self.total_rows == 0 {
            return None;
        }
        let nulls = self.null_counts.get(&field).copied().unwrap_or(0);
        Some((self.total_rows - nulls) as f64 / self.total_rows as f64)
    }

    pub fn log_summary(&self) {
        info!(
            rows = self.total_rows,
            truncated = self.truncated_values,
            unmapped = self.unmapped_fields.len(),
            "data quality summary"
        );
        for (field, counts) in &self.temporal {
            info!(
                field = %field,
                parsed = counts.parsed,
                unparsed = counts.unparsed,
                uncertain = counts.uncertain,
                "temporal field quality"
            );
        }
    }
}
