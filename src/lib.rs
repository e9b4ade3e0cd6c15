//! Normalization of ambiguous historical records.
//!
//! Source columns are reconciled onto a fixed set of canonical fields once per
//! table, then every date, year, and name value is normalized on its own. Dates
//! and years carry an uncertainty annotation and keep their original text.

pub mod error;
pub mod fields;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod readers;
pub mod reconcile;
pub mod record;
pub mod report;
pub mod types;

pub use error::Error;
pub use fields::CanonicalField;
pub use normalize::{normalize_date, normalize_name, normalize_year, normalize_year_str};
pub use reconcile::{reconcile, reconcile_with, ColumnMapping, NamingConvention};
pub use types::{
    ImportOptions, NormalizedDate, NormalizedTemporal, NormalizedYear, RawValue, Result,
    UncertaintyKind,
};
