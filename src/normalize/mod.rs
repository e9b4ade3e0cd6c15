//! Value normalizers for free-text historical fields.
//!
//! Each normalizer is a pure function over one value. Dates and years carry an
//! uncertainty annotation; names are cleaned only.

pub mod date;
pub mod name;
pub mod patterns;
pub mod year;

pub use date::{normalize_date, normalize_date_value};
pub use name::{clean_sex, clean_text, normalize_name, normalize_name_value, truncate_chars};
pub use patterns::{classify, is_missing};
pub use year::{normalize_year, normalize_year_str};
