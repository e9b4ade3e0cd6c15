use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use chrono::{Duration, NaiveDate};
use tracing::info;

use crate::error::Error;
use crate::types::{RawValue, Result};

use super::{DataReader, RawTable};

/// Excel file reader (supports .xlsx, .xls, .xlsm, .xlsb); only the first sheet is read
pub struct ExcelReader {
    path: PathBuf,
}

impl ExcelReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Convert a cell into a raw scalar.
    ///
    /// Numbers stay numeric so year columns go through the whole-number rule;
    /// date cells become ISO date text.
    fn data_to_raw(dt: &Data) -> RawValue {
        match dt {
            Data::Empty | Data::Error(_) => RawValue::Missing,
            Data::String(s) if s.trim().is_empty() => RawValue::Missing,
            Data::String(s) => RawValue::Text(s.clone()),
            Data::Float(f) => RawValue::Float(*f),
            Data::Int(i) => RawValue::Integer(*i),
            Data::Bool(b) => RawValue::Bool(*b),
            Data::DateTime(d) => Self::excel_serial_to_date(d.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
        }
    }

    /// Header cells are always text; whole numbers lose their fraction so that
    /// numbered columns read "5", not "5.0"
    fn data_to_header(dt: &Data) -> String {
        if let Data::Float(f) = dt {
            if f.is_finite() && f.fract() == 0.0 {
                return format!("{}", *f as i64);
            }
        }
        match Self::data_to_raw(dt).as_text() {
            Some(text) => text.into_owned(),
            None => String::new(),
        }
    }

    /// Convert an Excel serial date to ISO date text
    fn excel_serial_to_date(serial: f64) -> RawValue {
        // Excel epoch is 1899-12-30 (with the 1900 leap year bug)
        let offset = Some(serial)
            .filter(|s| s.is_finite())
            .and_then(|s| Duration::try_days(s as i64));
        let date = NaiveDate::from_ymd_opt(1899, 12, 30)
            .zip(offset)
            .and_then(|(base, offset)| base.checked_add_signed(offset));
        match date {
            Some(date) => RawValue::Text(date.format("%Y-%m-%d").to_string()),
            None => RawValue::Float(serial),
        }
    }
}

impl DataReader for ExcelReader {
    fn read(&mut self) -> Result<RawTable> {
        let mut workbook: Sheets<std::io::BufReader<std::fs::File>> =
            open_workbook_auto(&self.path)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Error::EmptyInput {
                path: self.path.clone(),
            })?;

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(Error::Excel)?;

        let mut rows = range.rows();
        let headers: Vec<String> = match rows.next() {
            Some(row) => row.iter().map(Self::data_to_header).collect(),
            None => {
                return Err(Error::EmptyInput {
                    path: self.path.clone(),
                })
            }
        };

        let rows: Vec<Vec<RawValue>> = rows
            .map(|row| row.iter().map(Self::data_to_raw).collect())
            .collect();

        info!(
            path = %self.path.display(),
            sheet = %sheet_name,
            rows = rows.len(),
            "read worksheet"
        );

        Ok(RawTable {
            name: sheet_name,
            headers,
            rows,
        })
    }
}
