pub mod csv;
pub mod excel;
pub mod json;

use std::path::Path;

use crate::types::{FileFormat, ImportOptions, RawValue, Result};

/// A source table: ordered headers plus untyped rows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// File or sheet name
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Value at a row and column; short rows read as missing
    pub fn value(&self, row: usize, column: usize) -> &RawValue {
        static MISSING: RawValue = RawValue::Missing;
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&MISSING)
    }
}

/// Common trait for data file readers
pub trait DataReader {
    /// Read the whole source into a raw table
    fn read(&mut self) -> Result<RawTable>;
}

/// Create a reader for the given file path
pub fn create_reader(path: &Path, options: &ImportOptions) -> Result<Box<dyn DataReader>> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    let format = FileFormat::from_extension(ext).ok_or_else(|| {
        crate::error::Error::UnsupportedFormat(format!("Unsupported file extension: .{}", ext))
    })?;

    match format {
        FileFormat::Csv => Ok(Box::new(csv::CsvReader::new(path, options.delimiter))),
        FileFormat::Tsv => Ok(Box::new(csv::CsvReader::new(
            path,
            options.delimiter.or(Some(b'\t')),
        ))),
        FileFormat::Excel => Ok(Box::new(excel::ExcelReader::new(path))),
        FileFormat::Json => Ok(Box::new(json::JsonReader::new(path))),
    }
}
