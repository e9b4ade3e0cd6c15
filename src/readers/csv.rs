use std::borrow::Cow;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use encoding_rs::WINDOWS_1252;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::types::{RawValue, Result};

use super::{DataReader, RawTable};

/// Delimiters tried in order when none is given
const CANDIDATE_DELIMITERS: &[u8] = &[b'|', b',', b'\t', b';'];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// CSV/TSV file reader
pub struct CsvReader {
    path: PathBuf,
    delimiter: Option<u8>,
}

impl CsvReader {
    /// Create a reader; the delimiter is sniffed when `None`
    pub fn new(path: &Path, delimiter: Option<u8>) -> Self {
        Self {
            path: path.to_path_buf(),
            delimiter,
        }
    }
}

impl DataReader for CsvReader {
    fn read(&mut self) -> Result<RawTable> {
        let bytes = std::fs::read(&self.path)?;
        let text = decode(&bytes);

        let delimiter = match self.delimiter {
            Some(d) => d,
            None => sniff_delimiter(&text),
        };
        info!(
            path = %self.path.display(),
            delimiter = %char::from(delimiter).escape_default(),
            "reading delimited file"
        );

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        if headers.is_empty() {
            return Err(Error::EmptyInput {
                path: self.path.clone(),
            });
        }

        let mut rows = Vec::new();
        for (line, result) in reader.records().enumerate() {
            match result {
                Ok(record) => rows.push(record.iter().map(cell_value).collect()),
                Err(e) => warn!(row = line + 1, error = %e, "skipping unreadable row"),
            }
        }

        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        Ok(RawTable {
            name,
            headers,
            rows,
        })
    }
}

/// UTF-8 with or without BOM; anything else is read as Windows-1252
pub fn decode(bytes: &[u8]) -> Cow<'_, str> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => {
            debug!("input is not UTF-8, decoding as Windows-1252");
            let (text, _, _) = WINDOWS_1252.decode(bytes);
            text
        }
    }
}

/// First candidate delimiter that splits the header line into more than one column
pub fn sniff_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .find(|d| {
            let mut reader = ReaderBuilder::new()
                .delimiter(*d)
                .has_headers(false)
                .from_reader(header.as_bytes());
            reader
                .records()
                .next()
                .and_then(|r| r.ok())
                .map_or(false, |r| r.len() > 1)
        })
        .unwrap_or(b',')
}

fn cell_value(cell: &str) -> RawValue {
    if cell.trim().is_empty() {
        RawValue::Missing
    } else {
        RawValue::Text(cell.to_string())
    }
}
