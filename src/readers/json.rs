use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use crate::error::Error;
use crate::types::{RawValue, Result};

use super::{DataReader, RawTable};

/// Reader for a JSON array of flat objects, one object per row
pub struct JsonReader {
    path: PathBuf,
}

impl JsonReader {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl DataReader for JsonReader {
    fn read(&mut self) -> Result<RawTable> {
        let file = std::fs::File::open(&self.path)?;
        let value: Value = serde_json::from_reader(std::io::BufReader::new(file))?;

        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let table = table_from_json(name, &value)?;
        info!(path = %self.path.display(), rows = table.row_count(), "read JSON records");
        Ok(table)
    }
}

/// Build a raw table from a JSON array of objects.
///
/// Headers are the union of keys in first-seen order. Every field value must
/// be a scalar; nested arrays or objects are rejected.
pub fn table_from_json(name: String, value: &Value) -> Result<RawTable> {
    let records = value
        .as_array()
        .ok_or_else(|| Error::InvalidInput("expected a JSON array of records".to_string()))?;

    let mut headers: Vec<String> = Vec::new();
    let mut keyed_rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let object = record
            .as_object()
            .ok_or_else(|| Error::InvalidInput(format!("record {} is not a JSON object", i)))?;

        let mut row = Vec::with_capacity(object.len());
        for (key, field) in object {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
            row.push((key.as_str(), RawValue::from_json(field)?));
        }
        keyed_rows.push(row);
    }

    let rows = keyed_rows
        .into_iter()
        .map(|row| {
            let mut values = vec![RawValue::Missing; headers.len()];
            for (key, raw) in row {
                if let Some(idx) = headers.iter().position(|h| h == key) {
                    values[idx] = raw;
                }
            }
            values
        })
        .collect();

    Ok(RawTable {
        name,
        headers,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_table_from_json() {
        let value = json!([
            {"familyName": "Smith", "yearOfBirth": 1890.0},
            {"familyName": null, "sex": "F"}
        ]);
        let table = table_from_json("t".to_string(), &value).unwrap();
        assert_eq!(table.headers.len(), 3);

        let year = table.headers.iter().position(|h| h == "yearOfBirth").unwrap();
        let sex = table.headers.iter().position(|h| h == "sex").unwrap();
        assert_eq!(table.value(0, year), &RawValue::Float(1890.0));
        assert!(table.value(1, year).is_missing());
        assert_eq!(table.value(1, sex), &RawValue::from("F"));
    }

    #[test]
    fn test_nested_values_rejected() {
        let value = json!([{"yearOfBirth": [1890, 1891]}]);
        let err = table_from_json("t".to_string(), &value).unwrap_err();
        assert!(matches!(err, Error::NonScalarValue { kind: "array" }));
    }

    #[test]
    fn test_non_array_rejected() {
        let err = table_from_json("t".to_string(), &json!({"a": 1})).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        write!(file, r#"[{{"sex": "m", "band": "Oglala"}}]"#).unwrap();
        let table = JsonReader::new(file.path()).read().unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.name, file.path().file_name().unwrap().to_str().unwrap());
    }
}
