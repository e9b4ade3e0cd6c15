use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::types::Result;

/// Write any result as pretty JSON to a file
pub fn write_json_file<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

/// Render any result as pretty JSON
pub fn to_json_string<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Write any result as pretty JSON to stdout
pub fn write_json_stdout<T: Serialize>(value: &T) -> Result<()> {
    let json = to_json_string(value)?;
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_date;
    use crate::reconcile::reconcile;
    use crate::fields::CanonicalField;

    #[test]
    fn test_temporal_serialization() {
        let json = to_json_string(&normalize_date("about 1890")).unwrap();
        assert!(json.contains("\"value\": \"1890-01-01\""));
        assert!(json.contains("\"is_uncertain\": true"));
        assert!(json.contains("\"uncertainty_kind\": \"approximate\""));
        assert!(json.contains("\"original_text\": \"about 1890\""));
    }

    #[test]
    fn test_mapping_serialization() {
        let mapping = reconcile(&["yearOfBirth"], &[CanonicalField::YearOfBirth]);
        let json = to_json_string(&mapping).unwrap();
        assert!(json.contains("\"convention\": \"camel\""));
        assert!(json.contains("\"field\": \"year_of_birth\""));
        assert!(json.contains("\"match_kind\": \"exact\""));
    }

    #[test]
    fn test_write_json_file() {
        let file = tempfile::NamedTempFile::with_suffix(".json").unwrap();
        write_json_file(&normalize_date("1890-05-12"), file.path()).unwrap();
        let written = std::fs::read_to_string(file.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["value"], "1890-05-12");
        assert_eq!(value["is_uncertain"], false);
    }
}
