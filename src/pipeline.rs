//! Import orchestration: read a source, reconcile its columns once, then
//! normalize every row and collect quality metrics.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::error::Error;
use crate::fields::CanonicalField;
use crate::readers::{create_reader, RawTable};
use crate::reconcile::{reconcile_with, ColumnMapping};
use crate::record::{normalize_row, NormalizedRecord};
use crate::report::QualityReport;
use crate::types::{FileFormat, ImportOptions, Result};

/// Where an import came from
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub file_name: String,
    pub format: FileFormat,
    /// Sheet or file name the rows were read from
    pub table: String,
    pub file_hash: Option<String>,
    pub options: ImportOptions,
}

/// Everything produced by one import
#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub source: SourceInfo,
    pub mapping: ColumnMapping,
    pub report: QualityReport,
    pub records: Vec<NormalizedRecord>,
}

/// Import a data file into normalized records
pub fn import_file(path: &Path, options: &ImportOptions) -> Result<ImportResult> {
    let format = detect_format(path)?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let file_hash = if options.hash_file {
        Some(compute_file_hash(path)?)
    } else {
        None
    };

    let mut reader = create_reader(path, options)?;
    let table = reader.read()?;
    info!(
        file = %file_name,
        columns = table.headers.len(),
        rows = table.row_count(),
        "read source table"
    );

    let mapping = map_columns(&table, options);
    if mapping.is_empty() {
        return Err(Error::NoRecognizedColumns {
            path: path.to_path_buf(),
        });
    }
    check_strict(&mapping, options)?;

    let (records, report) = normalize_table(&table, &mapping, options);

    Ok(ImportResult {
        source: SourceInfo {
            file_name,
            format,
            table: table.name,
            file_hash,
            options: options.clone(),
        },
        mapping,
        report,
        records,
    })
}

/// Read only the headers of a file and reconcile them
pub fn inspect_columns(path: &Path, options: &ImportOptions) -> Result<ColumnMapping> {
    let mut reader = create_reader(path, options)?;
    let table = reader.read()?;
    Ok(map_columns(&table, options))
}

/// Reconcile a table's headers against every canonical field
pub fn map_columns(table: &RawTable, options: &ImportOptions) -> ColumnMapping {
    reconcile_with(&table.headers, &CanonicalField::ALL, options.convention)
}

/// Normalize every row of a table through a column mapping
pub fn normalize_table(
    table: &RawTable,
    mapping: &ColumnMapping,
    options: &ImportOptions,
) -> (Vec<NormalizedRecord>, QualityReport) {
    let mut report = QualityReport::new(mapping);
    let records: Vec<NormalizedRecord> = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| normalize_row(mapping, i, row, options.truncate))
        .inspect(|record| report.update(record))
        .collect();

    report.log_summary();
    (records, report)
}

fn check_strict(mapping: &ColumnMapping, options: &ImportOptions) -> Result<()> {
    if mapping.is_complete() {
        return Ok(());
    }
    if options.strict {
        return Err(Error::UnmappedFields {
            fields: mapping
                .unmapped_fields
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
        });
    }
    warn!(
        count = mapping.unmapped_fields.len(),
        "importing with unmapped fields left empty"
    );
    Ok(())
}

fn detect_format(path: &Path) -> Result<FileFormat> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    FileFormat::from_extension(ext).ok_or_else(|| {
        Error::UnsupportedFormat(format!("Unsupported file extension: .{}", ext))
    })
}

/// Compute SHA-256 hash of a file (streaming to handle large files)
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::NamingConvention;
    use crate::types::UncertaintyKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_compute_file_hash() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "test content").unwrap();

        let hash = compute_file_hash(file.path()).unwrap();
        assert_eq!(hash.len(), 64); // SHA-256 produces 64 hex chars
        assert_eq!(
            hash,
            "6ae8a75555209fd6c44157c0aed8016e763ff435a19cf186f76863140143ff72"
        );
    }

    #[test]
    fn test_import_csv() {
        let file = create_test_csv(
            "Family Name,Sex,Year of birth,Arrival at Lincoln,Notes\n\
             Smith,m,age 20,about 1890,x\n\
             Jones,F,1890 or 1891,1891-09-01,\n",
        );
        let result = import_file(file.path(), &ImportOptions::default()).unwrap();

        assert_eq!(result.source.format, FileFormat::Csv);
        assert!(result.source.file_hash.is_some());
        assert_eq!(result.mapping.convention, Some(NamingConvention::Spaced));
        assert_eq!(result.mapping.unmatched_columns, vec!["Notes".to_string()]);
        assert_eq!(result.records.len(), 2);

        let first = &result.records[0];
        assert_eq!(first.text(CanonicalField::Sex), Some("M"));
        assert_eq!(first.year_of_birth.value, Some(1880));
        assert_eq!(
            first.arrival_date.uncertainty_kind,
            Some(UncertaintyKind::Approximate)
        );

        let second = &result.records[1];
        assert_eq!(second.year_of_birth.value, Some(1890));
        assert_eq!(second.year_of_birth.uncertainty_kind, Some(UncertaintyKind::Range));

        assert_eq!(result.report.total_rows, 2);
    }

    #[test]
    fn test_no_recognized_columns() {
        let file = create_test_csv("foo,bar\n1,2\n");
        let result = import_file(file.path(), &ImportOptions::default());
        assert!(matches!(result, Err(Error::NoRecognizedColumns { .. })));
    }

    #[test]
    fn test_strict_mode_rejects_gaps() {
        let file = create_test_csv("Family Name,Sex\nSmith,M\n");
        let options = ImportOptions {
            strict: true,
            ..ImportOptions::default()
        };
        match import_file(file.path(), &options) {
            Err(Error::UnmappedFields { fields }) => {
                assert!(fields.contains(&"year_of_birth".to_string()));
                assert!(!fields.contains(&"family_name".to_string()));
            }
            other => panic!("expected unmapped fields error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_forced_convention() {
        let file = create_test_csv("0,1,5\nRed Cloud,Smith,1885\n");
        let options = ImportOptions {
            convention: Some(NamingConvention::Positional),
            hash_file: false,
            ..ImportOptions::default()
        };
        let result = import_file(file.path(), &options).unwrap();
        assert!(result.mapping.forced);
        assert!(result.source.file_hash.is_none());
        assert_eq!(
            result.records[0].text(CanonicalField::IndigenousName),
            Some("Red Cloud")
        );
        assert_eq!(result.records[0].year_of_birth.value, Some(1885));
    }

    #[test]
    fn test_unsupported_extension() {
        let file = NamedTempFile::with_suffix(".xyz").unwrap();
        let result = import_file(file.path(), &ImportOptions::default());
        assert!(matches!(result, Err(Error::UnsupportedFormat(_))));
    }

    #[test]
    fn test_inspect_columns() {
        let file = create_test_csv("yearOfBirth,familyName\n1890,Smith\n");
        let mapping = inspect_columns(file.path(), &ImportOptions::default()).unwrap();
        assert_eq!(mapping.convention, Some(NamingConvention::Camel));
    }
}
