//! Second pass: keep only contacts flagged genuine

use crate::columns::ColumnMap;
use crate::StoreError;
use cleanser_domain::CONTACT_FIELDS;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Counts from a cleanup pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanupSummary {
    /// Data rows read from the analyzed file
    pub rows_read: usize,

    /// Rows written to the cleaned file
    pub rows_kept: usize,
}

impl CleanupSummary {
    /// Rows dropped because `is_real` was not "true"
    pub fn rows_dropped(&self) -> usize {
        self.rows_read - self.rows_kept
    }
}

/// Copy rows whose `is_real` is textually "true" (any case) into `cleaned`
///
/// Only `name`, `organization` and `email` are written. Any other `is_real`
/// value, including blanks and garbage, drops the row. The cleaned file is
/// always created with its header, even when no row survives.
///
/// # Errors
///
/// - [`StoreError::NotFound`] if `analyzed` does not exist
/// - [`StoreError::MissingColumn`] if a contact column or `is_real` is absent
/// - [`StoreError::Csv`] / [`StoreError::Io`] on read or write failure
pub fn extract_real_contacts(
    analyzed: &Path,
    cleaned: &Path,
) -> Result<CleanupSummary, StoreError> {
    info!("Extracting real contacts from {}", analyzed.display());

    if !analyzed.exists() {
        return Err(StoreError::NotFound(analyzed.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(analyzed)?;
    let headers = reader.headers()?.clone();
    let required = [CONTACT_FIELDS[0], CONTACT_FIELDS[1], CONTACT_FIELDS[2], "is_real"];
    let columns = ColumnMap::resolve(&headers, &required, analyzed)?;

    if let Some(parent) = cleaned.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(cleaned)?;
    writer.write_record(CONTACT_FIELDS)?;

    let mut summary = CleanupSummary::default();
    for result in reader.records() {
        let record = result?;
        summary.rows_read += 1;

        if !columns.get(&record, "is_real").eq_ignore_ascii_case("true") {
            continue;
        }

        writer.write_record(CONTACT_FIELDS.map(|column| columns.get(&record, column)))?;
        summary.rows_kept += 1;
    }
    writer.flush()?;

    if summary.rows_kept == 0 {
        warn!("No real contacts found to save");
    } else {
        info!(
            "Saved {} real contacts to {}",
            summary.rows_kept,
            cleaned.display()
        );
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ANALYZED: &str = "\
name,organization,email,is_real,confidence_score,reason
Ann,Acme,ann@acme.com,true,0.9,no issues found
Test User,Test Co,test@test.com,false,0.95,Contains test
Bob,Initech,bob@initech.com,TRUE,0.5,no analysis available
Eve,Evil,eve@evil.com,maybe,0.5,?
";

    #[test]
    fn test_keeps_only_true_rows() {
        let dir = tempdir().unwrap();
        let analyzed = dir.path().join("analyzed.csv");
        let cleaned = dir.path().join("out").join("cleaned.csv");
        fs::write(&analyzed, ANALYZED).unwrap();

        let summary = extract_real_contacts(&analyzed, &cleaned).unwrap();
        assert_eq!(summary.rows_read, 4);
        assert_eq!(summary.rows_kept, 2);
        assert_eq!(summary.rows_dropped(), 2);

        let contents = fs::read_to_string(&cleaned).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(
            lines,
            vec![
                "name,organization,email",
                "Ann,Acme,ann@acme.com",
                "Bob,Initech,bob@initech.com",
            ]
        );
    }

    #[test]
    fn test_tolerates_bom_on_first_header() {
        let dir = tempdir().unwrap();
        let analyzed = dir.path().join("analyzed.csv");
        let cleaned = dir.path().join("cleaned.csv");
        fs::write(&analyzed, format!("\u{feff}{}", ANALYZED)).unwrap();

        let summary = extract_real_contacts(&analyzed, &cleaned).unwrap();
        assert_eq!(summary.rows_kept, 2);

        let contents = fs::read_to_string(&cleaned).unwrap();
        assert!(contents.contains("Ann,Acme,ann@acme.com"));
    }

    #[test]
    fn test_header_written_when_nothing_kept() {
        let dir = tempdir().unwrap();
        let analyzed = dir.path().join("analyzed.csv");
        let cleaned = dir.path().join("cleaned.csv");
        fs::write(
            &analyzed,
            "name,organization,email,is_real\nX,Y,x@y.com,False\n",
        )
        .unwrap();

        let summary = extract_real_contacts(&analyzed, &cleaned).unwrap();
        assert_eq!(summary.rows_kept, 0);
        assert_eq!(fs::read_to_string(&cleaned).unwrap(), "name,organization,email\n");
    }

    #[test]
    fn test_missing_is_real_column() {
        let dir = tempdir().unwrap();
        let analyzed = dir.path().join("analyzed.csv");
        fs::write(&analyzed, "name,organization,email\nA,B,a@b.com\n").unwrap();

        let result = extract_real_contacts(&analyzed, &dir.path().join("cleaned.csv"));
        assert!(matches!(result, Err(StoreError::MissingColumn { .. })));
    }

    #[test]
    fn test_missing_analyzed_file() {
        let dir = tempdir().unwrap();
        let result = extract_real_contacts(
            &dir.path().join("absent.csv"),
            &dir.path().join("cleaned.csv"),
        );
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }
}
