//! Incremental output of reconciled rows

use crate::StoreError;
use cleanser_domain::{ReconciledRecord, ANALYSIS_FIELDS, CONTACT_FIELDS};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Header of the analyzed output: contact columns, then analysis columns
pub fn analyzed_header() -> Vec<&'static str> {
    CONTACT_FIELDS.iter().chain(ANALYSIS_FIELDS.iter()).copied().collect()
}

/// Appends reconciled rows to a CSV file one chunk at a time
///
/// The file is created (truncating any previous run) on the first
/// [`append`](Self::append), which also writes the header. Every append is
/// flushed before returning so a crash loses at most the chunk in flight.
/// No deduplication is performed across appends.
pub struct IncrementalWriter {
    path: PathBuf,
    writer: Option<csv::Writer<File>>,
    rows_written: usize,
}

impl IncrementalWriter {
    /// Create a writer targeting `path`; nothing is touched until the first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
            rows_written: 0,
        }
    }

    /// Output location
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Data rows written so far (header excluded)
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Append one chunk's rows and flush
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] or [`StoreError::Csv`] if the file cannot be
    /// created or written.
    pub fn append(&mut self, rows: &[ReconciledRecord]) -> Result<usize, StoreError> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => Self::open(&self.path)?,
        };
        let writer = self.writer.insert(writer);

        for row in rows {
            let is_real = row.is_real.to_string();
            // Debug formatting keeps the fraction, so 1.0 stays "1.0"
            let confidence = format!("{:?}", row.confidence_score);
            let [name, organization, email] = row.contact.fields();
            writer.write_record([
                name,
                organization,
                email,
                is_real.as_str(),
                confidence.as_str(),
                row.reason.as_str(),
            ])?;
        }
        writer.flush()?;

        self.rows_written += rows.len();
        debug!(
            "Appended {} rows to {} ({} total)",
            rows.len(),
            self.path.display(),
            self.rows_written
        );
        Ok(rows.len())
    }

    fn open(path: &Path) -> Result<csv::Writer<File>, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_writer(File::create(path)?);
        writer.write_record(analyzed_header())?;
        Ok(writer)
    }
}
