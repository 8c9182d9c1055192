//! Header resolution shared by the readers

use crate::StoreError;
use csv::StringRecord;
use std::collections::HashMap;
use std::path::Path;

const BOM: char = '\u{feff}';

/// Positions of named columns within a CSV header row
#[derive(Debug)]
pub(crate) struct ColumnMap {
    positions: HashMap<String, usize>,
}

impl ColumnMap {
    /// Resolve `required` columns against `headers`
    ///
    /// Header names are trimmed and a leading byte-order mark (left behind by
    /// spreadsheet exports) is ignored.
    pub(crate) fn resolve(
        headers: &StringRecord,
        required: &[&str],
        path: &Path,
    ) -> Result<Self, StoreError> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize(name).to_string(), idx))
            .collect();

        for column in required {
            if !positions.contains_key(*column) {
                return Err(StoreError::MissingColumn {
                    column: column.to_string(),
                    path: path.to_path_buf(),
                });
            }
        }

        Ok(Self { positions })
    }

    /// Field value for `column`, empty when the row is short
    pub(crate) fn get<'r>(&self, record: &'r StringRecord, column: &str) -> &'r str {
        self.positions
            .get(column)
            .and_then(|idx| record.get(*idx))
            .unwrap_or("")
    }
}

fn normalize(name: &str) -> &str {
    name.trim_start_matches(BOM).trim()
}
