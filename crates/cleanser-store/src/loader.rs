//! Input loading

use crate::columns::ColumnMap;
use crate::StoreError;
use cleanser_domain::{ContactRecord, CONTACT_FIELDS};
use std::path::Path;
use tracing::info;

/// Read every contact from a CSV file with `name`, `organization` and `email` columns
///
/// The file is read entirely before returning. Extra columns are ignored;
/// short rows yield empty fields rather than errors.
///
/// # Errors
///
/// - [`StoreError::NotFound`] if `path` does not exist
/// - [`StoreError::MissingColumn`] if a required column is absent
/// - [`StoreError::Empty`] if the file has a header but no data rows
/// - [`StoreError::Csv`] / [`StoreError::Io`] if the file cannot be read
pub fn load_contacts(path: &Path) -> Result<Vec<ContactRecord>, StoreError> {
    info!("Reading CSV file: {}", path.display());

    if !path.exists() {
        return Err(StoreError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let columns = ColumnMap::resolve(&headers, &CONTACT_FIELDS, path)?;

    let mut contacts = Vec::new();
    for result in reader.records() {
        let record = result?;
        contacts.push(ContactRecord::new(
            columns.get(&record, "name"),
            columns.get(&record, "organization"),
            columns.get(&record, "email"),
        ));
    }

    if contacts.is_empty() {
        return Err(StoreError::Empty(path.to_path_buf()));
    }

    info!("Successfully read {} contacts", contacts.len());
    Ok(contacts)
}
