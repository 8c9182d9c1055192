//! Cleanser Storage Layer
//!
//! CSV plumbing around the classification pipeline.
//!
//! # Components
//!
//! - [`load_contacts`]: read the whole input file into `ContactRecord`s
//! - [`IncrementalWriter`]: append reconciled rows chunk by chunk, header once
//! - [`extract_real_contacts`]: second pass keeping only rows flagged genuine
//!
//! # Examples
//!
//! ```no_run
//! use cleanser_store::{extract_real_contacts, load_contacts};
//! use std::path::Path;
//!
//! let contacts = load_contacts(Path::new("input/contacts.csv")).unwrap();
//! println!("{} contacts", contacts.len());
//!
//! let summary = extract_real_contacts(
//!     Path::new("output/analyzed_contacts.csv"),
//!     Path::new("output/cleaned_contacts.csv"),
//! ).unwrap();
//! println!("kept {} of {}", summary.rows_kept, summary.rows_read);
//! ```

#![warn(missing_docs)]

mod cleanup;
mod columns;
mod loader;
mod writer;

use std::path::PathBuf;
use thiserror::Error;

pub use cleanup::{extract_real_contacts, CleanupSummary};
pub use loader::load_contacts;
pub use writer::{analyzed_header, IncrementalWriter};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// File does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File exists but holds no data rows
    #[error("No records in {}", .0.display())]
    Empty(PathBuf),

    /// A required column is absent from the header row
    #[error("Missing column '{column}' in {}", path.display())]
    MissingColumn {
        /// Column that was expected
        column: String,
        /// File that was read
        path: PathBuf,
    },

    /// CSV encoding or decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
