//! Error types for the pipeline
//!
//! Only run-fatal conditions are errors. Failures confined to one chunk
//! (model call or response parsing) are reported through
//! [`ChunkOutcome`](crate::ChunkOutcome) instead.

use cleanser_store::StoreError;
use thiserror::Error;

/// Errors that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input missing, unreadable or empty
    #[error("Failed to load input: {0}")]
    Load(#[source] StoreError),

    /// Invalid configuration (chunk size, template placeholder, ...)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Prompt template could not be read or decoded
    #[error("Prompt template error: {0}")]
    Template(String),

    /// Output could not be written
    #[error("Failed to write output: {0}")]
    Write(#[source] StoreError),
}
