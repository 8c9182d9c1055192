//! Cleanser Domain Layer
//!
//! Core data model for contact classification. This crate has no external
//! dependencies and performs no I/O; loaders, writers and model clients live
//! in the infrastructure crates.
//!
//! ## Key Concepts
//!
//! - **ContactRecord**: one input row (name, organization, work email)
//! - **AnalysisResult**: the model's verdict for a single email, possibly partial
//! - **ReconciledRecord**: a contact joined with its verdict, always fully populated
//! - **LlmProvider**: the opaque text-in, text-out boundary to the model

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod contact;
pub mod traits;

// Re-exports for convenience
pub use analysis::{
    AnalysisResult, Classification, ReconciledRecord, ANALYSIS_FIELDS, DEFAULT_CONFIDENCE,
    NO_ANALYSIS_REASON, NO_ISSUES_REASON,
};
pub use contact::{ContactRecord, CONTACT_FIELDS};
pub use traits::LlmProvider;
