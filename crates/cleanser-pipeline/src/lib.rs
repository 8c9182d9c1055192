//! Cleanser Pipeline
//!
//! Classifies contact records as genuine or test entries by sending them to
//! a generative model in fixed-size chunks.
//!
//! # Architecture
//!
//! ```text
//! CSV → load → chunk → { prompt → LLM → parse → reconcile → append } → analyzed CSV
//! ```
//!
//! Each chunk is written as soon as it is reconciled, so a crash part-way
//! through keeps every chunk that finished. A model or parse failure is
//! confined to its chunk: the chunk's records are written as "assumed
//! genuine" and the failure is recorded in the [`RunReport`].
//!
//! # Example Usage
//!
//! ```no_run
//! use cleanser_pipeline::{Pipeline, PipelineConfig, PipelineContext, PromptTemplate};
//! use cleanser_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let template = PromptTemplate::load(&config.paths.prompt)?;
//! let llm = MockProvider::new("[]");
//!
//! let mut pipeline = Pipeline::new(llm, config, template)?;
//! let report = pipeline.run(&PipelineContext::new()).await?;
//!
//! println!("{}", report.summary());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod context;
mod error;
mod parser;
mod pipeline;
mod prompt;
mod reconcile;
mod types;


pub use chunking::{Chunk, RecordChunker};
pub use config::{PathsConfig, PipelineConfig};
pub use context::{NoProgress, PipelineContext, ProgressSink};
pub use error::PipelineError;
pub use parser::{parse_llm_response, ParseOutcome};
pub use pipeline::Pipeline;
pub use prompt::{
    PromptBuilder, PromptTemplate, CONTACTS_PLACEHOLDER, DEFAULT_HUMAN_TEMPLATE,
    DEFAULT_TEMPLATE_YAML,
};
pub use reconcile::{reconcile, Reconciliation};
pub use types::{ChunkOutcome, OutcomeKind, PipelineState, RunReport};
