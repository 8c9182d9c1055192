//! Run state, per-chunk outcomes and the run report

use std::fmt;
use uuid::Uuid;

/// Orchestrator lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Nothing loaded yet
    Idle,
    /// Input records loaded
    Loaded,
    /// Records partitioned into chunks
    Chunked,
    /// Working on the chunk with this index
    Processing(usize),
    /// Every chunk has been written
    Done,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Loaded => write!(f, "loaded"),
            PipelineState::Chunked => write!(f, "chunked"),
            PipelineState::Processing(i) => write!(f, "processing chunk {}", i),
            PipelineState::Done => write!(f, "done"),
        }
    }
}

/// How a chunk ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeKind {
    /// The response parsed; some records may still have been omitted
    Success {
        /// Records with a model verdict
        matched: usize,
        /// Records the model skipped
        omitted: usize,
        /// Records whose verdict could not be read
        malformed: usize,
    },

    /// The model call failed; every record was defaulted
    InvocationFailure {
        /// Provider error message
        error: String,
    },

    /// No usable array in the response; every record was defaulted
    ParseFailure {
        /// Parser diagnostic
        reason: String,
    },
}

impl OutcomeKind {
    /// Short label used in logs and tables
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeKind::Success { .. } => "success",
            OutcomeKind::InvocationFailure { .. } => "invocation failure",
            OutcomeKind::ParseFailure { .. } => "parse failure",
        }
    }
}

/// Result of processing one chunk
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkOutcome {
    /// Chunk index
    pub index: usize,

    /// Records in the chunk
    pub records: usize,

    /// Emails of records written with default values
    pub defaulted: Vec<String>,

    /// The subset of `defaulted` whose verdict was present but unreadable
    pub malformed: Vec<String>,

    /// What happened
    pub kind: OutcomeKind,
}

impl ChunkOutcome {
    /// Whether the whole chunk fell back to defaults
    pub fn is_failure(&self) -> bool {
        !matches!(self.kind, OutcomeKind::Success { .. })
    }
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Run id
    pub run_id: Uuid,

    /// Model used
    pub model_name: String,

    /// Records loaded
    pub total_records: usize,

    /// Chunks processed
    pub total_chunks: usize,

    /// One outcome per chunk, in order
    pub outcomes: Vec<ChunkOutcome>,

    /// Data rows written to the analyzed file
    pub rows_written: usize,

    /// Verdicts that referenced emails outside their chunk
    pub unattributed_results: usize,

    /// Wall-clock duration in milliseconds
    pub elapsed_ms: u64,
}

impl RunReport {
    /// Outcomes for chunks whose model call or parse failed
    pub fn failed_chunks(&self) -> Vec<&ChunkOutcome> {
        self.outcomes.iter().filter(|o| o.is_failure()).collect()
    }

    /// Records defaulted because their whole chunk failed
    pub fn records_defaulted_by_chunk_failure(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.is_failure())
            .flat_map(|o| o.defaulted.iter().map(String::as_str))
            .collect()
    }

    /// Records defaulted because the model omitted them from a parsed response
    pub fn records_omitted_by_model(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| !o.is_failure())
            .flat_map(|o| {
                o.defaulted
                    .iter()
                    .filter(move |email| !o.malformed.contains(email))
                    .map(String::as_str)
            })
            .collect()
    }

    /// Records defaulted because the model's verdict for them was unreadable
    pub fn records_with_malformed_verdict(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .flat_map(|o| o.malformed.iter().map(String::as_str))
            .collect()
    }

    /// Records that received a model verdict
    pub fn records_analyzed(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o.kind {
                OutcomeKind::Success { matched, .. } => matched,
                _ => 0,
            })
            .sum()
    }

    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        let failed = self.failed_chunks();
        let mut lines = vec![
            "Run Summary".to_string(),
            "===========".to_string(),
            format!("Run id: {}", self.run_id),
            format!("Model: {}", self.model_name),
            format!("Records: {}", self.total_records),
            format!("Chunks: {} ({} failed)", self.total_chunks, failed.len()),
            format!("Rows written: {}", self.rows_written),
            format!("Analyzed by model: {}", self.records_analyzed()),
            format!(
                "Defaulted by chunk failure: {}",
                self.records_defaulted_by_chunk_failure().len()
            ),
            format!("Omitted by model: {}", self.records_omitted_by_model().len()),
        ];

        let malformed = self.records_with_malformed_verdict().len();
        if malformed > 0 {
            lines.push(format!("Unreadable verdicts: {}", malformed));
        }

        if self.unattributed_results > 0 {
            lines.push(format!("Unattributed verdicts: {}", self.unattributed_results));
        }
        lines.push(format!("Elapsed: {}ms", self.elapsed_ms));

        if !failed.is_empty() {
            lines.push(String::new());
            lines.push("Failed chunks:".to_string());
            for outcome in failed {
                let detail = match &outcome.kind {
                    OutcomeKind::InvocationFailure { error } => error.as_str(),
                    OutcomeKind::ParseFailure { reason } => reason.as_str(),
                    OutcomeKind::Success { .. } => "",
                };
                lines.push(format!(
                    "  #{} ({}, {} records): {}",
                    outcome.index,
                    outcome.kind.label(),
                    outcome.records,
                    detail
                ));
            }
        }

        lines.join("\n")
    }
}
