//! Per-run context: identity, tracing span and progress reporting

use crate::types::ChunkOutcome;
use std::sync::Arc;
use tracing::{info_span, Span};
use uuid::Uuid;

/// Receives progress as chunks complete
///
/// All methods default to no-ops so implementors only override what they need.
pub trait ProgressSink: Send + Sync {
    /// Called once before the first chunk with the total chunk count
    fn start(&self, _total_chunks: usize) {}

    /// Called after each chunk has been written
    fn advance(&self, _outcome: &ChunkOutcome) {}

    /// Called once after the last chunk
    fn finish(&self) {}
}

/// Progress sink that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// State carried through one pipeline run
pub struct PipelineContext {
    run_id: Uuid,
    span: Span,
    progress: Arc<dyn ProgressSink>,
}

impl PipelineContext {
    /// Create a context with a fresh run id and no progress reporting
    pub fn new() -> Self {
        Self::with_progress(Arc::new(NoProgress))
    }

    /// Create a context reporting to `progress`
    pub fn with_progress(progress: Arc<dyn ProgressSink>) -> Self {
        let run_id = Uuid::now_v7();
        let span = info_span!("run", run_id = %run_id);
        Self {
            run_id,
            span,
            progress,
        }
    }

    /// Unique id of this run
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Span that every log line of the run is recorded under
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Progress sink
    pub fn progress(&self) -> &dyn ProgressSink {
        self.progress.as_ref()
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_context_gets_its_own_run_id() {
        let a = PipelineContext::new();
        let b = PipelineContext::new();
        assert_ne!(a.run_id(), b.run_id());
        assert_eq!(a.run_id().get_version_num(), 7);
    }
}
