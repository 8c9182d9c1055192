//! Core pipeline orchestrator

use crate::chunking::{Chunk, RecordChunker};
use crate::config::PipelineConfig;
use crate::context::PipelineContext;
use crate::error::PipelineError;
use crate::parser::{parse_llm_response, ParseOutcome};
use crate::prompt::{PromptBuilder, PromptTemplate};
use crate::reconcile::reconcile;
use crate::types::{ChunkOutcome, OutcomeKind, PipelineState, RunReport};
use cleanser_domain::{ContactRecord, LlmProvider, ReconciledRecord};
use cleanser_store::{load_contacts, IncrementalWriter};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Drives load, chunk and per-chunk classification for one input file
///
/// A chunk whose model call or response parse fails is still written, with
/// every record defaulted to "assumed genuine"; the failure is reported in
/// the [`RunReport`]. Only load, configuration and write failures abort.
pub struct Pipeline<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: PipelineConfig,
    template: PromptTemplate,
    chunker: RecordChunker,
    state: PipelineState,
}

/// One chunk's rows, ready to write
struct ProcessedChunk {
    rows: Vec<ReconciledRecord>,
    outcome: ChunkOutcome,
    unattributed: usize,
}

impl<L> Pipeline<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new pipeline
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Config`] if the configuration is invalid.
    pub fn new(
        llm_provider: L,
        config: PipelineConfig,
        template: PromptTemplate,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        let chunker = RecordChunker::new(config.chunk_size)?;

        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
            template,
            chunker,
            state: PipelineState::Idle,
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Classify `paths.input` and write every row to `paths.analyzed`
    ///
    /// # Errors
    ///
    /// - [`PipelineError::Load`] if the input is missing, unreadable or empty
    /// - [`PipelineError::Write`] if the analyzed file cannot be written
    pub async fn run(&mut self, ctx: &PipelineContext) -> Result<RunReport, PipelineError> {
        let span = ctx.span().clone();
        self.load_and_process(ctx).instrument(span).await
    }

    async fn load_and_process(
        &mut self,
        ctx: &PipelineContext,
    ) -> Result<RunReport, PipelineError> {
        let input = self.config.paths.input.clone();
        let records = load_contacts(&input).map_err(PipelineError::Load)?;
        info!("Loaded {} contacts from {}", records.len(), input.display());

        let mut writer = IncrementalWriter::new(self.config.paths.analyzed.clone());
        self.process_records(&records, &mut writer, ctx).await
    }

    /// Classify already loaded records, appending each chunk to `writer`
    pub async fn run_records(
        &mut self,
        records: &[ContactRecord],
        writer: &mut IncrementalWriter,
        ctx: &PipelineContext,
    ) -> Result<RunReport, PipelineError> {
        let span = ctx.span().clone();
        self.process_records(records, writer, ctx)
            .instrument(span)
            .await
    }

    async fn process_records(
        &mut self,
        records: &[ContactRecord],
        writer: &mut IncrementalWriter,
        ctx: &PipelineContext,
    ) -> Result<RunReport, PipelineError> {
        let start = Instant::now();
        self.state = PipelineState::Loaded;

        let chunks = self.chunker.chunk(records);
        self.state = PipelineState::Chunked;
        info!(
            "Split {} contacts into {} chunks of up to {}",
            records.len(),
            chunks.len(),
            self.chunker.chunk_size()
        );

        let mut outcomes = Vec::with_capacity(chunks.len());
        let mut unattributed_results = 0;
        ctx.progress().start(chunks.len());

        for chunk in &chunks {
            self.state = PipelineState::Processing(chunk.index);
            let chunk_span = info_span!("chunk", index = chunk.index, records = chunk.len());

            let processed = self.process_chunk(chunk).instrument(chunk_span).await;

            writer.append(&processed.rows).map_err(|e| {
                error!("Failed to write chunk {}: {}", chunk.index, e);
                PipelineError::Write(e)
            })?;
            debug!(
                "Wrote chunk {}/{} to {}",
                chunk.index + 1,
                chunks.len(),
                writer.path().display()
            );

            unattributed_results += processed.unattributed;
            ctx.progress().advance(&processed.outcome);
            outcomes.push(processed.outcome);
        }

        ctx.progress().finish();
        self.state = PipelineState::Done;

        let report = RunReport {
            run_id: ctx.run_id(),
            model_name: self.config.model_name.clone(),
            total_records: records.len(),
            total_chunks: chunks.len(),
            outcomes,
            rows_written: writer.rows_written(),
            unattributed_results,
            elapsed_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Run complete: {} rows written, {} of {} chunks failed",
            report.rows_written,
            report.failed_chunks().len(),
            report.total_chunks
        );

        Ok(report)
    }

    /// Build prompt, call the model, parse and reconcile one chunk
    async fn process_chunk(&self, chunk: &Chunk<'_>) -> ProcessedChunk {
        let prompt = PromptBuilder::new(&self.template).build(chunk.records);
        debug!("Prompt length: {} chars", prompt.len());

        let response = match self.call_llm(prompt).await {
            Ok(response) => response,
            Err(e) => {
                error!("Model call failed for chunk {}: {}", chunk.index, e);
                return defaulted_chunk(chunk, OutcomeKind::InvocationFailure { error: e });
            }
        };
        debug!("Response length: {} chars", response.len());

        let (results, malformed) = match parse_llm_response(&response) {
            ParseOutcome::Parsed { results, malformed } => (results, malformed),
            ParseOutcome::Failed { reason, response } => {
                error!(
                    "Could not parse response for chunk {}: {}\nRaw response: {}",
                    chunk.index, reason, response
                );
                return defaulted_chunk(chunk, OutcomeKind::ParseFailure { reason });
            }
        };
        debug!("Parsed {} results", results.len());

        let reconciliation = reconcile(chunk.records, results, &malformed);
        for email in &reconciliation.omitted {
            debug!("No analysis returned for {}", email);
        }
        if !reconciliation.omitted.is_empty() {
            warn!(
                "Model omitted {} of {} contacts in chunk {}",
                reconciliation.omitted.len(),
                chunk.len(),
                chunk.index
            );
        }
        if !reconciliation.malformed.is_empty() {
            warn!(
                "Unreadable verdicts for {} contacts in chunk {}; defaulted",
                reconciliation.malformed.len(),
                chunk.index
            );
        }

        ProcessedChunk {
            outcome: ChunkOutcome {
                index: chunk.index,
                records: chunk.len(),
                defaulted: reconciliation.defaulted_emails(),
                kind: OutcomeKind::Success {
                    matched: reconciliation.matched,
                    omitted: reconciliation.omitted.len(),
                    malformed: reconciliation.malformed.len(),
                },
                malformed: reconciliation.malformed,
            },
            unattributed: reconciliation.unattributed,
            rows: reconciliation.records,
        }
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: String) -> Result<String, String> {
        let llm = Arc::clone(&self.llm_provider);

        // LlmProvider is synchronous
        let call = tokio::task::spawn_blocking(move || {
            llm.generate(&prompt).map_err(|e| e.to_string())
        });

        let joined = match self.config.request_timeout() {
            Some(limit) => timeout(limit, call)
                .await
                .map_err(|_| format!("Model call timed out after {}s", limit.as_secs()))?,
            None => call.await,
        };

        joined.map_err(|e| format!("Task join error: {}", e))?
    }
}

/// Every record in the chunk falls back to "assumed genuine"
fn defaulted_chunk(chunk: &Chunk<'_>, kind: OutcomeKind) -> ProcessedChunk {
    let rows: Vec<ReconciledRecord> = chunk
        .records
        .iter()
        .cloned()
        .map(ReconciledRecord::defaulted)
        .collect();

    ProcessedChunk {
        outcome: ChunkOutcome {
            index: chunk.index,
            records: chunk.len(),
            defaulted: chunk.records.iter().map(|r| r.email.clone()).collect(),
            malformed: Vec::new(),
            kind,
        },
        rows,
        unattributed: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::DEFAULT_HUMAN_TEMPLATE;
    use cleanser_llm::MockProvider;
    use tempfile::tempdir;

    fn template() -> PromptTemplate {
        PromptTemplate::new("Classify.", DEFAULT_HUMAN_TEMPLATE).unwrap()
    }

    fn contacts(n: usize) -> Vec<ContactRecord> {
        (0..n)
            .map(|i| {
                ContactRecord::new(format!("Name {}", i), "Org", format!("user{}@org.com", i))
            })
            .collect()
    }

    fn config(chunk_size: usize) -> PipelineConfig {
        PipelineConfig {
            chunk_size,
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Pipeline::new(MockProvider::new("[]"), config(0), template());
        assert!(matches!(result, Err(PipelineError::Config(_))));
    }

    #[tokio::test]
    async fn test_one_model_call_per_chunk() {
        let llm = MockProvider::new("[]");
        let probe = llm.clone();
        let mut pipeline = Pipeline::new(llm, config(3), template()).unwrap();
        let dir = tempdir().unwrap();
        let mut writer = IncrementalWriter::new(dir.path().join("analyzed.csv"));

        let report = pipeline
            .run_records(&contacts(7), &mut writer, &PipelineContext::new())
            .await
            .unwrap();

        assert_eq!(probe.call_count(), 3);
        assert_eq!(report.total_chunks, 3);
        assert_eq!(report.rows_written, 7);
        assert_eq!(report.records_omitted_by_model().len(), 7);
        assert_eq!(pipeline.state(), PipelineState::Done);

        let prompts = probe.prompts();
        assert!(prompts[2].contains("user6@org.com"));
        assert!(!prompts[2].contains("user5@org.com"));
    }

    #[tokio::test]
    async fn test_invocation_failure_defaults_chunk_and_continues() {
        let llm = MockProvider::new(r#"[{"email": "user2@org.com", "is_real": false}]"#);
        llm.queue_error("model crashed");
        let mut pipeline = Pipeline::new(llm, config(2), template()).unwrap();
        let dir = tempdir().unwrap();
        let mut writer = IncrementalWriter::new(dir.path().join("analyzed.csv"));

        let report = pipeline
            .run_records(&contacts(4), &mut writer, &PipelineContext::new())
            .await
            .unwrap();

        assert_eq!(report.rows_written, 4);
        let failed = report.failed_chunks();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].index, 0);
        assert!(matches!(failed[0].kind, OutcomeKind::InvocationFailure { .. }));
        assert_eq!(
            report.records_defaulted_by_chunk_failure(),
            vec!["user0@org.com", "user1@org.com"]
        );
        assert_eq!(report.records_omitted_by_model(), vec!["user3@org.com"]);
    }

    #[tokio::test]
    async fn test_parse_failure_is_tagged() {
        let llm = MockProvider::new("I cannot comply.");
        let mut pipeline = Pipeline::new(llm, config(10), template()).unwrap();
        let dir = tempdir().unwrap();
        let mut writer = IncrementalWriter::new(dir.path().join("analyzed.csv"));

        let report = pipeline
            .run_records(&contacts(2), &mut writer, &PipelineContext::new())
            .await
            .unwrap();

        assert!(matches!(report.outcomes[0].kind, OutcomeKind::ParseFailure { .. }));
        assert_eq!(report.records_defaulted_by_chunk_failure().len(), 2);
    }

    #[tokio::test]
    async fn test_numeric_and_unreadable_verdicts() {
        let llm = MockProvider::new(
            r#"[
                {"email": "user0@org.com", "is_real": 0, "reason": "fake"},
                {"email": "user1@org.com", "is_real": "maybe"}
            ]"#,
        );
        let mut pipeline = Pipeline::new(llm, config(10), template()).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("analyzed.csv");
        let mut writer = IncrementalWriter::new(path.clone());

        let report = pipeline
            .run_records(&contacts(3), &mut writer, &PipelineContext::new())
            .await
            .unwrap();

        assert_eq!(
            report.outcomes[0].kind,
            OutcomeKind::Success {
                matched: 1,
                omitted: 1,
                malformed: 1,
            }
        );
        assert_eq!(report.records_with_malformed_verdict(), vec!["user1@org.com"]);
        assert_eq!(report.records_omitted_by_model(), vec!["user2@org.com"]);

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("Name 0,Org,user0@org.com,false,0.5,fake"));
    }

    #[tokio::test]
    async fn test_write_failure_aborts() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();

        let mut pipeline = Pipeline::new(MockProvider::new("[]"), config(1), template()).unwrap();
        let mut writer = IncrementalWriter::new(blocker.join("analyzed.csv"));

        let result = pipeline
            .run_records(&contacts(3), &mut writer, &PipelineContext::new())
            .await;
        assert!(matches!(result, Err(PipelineError::Write(_))));
        assert_eq!(pipeline.state(), PipelineState::Processing(0));
    }

    #[tokio::test]
    async fn test_missing_input_is_load_error() {
        let dir = tempdir().unwrap();
        let mut cfg = config(10);
        cfg.paths.input = dir.path().join("absent.csv");
        cfg.paths.analyzed = dir.path().join("analyzed.csv");

        let llm = MockProvider::new("[]");
        let probe = llm.clone();
        let mut pipeline = Pipeline::new(llm, cfg, template()).unwrap();

        let result = pipeline.run(&PipelineContext::new()).await;
        assert!(matches!(result, Err(PipelineError::Load(_))));
        assert_eq!(probe.call_count(), 0);
        assert!(!dir.path().join("analyzed.csv").exists());
    }
}
