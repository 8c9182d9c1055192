//! Analyze command implementation.

use crate::cli::AnalyzeArgs;
use crate::config::{apply_model_args, override_path};
use crate::error::Result;
use crate::output::Formatter;
use crate::progress::BarProgress;
use cleanser_domain::LlmProvider;
use cleanser_llm::{OllamaOptions, OllamaProvider};
use cleanser_pipeline::{Pipeline, PipelineConfig, PipelineContext, PromptTemplate, RunReport};
use std::sync::Arc;
use tracing::info;

/// Execute the analyze command.
pub async fn execute_analyze(
    args: AnalyzeArgs,
    mut config: PipelineConfig,
    formatter: &Formatter,
    show_progress: bool,
) -> Result<()> {
    override_path(&mut config.paths.input, args.input.as_ref());
    override_path(&mut config.paths.analyzed, args.output.as_ref());
    override_path(&mut config.paths.prompt, args.prompt.as_ref());
    apply_model_args(&mut config, &args.model);

    let report = analyze(config, show_progress).await?;
    println!("{}", formatter.format_report(&report)?);

    Ok(())
}

/// Run the pipeline against the configured Ollama model
pub(crate) async fn analyze(config: PipelineConfig, show_progress: bool) -> Result<RunReport> {
    config.validate()?;

    let provider = OllamaProvider::new(
        &config.ollama_endpoint,
        &config.model_name,
        OllamaOptions {
            temperature: config.temperature,
            timeout: config.request_timeout(),
        },
    )?;

    analyze_with(provider, config, show_progress).await
}

/// Run the pipeline with any provider
pub(crate) async fn analyze_with<L>(
    provider: L,
    config: PipelineConfig,
    show_progress: bool,
) -> Result<RunReport>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    let template = PromptTemplate::load(&config.paths.prompt)?;

    let ctx = if show_progress {
        PipelineContext::with_progress(Arc::new(BarProgress::new()))
    } else {
        PipelineContext::new()
    };

    info!(
        run_id = %ctx.run_id(),
        model = %config.model_name,
        chunk_size = config.chunk_size,
        "Starting contact analysis"
    );

    let mut pipeline = Pipeline::new(provider, config, template)?;
    Ok(pipeline.run(&ctx).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use cleanser_llm::MockProvider;
    use cleanser_pipeline::{PipelineError, DEFAULT_TEMPLATE_YAML};
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_analyze_with_mock_provider() {
        let dir = tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.paths.input = dir.path().join("contacts.csv");
        config.paths.analyzed = dir.path().join("analyzed.csv");
        config.paths.prompt = dir.path().join("analyze.yaml");
        fs::write(&config.paths.input, "name,organization,email\nA,B,a@b.com\n").unwrap();
        fs::write(&config.paths.prompt, DEFAULT_TEMPLATE_YAML).unwrap();

        let report = analyze_with(MockProvider::new("[]"), config.clone(), false)
            .await
            .unwrap();

        assert_eq!(report.rows_written, 1);
        assert!(config.paths.analyzed.exists());
    }

    #[tokio::test]
    async fn test_missing_template_is_fatal() {
        let dir = tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.paths.prompt = dir.path().join("missing.yaml");

        let result = analyze_with(MockProvider::new("[]"), config, false).await;
        assert!(matches!(result, Err(CliError::Pipeline(PipelineError::Template(_)))));
    }
}
