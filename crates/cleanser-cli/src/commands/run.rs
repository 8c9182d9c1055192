//! Run command implementation: analyze, then clean.

use crate::cli::RunArgs;
use crate::commands::analyze::analyze;
use crate::commands::clean::clean;
use crate::config::{apply_model_args, override_path};
use crate::error::Result;
use crate::output::Formatter;
use cleanser_pipeline::PipelineConfig;

/// Execute the run command.
pub async fn execute_run(
    args: RunArgs,
    mut config: PipelineConfig,
    formatter: &Formatter,
    show_progress: bool,
) -> Result<()> {
    override_path(&mut config.paths.input, args.input.as_ref());
    override_path(&mut config.paths.analyzed, args.analyzed.as_ref());
    override_path(&mut config.paths.cleaned, args.cleaned.as_ref());
    override_path(&mut config.paths.prompt, args.prompt.as_ref());
    apply_model_args(&mut config, &args.model);

    let report = analyze(config.clone(), show_progress).await?;
    println!("{}", formatter.format_report(&report)?);

    let summary = clean(&config)?;
    println!("{}", formatter.format_cleanup(&summary)?);

    Ok(())
}
