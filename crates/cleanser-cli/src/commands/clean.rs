//! Clean command implementation.

use crate::cli::CleanArgs;
use crate::config::override_path;
use crate::error::Result;
use crate::output::Formatter;
use cleanser_pipeline::PipelineConfig;
use cleanser_store::{extract_real_contacts, CleanupSummary};
use tracing::info;

/// Execute the clean command.
pub fn execute_clean(
    args: CleanArgs,
    mut config: PipelineConfig,
    formatter: &Formatter,
) -> Result<()> {
    override_path(&mut config.paths.analyzed, args.input.as_ref());
    override_path(&mut config.paths.cleaned, args.output.as_ref());

    let summary = clean(&config)?;
    println!("{}", formatter.format_cleanup(&summary)?);

    Ok(())
}

/// Filter the analyzed file down to genuine contacts
pub(crate) fn clean(config: &PipelineConfig) -> Result<CleanupSummary> {
    info!("Starting contact cleaning");
    let summary = extract_real_contacts(&config.paths.analyzed, &config.paths.cleaned)?;
    info!(
        "Cleaning complete. Clean contacts saved to {}",
        config.paths.cleaned.display()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use cleanser_store::StoreError;
    use tempfile::tempdir;

    #[test]
    fn test_missing_analyzed_file() {
        let dir = tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.paths.analyzed = dir.path().join("absent.csv");
        config.paths.cleaned = dir.path().join("cleaned.csv");

        assert!(matches!(clean(&config), Err(CliError::Store(StoreError::NotFound(_)))));
    }
}
