//! Init command implementation.

use crate::cli::InitArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use cleanser_pipeline::{PipelineConfig, PromptTemplate, DEFAULT_TEMPLATE_YAML};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// What `init` changed on disk
#[derive(Debug, Default, PartialEq)]
pub struct InitSummary {
    /// Directories that did not exist before
    pub created_dirs: Vec<PathBuf>,

    /// Whether the prompt template was written
    pub template_written: bool,

    /// Configuration file written, if requested
    pub config_written: Option<PathBuf>,
}

/// Execute the init command.
pub fn execute_init(args: InitArgs, config: PipelineConfig, formatter: &Formatter) -> Result<()> {
    let summary = init(&args, &config)?;

    for dir in &summary.created_dirs {
        println!("{}", formatter.success(&format!("Created {}", dir.display())));
    }
    if summary.template_written {
        println!(
            "{}",
            formatter.success(&format!("Wrote prompt template {}", config.paths.prompt.display()))
        );
    } else {
        println!(
            "{}",
            formatter.info(&format!(
                "Kept existing prompt template {} (use --force to overwrite)",
                config.paths.prompt.display()
            ))
        );
    }
    if let Some(path) = &summary.config_written {
        println!("{}", formatter.success(&format!("Wrote configuration {}", path.display())));
    }

    Ok(())
}

/// Create working directories and the default prompt template
pub(crate) fn init(args: &InitArgs, config: &PipelineConfig) -> Result<InitSummary> {
    let mut summary = InitSummary::default();

    let paths = &config.paths;
    let dirs: BTreeSet<&Path> = [
        &paths.input,
        &paths.analyzed,
        &paths.cleaned,
        &paths.log,
        &paths.prompt,
    ]
    .into_iter()
    .filter_map(|p| p.parent())
    .filter(|p| !p.as_os_str().is_empty())
    .collect();

    for dir in dirs {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            info!("Created directory {}", dir.display());
            summary.created_dirs.push(dir.to_path_buf());
        }
    }

    if args.force || !paths.prompt.exists() {
        fs::write(&paths.prompt, default_template_for(&paths.prompt)?)?;
        summary.template_written = true;
    }

    if let Some(path) = &args.write_config {
        if path.exists() && !args.force {
            return Err(CliError::Config(format!(
                "{} already exists (use --force to overwrite)",
                path.display()
            )));
        }
        fs::write(path, config.to_toml()?)?;
        summary.config_written = Some(path.clone());
    }

    Ok(summary)
}

fn default_template_for(path: &Path) -> Result<String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("toml") => Ok(PromptTemplate::from_yaml(DEFAULT_TEMPLATE_YAML)?.to_toml()?),
        _ => Ok(DEFAULT_TEMPLATE_YAML.to_string()),
    }
}
