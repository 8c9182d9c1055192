//! Configuration loading and merging for the CLI.
//!
//! Precedence, lowest first: built-in defaults, the TOML file, then
//! environment variables and command-line flags (clap resolves those two,
//! flags winning).

use crate::cli::ModelArgs;
use crate::error::{CliError, Result};
use cleanser_pipeline::PipelineConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "cleanser.toml";

/// Load the base configuration
///
/// An explicit path must exist. Without one, `cleanser.toml` in the working
/// directory is used if present, otherwise the built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> Result<PipelineConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(CliError::Config(format!(
                    "config file {} not found",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => {
            let candidate = PathBuf::from(DEFAULT_CONFIG_FILE);
            candidate.exists().then_some(candidate)
        }
    };

    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Ok(PipelineConfig::from_file(&path)?)
        }
        None => Ok(PipelineConfig::default()),
    }
}

/// Apply model/batching overrides from flags or environment
pub fn apply_model_args(config: &mut PipelineConfig, args: &ModelArgs) {
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if let Some(model) = &args.model {
        config.model_name = model.clone();
    }
    if let Some(temperature) = args.temperature {
        config.temperature = temperature;
    }
    if let Some(endpoint) = &args.endpoint {
        config.ollama_endpoint = endpoint.clone();
    }
    if let Some(timeout) = args.timeout {
        config.request_timeout_secs = Some(timeout);
    }
}

/// Replace `target` when an override is given
pub fn override_path(target: &mut PathBuf, value: Option<&PathBuf>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}
