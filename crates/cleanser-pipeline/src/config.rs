//! Configuration for the pipeline

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// File locations used by a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Input contacts CSV
    pub input: PathBuf,

    /// Analyzed output CSV (all rows plus verdicts)
    pub analyzed: PathBuf,

    /// Cleaned output CSV (genuine rows only)
    pub cleaned: PathBuf,

    /// Log file
    pub log: PathBuf,

    /// Prompt template document
    pub prompt: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("input/contacts.csv"),
            analyzed: PathBuf::from("output/analyzed_contacts.csv"),
            cleaned: PathBuf::from("output/cleaned_contacts.csv"),
            log: PathBuf::from("output/processing.log"),
            prompt: PathBuf::from("prompts/analyze.yaml"),
        }
    }
}

/// Configuration for a pipeline run
///
/// Every field has a default, so a TOML file only needs the keys it changes.
///
/// # Examples
///
/// ```
/// use cleanser_pipeline::PipelineConfig;
///
/// let config = PipelineConfig::from_toml("chunk_size = 25").unwrap();
/// assert_eq!(config.chunk_size, 25);
/// assert_eq!(config.model_name, "llama3.2");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Records per model request
    pub chunk_size: usize,

    /// Model identifier passed to the provider
    pub model_name: String,

    /// Requested determinism, passed opaquely to the provider
    pub temperature: f64,

    /// Ollama API endpoint
    pub ollama_endpoint: String,

    /// Client-side timeout for one model call; unset waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// File locations
    pub paths: PathsConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            model_name: "llama3.2".to_string(),
            temperature: 0.0,
            ollama_endpoint: DEFAULT_OLLAMA_ENDPOINT.to_string(),
            request_timeout_secs: None,
            paths: PathsConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Model call timeout as a Duration, if configured
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.chunk_size == 0 {
            return Err(PipelineError::Config(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.model_name.trim().is_empty() {
            return Err(PipelineError::Config(
                "model_name must not be empty".to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(PipelineError::Config(format!(
                "temperature {} out of range [0.0, 2.0]",
                self.temperature
            )));
        }
        if self.request_timeout_secs == Some(0) {
            return Err(PipelineError::Config(
                "request_timeout_secs must be greater than 0 when set".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, PipelineError> {
        toml::from_str(toml_str)
            .map_err(|e| PipelineError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, PipelineError> {
        toml::to_string_pretty(self)
            .map_err(|e| PipelineError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut config = PipelineConfig::default();
        config.chunk_size = 0;
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_negative_chunk_size_rejected_at_parse() {
        assert!(PipelineConfig::from_toml("chunk_size = -3").is_err());
    }

    #[test]
    fn test_temperature_range() {
        let mut config = PipelineConfig::default();
        config.temperature = 2.5;
        assert!(config.validate().is_err());

        config.temperature = 0.7;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut config = PipelineConfig::default();
        config.request_timeout_secs = Some(0);
        assert!(config.validate().is_err());

        config.request_timeout_secs = Some(90);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml(
            r#"
            model_name = "mistral"

            [paths]
            input = "data/people.csv"
            "#,
        )
        .unwrap();

        assert_eq!(config.model_name, "mistral");
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.paths.input, PathBuf::from("data/people.csv"));
        assert_eq!(
            config.paths.analyzed,
            PathBuf::from("output/analyzed_contacts.csv")
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = PipelineConfig::default();
        config.request_timeout_secs = Some(30);
        let toml_str = config.to_toml().unwrap();
        let parsed = PipelineConfig::from_toml(&toml_str).unwrap();

        assert_eq!(config, parsed);
    }
}
