//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//!
//! # Features
//!
//! - HTTP communication with the `/api/generate` endpoint
//! - Configurable endpoint, model and temperature
//! - Optional client-side timeout (none by default)
//!
//! A request is attempted exactly once. A failed call surfaces as an
//! [`LlmError`] and it is up to the caller to decide what that means for the
//! batch it belongs to.
//!
//! # Examples
//!
//! ```no_run
//! use cleanser_llm::{OllamaOptions, OllamaProvider};
//!
//! let provider = OllamaProvider::new(
//!     "http://localhost:11434",
//!     "llama3.2",
//!     OllamaOptions::default(),
//! ).unwrap();
//! ```

use crate::LlmError;
use cleanser_domain::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request tuning passed through to Ollama
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OllamaOptions {
    /// Sampling temperature; 0.0 asks for the most deterministic output
    pub temperature: f64,

    /// Client-side timeout; `None` waits for as long as the model takes
    pub timeout: Option<Duration>,
}

/// Ollama API provider for local LLM inference
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    options: OllamaOptions,
    client: reqwest::Client,
}

/// Request body for Ollama generate API
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f64,
}

/// Response from Ollama generate API
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
    #[allow(dead_code)]
    done: bool,
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.2")
    /// - `options`: temperature and timeout
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Other`] if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        options: OllamaOptions,
    ) -> Result<Self, LlmError> {
        // The blocking path runs each call on its own runtime; pooled
        // connections would be bound to a runtime that is already gone.
        let mut builder = reqwest::Client::builder().pool_max_idle_per_host(0);
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            model: model.into(),
            options,
            client,
        })
    }

    /// Model this provider targets
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text using Ollama API
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running or the request fails ([`LlmError::Communication`])
    /// - Model is not available ([`LlmError::ModelNotAvailable`])
    /// - Response body is not the expected JSON ([`LlmError::InvalidResponse`])
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/generate", self.endpoint);

        let request_body = OllamaGenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.options.temperature,
            },
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Calling Ollama");

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body = response
            .json::<OllamaGenerateResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.response)
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    /// Blocking wrapper around [`OllamaProvider::generate`]
    ///
    /// Must not be called from inside an async task; use
    /// `tokio::task::spawn_blocking` when driving it from async code.
    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?;

        runtime.block_on(OllamaProvider::generate(self, prompt))
    }
}
