//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (cleanser-llm). The call is
/// synchronous and may take seconds; callers must not assume the returned
/// text conforms to any schema.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for a single request payload
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;
}
