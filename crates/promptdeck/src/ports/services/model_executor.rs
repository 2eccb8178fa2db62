//! Model Executor Port
//!
//! Abstract interface for hosted model invocations. The providers behind it
//! are opaque to the core: an executor turns rendered prompt text and a
//! model identifier into response text plus token and cost accounting.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Result of a successful model call
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionOutput {
    /// Generated text
    pub response: String,
    /// Total tokens billed (prompt + completion)
    pub tokens: u64,
    /// Cost in USD
    pub cost: f64,
}

/// Model executor interface
///
/// Errors returned here are not propagated to API callers; the execution
/// service records them as failed usage records.
///
/// # Example
///
/// ```rust,ignore
/// use promptdeck::ports::ModelExecutor;
///
/// struct OpenAiExecutor { /* ... */ }
///
/// #[async_trait]
/// impl ModelExecutor for OpenAiExecutor {
///     async fn execute(&self, prompt: &str, model: &str)
///         -> Result<ExecutionOutput, DomainError> {
///         // Call the provider API
///     }
///     fn executor_name(&self) -> &str { "openai" }
/// }
/// ```
#[async_trait]
pub trait ModelExecutor: Send + Sync {
    /// Run `prompt` against `model`
    async fn execute(&self, prompt: &str, model: &str) -> Result<ExecutionOutput, DomainError>;

    /// Name used in logs (e.g., "stub", "openai")
    fn executor_name(&self) -> &str;

    /// Estimate token count for text
    fn estimate_tokens(&self, text: &str) -> u64 {
        // Rough estimate: ~4 chars per token
        (text.len() / 4) as u64
    }
}
