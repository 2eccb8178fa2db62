//! Stub Model Executor
//!
//! Stands in for hosted providers. Produces a canned response, estimates
//! tokens from text length and prices them from a per-model rate table.

use std::time::Duration;

use async_trait::async_trait;

use promptdeck::{DomainError, ExecutionOutput, ModelExecutor};

/// USD per 1K tokens
const RATES_PER_1K: &[(&str, f64)] = &[
    ("gpt-4o", 0.005),
    ("gpt-4o-mini", 0.00015),
    ("claude-3-5-sonnet", 0.003),
    ("claude-3-haiku", 0.00025),
    ("gemini-1.5-pro", 0.00125),
    ("gemini-1.5-flash", 0.000075),
];

/// Rate for models missing from the table
const FALLBACK_RATE_PER_1K: f64 = 0.001;

/// Price per 1K tokens for `model`
pub fn rate_per_1k(model: &str) -> f64 {
    RATES_PER_1K
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, rate)| *rate)
        .unwrap_or(FALLBACK_RATE_PER_1K)
}

/// Executor that never leaves the process
#[derive(Debug, Clone, Default)]
pub struct StubExecutor {
    delay: Option<Duration>,
}

impl StubExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated provider latency
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ModelExecutor for StubExecutor {
    async fn execute(&self, prompt: &str, model: &str) -> Result<ExecutionOutput, DomainError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let response = format!(
            "[{}] Mock response to a {}-character prompt.",
            model,
            prompt.chars().count()
        );
        let tokens = self.estimate_tokens(prompt) + self.estimate_tokens(&response);
        let cost = tokens as f64 / 1000.0 * rate_per_1k(model);

        tracing::debug!("Stub executor: model={} tokens={}", model, tokens);

        Ok(ExecutionOutput {
            response,
            tokens,
            cost,
        })
    }

    fn executor_name(&self) -> &str {
        "stub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_table_and_fallback() {
        assert_eq!(rate_per_1k("gpt-4o"), 0.005);
        assert_eq!(rate_per_1k("gpt-4o-mini"), 0.00015);
        assert_eq!(rate_per_1k("some-new-model"), FALLBACK_RATE_PER_1K);
    }

    #[tokio::test]
    async fn test_stub_prices_estimated_tokens() {
        let executor = StubExecutor::new();
        let prompt = "x".repeat(4000);

        let output = executor.execute(&prompt, "gpt-4o").await.unwrap();

        assert!(output.response.starts_with("[gpt-4o]"));
        assert!(output.tokens >= 1000);
        let expected = output.tokens as f64 / 1000.0 * 0.005;
        assert!((output.cost - expected).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_empty_prompt_still_succeeds() {
        let output = StubExecutor::new().execute("", "unknown").await.unwrap();
        assert!(!output.response.is_empty());
    }
}
