//! Execution Application Service (Use Case)
//!
//! Resolves and renders a prompt, runs it through the model executor under a
//! deadline, and records the outcome in the usage ledger. Executor failures
//! and timeouts become failed usage records; they are never returned as errors.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use promptdeck::{
    render, ConfigRepository, DomainError, ModelExecutor, TemplateRepository, UsageLedger,
    UsageRecord, TIMEOUT_ERROR,
};

use super::{ConfigService, TemplateService, UsageService};

/// What to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    /// A stored template, by address
    Template { category: String, name: String },
    /// Ad-hoc prompt text
    Text(String),
}

/// Outcome of one execution
#[derive(Debug, Clone)]
pub struct Execution {
    pub record: UsageRecord,
    /// Model output; `None` when the call failed
    pub response: Option<String>,
}

/// Application service for model execution
pub struct ExecutionService {
    templates: Arc<TemplateService<dyn TemplateRepository>>,
    usage: Arc<UsageService<dyn UsageLedger>>,
    config: Arc<ConfigService<dyn ConfigRepository>>,
    executor: Arc<dyn ModelExecutor>,
    timeout: Duration,
}

impl ExecutionService {
    pub fn new(
        templates: Arc<TemplateService<dyn TemplateRepository>>,
        usage: Arc<UsageService<dyn UsageLedger>>,
        config: Arc<ConfigService<dyn ConfigRepository>>,
        executor: Arc<dyn ModelExecutor>,
        timeout: Duration,
    ) -> Self {
        Self {
            templates,
            usage,
            config,
            executor,
            timeout,
        }
    }

    /// Execute `source` against `model` (or the configured default model)
    pub async fn execute(
        &self,
        source: PromptSource,
        model: Option<String>,
        variables: &HashMap<String, String>,
    ) -> Result<Execution, DomainError> {
        let config = self.config.raw().await?;
        let model = model
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| config.ui.default_model.clone());
        if model.trim().is_empty() {
            return Err(DomainError::Validation(
                "No model given and no default model configured".to_string(),
            ));
        }

        let (prompt_ref, content) = match source {
            PromptSource::Template { category, name } => {
                let template = self.templates.get(&category, &name).await?;
                (Some(template.address.to_string()), template.content)
            }
            PromptSource::Text(text) => {
                if text.trim().is_empty() {
                    return Err(DomainError::Validation(
                        "Prompt text must not be empty".to_string(),
                    ));
                }
                (None, text)
            }
        };
        let prompt = render(&content, variables);

        let started = Instant::now();
        let outcome = tokio::time::timeout(self.timeout, self.executor.execute(&prompt, &model)).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let (record, response) = match outcome {
            Ok(Ok(output)) => {
                let record = UsageRecord::succeeded(
                    &model,
                    prompt_ref,
                    output.tokens,
                    output.cost,
                    duration_ms,
                )
                .with_payload(Some(prompt), Some(output.response.clone()));
                (record, Some(output.response))
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    "Executor '{}' failed for model {}: {}",
                    self.executor.executor_name(),
                    model,
                    e
                );
                let record = UsageRecord::failed(&model, prompt_ref, e.to_string(), duration_ms)
                    .with_payload(Some(prompt), None);
                (record, None)
            }
            Err(_) => {
                tracing::warn!(
                    "Executor '{}' timed out after {:?} for model {}",
                    self.executor.executor_name(),
                    self.timeout,
                    model
                );
                let record = UsageRecord::failed(&model, prompt_ref, TIMEOUT_ERROR, duration_ms)
                    .with_payload(Some(prompt), None);
                (record, None)
            }
        };

        let record = if config.logging.save_responses {
            record
        } else {
            record.without_payload()
        };
        let record = self.usage.record(record).await?;

        Ok(Execution { record, response })
    }
}
