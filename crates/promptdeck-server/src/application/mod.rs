//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and the model executor.

mod config_service;
mod execution_service;
mod template_service;
mod usage_service;

pub use config_service::ConfigService;
pub use execution_service::{Execution, ExecutionService, PromptSource};
pub use template_service::{RenderedTemplate, TemplateService};
pub use usage_service::UsageService;

use std::future::Future;

use promptdeck::DomainError;

/// Run a read, retrying once if the backing store reported an I/O failure
pub(crate) async fn retry_read<T, F, Fut>(operation: &str, mut read: F) -> Result<T, DomainError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DomainError>>,
{
    match read().await {
        Err(e) if e.is_io() => {
            tracing::warn!("{} failed, retrying once: {}", operation, e);
            read().await
        }
        other => other,
    }
}
