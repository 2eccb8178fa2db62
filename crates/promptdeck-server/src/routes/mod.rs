//! PromptDeck API Routes
//!
//! - /api/templates - Prompt library
//! - /api/templates/:category/:name/render - Template preview
//! - /api/usage - Usage ledger
//! - /api/analytics - Ledger summary
//! - /api/execute - Model invocation
//! - /api/config - Dashboard settings and secrets

pub mod analytics;
pub mod config;
pub mod execute;
pub mod swagger;
pub mod template;
pub mod usage;

use axum::http::StatusCode;

use promptdeck::DomainError;

/// Error half of every handler result
pub type ApiError = (StatusCode, String);

/// Map a domain failure onto an HTTP status
pub fn api_error(err: DomainError) -> ApiError {
    let status = match &err {
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        DomainError::ExternalService(_) => StatusCode::BAD_GATEWAY,
    };
    if status.is_server_error() {
        tracing::error!("Request failed: {}", err);
    }
    (status, err.to_string())
}
