//! Execute Routes - Model invocation
//!
//! Executor failures come back as 200 with a failed usage record.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::application::PromptSource;
use promptdeck::TemplateAddress;

use super::{api_error, ApiError};
use crate::models::{ExecuteRequest, ExecuteResponse};
use crate::AppState;

/// Execute a template or ad-hoc prompt
#[utoipa::path(
    post,
    path = "/api/execute",
    request_body = ExecuteRequest,
    responses(
        (status = 200, description = "Call recorded (check record.success)", body = ExecuteResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Template not found")
    ),
    tag = "Execute"
)]
pub async fn execute(
    State(state): State<AppState>,
    Json(payload): Json<ExecuteRequest>,
) -> Result<Json<ExecuteResponse>, ApiError> {
    let source = match (payload.template, payload.prompt) {
        (Some(reference), None) => {
            let address: TemplateAddress = reference.parse().map_err(api_error)?;
            PromptSource::Template {
                category: address.category().to_string(),
                name: address.name().to_string(),
            }
        }
        (None, Some(text)) => PromptSource::Text(text),
        _ => {
            return Err((
                StatusCode::BAD_REQUEST,
                "Exactly one of 'template' or 'prompt' is required".to_string(),
            ))
        }
    };

    let execution = state
        .execution_service
        .execute(source, payload.model, &payload.variables)
        .await
        .map_err(api_error)?;

    Ok(Json(ExecuteResponse {
        record: execution.record.into(),
        response: execution.response,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/execute", post(execute))
}
