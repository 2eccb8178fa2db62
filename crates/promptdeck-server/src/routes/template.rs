//! Template Routes - Prompt Library
//!
//! HTTP handlers that delegate to TemplateService for business logic.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use super::{api_error, ApiError};
use crate::models::{
    PutTemplateRequest, RenderTemplateRequest, RenderTemplateResponse, TemplateResponse,
    TemplateSummaryResponse,
};
use crate::AppState;

/// List all templates
#[utoipa::path(
    get,
    path = "/api/templates",
    responses(
        (status = 200, description = "Templates sorted by category then name", body = Vec<TemplateSummaryResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Template"
)]
pub async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<TemplateSummaryResponse>>, ApiError> {
    let summaries = state.template_service.list().await.map_err(api_error)?;
    Ok(Json(summaries.into_iter().map(Into::into).collect()))
}

/// Get template by address
#[utoipa::path(
    get,
    path = "/api/templates/{category}/{name}",
    params(
        ("category" = String, Path, description = "Template category"),
        ("name" = String, Path, description = "Template name")
    ),
    responses(
        (status = 200, description = "Template found", body = TemplateResponse),
        (status = 400, description = "Invalid address"),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn get_template(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let template = state
        .template_service
        .get(&category, &name)
        .await
        .map_err(api_error)?;
    Ok(Json(template.into()))
}

/// Create or overwrite template
#[utoipa::path(
    put,
    path = "/api/templates/{category}/{name}",
    params(
        ("category" = String, Path, description = "Template category"),
        ("name" = String, Path, description = "Template name")
    ),
    request_body = PutTemplateRequest,
    responses(
        (status = 200, description = "Template saved", body = TemplateResponse),
        (status = 400, description = "Invalid address"),
        (status = 500, description = "Persistence failure")
    ),
    tag = "Template"
)]
pub async fn put_template(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
    Json(payload): Json<PutTemplateRequest>,
) -> Result<Json<TemplateResponse>, ApiError> {
    let template = state
        .template_service
        .put(&category, &name, payload.content)
        .await
        .map_err(api_error)?;
    Ok(Json(template.into()))
}

/// Delete template
#[utoipa::path(
    delete,
    path = "/api/templates/{category}/{name}",
    params(
        ("category" = String, Path, description = "Template category"),
        ("name" = String, Path, description = "Template name")
    ),
    responses(
        (status = 200, description = "Template deleted"),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn delete_template(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .template_service
        .delete(&category, &name)
        .await
        .map_err(api_error)?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "Template deleted"
    })))
}

/// Render template with variables
#[utoipa::path(
    post,
    path = "/api/templates/{category}/{name}/render",
    params(
        ("category" = String, Path, description = "Template category"),
        ("name" = String, Path, description = "Template name")
    ),
    request_body = RenderTemplateRequest,
    responses(
        (status = 200, description = "Rendered text", body = RenderTemplateResponse),
        (status = 404, description = "Template not found")
    ),
    tag = "Template"
)]
pub async fn render_template(
    State(state): State<AppState>,
    Path((category, name)): Path<(String, String)>,
    Json(payload): Json<RenderTemplateRequest>,
) -> Result<Json<RenderTemplateResponse>, ApiError> {
    let result = state
        .template_service
        .render(&category, &name, &payload.variables)
        .await
        .map_err(api_error)?;
    Ok(Json(result.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/templates", get(list_templates))
        .route(
            "/api/templates/:category/:name",
            get(get_template).put(put_template).delete(delete_template),
        )
        .route(
            "/api/templates/:category/:name/render",
            post(render_template),
        )
}
