//! Config Routes - Dashboard settings

use axum::{extract::State, routing::get, Json, Router};

use super::{api_error, ApiError};
use crate::models::ConfigResponse;
use crate::AppState;

/// Read config (secrets masked)
#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "Current settings", body = ConfigResponse)
    ),
    tag = "Config"
)]
pub async fn get_config(State(state): State<AppState>) -> Result<Json<ConfigResponse>, ApiError> {
    let config = state.config_service.read().await.map_err(api_error)?;
    Ok(Json(config.into()))
}

/// Merge a partial config
///
/// Send `"configured"` for a secret to keep it, `""` to remove it.
#[utoipa::path(
    put,
    path = "/api/config",
    request_body(content = Object, description = "Partial settings tree"),
    responses(
        (status = 200, description = "Merged settings", body = ConfigResponse),
        (status = 400, description = "Unknown branch, key or type")
    ),
    tag = "Config"
)]
pub async fn update_config(
    State(state): State<AppState>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<ConfigResponse>, ApiError> {
    let config = state.config_service.write(&patch).await.map_err(api_error)?;
    Ok(Json(config.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/config", get(get_config).put(update_config))
}
