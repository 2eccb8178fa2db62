//! Analytics Routes - Ledger summary

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};

use super::{api_error, ApiError};
use crate::models::{AnalyticsQuery, AnalyticsResponse};
use crate::AppState;

/// Get analytics snapshot
#[utoipa::path(
    get,
    path = "/api/analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Snapshot over the current ledger", body = AnalyticsResponse),
        (status = 400, description = "window_days out of range")
    ),
    tag = "Analytics"
)]
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, ApiError> {
    let snapshot = state
        .usage_service
        .analytics(query.window_days)
        .await
        .map_err(api_error)?;
    Ok(Json(snapshot.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/analytics", get(get_analytics))
}
