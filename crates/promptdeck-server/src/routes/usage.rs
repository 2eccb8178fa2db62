//! Usage Routes - Ledger queries

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use promptdeck::{StatusFilter, UsageFilter};

use super::{api_error, ApiError};
use crate::models::{UsageQuery, UsageRecordResponse};
use crate::AppState;

/// List usage records
///
/// GET /api/usage?search=summarize&status=error&limit=20
#[utoipa::path(
    get,
    path = "/api/usage",
    params(UsageQuery),
    responses(
        (status = 200, description = "Matching records, most recent first", body = Vec<UsageRecordResponse>),
        (status = 400, description = "Invalid status filter")
    ),
    tag = "Usage"
)]
pub async fn list_usage(
    State(state): State<AppState>,
    Query(query): Query<UsageQuery>,
) -> Result<Json<Vec<UsageRecordResponse>>, ApiError> {
    let status: StatusFilter = query
        .status
        .as_deref()
        .map(|s| s.parse())
        .transpose()
        .map_err(|e: String| (StatusCode::BAD_REQUEST, e))?
        .unwrap_or_default();

    let filter = UsageFilter {
        search: query.search,
        status,
    };

    let records = state
        .usage_service
        .list(&filter, query.limit)
        .await
        .map_err(api_error)?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/usage", get(list_usage))
}
