//! Analytics DTOs

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use promptdeck::AnalyticsSnapshot;

/// Query parameters for analytics
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct AnalyticsQuery {
    /// Trailing window in days (default: 7, range: 1-365)
    pub window_days: Option<u32>,
}

/// Ledger summary, recomputed on every request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyticsResponse {
    pub total_calls: u64,
    pub total_tokens: u64,
    /// USD
    pub total_cost: f64,
    /// Rounded percentage of successful calls
    pub success_rate: u32,
    pub avg_duration_ms: u64,
    /// Calls per model
    pub model_usage: BTreeMap<String, u64>,
    /// Calls per UTC day, oldest first, ending today
    pub calls_per_day: Vec<u64>,
    pub window_start: NaiveDate,
}

impl From<AnalyticsSnapshot> for AnalyticsResponse {
    fn from(snapshot: AnalyticsSnapshot) -> Self {
        Self {
            total_calls: snapshot.total_calls,
            total_tokens: snapshot.total_tokens,
            total_cost: snapshot.total_cost,
            success_rate: snapshot.success_rate,
            avg_duration_ms: snapshot.avg_duration_ms,
            model_usage: snapshot.model_usage,
            calls_per_day: snapshot.calls_per_day,
            window_start: snapshot.window_start,
        }
    }
}
