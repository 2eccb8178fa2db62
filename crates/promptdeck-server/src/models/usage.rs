//! Usage Ledger DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use promptdeck::UsageRecord;

/// Query parameters for usage listing
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct UsageQuery {
    /// Case-insensitive match against prompt reference, model and input
    pub search: Option<String>,
    /// all | success | error (default: all)
    pub status: Option<String>,
    /// Maximum records (default: 50, max: 1000)
    pub limit: Option<usize>,
}

/// Usage record
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UsageRecordResponse {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub prompt_ref: Option<String>,
    pub tokens: u64,
    /// USD
    pub cost: f64,
    pub duration_ms: u64,
    pub success: bool,
    pub error: Option<String>,
    pub input: Option<String>,
    pub response: Option<String>,
}

impl From<UsageRecord> for UsageRecordResponse {
    fn from(record: UsageRecord) -> Self {
        Self {
            id: record.id,
            timestamp: record.timestamp,
            model: record.model,
            prompt_ref: record.prompt_ref,
            tokens: record.tokens,
            cost: record.cost,
            duration_ms: record.duration_ms,
            success: record.success,
            error: record.error,
            input: record.input,
            response: record.response,
        }
    }
}
