//! Execute DTOs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UsageRecordResponse;

/// Execute request. Exactly one of `template` or `prompt` must be set.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ExecuteRequest {
    /// Stored template address, "category/name"
    pub template: Option<String>,
    /// Ad-hoc prompt text
    pub prompt: Option<String>,
    /// Model identifier (default: ui.default_model)
    pub model: Option<String>,
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// Execute response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ExecuteResponse {
    /// The usage record written for this call
    pub record: UsageRecordResponse,
    /// Model output, absent when the call failed
    pub response: Option<String>,
}
