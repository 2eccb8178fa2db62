//! UsageRecord - Outcome of a single model invocation
//!
//! Pure domain entity without infrastructure dependencies.
//! Records are immutable once appended to the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::value_objects::StatusFilter;

/// Error text recorded when the executor exceeds its deadline
pub const TIMEOUT_ERROR: &str = "timeout";

/// UsageRecord - Ledger entry for one model call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_ref: Option<String>,
    #[serde(default)]
    pub tokens: u64,
    /// Cost in USD
    #[serde(default)]
    pub cost: f64,
    #[serde(default)]
    pub duration_ms: u64,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

impl UsageRecord {
    /// Record a completed call
    pub fn succeeded(
        model: impl Into<String>,
        prompt_ref: Option<String>,
        tokens: u64,
        cost: f64,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            model: model.into(),
            prompt_ref,
            tokens,
            cost: cost.max(0.0),
            duration_ms,
            success: true,
            error: None,
            input: None,
            response: None,
        }
    }

    /// Record a failed call. An empty message is replaced so the
    /// failure always carries an error.
    pub fn failed(
        model: impl Into<String>,
        prompt_ref: Option<String>,
        error: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        let error = error.into();
        let error = if error.trim().is_empty() {
            "unknown error".to_string()
        } else {
            error
        };

        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            model: model.into(),
            prompt_ref,
            tokens: 0,
            cost: 0.0,
            duration_ms,
            success: false,
            error: Some(error),
            input: None,
            response: None,
        }
    }

    /// Override the call time (imports, backfills)
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Attach raw input and response payloads
    pub fn with_payload(mut self, input: Option<String>, response: Option<String>) -> Self {
        self.input = input;
        self.response = response;
        self
    }

    /// Drop raw payloads (response retention disabled)
    pub fn without_payload(mut self) -> Self {
        self.input = None;
        self.response = None;
        self
    }

    /// Check the success/error invariant and numeric ranges
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.model.trim().is_empty() {
            return Err(DomainError::Validation(
                "Usage record model must not be empty".to_string(),
            ));
        }
        if !self.cost.is_finite() || self.cost < 0.0 {
            return Err(DomainError::Validation(format!(
                "Usage record cost must be a non-negative amount: {}",
                self.cost
            )));
        }
        match (self.success, self.error.as_deref()) {
            (true, Some(_)) => Err(DomainError::Validation(
                "Successful usage record must not carry an error".to_string(),
            )),
            (false, None) => Err(DomainError::Validation(
                "Failed usage record must carry an error".to_string(),
            )),
            (false, Some(e)) if e.trim().is_empty() => Err(DomainError::Validation(
                "Failed usage record must carry an error".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Filter for ledger queries
#[derive(Debug, Default, Clone)]
pub struct UsageFilter {
    /// Case-insensitive match against prompt_ref, model and input
    pub search: Option<String>,
    pub status: StatusFilter,
}

impl UsageFilter {
    pub fn matches(&self, record: &UsageRecord) -> bool {
        if !self.status.accepts(record.success) {
            return false;
        }

        let term = match self.search.as_deref().map(str::trim) {
            Some(t) if !t.is_empty() => t.to_lowercase(),
            _ => return true,
        };

        [
            record.prompt_ref.as_deref(),
            Some(record.model.as_str()),
            record.input.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
    }

    /// Select matching records most-recent-first, bounded by `limit`.
    ///
    /// `records` must be in insertion order; equal timestamps resolve to the
    /// later insertion first.
    pub fn apply(&self, records: &[UsageRecord], limit: usize) -> Vec<UsageRecord> {
        let mut matched: Vec<(usize, &UsageRecord)> = records
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .collect();

        matched.sort_by(|(ia, a), (ib, b)| b.timestamp.cmp(&a.timestamp).then(ib.cmp(ia)));

        matched
            .into_iter()
            .take(limit)
            .map(|(_, r)| r.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ledger() -> Vec<UsageRecord> {
        let base = Utc::now();
        vec![
            UsageRecord::succeeded("gpt-4o", Some("examples/summarize".into()), 120, 0.01, 800)
                .at(base - Duration::minutes(30))
                .with_payload(Some("Summarize the quarterly report".into()), None),
            UsageRecord::failed("claude-3-haiku", Some("custom/translate".into()), "rate limited", 40)
                .at(base - Duration::minutes(20)),
            UsageRecord::succeeded("claude-3-haiku", None, 60, 0.002, 300)
                .at(base - Duration::minutes(10)),
            UsageRecord::failed("gpt-4o", None, TIMEOUT_ERROR, 30_000).at(base),
        ]
    }

    #[test]
    fn test_failed_record_always_has_error() {
        let record = UsageRecord::failed("m", None, "  ", 0);
        assert!(!record.success);
        assert_eq!(record.error.as_deref(), Some("unknown error"));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_inconsistent_outcome() {
        let mut record = UsageRecord::succeeded("m", None, 1, 0.0, 1);
        record.error = Some("boom".into());
        assert!(record.validate().is_err());

        let mut record = UsageRecord::failed("m", None, "boom", 1);
        record.error = None;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_error_filter_excludes_successes_and_honors_limit() {
        let filter = UsageFilter {
            search: None,
            status: StatusFilter::Error,
        };
        let records = ledger();

        let all_errors = filter.apply(&records, 10);
        assert_eq!(all_errors.len(), 2);
        assert!(all_errors.iter().all(|r| !r.success));

        let limited = filter.apply(&records, 1);
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].error.as_deref(), Some(TIMEOUT_ERROR));
    }

    #[test]
    fn test_results_are_most_recent_first() {
        let records = ledger();
        let result = UsageFilter::default().apply(&records, 10);
        assert_eq!(result.len(), 4);
        for pair in result.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
    }

    #[test]
    fn test_equal_timestamps_prefer_later_insertion() {
        let now = Utc::now();
        let first = UsageRecord::succeeded("a", None, 1, 0.0, 1).at(now);
        let second = UsageRecord::succeeded("b", None, 1, 0.0, 1).at(now);
        let records = vec![first, second.clone()];

        let result = UsageFilter::default().apply(&records, 1);
        assert_eq!(result[0].id, second.id);
    }

    #[test]
    fn test_search_matches_prompt_ref_model_and_input() {
        let records = ledger();
        let search = |term: &str| UsageFilter {
            search: Some(term.to_string()),
            status: StatusFilter::All,
        };

        assert_eq!(search("TRANSLATE").apply(&records, 10).len(), 1);
        assert_eq!(search("haiku").apply(&records, 10).len(), 2);
        assert_eq!(search("quarterly").apply(&records, 10).len(), 1);
        assert_eq!(search("nothing-like-this").apply(&records, 10).len(), 0);
        assert_eq!(search("   ").apply(&records, 10).len(), 4);
    }
}
