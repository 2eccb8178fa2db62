//! Usage Application Service (Use Case)
//!
//! Records model calls and serves ledger queries and analytics.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use promptdeck::{
    summarize, AnalyticsSnapshot, DomainError, UsageFilter, UsageLedger, UsageRecord,
    DEFAULT_WINDOW_DAYS,
};

use super::retry_read;

pub const DEFAULT_QUERY_LIMIT: usize = 50;
pub const MAX_QUERY_LIMIT: usize = 1000;

/// Application service for usage ledger operations
pub struct UsageService<L: UsageLedger + ?Sized> {
    ledger: Arc<L>,
}

impl<L: UsageLedger + ?Sized> UsageService<L> {
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }

    /// Validate and append a record
    pub async fn record(&self, record: UsageRecord) -> Result<UsageRecord, DomainError> {
        record.validate()?;
        self.ledger.append(record.clone()).await?;

        tracing::debug!(
            "Recorded usage: model={} success={} tokens={}",
            record.model,
            record.success,
            record.tokens
        );

        Ok(record)
    }

    /// Matching records, most recent first. `limit` defaults to 50 and is capped at 1000.
    pub async fn list(
        &self,
        filter: &UsageFilter,
        limit: Option<usize>,
    ) -> Result<Vec<UsageRecord>, DomainError> {
        let limit = limit.unwrap_or(DEFAULT_QUERY_LIMIT).min(MAX_QUERY_LIMIT);
        retry_read("Query usage", || self.ledger.query(filter, limit)).await
    }

    /// Snapshot over the current ledger contents
    pub async fn analytics(&self, window_days: Option<u32>) -> Result<AnalyticsSnapshot, DomainError> {
        let records = retry_read("Read usage ledger", || self.ledger.records()).await?;
        summarize(&records, window_days.unwrap_or(DEFAULT_WINDOW_DAYS))
    }

    /// Remove records older than `cutoff`
    pub async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let removed = self.ledger.prune_before(cutoff).await?;
        if removed > 0 {
            tracing::info!("Pruned {} usage records older than {}", removed, cutoff);
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryUsageLedger;
    use chrono::Duration;
    use promptdeck::StatusFilter;

    fn service() -> UsageService<InMemoryUsageLedger> {
        UsageService::new(Arc::new(InMemoryUsageLedger::new()))
    }

    #[tokio::test]
    async fn test_record_rejects_invalid_outcome() {
        let service = service();
        let mut record = UsageRecord::succeeded("m", None, 1, 0.0, 1);
        record.error = Some("boom".to_string());

        assert!(matches!(
            service.record(record).await.unwrap_err(),
            DomainError::Validation(_)
        ));
        assert!(service.list(&UsageFilter::default(), None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_defaults_and_caps_limit() {
        let service = service();
        for i in 0..60 {
            service
                .record(UsageRecord::succeeded("m", None, i, 0.0, 1))
                .await
                .unwrap();
        }

        let filter = UsageFilter::default();
        assert_eq!(service.list(&filter, None).await.unwrap().len(), DEFAULT_QUERY_LIMIT);
        assert_eq!(service.list(&filter, Some(5)).await.unwrap().len(), 5);
        assert_eq!(service.list(&filter, Some(5_000)).await.unwrap().len(), 60);
    }

    #[tokio::test]
    async fn test_error_query_never_returns_successes() {
        let service = service();
        service
            .record(UsageRecord::succeeded("a", None, 1, 0.0, 1))
            .await
            .unwrap();
        service
            .record(UsageRecord::failed("b", None, "boom", 1))
            .await
            .unwrap();

        let filter = UsageFilter {
            search: None,
            status: StatusFilter::Error,
        };
        let result = service.list(&filter, Some(10)).await.unwrap();
        assert_eq!(result.len(), 1);
        assert!(!result[0].success);
    }

    #[tokio::test]
    async fn test_analytics_matches_recorded_calls() {
        let service = service();
        service
            .record(UsageRecord::succeeded("a", None, 100, 0.01, 10))
            .await
            .unwrap();
        service
            .record(UsageRecord {
                tokens: 50,
                cost: 0.02,
                ..UsageRecord::failed("b", None, "boom", 10)
            })
            .await
            .unwrap();

        let snapshot = service.analytics(None).await.unwrap();
        assert_eq!(snapshot.total_calls, 2);
        assert_eq!(snapshot.total_tokens, 150);
        assert_eq!(snapshot.total_cost, 0.03);
        assert_eq!(snapshot.success_rate, 50);
        assert_eq!(snapshot.calls_per_day.len(), 7);
        // both fall inside the window even if UTC midnight passed in between
        assert_eq!(snapshot.calls_per_day.iter().sum::<u64>(), 2);

        assert!(service.analytics(Some(0)).await.is_err());
    }

    #[tokio::test]
    async fn test_prune_before() {
        let service = service();
        let now = Utc::now();
        service
            .record(UsageRecord::succeeded("old", None, 1, 0.0, 1).at(now - Duration::days(90)))
            .await
            .unwrap();
        service
            .record(UsageRecord::succeeded("new", None, 1, 0.0, 1))
            .await
            .unwrap();

        assert_eq!(service.prune_before(now - Duration::days(30)).await.unwrap(), 1);
        assert_eq!(service.list(&UsageFilter::default(), None).await.unwrap().len(), 1);
    }
}
