//! Usage Ledger Port
//!
//! Append-only store of usage records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{errors::DomainError, UsageFilter, UsageRecord};

/// Ledger interface for usage records
///
/// Implementations must make each `append` atomic with respect to other
/// appends and keep insertion order.
#[async_trait]
pub trait UsageLedger: Send + Sync {
    /// Append a record
    async fn append(&self, record: UsageRecord) -> Result<(), DomainError>;

    /// Every record, in insertion order
    async fn records(&self) -> Result<Vec<UsageRecord>, DomainError>;

    /// Matching records, most recent first, at most `limit`
    async fn query(
        &self,
        filter: &UsageFilter,
        limit: usize,
    ) -> Result<Vec<UsageRecord>, DomainError> {
        let records = self.records().await?;
        Ok(filter.apply(&records, limit))
    }

    /// Remove records older than `cutoff`; returns how many were removed
    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError>;
}
