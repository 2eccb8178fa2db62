//! Analytics Aggregator
//!
//! Derives summary statistics from ledger contents on every read.
//! Days are UTC calendar days. Costs are summed in integer micro-dollars so
//! the total does not depend on record order.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::UsageRecord;
use crate::domain::errors::DomainError;

pub const DEFAULT_WINDOW_DAYS: u32 = 7;
pub const MAX_WINDOW_DAYS: u32 = 365;

const MICROS_PER_UNIT: f64 = 1_000_000.0;

/// Recomputed-on-read ledger summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub total_calls: u64,
    pub total_tokens: u64,
    /// USD, rounded to micro-dollars
    pub total_cost: f64,
    /// Percentage of successful calls, rounded (0 when empty)
    pub success_rate: u32,
    pub avg_duration_ms: u64,
    /// Call count per model
    pub model_usage: BTreeMap<String, u64>,
    /// Calls per UTC day, oldest first, ending today
    pub calls_per_day: Vec<u64>,
    /// First day covered by `calls_per_day`
    pub window_start: NaiveDate,
}

/// Summarize `records` over a trailing window ending today (UTC)
pub fn summarize(records: &[UsageRecord], window_days: u32) -> Result<AnalyticsSnapshot, DomainError> {
    summarize_at(records, window_days, Utc::now().date_naive())
}

/// Summarize `records` over a trailing window ending on `today`
pub fn summarize_at(
    records: &[UsageRecord],
    window_days: u32,
    today: NaiveDate,
) -> Result<AnalyticsSnapshot, DomainError> {
    if window_days == 0 || window_days > MAX_WINDOW_DAYS {
        return Err(DomainError::Validation(format!(
            "window_days must be between 1 and {}: {}",
            MAX_WINDOW_DAYS, window_days
        )));
    }

    let window_start = today
        .checked_sub_days(Days::new(u64::from(window_days - 1)))
        .ok_or_else(|| DomainError::Validation("window starts before the calendar".to_string()))?;

    let total_calls = records.len() as u64;
    let mut total_tokens: u64 = 0;
    let mut cost_micros: i64 = 0;
    let mut duration_ms: u128 = 0;
    let mut successes: u64 = 0;
    let mut model_usage: BTreeMap<String, u64> = BTreeMap::new();
    let mut calls_per_day = vec![0u64; window_days as usize];

    for record in records {
        total_tokens = total_tokens.saturating_add(record.tokens);
        cost_micros = cost_micros.saturating_add(to_micros(record.cost));
        duration_ms += u128::from(record.duration_ms);
        if record.success {
            successes += 1;
        }
        *model_usage.entry(record.model.clone()).or_insert(0) += 1;

        let day = record.timestamp.date_naive();
        if day >= window_start && day <= today {
            let offset = (day - window_start).num_days() as usize;
            calls_per_day[offset] += 1;
        }
    }

    let (success_rate, avg_duration_ms) = if total_calls == 0 {
        (0, 0)
    } else {
        (
            (100.0 * successes as f64 / total_calls as f64).round() as u32,
            (duration_ms as f64 / total_calls as f64).round() as u64,
        )
    };

    Ok(AnalyticsSnapshot {
        total_calls,
        total_tokens,
        total_cost: cost_micros as f64 / MICROS_PER_UNIT,
        success_rate,
        avg_duration_ms,
        model_usage,
        calls_per_day,
        window_start,
    })
}

fn to_micros(cost: f64) -> i64 {
    if cost.is_finite() && cost > 0.0 {
        (cost * MICROS_PER_UNIT).round() as i64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(record: UsageRecord, y: i32, m: u32, d: u32, h: u32) -> UsageRecord {
        record.at(Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap())
    }

    #[test]
    fn test_empty_ledger() {
        let snapshot = summarize(&[], DEFAULT_WINDOW_DAYS).unwrap();
        assert_eq!(snapshot.total_calls, 0);
        assert_eq!(snapshot.total_tokens, 0);
        assert_eq!(snapshot.total_cost, 0.0);
        assert_eq!(snapshot.success_rate, 0);
        assert!(snapshot.model_usage.is_empty());
        assert_eq!(snapshot.calls_per_day, vec![0; 7]);
    }

    #[test]
    fn test_totals_rate_and_model_usage() {
        let records = vec![
            UsageRecord::succeeded("a", None, 100, 0.01, 200),
            UsageRecord {
                tokens: 50,
                cost: 0.02,
                ..UsageRecord::failed("b", None, "boom", 400)
            },
        ];

        let snapshot = summarize(&records, 7).unwrap();
        assert_eq!(snapshot.total_calls, 2);
        assert_eq!(snapshot.total_tokens, 150);
        assert_eq!(snapshot.total_cost, 0.03);
        assert_eq!(snapshot.success_rate, 50);
        assert_eq!(snapshot.avg_duration_ms, 300);
        assert_eq!(
            snapshot.model_usage,
            BTreeMap::from([("a".to_string(), 1), ("b".to_string(), 1)])
        );
    }

    #[test]
    fn test_success_rate_rounds() {
        let records = vec![
            UsageRecord::succeeded("m", None, 0, 0.0, 0),
            UsageRecord::succeeded("m", None, 0, 0.0, 0),
            UsageRecord::failed("m", None, "x", 0),
        ];
        assert_eq!(summarize(&records, 7).unwrap().success_rate, 67);
    }

    #[test]
    fn test_calls_per_day_buckets_trailing_window() {
        let today = day(2026, 3, 10);
        let records = vec![
            at(UsageRecord::succeeded("m", None, 1, 0.0, 1), 2026, 3, 10, 23),
            at(UsageRecord::succeeded("m", None, 1, 0.0, 1), 2026, 3, 10, 0),
            at(UsageRecord::succeeded("m", None, 1, 0.0, 1), 2026, 3, 8, 12),
            at(UsageRecord::succeeded("m", None, 1, 0.0, 1), 2026, 3, 4, 12),
            // outside the window on both sides
            at(UsageRecord::succeeded("m", None, 1, 0.0, 1), 2026, 3, 3, 12),
            at(UsageRecord::succeeded("m", None, 1, 0.0, 1), 2026, 3, 11, 1),
        ];

        let snapshot = summarize_at(&records, 7, today).unwrap();
        assert_eq!(snapshot.window_start, day(2026, 3, 4));
        assert_eq!(snapshot.calls_per_day, vec![1, 0, 0, 0, 1, 0, 2]);
        // totals still cover every record
        assert_eq!(snapshot.total_calls, 6);
    }

    #[test]
    fn test_order_independent() {
        let today = day(2026, 3, 10);
        let mut records = vec![
            at(UsageRecord::succeeded("a", None, 10, 0.1, 5), 2026, 3, 9, 1),
            at(UsageRecord::succeeded("b", None, 20, 0.2, 7), 2026, 3, 10, 1),
            at(UsageRecord::failed("a", None, "x", 9), 2026, 3, 8, 1),
        ];
        let forward = summarize_at(&records, 3, today).unwrap();
        records.reverse();
        let backward = summarize_at(&records, 3, today).unwrap();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_window_bounds_validated() {
        assert!(summarize(&[], 0).is_err());
        assert!(summarize(&[], MAX_WINDOW_DAYS + 1).is_err());
        assert_eq!(summarize(&[], 1).unwrap().calls_per_day, vec![0]);
    }
}
