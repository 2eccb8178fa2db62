//! Retention Sweeper - Periodic usage ledger pruning
//!
//! Reads `logging.retention_days` from the config store on every tick, so a
//! policy change takes effect without a restart. `0` keeps history forever.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::time::interval;

use promptdeck::{ConfigRepository, DomainError, UsageLedger};

use crate::application::{ConfigService, UsageService};

/// Sweeper configuration
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Interval between sweeps
    pub interval: Duration,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600), // 1 hour
        }
    }
}

/// Usage ledger retention sweeper
pub struct RetentionSweeper {
    usage: Arc<UsageService<dyn UsageLedger>>,
    config: Arc<ConfigService<dyn ConfigRepository>>,
    settings: RetentionConfig,
}

impl RetentionSweeper {
    pub fn new(
        usage: Arc<UsageService<dyn UsageLedger>>,
        config: Arc<ConfigService<dyn ConfigRepository>>,
        settings: Option<RetentionConfig>,
    ) -> Self {
        Self {
            usage,
            config,
            settings: settings.unwrap_or_default(),
        }
    }

    /// Start the sweeper (runs in background)
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    async fn run(self) {
        tracing::info!(
            "🧹 Retention sweeper started (interval: {:?})",
            self.settings.interval
        );

        let mut ticker = interval(self.settings.interval);

        loop {
            ticker.tick().await;

            match self.sweep_once().await {
                Ok(Some(removed)) => {
                    tracing::debug!("🧹 Retention sweep removed {} records", removed)
                }
                Ok(None) => tracing::debug!("🧹 Retention disabled, nothing to sweep"),
                Err(e) => tracing::warn!("🧹 Retention sweep failed: {}", e),
            }
        }
    }

    /// Prune once against the current policy. `None` when retention is disabled.
    pub async fn sweep_once(&self) -> Result<Option<usize>, DomainError> {
        let retention_days = self.config.raw().await?.logging.retention_days;
        if retention_days == 0 {
            return Ok(None);
        }

        let Some(cutoff) =
            Utc::now().checked_sub_signed(chrono::Duration::days(i64::from(retention_days)))
        else {
            tracing::warn!(
                "🧹 Retention of {} days reaches past the earliest date, keeping everything",
                retention_days
            );
            return Ok(None);
        };

        self.usage.prune_before(cutoff).await.map(Some)
    }
}
