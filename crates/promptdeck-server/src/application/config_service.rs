//! Config Application Service (Use Case)
//!
//! Masked reads and merge-on-write for the settings tree.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use promptdeck::{Config, ConfigRepository, DomainError};

use super::retry_read;

/// Application service for config operations
pub struct ConfigService<R: ConfigRepository + ?Sized> {
    repo: Arc<R>,
    // serializes load-merge-save so concurrent writes never lose a branch
    write_lock: Mutex<()>,
}

impl<R: ConfigRepository + ?Sized> ConfigService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self {
            repo,
            write_lock: Mutex::new(()),
        }
    }

    /// Current config with every set secret masked
    pub async fn read(&self) -> Result<Config, DomainError> {
        Ok(self.raw().await?.masked())
    }

    /// Deep-merge `patch` into the stored config; returns the masked result
    pub async fn write(&self, patch: &Value) -> Result<Config, DomainError> {
        let _guard = self.write_lock.lock().await;

        let current = self.raw().await?;
        let merged = current.apply_patch(patch)?;
        self.repo.save(&merged).await?;

        tracing::info!("Config updated");

        Ok(merged.masked())
    }

    /// Unmasked config for in-process consumers
    pub async fn raw(&self) -> Result<Config, DomainError> {
        retry_read("Load config", || self.repo.load()).await
    }
}
