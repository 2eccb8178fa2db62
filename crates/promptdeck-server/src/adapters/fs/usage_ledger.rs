//! JSON-lines implementation of UsageLedger
//!
//! One serialized record per line. Every operation holds the same lock, so
//! appends never interleave and readers never see a half-written line. A
//! failed append is truncated away, and a torn tail left by a crash is
//! terminated before the next record is written.

use std::io::{ErrorKind, SeekFrom};
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use promptdeck::{DomainError, UsageLedger, UsageRecord};

/// Append-only ledger file
pub struct JsonlUsageLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlUsageLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read_all(&self) -> Result<Vec<UsageRecord>, DomainError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (lineno, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<UsageRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        "Skipping malformed ledger line {} in {:?}: {}",
                        lineno + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        Ok(records)
    }

    async fn ensure_parent(&self) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl UsageLedger for JsonlUsageLedger {
    async fn append(&self, record: UsageRecord) -> Result<(), DomainError> {
        let mut line = serde_json::to_string(&record).map_err(DomainError::io)?;
        line.push('\n');

        let _guard = self.lock.lock().await;
        self.ensure_parent().await?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)
            .await?;

        let len = file.metadata().await?.len();
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::Start(len - 1)).await?;
            file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                tracing::warn!("Ledger {:?} ends with a torn line, terminating it", self.path);
                line.insert(0, '\n');
            }
        }

        let written = async {
            file.write_all(line.as_bytes()).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            if let Err(rollback) = file.set_len(len).await {
                tracing::error!(
                    "Failed to roll back partial ledger append in {:?}: {}",
                    self.path,
                    rollback
                );
            }
            return Err(e.into());
        }

        Ok(())
    }

    async fn records(&self) -> Result<Vec<UsageRecord>, DomainError> {
        let _guard = self.lock.lock().await;
        self.read_all().await
    }

    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let _guard = self.lock.lock().await;

        let records = self.read_all().await?;
        let before = records.len();
        let kept: Vec<&UsageRecord> = records.iter().filter(|r| r.timestamp >= cutoff).collect();
        let removed = before - kept.len();
        if removed == 0 {
            return Ok(0);
        }

        let mut body = String::new();
        for record in kept {
            body.push_str(&serde_json::to_string(record).map_err(DomainError::io)?);
            body.push('\n');
        }

        let tmp = self.path.with_extension("jsonl.tmp");
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;

        Ok(removed)
    }
}
