//! Process configuration
//!
//! ENV vars: PROMPTDECK_DATA_DIR, PROMPTDECK_BIND, PROMPTDECK_EXECUTOR_TIMEOUT_MS,
//! PROMPTDECK_RETENTION_INTERVAL_SECS, PROMPTDECK_STORAGE, PROMPTDECK_STUB_DELAY_MS

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};

/// Where stores keep their data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Templates as files, JSON-lines ledger, JSON config under the data dir
    Fs,
    /// Process-local, lost on restart
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "fs" => Ok(StorageBackend::Fs),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("Unknown storage backend: {} (expected fs or memory)", other),
        }
    }
}

/// Server process configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub bind: SocketAddr,
    pub executor_timeout: Duration,
    pub retention_interval: Duration,
    pub storage: StorageBackend,
    /// Simulated latency for the stub executor
    pub stub_delay: Option<Duration>,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let data_dir = lookup("PROMPTDECK_DATA_DIR").unwrap_or_else(|| "./data".to_string());

        let bind = lookup("PROMPTDECK_BIND").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let bind: SocketAddr = bind
            .parse()
            .with_context(|| format!("Invalid PROMPTDECK_BIND: {}", bind))?;

        let timeout_ms: u64 = match lookup("PROMPTDECK_EXECUTOR_TIMEOUT_MS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid PROMPTDECK_EXECUTOR_TIMEOUT_MS: {}", raw))?,
            None => 30_000,
        };

        let retention_secs: u64 = match lookup("PROMPTDECK_RETENTION_INTERVAL_SECS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid PROMPTDECK_RETENTION_INTERVAL_SECS: {}", raw))?,
            None => 3600,
        };
        if retention_secs == 0 {
            bail!("PROMPTDECK_RETENTION_INTERVAL_SECS must be positive");
        }

        let storage = match lookup("PROMPTDECK_STORAGE") {
            Some(raw) => raw.parse()?,
            None => StorageBackend::Fs,
        };

        let stub_delay = match lookup("PROMPTDECK_STUB_DELAY_MS") {
            Some(raw) => {
                let ms: u64 = raw
                    .parse()
                    .with_context(|| format!("Invalid PROMPTDECK_STUB_DELAY_MS: {}", raw))?;
                (ms > 0).then(|| Duration::from_millis(ms))
            }
            None => None,
        };

        Ok(Self {
            data_dir: PathBuf::from(data_dir),
            bind,
            executor_timeout: Duration::from_millis(timeout_ms),
            retention_interval: Duration::from_secs(retention_secs),
            storage,
            stub_delay,
        })
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.data_dir.join("templates")
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.data_dir.join("usage.jsonl")
    }

    pub fn config_path(&self) -> PathBuf {
        self.data_dir.join("config.json")
    }
}
