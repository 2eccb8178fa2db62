//! JSON file implementation of ConfigRepository

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use promptdeck::{Config, ConfigRepository, DomainError};

/// Stores the config document as pretty-printed JSON
pub struct FsConfigRepository {
    path: PathBuf,
}

impl FsConfigRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigRepository for FsConfigRepository {
    async fn load(&self) -> Result<Config, DomainError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Config::default()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&raw)
            .map_err(|e| DomainError::Io(format!("Corrupt config file {:?}: {}", self.path, e)))
    }

    async fn save(&self, config: &Config) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let body = serde_json::to_string_pretty(config).map_err(DomainError::io)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).await?;
        fs::rename(&tmp, &self.path).await?;

        Ok(())
    }
}
