//! Config Repository Port
//!
//! Abstract interface for the settings document.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Config};

/// Repository interface for the (unmasked) config document
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Load the stored config, or defaults when nothing is stored yet
    async fn load(&self) -> Result<Config, DomainError>;

    /// Replace the stored config
    async fn save(&self, config: &Config) -> Result<(), DomainError>;
}
