//! In-Memory Repository Implementations
//!
//! Used for `PROMPTDECK_STORAGE=memory` and in tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use promptdeck::{
    Config, ConfigRepository, DomainError, Template, TemplateAddress, TemplateRepository,
    UsageLedger, UsageRecord,
};

/// In-memory implementation of TemplateRepository
#[derive(Default)]
pub struct InMemoryTemplateRepository {
    templates: RwLock<BTreeMap<TemplateAddress, String>>,
}

impl InMemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for InMemoryTemplateRepository {
    async fn find_all(&self) -> Result<Vec<Template>, DomainError> {
        let templates = self.templates.read().await;
        Ok(templates
            .iter()
            .map(|(address, content)| Template::new(address.clone(), content.clone()))
            .collect())
    }

    async fn find(&self, address: &TemplateAddress) -> Result<Option<Template>, DomainError> {
        let templates = self.templates.read().await;
        Ok(templates
            .get(address)
            .map(|content| Template::new(address.clone(), content.clone())))
    }

    async fn save(&self, template: &Template) -> Result<(), DomainError> {
        self.templates
            .write()
            .await
            .insert(template.address.clone(), template.content.clone());
        Ok(())
    }

    async fn delete(&self, address: &TemplateAddress) -> Result<bool, DomainError> {
        Ok(self.templates.write().await.remove(address).is_some())
    }
}

/// In-memory implementation of UsageLedger
#[derive(Default)]
pub struct InMemoryUsageLedger {
    records: RwLock<Vec<UsageRecord>>,
}

impl InMemoryUsageLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsageLedger for InMemoryUsageLedger {
    async fn append(&self, record: UsageRecord) -> Result<(), DomainError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn records(&self) -> Result<Vec<UsageRecord>, DomainError> {
        Ok(self.records.read().await.clone())
    }

    async fn prune_before(&self, cutoff: DateTime<Utc>) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.timestamp >= cutoff);
        Ok(before - records.len())
    }
}

/// In-memory implementation of ConfigRepository
#[derive(Default)]
pub struct InMemoryConfigRepository {
    config: RwLock<Config>,
}

impl InMemoryConfigRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigRepository for InMemoryConfigRepository {
    async fn load(&self) -> Result<Config, DomainError> {
        Ok(self.config.read().await.clone())
    }

    async fn save(&self, config: &Config) -> Result<(), DomainError> {
        *self.config.write().await = config.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptdeck::{StatusFilter, UsageFilter};

    #[tokio::test]
    async fn test_template_repository_round_trip() {
        let repo = InMemoryTemplateRepository::new();
        let addr = TemplateAddress::new("custom", "hello").unwrap();

        repo.save(&Template::new(addr.clone(), "Hello {{name}}"))
            .await
            .unwrap();

        assert_eq!(
            repo.find(&addr).await.unwrap().unwrap().content,
            "Hello {{name}}"
        );
        assert!(repo.delete(&addr).await.unwrap());
        assert!(!repo.delete(&addr).await.unwrap());
    }

    #[tokio::test]
    async fn test_ledger_query_uses_shared_filter() {
        let ledger = InMemoryUsageLedger::new();
        for i in 0..5 {
            ledger
                .append(UsageRecord::failed("m", None, format!("e{}", i), 1))
                .await
                .unwrap();
        }
        ledger
            .append(UsageRecord::succeeded("m", None, 1, 0.0, 1))
            .await
            .unwrap();

        let filter = UsageFilter {
            search: None,
            status: StatusFilter::Error,
        };
        let result = ledger.query(&filter, 3).await.unwrap();
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|r| !r.success));
    }
}
