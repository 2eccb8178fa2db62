//! Template Repository Port
//!
//! Abstract interface for template persistence operations.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Template, TemplateAddress};

/// Repository interface for templates addressed by `(category, name)`
#[async_trait]
pub trait TemplateRepository: Send + Sync {
    /// All templates across every category
    async fn find_all(&self) -> Result<Vec<Template>, DomainError>;

    /// Find a template by address
    async fn find(&self, address: &TemplateAddress) -> Result<Option<Template>, DomainError>;

    /// Save a template (insert or overwrite), creating its category if needed
    async fn save(&self, template: &Template) -> Result<(), DomainError>;

    /// Delete a template; returns false if nothing was stored at the address
    async fn delete(&self, address: &TemplateAddress) -> Result<bool, DomainError>;
}
