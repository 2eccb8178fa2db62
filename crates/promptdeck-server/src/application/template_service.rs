//! Template Application Service (Use Case)
//!
//! Orchestrates domain operations for the template library.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use promptdeck::{
    render, unresolved, DomainError, Template, TemplateAddress, TemplateRepository,
    TemplateSummary,
};

use super::retry_read;

/// Category that holds the bundled example templates
pub const EXAMPLES_CATEGORY: &str = "examples";

const EXAMPLES: &[(&str, &str)] = &[
    (
        "code-review",
        "Review this code for bugs, performance, and best practices:\n\n{{code}}",
    ),
    (
        "explain-code",
        "Explain what this code does in simple terms:\n\n{{code}}",
    ),
    (
        "fix-bug",
        "Find and fix the bug:\n\n{{code}}\n\nError: {{error}}",
    ),
    (
        "summarize",
        "Summarize the following text in {{length}} sentences:\n\n{{text}}",
    ),
    (
        "translate",
        "Translate the following text to {{language}}:\n\n{{text}}",
    ),
];

/// Rendered template text plus the placeholders left verbatim
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedTemplate {
    pub rendered: String,
    pub unresolved: Vec<String>,
}

/// Application service for template operations
pub struct TemplateService<R: TemplateRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: TemplateRepository + ?Sized> TemplateService<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// All templates, sorted by category then name
    pub async fn list(&self) -> Result<Vec<TemplateSummary>, DomainError> {
        let templates = retry_read("List templates", || self.repo.find_all()).await?;

        let mut summaries: Vec<TemplateSummary> =
            templates.iter().map(Template::summary).collect();
        summaries.sort_by(|a, b| a.address.cmp(&b.address));

        Ok(summaries)
    }

    /// Get a template by address
    pub async fn get(&self, category: &str, name: &str) -> Result<Template, DomainError> {
        let address = TemplateAddress::new(category, name)?;

        retry_read("Get template", || self.repo.find(&address))
            .await?
            .ok_or_else(|| DomainError::not_found("Template", &address))
    }

    /// Create or overwrite a template
    pub async fn put(
        &self,
        category: &str,
        name: &str,
        content: String,
    ) -> Result<Template, DomainError> {
        let template = Template::new(TemplateAddress::new(category, name)?, content);
        self.repo.save(&template).await?;

        tracing::info!("Saved template: {}", template.address);

        Ok(template)
    }

    /// Delete a template
    pub async fn delete(&self, category: &str, name: &str) -> Result<(), DomainError> {
        let address = TemplateAddress::new(category, name)?;

        if !self.repo.delete(&address).await? {
            return Err(DomainError::not_found("Template", &address));
        }

        tracing::info!("Deleted template: {}", address);
        Ok(())
    }

    /// Render a stored template against `bindings`
    pub async fn render(
        &self,
        category: &str,
        name: &str,
        bindings: &HashMap<String, String>,
    ) -> Result<RenderedTemplate, DomainError> {
        let template = self.get(category, name).await?;

        Ok(RenderedTemplate {
            rendered: render(&template.content, bindings),
            unresolved: unresolved(&template.content, bindings),
        })
    }

    /// Write the bundled examples if the library is empty; returns how many were written
    pub async fn seed_examples(&self) -> Result<usize, DomainError> {
        let existing = retry_read("List templates", || self.repo.find_all()).await?;
        if !existing.is_empty() {
            return Ok(0);
        }

        for (name, content) in EXAMPLES {
            let template = Template::new(TemplateAddress::new(EXAMPLES_CATEGORY, *name)?, *content);
            self.repo.save(&template).await?;
        }

        tracing::info!("Seeded {} example templates", EXAMPLES.len());
        Ok(EXAMPLES.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryTemplateRepository;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn service() -> TemplateService<InMemoryTemplateRepository> {
        TemplateService::new(Arc::new(InMemoryTemplateRepository::new()))
    }

    #[tokio::test]
    async fn test_put_then_get_returns_content() {
        let service = service();
        service
            .put("custom", "greet", "Hello {{name}}\n".to_string())
            .await
            .unwrap();

        let template = service.get("custom", "greet").await.unwrap();
        assert_eq!(template.content, "Hello {{name}}\n");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = service().get("custom", "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_path_unsafe_name_rejected() {
        let service = service();
        let err = service
            .put("custom", "../escape", "x".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(matches!(
            service.get("", "x").await.unwrap_err(),
            DomainError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_list_sorted_by_category_then_name() {
        let service = service();
        for (c, n) in [("zeta", "a"), ("alpha", "b"), ("alpha", "a")] {
            service.put(c, n, "x".to_string()).await.unwrap();
        }

        let listed: Vec<String> = service
            .list()
            .await
            .unwrap()
            .iter()
            .map(|s| s.address.to_string())
            .collect();
        assert_eq!(listed, vec!["alpha/a", "alpha/b", "zeta/a"]);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let service = service();
        assert!(matches!(
            service.delete("custom", "ghost").await.unwrap_err(),
            DomainError::NotFound { .. }
        ));

        service.put("custom", "ghost", "x".to_string()).await.unwrap();
        service.delete("custom", "ghost").await.unwrap();
        assert!(service.get("custom", "ghost").await.is_err());
    }

    #[tokio::test]
    async fn test_render_reports_unresolved() {
        let service = service();
        service
            .put("custom", "fix", "Fix {{code}} ({{error}})".to_string())
            .await
            .unwrap();

        let bindings = HashMap::from([("code".to_string(), "x = 1".to_string())]);
        let result = service.render("custom", "fix", &bindings).await.unwrap();

        assert_eq!(result.rendered, "Fix x = 1 ({{error}})");
        assert_eq!(result.unresolved, vec!["error"]);
    }

    #[tokio::test]
    async fn test_seed_examples_only_when_empty() {
        let service = service();
        let seeded = service.seed_examples().await.unwrap();
        assert_eq!(seeded, EXAMPLES.len());
        assert!(service
            .list()
            .await
            .unwrap()
            .iter()
            .all(|s| s.address.category() == EXAMPLES_CATEGORY));

        assert_eq!(service.seed_examples().await.unwrap(), 0);
    }

    /// Fails the first read with an I/O error, then delegates
    struct FlakyRepository {
        inner: InMemoryTemplateRepository,
        reads: AtomicUsize,
        failures: usize,
    }

    #[async_trait]
    impl TemplateRepository for FlakyRepository {
        async fn find_all(&self) -> Result<Vec<Template>, DomainError> {
            if self.reads.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(DomainError::Io("disk hiccup".to_string()));
            }
            self.inner.find_all().await
        }

        async fn find(&self, address: &TemplateAddress) -> Result<Option<Template>, DomainError> {
            if self.reads.fetch_add(1, Ordering::SeqCst) < self.failures {
                return Err(DomainError::Io("disk hiccup".to_string()));
            }
            self.inner.find(address).await
        }

        async fn save(&self, _template: &Template) -> Result<(), DomainError> {
            Err(DomainError::Io("read-only medium".to_string()))
        }

        async fn delete(&self, address: &TemplateAddress) -> Result<bool, DomainError> {
            self.inner.delete(address).await
        }
    }

    fn flaky(failures: usize) -> TemplateService<FlakyRepository> {
        TemplateService::new(Arc::new(FlakyRepository {
            inner: InMemoryTemplateRepository::new(),
            reads: AtomicUsize::new(0),
            failures,
        }))
    }

    #[tokio::test]
    async fn test_single_read_failure_is_retried() {
        assert!(flaky(1).list().await.unwrap().is_empty());
        assert!(matches!(
            flaky(1).get("custom", "x").await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_repeated_read_failure_surfaces() {
        assert!(flaky(2).list().await.unwrap_err().is_io());
    }

    #[tokio::test]
    async fn test_write_failure_is_not_retried() {
        let err = flaky(0)
            .put("custom", "x", "y".to_string())
            .await
            .unwrap_err();
        assert!(err.is_io());
    }
}
