//! Filesystem implementation of TemplateRepository
//!
//! Layout: `{root}/{category}/{name}.txt`. Writes go to a dot-prefixed
//! temporary file first and are renamed into place.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use promptdeck::{DomainError, Template, TemplateAddress, TemplateRepository};

const TEMPLATE_EXT: &str = "txt";

/// Filesystem implementation of TemplateRepository
pub struct FsTemplateRepository {
    root: PathBuf,
}

impl FsTemplateRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn category_dir(&self, address: &TemplateAddress) -> PathBuf {
        self.root.join(address.category())
    }

    fn template_path(&self, address: &TemplateAddress) -> PathBuf {
        self.category_dir(address)
            .join(format!("{}.{}", address.name(), TEMPLATE_EXT))
    }

    async fn read_category(&self, category: &str, dir: &Path) -> Result<Vec<Template>, DomainError> {
        let mut templates = Vec::new();
        let mut entries = fs::read_dir(dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(TEMPLATE_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let address = match TemplateAddress::new(category, stem) {
                Ok(address) => address,
                Err(_) => {
                    tracing::debug!("Skipping non-template file {:?}", path);
                    continue;
                }
            };

            let content = fs::read_to_string(&path).await?;
            templates.push(Template::new(address, content));
        }

        Ok(templates)
    }
}

#[async_trait]
impl TemplateRepository for FsTemplateRepository {
    async fn find_all(&self) -> Result<Vec<Template>, DomainError> {
        let mut categories = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(e.into()),
        };

        let mut templates = Vec::new();
        while let Some(entry) = categories.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(category) = name.to_str() else {
                continue;
            };
            if category.starts_with('.') {
                continue;
            }
            templates.extend(self.read_category(category, &entry.path()).await?);
        }

        Ok(templates)
    }

    async fn find(&self, address: &TemplateAddress) -> Result<Option<Template>, DomainError> {
        match fs::read_to_string(self.template_path(address)).await {
            Ok(content) => Ok(Some(Template::new(address.clone(), content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, template: &Template) -> Result<(), DomainError> {
        let dir = self.category_dir(&template.address);
        fs::create_dir_all(&dir).await?;

        let path = self.template_path(&template.address);
        let tmp = dir.join(format!(".{}.{}.tmp", template.name(), TEMPLATE_EXT));
        fs::write(&tmp, template.content.as_bytes()).await?;
        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn delete(&self, address: &TemplateAddress) -> Result<bool, DomainError> {
        match fs::remove_file(self.template_path(address)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
