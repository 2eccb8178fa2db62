//! Template - Category-addressed prompt template
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::domain::services::renderer;
use crate::domain::value_objects::TemplateAddress;

/// Number of characters shown in listing previews
pub const PREVIEW_CHARS: usize = 100;

/// Template - A named piece of prompt text with `{{placeholder}}` markers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub address: TemplateAddress,
    pub content: String,
}

impl Template {
    pub fn new(address: TemplateAddress, content: impl Into<String>) -> Self {
        Self {
            address,
            content: content.into(),
        }
    }

    pub fn category(&self) -> &str {
        self.address.category()
    }

    pub fn name(&self) -> &str {
        self.address.name()
    }

    /// Distinct placeholder identifiers in order of first appearance
    pub fn variables(&self) -> Vec<String> {
        renderer::placeholders(&self.content)
    }

    /// Truncated content for listings (UTF-8 safe, by char count)
    pub fn preview(&self) -> String {
        let mut chars = self.content.chars();
        let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{}...", head)
        } else {
            head
        }
    }

    pub fn summary(&self) -> TemplateSummary {
        TemplateSummary {
            address: self.address.clone(),
            preview: self.preview(),
        }
    }
}

/// Listing entry for a template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSummary {
    pub address: TemplateAddress,
    pub preview: String,
}
