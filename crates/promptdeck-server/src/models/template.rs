//! Template DTOs

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use promptdeck::{Template, TemplateSummary};

use crate::application::RenderedTemplate;

/// Template listing entry
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateSummaryResponse {
    pub category: String,
    pub name: String,
    /// First 100 characters of content
    pub preview: String,
}

impl From<TemplateSummary> for TemplateSummaryResponse {
    fn from(summary: TemplateSummary) -> Self {
        Self {
            category: summary.address.category().to_string(),
            name: summary.address.name().to_string(),
            preview: summary.preview,
        }
    }
}

/// Full template
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplateResponse {
    pub category: String,
    pub name: String,
    pub content: String,
    /// Placeholder identifiers in order of first appearance
    pub variables: Vec<String>,
}

impl From<Template> for TemplateResponse {
    fn from(template: Template) -> Self {
        let variables = template.variables();
        Self {
            category: template.category().to_string(),
            name: template.name().to_string(),
            content: template.content,
            variables,
        }
    }
}

/// Create or overwrite template request
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PutTemplateRequest {
    pub content: String,
}

/// Render template request
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RenderTemplateRequest {
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// Rendered template
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RenderTemplateResponse {
    pub rendered: String,
    /// Placeholders left verbatim
    pub unresolved: Vec<String>,
}

impl From<RenderedTemplate> for RenderTemplateResponse {
    fn from(result: RenderedTemplate) -> Self {
        Self {
            rendered: result.rendered,
            unresolved: result.unresolved,
        }
    }
}
