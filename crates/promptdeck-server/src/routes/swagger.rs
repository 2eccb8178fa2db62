//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    AnalyticsResponse,
    ConfigResponse,
    // Execute models
    ExecuteRequest,
    ExecuteResponse,
    // Template models
    PutTemplateRequest,
    RenderTemplateRequest,
    RenderTemplateResponse,
    TemplateResponse,
    TemplateSummaryResponse,
    // Usage models
    UsageRecordResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Template endpoints
        super::template::list_templates,
        super::template::get_template,
        super::template::put_template,
        super::template::delete_template,
        super::template::render_template,
        // Usage endpoints
        super::usage::list_usage,
        // Analytics endpoints
        super::analytics::get_analytics,
        // Execute endpoints
        super::execute::execute,
        // Config endpoints
        super::config::get_config,
        super::config::update_config,
    ),
    info(
        title = "PromptDeck API",
        version = "0.1.0",
        description = "Prompt template library, usage ledger and analytics for the PromptDeck dashboard.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Template", description = "Template - Category-addressed prompt library"),
        (name = "Usage", description = "Usage - Per-call ledger"),
        (name = "Analytics", description = "Analytics - Cost, token and success-rate summary"),
        (name = "Execute", description = "Execute - Run a prompt through the model executor"),
        (name = "Config", description = "Config - Dashboard settings and masked secrets"),
    ),
    components(
        schemas(
            // Template
            TemplateSummaryResponse,
            TemplateResponse,
            PutTemplateRequest,
            RenderTemplateRequest,
            RenderTemplateResponse,
            // Usage
            UsageRecordResponse,
            AnalyticsResponse,
            // Execute
            ExecuteRequest,
            ExecuteResponse,
            // Config
            ConfigResponse,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/templates",
            "/api/templates/{category}/{name}",
            "/api/templates/{category}/{name}/render",
            "/api/usage",
            "/api/analytics",
            "/api/execute",
            "/api/config",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
