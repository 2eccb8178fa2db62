use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod adapters;
mod application;
mod config;
mod models;
mod routes;
mod services;

use adapters::{
    FsConfigRepository, FsTemplateRepository, InMemoryConfigRepository,
    InMemoryTemplateRepository, InMemoryUsageLedger, JsonlUsageLedger, StubExecutor,
};
use application::{ConfigService, ExecutionService, TemplateService, UsageService};
use config::{ServerConfig, StorageBackend};
use promptdeck::{ConfigRepository, ModelExecutor, TemplateRepository, UsageLedger};
use services::retention::{RetentionConfig, RetentionSweeper};

/// Type aliases for application services over runtime-selected backends
pub type AppTemplateService = TemplateService<dyn TemplateRepository>;
pub type AppUsageService = UsageService<dyn UsageLedger>;
pub type AppConfigService = ConfigService<dyn ConfigRepository>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub template_service: Arc<AppTemplateService>,
    pub usage_service: Arc<AppUsageService>,
    pub config_service: Arc<AppConfigService>,
    pub execution_service: Arc<ExecutionService>,
}

impl AppState {
    pub fn new(
        template_repo: Arc<dyn TemplateRepository>,
        ledger: Arc<dyn UsageLedger>,
        config_repo: Arc<dyn ConfigRepository>,
        executor: Arc<dyn ModelExecutor>,
        executor_timeout: Duration,
    ) -> Self {
        let template_service = Arc::new(TemplateService::new(template_repo));
        let usage_service = Arc::new(UsageService::new(ledger));
        let config_service = Arc::new(ConfigService::new(config_repo));
        let execution_service = Arc::new(ExecutionService::new(
            template_service.clone(),
            usage_service.clone(),
            config_service.clone(),
            executor,
            executor_timeout,
        ));

        Self {
            template_service,
            usage_service,
            config_service,
            execution_service,
        }
    }

    /// Wire stores for the configured backend
    fn from_config(config: &ServerConfig) -> Self {
        let executor: Arc<dyn ModelExecutor> = match config.stub_delay {
            Some(delay) => Arc::new(StubExecutor::new().with_delay(delay)),
            None => Arc::new(StubExecutor::new()),
        };

        match config.storage {
            StorageBackend::Fs => Self::new(
                Arc::new(FsTemplateRepository::new(config.templates_dir())),
                Arc::new(JsonlUsageLedger::new(config.ledger_path())),
                Arc::new(FsConfigRepository::new(config.config_path())),
                executor,
                config.executor_timeout,
            ),
            StorageBackend::Memory => Self::new(
                Arc::new(InMemoryTemplateRepository::new()),
                Arc::new(InMemoryUsageLedger::new()),
                Arc::new(InMemoryConfigRepository::new()),
                executor,
                config.executor_timeout,
            ),
        }
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "PromptDeck API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::template::router())
        .merge(routes::usage::router())
        .merge(routes::analytics::router())
        .merge(routes::execute::router())
        .merge(routes::config::router());

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("🗂️  PromptDeck API initializing...");

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    tracing::info!(
        "💾 Storage: {:?} (data dir: {:?})",
        config.storage,
        config.data_dir
    );

    let state = AppState::from_config(&config);

    // Seed example templates into an empty library
    let settings = state
        .config_service
        .raw()
        .await
        .context("Failed to load dashboard config")?;
    if settings.prompts.seed_examples {
        match state.template_service.seed_examples().await {
            Ok(0) => {}
            Ok(count) => tracing::info!("🌱 Seeded {} example templates", count),
            Err(e) => tracing::warn!("⚠️  Failed to seed example templates: {}", e),
        }
    }

    // Start retention sweeper
    RetentionSweeper::new(
        state.usage_service.clone(),
        state.config_service.clone(),
        Some(RetentionConfig {
            interval: config.retention_interval,
        }),
    )
    .start();

    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ PromptDeck API ready on {}", config.bind);

    axum::serve(listener, router).await.context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_router() -> Router {
        build_router(AppState::new(
            Arc::new(InMemoryTemplateRepository::new()),
            Arc::new(InMemoryUsageLedger::new()),
            Arc::new(InMemoryConfigRepository::new()),
            Arc::new(StubExecutor::new()),
            Duration::from_secs(5),
        ))
    }

    async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        let request = match body {
            Some(body) => request.body(Body::from(body.to_string())).unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        });
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&test_router(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_template_lifecycle() {
        let router = test_router();

        let (status, body) = send(
            &router,
            "PUT",
            "/api/templates/custom/greet",
            Some(json!({ "content": "Hello {{name}}, meet {{friend}}" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["variables"], json!(["name", "friend"]));

        let (status, body) = send(&router, "GET", "/api/templates/custom/greet", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "Hello {{name}}, meet {{friend}}");

        let (_, body) = send(&router, "GET", "/api/templates", None).await;
        assert_eq!(body[0]["category"], "custom");
        assert_eq!(body[0]["name"], "greet");

        let (status, body) = send(
            &router,
            "POST",
            "/api/templates/custom/greet/render",
            Some(json!({ "variables": { "name": "Ada" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rendered"], "Hello Ada, meet {{friend}}");
        assert_eq!(body["unresolved"], json!(["friend"]));

        let (status, _) = send(&router, "DELETE", "/api/templates/custom/greet", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&router, "GET", "/api/templates/custom/greet", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&router, "DELETE", "/api/templates/custom/greet", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_template_name_is_bad_request() {
        let (status, _) = send(
            &test_router(),
            "PUT",
            "/api/templates/custom/.hidden",
            Some(json!({ "content": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_execute_then_usage_and_analytics() {
        let router = test_router();
        send(
            &router,
            "PUT",
            "/api/templates/examples/translate",
            Some(json!({ "content": "Translate to {{language}}: {{text}}" })),
        )
        .await;

        let (status, body) = send(
            &router,
            "POST",
            "/api/execute",
            Some(json!({
                "template": "examples/translate",
                "model": "gpt-4o",
                "variables": { "language": "French", "text": "hello" }
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record"]["success"], true);
        assert_eq!(body["record"]["prompt_ref"], "examples/translate");

        let (status, body) = send(&router, "GET", "/api/usage?status=success&limit=10", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().map(Vec::len), Some(1));

        let (status, body) = send(&router, "GET", "/api/usage?status=error", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send(&router, "GET", "/api/analytics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_calls"], 1);
        assert_eq!(body["success_rate"], 100);
        assert_eq!(body["model_usage"]["gpt-4o"], 1);
        assert_eq!(body["calls_per_day"].as_array().map(Vec::len), Some(7));
    }

    #[tokio::test]
    async fn test_bad_query_parameters() {
        let router = test_router();
        let (status, _) = send(&router, "GET", "/api/usage?status=maybe", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(&router, "GET", "/api/analytics?window_days=0", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &router,
            "POST",
            "/api/execute",
            Some(json!({ "template": "a/b", "prompt": "both" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_config_masks_and_preserves_secrets() {
        let router = test_router();

        let (status, body) = send(
            &router,
            "PUT",
            "/api/config",
            Some(json!({ "env": { "OPENAI_API_KEY": "sk-live" } })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["env"]["OPENAI_API_KEY"], "configured");

        let (_, read_back) = send(&router, "GET", "/api/config", None).await;
        let (status, _) = send(&router, "PUT", "/api/config", Some(read_back)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(
            &router,
            "PUT",
            "/api/config",
            Some(json!({ "telemetry": { "enabled": true } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_config_rejects_out_of_range_values() {
        let router = test_router();

        let (status, _) = send(
            &router,
            "PUT",
            "/api/config",
            Some(json!({ "logging": { "retention_days": 100_000_000 } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &router,
            "PUT",
            "/api/config",
            Some(json!({ "ui": { "default_model": "" } })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = send(&router, "GET", "/api/config", None).await;
        assert_eq!(body["logging"]["retention_days"], 30);
        assert_eq!(body["ui"]["default_model"], "gpt-4o-mini");
    }

    #[tokio::test]
    async fn test_openapi_served() {
        let (status, body) = send(&test_router(), "GET", "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["info"]["title"], "PromptDeck API");
    }
}
