//! PromptDeck API Client

use std::collections::{BTreeMap, HashMap};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API Client for PromptDeck
pub struct PromptDeckClient {
    client: Client,
    base_url: String,
}

// ============================================
// API Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct TemplateSummary {
    pub category: String,
    pub name: String,
    pub preview: String,
}

#[derive(Debug, Deserialize)]
pub struct TemplateResponse {
    pub category: String,
    pub name: String,
    pub content: String,
    pub variables: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderResponse {
    pub rendered: String,
    pub unresolved: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UsageRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub model: String,
    pub prompt_ref: Option<String>,
    pub tokens: u64,
    pub cost: f64,
    pub duration_ms: u64,
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyticsResponse {
    pub total_calls: u64,
    pub total_tokens: u64,
    pub total_cost: f64,
    pub success_rate: u32,
    pub avg_duration_ms: u64,
    pub model_usage: BTreeMap<String, u64>,
    pub calls_per_day: Vec<u64>,
    pub window_start: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct ExecuteResponse {
    pub record: UsageRecord,
    pub response: Option<String>,
}

#[derive(Debug, Serialize)]
struct PutTemplateRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct RenderRequest<'a> {
    variables: &'a HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct ExecuteRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub variables: HashMap<String, String>,
}

impl PromptDeckClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn template_url(&self, category: &str, name: &str) -> String {
        format!(
            "{}/api/templates/{}/{}",
            self.base_url,
            urlencoding::encode(category),
            urlencoding::encode(name)
        )
    }

    /// Send a request and decode a JSON body, turning non-2xx into errors
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let resp = request
            .send()
            .await
            .context("Failed to connect to PromptDeck API")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("API error ({}): {}", status, body);
        }

        resp.json().await.context("Failed to parse response")
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// List all templates
    pub async fn list_templates(&self) -> Result<Vec<TemplateSummary>> {
        let url = format!("{}/api/templates", self.base_url);
        self.send(self.client.get(&url)).await
    }

    /// Get one template
    pub async fn get_template(&self, category: &str, name: &str) -> Result<TemplateResponse> {
        self.send(self.client.get(self.template_url(category, name)))
            .await
    }

    /// Create or overwrite a template
    pub async fn put_template(
        &self,
        category: &str,
        name: &str,
        content: &str,
    ) -> Result<TemplateResponse> {
        let request = self
            .client
            .put(self.template_url(category, name))
            .json(&PutTemplateRequest { content });
        self.send(request).await
    }

    /// Delete a template
    pub async fn delete_template(&self, category: &str, name: &str) -> Result<()> {
        let _: serde_json::Value = self
            .send(self.client.delete(self.template_url(category, name)))
            .await?;
        Ok(())
    }

    /// Render a template server-side
    pub async fn render_template(
        &self,
        category: &str,
        name: &str,
        variables: &HashMap<String, String>,
    ) -> Result<RenderResponse> {
        let url = format!("{}/render", self.template_url(category, name));
        let request = self.client.post(&url).json(&RenderRequest { variables });
        self.send(request).await
    }

    /// Query the usage ledger
    pub async fn list_usage(
        &self,
        search: Option<&str>,
        status: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<UsageRecord>> {
        let url = format!("{}/api/usage", self.base_url);

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(search) = search {
            query.push(("search", search.to_string()));
        }
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }

        self.send(self.client.get(&url).query(&query)).await
    }

    /// Analytics snapshot
    pub async fn analytics(&self, window_days: Option<u32>) -> Result<AnalyticsResponse> {
        let url = format!("{}/api/analytics", self.base_url);
        let mut request = self.client.get(&url);
        if let Some(days) = window_days {
            request = request.query(&[("window_days", days)]);
        }
        self.send(request).await
    }

    /// Execute a template or ad-hoc prompt
    pub async fn execute(&self, request: &ExecuteRequest) -> Result<ExecuteResponse> {
        let url = format!("{}/api/execute", self.base_url);
        self.send(self.client.post(&url).json(request)).await
    }

    /// Read dashboard settings (secrets masked)
    pub async fn get_config(&self) -> Result<serde_json::Value> {
        let url = format!("{}/api/config", self.base_url);
        self.send(self.client.get(&url)).await
    }

    /// Merge a partial settings tree
    pub async fn update_config(&self, patch: &serde_json::Value) -> Result<serde_json::Value> {
        let url = format!("{}/api/config", self.base_url);
        self.send(self.client.put(&url).json(patch)).await
    }
}
