//! Config DTOs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use promptdeck::{Config, LoggingSettings, PromptSettings, UiSettings};

/// Settings tree with every set secret replaced by "configured"
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConfigResponse {
    /// theme, default_model, show_costs
    #[schema(value_type = Object)]
    pub ui: UiSettings,
    /// level, retention_days, save_responses
    #[schema(value_type = Object)]
    pub logging: LoggingSettings,
    /// default_category, seed_examples
    #[schema(value_type = Object)]
    pub prompts: PromptSettings,
    pub env: BTreeMap<String, String>,
}

impl From<Config> for ConfigResponse {
    fn from(config: Config) -> Self {
        Self {
            ui: config.ui,
            logging: config.logging,
            prompts: config.prompts,
            env: config.env,
        }
    }
}
