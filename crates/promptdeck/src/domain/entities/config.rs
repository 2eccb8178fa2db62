//! Config - Dashboard settings tree and masked secrets
//!
//! Pure domain entity without infrastructure dependencies.
//! The settings schema is closed: unknown branches and keys are rejected.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::errors::DomainError;

/// Value substituted for any secret that has been set
pub const SECRET_MASK: &str = "configured";

const SECRETS_BRANCH: &str = "env";

/// Upper bound for `logging.retention_days` (about a century)
pub const MAX_RETENTION_DAYS: u32 = 36_500;

/// UI preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiSettings {
    pub theme: String,
    pub default_model: String,
    pub show_costs: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            default_model: "gpt-4o-mini".to_string(),
            show_costs: true,
        }
    }
}

/// Logging and retention policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSettings {
    pub level: String,
    /// Days of usage history to keep (0 = keep forever)
    pub retention_days: u32,
    /// Keep raw input/response payloads on usage records
    pub save_responses: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            retention_days: 30,
            save_responses: false,
        }
    }
}

/// Prompt library defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromptSettings {
    pub default_category: String,
    pub seed_examples: bool,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            default_category: "custom".to_string(),
            seed_examples: true,
        }
    }
}

/// Config - Settings tree plus environment-style secrets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub ui: UiSettings,
    pub logging: LoggingSettings,
    pub prompts: PromptSettings,
    /// Secret values keyed by environment variable name (plaintext at rest)
    pub env: BTreeMap<String, String>,
}

impl Config {
    /// Copy safe to hand to readers: every set secret becomes the mask
    pub fn masked(&self) -> Self {
        Self {
            env: self
                .env
                .keys()
                .map(|k| (k.clone(), SECRET_MASK.to_string()))
                .collect(),
            ..self.clone()
        }
    }

    /// Raw secret value
    pub fn secret(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Merge a partial config into a copy of this one.
    ///
    /// Settings branches are deep-merged by path. For secrets, the mask
    /// leaves the stored value untouched, an empty string removes it and
    /// anything else overwrites it.
    pub fn apply_patch(&self, patch: &Value) -> Result<Config, DomainError> {
        let patch = patch.as_object().ok_or_else(|| {
            DomainError::Validation("Config patch must be a JSON object".to_string())
        })?;

        let mut merged = self.clone();

        for (branch, value) in patch {
            match branch.as_str() {
                "ui" => merged.ui = merge_branch(&merged.ui, branch, value)?,
                "logging" => merged.logging = merge_branch(&merged.logging, branch, value)?,
                "prompts" => merged.prompts = merge_branch(&merged.prompts, branch, value)?,
                SECRETS_BRANCH => merge_secrets(&mut merged.env, value)?,
                other => {
                    return Err(DomainError::Validation(format!(
                        "Unknown settings branch: {}",
                        other
                    )))
                }
            }
        }

        merged.validate()?;
        Ok(merged)
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.ui.default_model.trim().is_empty() {
            return Err(DomainError::Validation(
                "ui.default_model must not be empty".to_string(),
            ));
        }
        if self.logging.retention_days > MAX_RETENTION_DAYS {
            return Err(DomainError::Validation(format!(
                "logging.retention_days must be at most {} (0 keeps history forever)",
                MAX_RETENTION_DAYS
            )));
        }
        Ok(())
    }
}

fn merge_branch<T>(current: &T, branch: &str, patch: &Value) -> Result<T, DomainError>
where
    T: Serialize + serde::de::DeserializeOwned,
{
    if !patch.is_object() {
        return Err(DomainError::Validation(format!(
            "Settings branch '{}' must be an object",
            branch
        )));
    }

    let mut base = serde_json::to_value(current)
        .map_err(|e| DomainError::Validation(format!("{}: {}", branch, e)))?;
    deep_merge(&mut base, patch);

    serde_json::from_value(base).map_err(|e| DomainError::Validation(format!("{}: {}", branch, e)))
}

fn deep_merge(base: &mut Value, patch: &Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, patch) => *base = patch.clone(),
    }
}

fn merge_secrets(env: &mut BTreeMap<String, String>, patch: &Value) -> Result<(), DomainError> {
    let patch: &Map<String, Value> = patch.as_object().ok_or_else(|| {
        DomainError::Validation(format!("Settings branch '{}' must be an object", SECRETS_BRANCH))
    })?;

    for (key, value) in patch {
        validate_secret_key(key)?;
        let value = value.as_str().ok_or_else(|| {
            DomainError::Validation(format!("Secret '{}' must be a string", key))
        })?;

        if value == SECRET_MASK {
            continue;
        }
        if value.is_empty() {
            env.remove(key);
        } else {
            env.insert(key.clone(), value.to_string());
        }
    }

    Ok(())
}

fn validate_secret_key(key: &str) -> Result<(), DomainError> {
    let mut chars = key.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "Invalid secret key (expected UPPER_SNAKE_CASE): {}",
            key
        )))
    }
}
