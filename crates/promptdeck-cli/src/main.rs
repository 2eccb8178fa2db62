//! PromptDeck CLI - Template library, usage and analytics
//!
//! Talks to a running PromptDeck API server.

mod api;
mod config;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialoguer::{Confirm, Input};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;

use api::{ExecuteRequest, PromptDeckClient};
use config::Config;

#[derive(Parser)]
#[command(name = "promptdeck")]
#[command(about = "PromptDeck CLI - Prompt templates, usage and analytics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the API base URL and test the connection
    Login {
        /// Base URL (will prompt if not provided)
        #[arg(short, long)]
        url: Option<String>,
    },

    /// Manage prompt templates
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// List recorded model calls
    Usage {
        /// Match prompt reference, model or input
        #[arg(short, long)]
        search: Option<String>,
        /// all, success or error
        #[arg(long)]
        status: Option<String>,
        /// Max results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show cost, token and success-rate summary
    Stats {
        /// Trailing window in days
        #[arg(short, long)]
        window: Option<u32>,
    },

    /// Execute a template or ad-hoc prompt
    Run {
        /// Ad-hoc prompt text (or use -t for a stored template)
        prompt: Option<String>,
        /// Template address (category/name)
        #[arg(short, long)]
        template: Option<String>,
        /// Model identifier
        #[arg(short, long)]
        model: Option<String>,
        /// Variable binding (key=value), repeatable
        #[arg(short = 'v', long = "var", value_parser = parse_binding)]
        vars: Vec<(String, String)>,
    },

    /// Dashboard settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// List all templates
    List,
    /// Print a template's content
    Show {
        /// Template address (category/name)
        address: String,
    },
    /// Create or overwrite a template
    Put {
        /// Template address (category/name)
        address: String,
        /// Content (or use -f for file)
        content: Option<String>,
        /// Read content from file
        #[arg(short, long)]
        file: Option<String>,
    },
    /// Delete a template
    Delete {
        /// Template address (category/name)
        address: String,
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Render a template without executing it
    Render {
        /// Template address (category/name)
        address: String,
        /// Variable binding (key=value), repeatable
        #[arg(short = 'v', long = "var", value_parser = parse_binding)]
        vars: Vec<(String, String)>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show local CLI config and server settings
    Show,
    /// Set a server setting, e.g. `ui.theme light` or `env.OPENAI_API_KEY sk-...`
    Set {
        /// Dotted path (branch.key)
        path: String,
        /// Value (JSON literal, or plain string)
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { url } => cmd_login(url).await,
        Commands::Template { action } => cmd_template(action).await,
        Commands::Usage { search, status, limit } => cmd_usage(search, status, limit).await,
        Commands::Stats { window } => cmd_stats(window).await,
        Commands::Run { prompt, template, model, vars } => cmd_run(prompt, template, model, vars).await,
        Commands::Config { action } => cmd_config(action).await,
    }
}

fn client() -> Result<(Config, PromptDeckClient)> {
    let config = Config::load()?;
    let client = PromptDeckClient::new(&config.base_url);
    Ok((config, client))
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let base_url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("API base URL")
            .default(config.base_url.clone())
            .interact_text()
            .context("Failed to read base URL")?,
    };

    let client = PromptDeckClient::new(&base_url);
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to PromptDeck API at {}", base_url);
        }
    }

    config.set_base_url(&base_url);
    config.save()?;

    println!("{} Base URL saved to {:?}", "✓".green(), Config::config_path()?);

    Ok(())
}

async fn cmd_template(action: TemplateAction) -> Result<()> {
    let (_, client) = client()?;

    match action {
        TemplateAction::List => {
            let templates = client.list_templates().await?;

            if templates.is_empty() {
                println!("No templates found.");
                println!("\n{}", "Add one with:".dimmed());
                println!("  promptdeck template put custom/<name> \"Hello {{{{name}}}}\"");
                return Ok(());
            }

            println!("{}", "Templates:".bold());
            let mut current_category = String::new();
            for template in templates {
                if template.category != current_category {
                    println!("  {}", template.category.cyan().bold());
                    current_category = template.category.clone();
                }
                println!(
                    "    {} {}",
                    template.name.cyan(),
                    truncate_string(&template.preview.replace('\n', " "), 60).dimmed()
                );
            }
        }

        TemplateAction::Show { address } => {
            let (category, name) = split_address(&address)?;
            let template = client.get_template(category, name).await?;

            eprintln!(
                "{} {}/{} {}",
                "Template".dimmed(),
                template.category.cyan(),
                template.name.cyan().bold(),
                if template.variables.is_empty() {
                    String::new()
                } else {
                    format!("[{}]", template.variables.join(", ")).dimmed().to_string()
                }
            );
            eprintln!("{}", "---".dimmed());

            // Content to stdout (clean for piping)
            println!("{}", template.content);
        }

        TemplateAction::Put { address, content, file } => {
            let (category, name) = split_address(&address)?;

            let content = match (content, file) {
                (Some(c), None) => c,
                (None, Some(f)) => {
                    fs::read_to_string(&f).with_context(|| format!("Failed to read file: {}", f))?
                }
                (Some(_), Some(_)) => {
                    bail!("Cannot specify both content and --file");
                }
                (None, None) => Input::new()
                    .with_prompt("Template content")
                    .interact_text()
                    .context("Failed to read input")?,
            };

            let template = client.put_template(category, name, &content).await?;

            println!(
                "{} Saved {}/{}",
                "✓".green(),
                template.category.cyan(),
                template.name.cyan()
            );
            if !template.variables.is_empty() {
                println!("  Variables: {}", template.variables.join(", ").dimmed());
            }
        }

        TemplateAction::Delete { address, yes } => {
            let (category, name) = split_address(&address)?;

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete template {}?", address))
                    .default(false)
                    .interact()
                    .context("Failed to read confirmation")?;
                if !confirmed {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            client.delete_template(category, name).await?;
            println!("{} Deleted {}", "✓".green(), address.cyan());
        }

        TemplateAction::Render { address, vars } => {
            let (category, name) = split_address(&address)?;
            let variables: HashMap<String, String> = vars.into_iter().collect();

            let result = client.render_template(category, name, &variables).await?;

            if !result.unresolved.is_empty() {
                eprintln!(
                    "{} {}",
                    "Unresolved:".yellow(),
                    result.unresolved.join(", ")
                );
            }
            println!("{}", result.rendered);
        }
    }

    Ok(())
}

async fn cmd_usage(search: Option<String>, status: Option<String>, limit: Option<usize>) -> Result<()> {
    let (_, client) = client()?;

    let records = client
        .list_usage(search.as_deref(), status.as_deref(), limit)
        .await?;

    if records.is_empty() {
        println!("No usage records found.");
        return Ok(());
    }

    println!("{} records:", records.len().to_string().green());
    for record in records {
        let outcome = if record.success {
            "ok".green()
        } else {
            record.error.as_deref().unwrap_or("error").red()
        };

        let short_id: String = record.id.to_string().chars().take(8).collect();
        println!(
            "  {} {} {} {} {} tokens ${:.6} {}ms {}",
            short_id.dimmed(),
            record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            record.model.cyan(),
            record.prompt_ref.as_deref().unwrap_or("-").dimmed(),
            record.tokens,
            record.cost,
            record.duration_ms,
            outcome
        );
    }

    Ok(())
}

async fn cmd_stats(window: Option<u32>) -> Result<()> {
    let (_, client) = client()?;
    let stats = client.analytics(window).await?;

    let rate = stats.success_rate.to_string() + "%";
    let rate = if stats.success_rate >= 90 {
        rate.green()
    } else if stats.success_rate >= 50 {
        rate.yellow()
    } else {
        rate.red()
    };

    println!("{}", "Usage summary:".bold());
    println!("  Calls:        {}", stats.total_calls);
    println!("  Tokens:       {}", stats.total_tokens);
    println!("  Cost:         ${:.6}", stats.total_cost);
    println!("  Success rate: {}", rate);
    println!("  Avg duration: {}ms", stats.avg_duration_ms);

    if !stats.model_usage.is_empty() {
        println!("\n{}", "By model:".bold());
        for (model, calls) in &stats.model_usage {
            println!("  {} {}", model.cyan(), calls);
        }
    }

    println!(
        "\n{} {}",
        "Calls per day since".bold(),
        stats.window_start.to_string().dimmed()
    );
    let peak = stats.calls_per_day.iter().copied().max().unwrap_or(0);
    for (offset, calls) in stats.calls_per_day.iter().enumerate() {
        let day = stats.window_start + chrono::Days::new(offset as u64);
        println!("  {} {} {}", day.format("%m-%d"), bar(*calls, peak, 30), calls);
    }

    Ok(())
}

async fn cmd_run(
    prompt: Option<String>,
    template: Option<String>,
    model: Option<String>,
    vars: Vec<(String, String)>,
) -> Result<()> {
    let (config, client) = client()?;

    if prompt.is_some() == template.is_some() {
        bail!("Give either a prompt or --template, not both");
    }
    if let Some(address) = &template {
        split_address(address)?;
    }

    let request = ExecuteRequest {
        template,
        prompt,
        model: model.or(config.default_model),
        variables: vars.into_iter().collect(),
    };

    let result = client.execute(&request).await?;
    let record = result.record;

    eprintln!(
        "{} {} {} tokens ${:.6} {}ms",
        if record.success { "✓".green() } else { "✗".red() },
        record.model.cyan(),
        record.tokens,
        record.cost,
        record.duration_ms
    );

    match result.response {
        Some(response) => println!("{}", response),
        None => bail!(
            "Call failed: {}",
            record.error.as_deref().unwrap_or("unknown error")
        ),
    }

    Ok(())
}

async fn cmd_config(action: ConfigAction) -> Result<()> {
    let (config, client) = client()?;

    match action {
        ConfigAction::Show => {
            println!("{}", "CLI configuration:".bold());
            println!("  Path: {:?}", Config::config_path()?);
            println!("  Base URL: {}", config.base_url);
            println!(
                "  Default model: {}",
                config.default_model.as_deref().unwrap_or("(server default)").cyan()
            );

            let settings = client.get_config().await?;
            println!("\n{}", "Server settings:".bold());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }

        ConfigAction::Set { path, value } => {
            let patch = build_patch(&path, &value)?;
            client.update_config(&patch).await?;
            println!("{} {} updated", "✓".green(), path.cyan());
        }
    }

    Ok(())
}

// ============================================
// Helpers
// ============================================

/// Split "category/name"
fn split_address(address: &str) -> Result<(&str, &str)> {
    match address.split_once('/') {
        Some((category, name)) if !category.is_empty() && !name.is_empty() => Ok((category, name)),
        _ => bail!("Template address must be <category>/<name>: {}", address),
    }
}

/// Parse a `key=value` variable binding
fn parse_binding(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Expected key=value, got '{}'", raw)),
    }
}

/// Turn `a.b.c` + value into `{"a": {"b": {"c": value}}}`.
/// Secret values under `env` are always strings.
fn build_patch(path: &str, raw: &str) -> Result<Value> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.len() < 2 || segments.iter().any(|s| s.is_empty()) {
        bail!("Setting path must look like <branch>.<key>: {}", path);
    }

    let mut value = if segments[0] == "env" {
        Value::String(raw.to_string())
    } else {
        serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
    };

    for segment in segments.iter().rev() {
        let mut map = Map::new();
        map.insert(segment.to_string(), value);
        value = Value::Object(map);
    }

    Ok(value)
}

fn bar(value: u64, peak: u64, width: usize) -> String {
    if peak == 0 {
        return String::new();
    }
    let filled = ((value as f64 / peak as f64) * width as f64).round() as usize;
    "█".repeat(filled)
}

/// Truncate string safely for UTF-8 (by char count, not bytes)
fn truncate_string(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        format!("{}...", chars.into_iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_patch_nests_and_parses() {
        assert_eq!(
            build_patch("logging.retention_days", "7").unwrap(),
            json!({ "logging": { "retention_days": 7 } })
        );
        assert_eq!(
            build_patch("ui.theme", "light").unwrap(),
            json!({ "ui": { "theme": "light" } })
        );
        assert_eq!(
            build_patch("ui.show_costs", "false").unwrap(),
            json!({ "ui": { "show_costs": false } })
        );
    }

    #[test]
    fn test_build_patch_keeps_secrets_as_strings() {
        assert_eq!(
            build_patch("env.PORT_KEY", "1234").unwrap(),
            json!({ "env": { "PORT_KEY": "1234" } })
        );
    }

    #[test]
    fn test_build_patch_rejects_bare_branch() {
        assert!(build_patch("ui", "x").is_err());
        assert!(build_patch("ui..theme", "x").is_err());
    }

    #[test]
    fn test_parse_binding() {
        assert_eq!(
            parse_binding("text=a=b").unwrap(),
            ("text".to_string(), "a=b".to_string())
        );
        assert!(parse_binding("novalue").is_err());
    }

    #[test]
    fn test_split_address() {
        assert_eq!(split_address("custom/greet").unwrap(), ("custom", "greet"));
        assert!(split_address("greet").is_err());
        assert!(split_address("/greet").is_err());
    }

    #[test]
    fn test_truncate_and_bar() {
        assert_eq!(truncate_string("héllo wörld", 5), "héllo...");
        assert_eq!(bar(5, 10, 10), "█████");
        assert_eq!(bar(0, 0, 10), "");
    }
}
