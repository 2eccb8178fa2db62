//! PromptDeck API Models
//!
//! - Template: prompt library entries and render requests
//! - Usage: ledger records and query parameters
//! - Analytics: ledger summary
//! - Execute: model invocation
//! - Config: settings tree with masked secrets

mod analytics;
mod config;
mod execute;
mod template;
mod usage;

pub use analytics::*;
pub use config::*;
pub use execute::*;
pub use template::*;
pub use usage::*;
