//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Template: Category-addressed prompt text
//! - UsageRecord: Outcome of one model call
//! - Config: Settings tree and masked secrets

mod config;
mod template;
mod usage;

pub use config::*;
pub use template::*;
pub use usage::*;
