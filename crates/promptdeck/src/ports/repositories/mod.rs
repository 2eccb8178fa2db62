//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod config_repository;
mod template_repository;
mod usage_ledger;

pub use config_repository::*;
pub use template_repository::*;
pub use usage_ledger::*;
