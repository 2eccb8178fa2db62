//! Filesystem Repository Implementations

mod config_repository;
mod template_repository;
mod usage_ledger;

pub use config_repository::FsConfigRepository;
pub use template_repository::FsTemplateRepository;
pub use usage_ledger::JsonlUsageLedger;
