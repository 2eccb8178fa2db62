//! PromptDeck Domain Library
//!
//! Core domain types and interfaces for the PromptDeck prompt library and
//! usage ledger.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Template, UsageRecord, Config)
//!   - `value_objects/`: Immutable value types (TemplateAddress, StatusFilter)
//!   - `services/`: Pure functions (renderer, analytics)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Template store, usage ledger, config store
//!   - `services/`: Model executor
//!
//! # Usage
//!
//! ```rust,ignore
//! use promptdeck::domain::{render, Template, TemplateAddress};
//! use promptdeck::ports::{TemplateRepository, UsageLedger};
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    placeholders, render, summarize, summarize_at, unresolved, AnalyticsSnapshot, Config,
    DomainError, LoggingSettings, PromptSettings, StatusFilter, Template, TemplateAddress,
    TemplateSummary, UiSettings, UsageFilter, UsageRecord, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS,
    MAX_RETENTION_DAYS, SECRET_MASK, TIMEOUT_ERROR,
};
pub use ports::{
    ConfigRepository, ExecutionOutput, ModelExecutor, TemplateRepository, UsageLedger,
};
