//! Domain Services
//!
//! Stateless operations over domain entities.

pub mod analytics;
pub mod renderer;

pub use analytics::{
    summarize, summarize_at, AnalyticsSnapshot, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS,
};
pub use renderer::{placeholders, render, unresolved};
