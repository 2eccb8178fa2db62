//! Infrastructure Adapters
//!
//! Implementations of domain ports for storage backends and model calls.

pub mod executor;
pub mod fs;
pub mod memory;

// Re-exports
pub use executor::StubExecutor;
pub use fs::{FsConfigRepository, FsTemplateRepository, JsonlUsageLedger};
pub use memory::{InMemoryConfigRepository, InMemoryTemplateRepository, InMemoryUsageLedger};
