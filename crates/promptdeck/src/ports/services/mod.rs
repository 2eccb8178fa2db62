//! Service Ports
//!
//! Abstract interfaces for external services.

mod model_executor;

pub use model_executor::*;
