//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod status_filter;
mod template_address;

pub use status_filter::*;
pub use template_address::*;
