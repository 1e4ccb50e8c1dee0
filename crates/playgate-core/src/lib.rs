//! playgate-core: shared errors, configuration, and path sanitization.
//!
//! This crate is the foundational dependency for the playgate server and
//! CLI, providing a unified error type, application configuration, and
//! the sanitization rules applied to every request-derived path
//! component.

pub mod config;
pub mod error;
pub mod sanitize;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
