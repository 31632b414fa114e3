//! Application initialization.
//!
//! Logger setup for the binary. Component wiring lives in [`crate::plugin`].

mod logger;

// Re-export public API
pub use logger::init_logger_with;
