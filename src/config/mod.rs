//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (metadata keys, limits, etc.)
//! - Library configuration and CLI option types

mod cli;
mod constants;
mod types;

// Re-export all constants
pub use cli::{Cli, Command, SiteArgs};
pub use constants::*;
pub use types::{Config, LogFormat, LogLevel};
