//! Configuration types shared by the binary and the library.

use std::path::PathBuf;

use clap::ValueEnum;

use crate::config::constants::{DEFAULT_REPORTS_DIR, ENCRYPTION_KEY_ENV};

/// Verbosity of the process log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Default; includes the audit trail
    Info,
    /// Adds pipeline details
    Debug,
    /// Everything
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Shape of process log lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Colored, one record per line
    Plain,
    /// One JSON object per line, with an `audit` flag
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Used by [`crate::SeoPlugin`] to wire its components together.
///
/// # Examples
///
/// ```no_run
/// use seo_optimizer::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     site_url: Some("https://example.com".to_string()),
///     audit_log: Some(PathBuf::from("seo-audit.log")),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Public URL of the site; links on this host count as internal
    pub site_url: Option<String>,

    /// Directory receiving generated reports
    pub reports_dir: PathBuf,

    /// Append-only audit log file (audit lines always go to the process log)
    pub audit_log: Option<PathBuf>,

    /// Key material for encryption and nonces (at least 32 bytes)
    pub encryption_key: Option<String>,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,
}

impl Config {
    /// Fills unset secrets from the process environment.
    pub fn with_env(mut self) -> Self {
        if self.encryption_key.is_none() {
            self.encryption_key = std::env::var(ENCRYPTION_KEY_ENV)
                .ok()
                .filter(|key| !key.is_empty());
        }
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_url: None,
            reports_dir: PathBuf::from(DEFAULT_REPORTS_DIR),
            audit_log: None,
            encryption_key: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}
