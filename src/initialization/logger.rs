//! Logger initialization.
//!
//! Records on the [`AUDIT_TARGET`] target are the compliance trail of the
//! pipelines; both formats mark them so they can be told apart from diagnostics.

use std::io::Write;

use colored::*;
use log::{Level, LevelFilter};

use crate::audit::AUDIT_TARGET;
use crate::config::LogFormat;
use crate::error_handling::InitializationError;

/// Initializes `env_logger` with the given level and format.
///
/// `RUST_LOG` is read first and `level` then overrides it for this crate, so
/// `RUST_LOG=html5ever=debug` still works next to `--log-level`.
///
/// ```bash
/// RUST_LOG=debug seo_optimizer optimize site.json
///
/// # Only audit lines
/// seo_optimizer --log-format json optimize site.json 2>&1 | grep '"audit":true'
/// ```
///
/// # Errors
///
/// Returns [`InitializationError::LoggerError`] when a logger is already set.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    colored::control::set_override(true);

    let mut builder = env_logger::Builder::from_default_env();
    builder.filter_level(level);
    // html5ever reports every recovered parse error in post content
    builder.filter_module("html5ever", LevelFilter::Error);
    builder.filter_module("selectors", LevelFilter::Warn);
    builder.filter_module("seo_optimizer", level);
    // Audit lines survive --log-level warn
    builder.filter_module(AUDIT_TARGET, LevelFilter::Info);

    match format {
        LogFormat::Json => builder.format(|buf, record| {
            let line = json_line(
                chrono::Utc::now().timestamp_millis(),
                record.level(),
                record.target(),
                &record.args().to_string(),
            );
            writeln!(buf, "{}", line)
        }),
        LogFormat::Plain => builder.format(|buf, record| {
            let line = plain_line(record.level(), record.target(), &record.args().to_string());
            writeln!(buf, "{}", line)
        }),
    };

    // try_init so tests that initialize twice get an error instead of a panic
    builder.try_init()?;
    Ok(())
}

fn json_line(timestamp_millis: i64, level: Level, target: &str, message: &str) -> String {
    serde_json::json!({
        "ts": timestamp_millis,
        "level": level.as_str(),
        "target": target,
        "audit": target == AUDIT_TARGET,
        "msg": message,
    })
    .to_string()
}

fn plain_line(level: Level, target: &str, message: &str) -> String {
    if target == AUDIT_TARGET {
        return format!("📝 {} {}", target.magenta().bold(), message);
    }

    let (emoji, colored_level) = match level {
        Level::Error => ("❌", level.as_str().red()),
        Level::Warn => ("⚠️", level.as_str().yellow()),
        Level::Info => ("✔️", level.as_str().green()),
        Level::Debug => ("🔍", level.as_str().blue()),
        Level::Trace => ("🔬", level.as_str().purple()),
    };
    format!("{} {} [{}] {}", emoji, target.cyan(), colored_level, message)
}
