//! File logging.
//!
//! The terminal belongs to the TUI, so events go to `<data dir>/logs` through
//! a non-blocking writer. `SHADOWING_LOG` overrides the configured filter.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

pub const LOG_ENV: &str = "SHADOWING_LOG";

/// Build the filter from `SHADOWING_LOG`, else the configured level, else `info`.
fn filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .ok()
        .or_else(|| EnvFilter::try_new(&settings.level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// Install the global subscriber writing to `log_dir`.
///
/// Returns the appender guard, which must be held until shutdown so buffered
/// lines are flushed. `None` when logging is disabled or a subscriber is
/// already installed.
pub fn init(settings: &LoggingSettings, log_dir: &Path) -> std::io::Result<Option<WorkerGuard>> {
    if !settings.enabled {
        return Ok(None);
    }

    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::never(log_dir, &settings.file_name);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let installed = tracing_subscriber::fmt()
        .with_writer(file_writer)
        .with_target(true)
        .with_level(true)
        .with_ansi(false)
        .with_env_filter(filter(settings))
        .try_init()
        .is_ok();

    Ok(installed.then_some(guard))
}
