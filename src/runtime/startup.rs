use std::path::PathBuf;

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::config;
use crate::error::Result;
use crate::logging;
use crate::session::{SessionReconciler, SqliteStore};

/// Effective settings, plus why defaults were used instead of the config
/// file when that happened. A broken config never stops the app.
pub fn load_settings() -> (config::Settings, Option<String>) {
    let fallback = match config::Settings::load() {
        Ok(settings) => match settings.validate() {
            Ok(()) => return (settings, None),
            Err(msg) => format!("invalid config, using defaults: {msg}"),
        },
        Err(e) => format!("failed to load config, using defaults: {e}"),
    };
    eprintln!("shadowing: {fallback}");
    (config::Settings::default(), Some(fallback))
}

/// Repeat a config fallback in the log once the subscriber is installed.
pub fn report_fallback(fallback: Option<&str>) {
    if let Some(reason) = fallback {
        let path = config::resolve_config_path();
        warn!(config = ?path, "{reason}");
    }
}

/// Start file logging under `<data dir>/logs`. Failures are reported on stderr
/// and never stop the app.
pub fn start_logging(settings: &config::Settings) -> Option<WorkerGuard> {
    let log_dir = settings.storage.data_dir().join("logs");
    match logging::init(&settings.logging, &log_dir) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!(
                "shadowing: could not create log directory {}: {e}",
                log_dir.display()
            );
            None
        }
    }
}

/// Open the session database and the managed audio directory.
pub fn open_sessions(settings: &config::Settings) -> Result<SessionReconciler<SqliteStore>> {
    let db_path = settings.storage.database_path();
    let store = SqliteStore::open(&db_path)?;
    let audio_dir = settings.storage.audio_path();
    info!(
        database = %db_path.display(),
        audio = %audio_dir.display(),
        "session storage ready"
    );
    Ok(SessionReconciler::new(store, audio_dir))
}

/// Directory the chooser lists: the CLI argument, then `ui.start_dir`, then
/// the working directory.
pub fn library_dir(arg: Option<String>, settings: &config::Settings) -> PathBuf {
    arg.map(PathBuf::from)
        .or_else(|| settings.ui.start_dir.clone())
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}
