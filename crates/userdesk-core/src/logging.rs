//! File logging.
//!
//! The TUI owns the terminal, so logs always go to
//! `${USERDESK_HOME}/logs/userdesk.log`. Verbosity comes from `USERDESK_LOG`
//! (an `EnvFilter` directive string), defaulting to `info`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::paths;

/// Environment variable holding the filter directives.
pub const LOG_ENV: &str = "USERDESK_LOG";

const LOG_FILE: &str = "userdesk.log";
const DEFAULT_DIRECTIVE: &str = "info";

/// Installs the global subscriber writing to the default logs directory.
///
/// Keep the returned guard alive until exit so buffered lines are flushed.
///
/// # Errors
/// Returns an error if the logs directory cannot be created or a subscriber
/// is already installed.
pub fn init() -> Result<WorkerGuard> {
    init_in(&paths::logs_dir()?)
}

/// Same as [`init`] with an explicit directory.
///
/// # Errors
/// See [`init`].
pub fn init_in(dir: &Path) -> Result<WorkerGuard> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create logs directory '{}'", dir.display()))?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install log subscriber: {e}"))?;

    Ok(guard)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}
