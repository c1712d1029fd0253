//! File-based tracing setup.
//!
//! The TUI owns stdout, so logs go to rolling files under the palaver home.
//! Filtering is controlled with the PALAVER_LOG env var (env-filter syntax).

use std::fs;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::paths;

/// Initializes file logging and returns the flush guard.
///
/// The guard must be kept alive for the lifetime of the process; dropping it
/// stops the background writer. Returns None when the log directory cannot be
/// created or a subscriber is already installed (tests).
pub fn init() -> Option<WorkerGuard> {
    let dir = paths::logs_dir();
    fs::create_dir_all(&dir).ok()?;

    let appender = tracing_appender::rolling::daily(dir, "palaver.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_env("PALAVER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .ok()?;

    Some(guard)
}
