//! Structured logging for tt.
//!
//! The terminal belongs to the typing UI while a test runs, so log records
//! go to `tt.log` in the state directory instead of stderr. The filter is
//! read from `TT_LOG` (for example `TT_LOG=tt=debug`) and defaults to
//! `tt=info`.

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app_dirs::AppDirs;

const LOG_FILE: &str = "tt.log";

/// Initialize the global tracing subscriber.
///
/// Returns the guard of the background writer; keep it alive until exit so
/// buffered records are flushed. Returns `None` when there is no state
/// directory or a subscriber is already installed.
pub fn init() -> Option<WorkerGuard> {
    let dir = AppDirs::state_dir()?;
    std::fs::create_dir_all(&dir).ok()?;

    let filter = EnvFilter::try_from_env("TT_LOG").unwrap_or_else(|_| EnvFilter::new("tt=info"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, LOG_FILE));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .ok()?;

    Some(guard)
}
