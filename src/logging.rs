//! File-based logging module for browse-rs
//!
//! This module sets up tracing-based logging that writes to a file instead of stdout,
//! since the application uses a TUI that occupies the terminal.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const LOG_DIR: &str = ".logs";
const LOG_FILE_PREFIX: &str = "browse-rs";

/// Initialize the logging system.
///
/// Logs are written to `.logs/browse-rs.YYYY-MM-DD.log` with daily rotation.
/// The log level can be controlled via the `RUST_LOG` environment variable.
///
/// Default log levels:
/// - `browse_rs` modules: DEBUG
/// - `reqwest`: INFO
/// - Other crates: WARN
///
/// The returned guard flushes the background writer when dropped, so keep it
/// alive until shutdown.
pub fn init_logging() -> anyhow::Result<WorkerGuard> {
    let log_dir = Path::new(LOG_DIR);
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, LOG_DIR, LOG_FILE_PREFIX);

    // Non-blocking so slow disks never stall the event loop
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("browse_rs=debug,reqwest=info,warn"));

    let fmt_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::info!("Logging initialized - logs written to {}/", LOG_DIR);

    Ok(guard)
}

/// Log the outcome of a service call
#[macro_export]
macro_rules! log_service_result {
    ($operation:expr, $result:expr) => {
        match &$result {
            Ok(_) => tracing::debug!(operation = $operation, "Service call successful"),
            Err(e) => tracing::error!(operation = $operation, error = %e, "Service call failed"),
        }
    };
}

/// Log a service call with additional context
#[macro_export]
macro_rules! log_service_request {
    ($operation:expr, $($field:tt)*) => {
        tracing::debug!(operation = $operation, $($field)*, "Service call started");
    };
}
