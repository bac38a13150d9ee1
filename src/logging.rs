use std::path::{Path, PathBuf};

use codepad::kernel::services::adapters::DataDirs;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "codepad.log";
const DEFAULT_FILTER: &str = "codepad=info";

/// Keeps the non-blocking log writer alive for one CLI invocation.
pub struct LoggingGuard {
    _flush: WorkerGuard,
    log_dir: PathBuf,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }
}

/// Routes `tracing` into `<data>/logs/codepad.log.<date>`. Logging is
/// optional for the CLI: any setup failure yields `None`.
pub fn init(dirs: &DataDirs) -> Option<LoggingGuard> {
    let log_dir = dirs
        .ensure_log_dir()
        .or_else(|_| DataDirs::at(std::env::temp_dir().join("codepad")).ensure_log_dir())
        .ok()?;

    let (writer, flush) =
        tracing_appender::non_blocking(tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .try_init()
        .ok()?;

    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "codepad panicked");
    }));

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        data_dir = %dirs.root().display(),
        log_dir = %log_dir.display(),
        "codepad session started"
    );

    Some(LoggingGuard {
        _flush: flush,
        log_dir,
    })
}
