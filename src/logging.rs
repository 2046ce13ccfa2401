//! Structured logging: JSONL to a cache file, compact text to stderr.
//!
//! stdout is reserved for the result document (Alfred parses it), so every
//! diagnostic goes to stderr or the log file. The file layer uses a
//! non-blocking writer; the returned guard must stay alive until exit or the
//! tail of the log is lost.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Keep this alive for the duration of the program; dropping it flushes the
/// file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

pub fn init() -> LoggingGuard {
    let log_path = log_dir().join("winhop.jsonl");

    let file: Box<dyn Write + Send> = match log_path
        .parent()
        .map(std::fs::create_dir_all)
        .transpose()
        .and_then(|_| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
        }) {
        Ok(file) => Box::new(file),
        Err(err) => {
            eprintln!("[winhop] cannot open log file {}: {err}", log_path.display());
            Box::new(std::io::sink())
        }
    };

    let (file_writer, file_guard) = tracing_appender::non_blocking(file);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_layer = fmt::layer()
        .json()
        .with_writer(file_writer)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_target(true)
        .with_level(true)
        .with_file(false)
        .with_line_number(false);

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(stderr_layer)
        .init();

    tracing::debug!(log_path = %log_path.display(), "logging initialized");

    LoggingGuard {
        _file_guard: file_guard,
    }
}

/// Log directory under the user cache dir, falling back to the temp dir.
fn log_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("winhop")
        .join("logs")
}
