use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Env var holding an `EnvFilter` directive (e.g. `todo=debug`)
pub const LOG_FILTER_ENV: &str = "TODO_LOG";
/// Env var naming a directory to write `todo.<pid>.log` into
pub const LOG_DIR_ENV: &str = "TODO_LOG_DIR";

/// Where diagnostics go when no log directory is configured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSink {
    /// CLI runs: warnings and errors on stderr
    Stderr,
    /// The TUI owns the terminal, so nothing is written
    Silent,
}

fn filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global tracing subscriber. Safe to call more than once.
pub fn init(sink: LogSink) {
    if let Some(log_dir) = std::env::var_os(LOG_DIR_ENV).map(PathBuf::from)
        && fs::create_dir_all(&log_dir).is_ok()
    {
        let log_path = log_dir.join(format!("todo.{}.log", std::process::id()));
        if let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_path) {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true);
            let _ = tracing_subscriber::registry()
                .with(filter("todo=debug"))
                .with(file_layer)
                .try_init();
            return;
        }
    }

    if sink == LogSink::Stderr {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter("todo=warn"))
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .try_init();
    }
}
