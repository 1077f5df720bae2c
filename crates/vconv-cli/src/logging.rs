//! Tracing setup for the CLI.
//!
//! Everything at the configured level goes to a daily-rolling file. The
//! console only shows warnings and errors (debug with `--verbose`) so log lines
//! do not drown the status output.

use std::path::Path;
use std::sync::OnceLock;

use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

pub fn init_logging(log_dir: &Path, level: &str, verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { level };
        EnvFilter::new(level)
    });

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(cfg!(debug_assertions))
        .with_target(false)
        .with_filter(console_level);

    // Best effort: an unwritable log dir only loses the file layer.
    let _ = std::fs::create_dir_all(log_dir);
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("vconv")
        .filename_suffix("log")
        .build(log_dir);

    let (file_layer, appender_error) = match appender {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false);
            (Some(layer), None)
        }
        Err(e) => (None, Some(e)),
    };

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer);

    // Avoid panics if already initialized.
    let _ = tracing::subscriber::set_global_default(subscriber);

    if let Some(e) = appender_error {
        tracing::warn!(
            "File logging disabled, cannot write to {}: {}",
            log_dir.display(),
            e
        );
    }
}
