use std::{fs, path::Path};
use tracing_appender::{non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::Config;

/// Installs the global tracing subscriber: a daily rolling file under `log_dir`,
/// plus stdout when `LOG_TO_STDOUT=true`.
///
/// Keep the returned guard alive for the life of the process, otherwise buffered
/// file output is lost on exit.
pub fn init_logging(config: &Config, log_dir: &Path) -> WorkerGuard {
    fs::create_dir_all(log_dir).ok();

    let file_appender = rolling::daily(log_dir, &config.log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true);

    let env_filter = EnvFilter::try_new(&config.log_level)
        .unwrap_or_else(|_| EnvFilter::new("client=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    // A subscriber may already be installed (tests, embedding apps); keep theirs.
    let installed = if config.log_to_stdout {
        let stdout_layer = fmt::layer()
            .with_writer(std::io::stdout)
            .with_ansi(true)
            .with_target(true);
        registry.with(stdout_layer).try_init()
    } else {
        registry.try_init()
    };

    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed; skipping");
    }

    guard
}
