use clap::Parser;
use client::{AppState, ApiError, cli::Cli};
use colored::Colorize;
use common::{config::Config, logger::init_logging};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration and initialize logging
    let config = Config::init(&cli.env);
    let _log_guard = init_logging(config, &config.state_dir.join("logs"));

    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("{} {e}", "error".red());
            return ExitCode::FAILURE;
        }
    };

    match client::cli::run(cli, &state).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            let message = match e.downcast_ref::<ApiError>() {
                Some(api) => api.user_message(),
                None => e.to_string(),
            };
            eprintln!("{} {message}", "failed".red());
            ExitCode::FAILURE
        }
    }
}
