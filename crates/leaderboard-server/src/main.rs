//! Leaderboard server.
//!
//! Run with: cargo run -p leaderboard-server
//! Configure with `leaderboard.toml` (or the file named by
//! `LEADERBOARD_CONFIG`) and `LEADERBOARD_HOST` / `LEADERBOARD_PORT` /
//! `LEADERBOARD_DB`.

use std::process::ExitCode;

use leaderboard_config::DEFAULT_LOG_FILTER;
use leaderboard_server::console;
use leaderboard_server::server::{self, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config_path =
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = server::load_config(&config_path);

    let filter = match &config {
        Ok(config) => config.log.filter.as_str(),
        Err(_) => DEFAULT_LOG_FILTER,
    };
    console::init(filter);

    let config = match config {
        Ok(config) => config,
        Err(err) => {
            error!(path = %config_path, error = %err, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match server::serve(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "Server failed");
            ExitCode::FAILURE
        }
    }
}
