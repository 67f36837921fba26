//! Process bootstrap: configuration, store, listener.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use leaderboard_config::{ConfigError, ServerConfig};
use leaderboard_core::RankingStore;
use leaderboard_store::SqliteRankingStore;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::error::ServerError;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_ENV: &str = "LEADERBOARD_CONFIG";

/// Configuration file read when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "leaderboard.toml";

/// Loads the configuration file, falling back to defaults when it does
/// not exist, then applies environment overrides and validates.
pub fn load_config(path: impl AsRef<Path>) -> Result<ServerConfig, ConfigError> {
    let config = match ServerConfig::load(path.as_ref()) {
        Ok(config) => config,
        Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => ServerConfig::default(),
        Err(err) => return Err(err),
    };
    let config = config.with_env_overrides()?;
    config.validate()?;
    Ok(config)
}

/// Opens the store described by `config`, resetting it if configured to.
pub fn open_store(config: &ServerConfig) -> Result<SqliteRankingStore, ServerError> {
    let store = SqliteRankingStore::open(&config.database)?;
    if config.database.reset_on_start {
        store.reset()?;
    }
    Ok(store)
}

/// Serves the leaderboard until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let store = open_store(&config)?;
    let state = Arc::new(AppState::new(Arc::new(store)));
    let app = api::router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!(addr = %listener.local_addr()?, "Serving leaderboard");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Cannot listen for Ctrl-C, serving until killed");
        std::future::pending::<()>().await;
    }
}
