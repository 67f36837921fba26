//! Error types for the HTTP boundary.
//!
//! This is the only place errors become status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use leaderboard_config::ConfigError;
use leaderboard_core::StoreError;
use thiserror::Error;
use tracing::{error, warn};

/// Failure of a single request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is malformed; the store was not touched
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The store failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The blocking task running a store call panicked or was cancelled
    #[error("Store worker failed: {0}")]
    Worker(String),

    /// A response could not be encoded
    #[error("Response encoding failed: {0}")]
    Encode(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Store(_) | ApiError::Worker(_) | ApiError::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        } else {
            warn!(error = %self, "Request rejected");
        }
        // Error details stay in the log; clients get an empty body.
        status.into_response()
    }
}

/// Failure to start or run the server process.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
