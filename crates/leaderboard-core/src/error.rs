//! Error types for ranking store operations

use thiserror::Error;

/// Failure raised by a [`RankingStore`](crate::RankingStore).
///
/// An unknown player is not an error: lookups return `Ok(None)` for that.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing database could not be opened or initialized
    #[error("Failed to open store at {path}: {message}")]
    Open { path: String, message: String },

    /// A statement or transaction failed
    #[error("Database error: {0}")]
    Db(String),

    /// A persisted row could not be decoded
    #[error("Corrupt record: {0}")]
    Corrupt(String),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;
