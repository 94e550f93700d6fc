//! Error types for tracker-core

use thiserror::Error;

/// Result type alias using tracker-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tracker-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// `SQLite` error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The record store cannot be queried right now
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// The calling context was cancelled or its deadline expired
    #[error("Search cancelled")]
    Cancelled,
}

impl Error {
    /// True when retrying the same call may succeed without operator action.
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
