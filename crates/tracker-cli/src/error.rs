use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] tracker_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Work item title cannot be empty")]
    EmptyTitle,
    #[error("ID cannot be empty")]
    EmptyId,
    #[error("Not a valid ID: {0}")]
    InvalidId(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<tracker_core::config::ConfigError> for CliError {
    fn from(error: tracker_core::config::ConfigError) -> Self {
        Self::Config(error.to_string())
    }
}
