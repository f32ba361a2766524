//! Error types for the application

use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid rate schedule: {0}")]
    InvalidSchedule(String),

    #[error("No tariff schedule for {0}")]
    UnknownTariff(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("Feed error: {0}")]
    Feed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;
