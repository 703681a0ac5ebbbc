//! Error types for the progress_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for progress_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error (unknown sex or activity level, bad config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input outside its accepted numeric range
    #[error("Validation error: {0}")]
    Validation(String),

    /// Persisted record file is malformed
    #[error("Malformed record store: {0}")]
    Store(String),
}
