//! Error types for Zarya

use thiserror::Error;

/// Result type alias using Zarya's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in Zarya operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration value outside of its valid range
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed configuration file
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
