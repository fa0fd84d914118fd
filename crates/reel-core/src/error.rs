//! Error types for reel-core

use thiserror::Error;

/// Result type alias using reel-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in reel-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Remote document store rejected the request
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required configuration is missing
    #[error("Not configured: {0}")]
    NotConfigured(String),
}
