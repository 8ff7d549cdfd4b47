//! Error types for the Fluxo service.

use thiserror::Error;

/// Main error type for Fluxo operations.
#[derive(Error, Debug)]
pub enum FluxoError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// A caller-supplied argument was rejected
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Movement store errors
    #[error("Store error: {0}")]
    Store(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Fluxo operations.
pub type Result<T> = std::result::Result<T, FluxoError>;
