//! Error types for citeline.
//!
//! The normalization pipeline itself is total and never produces an error.
//! Everything here belongs to the surrounding layers: configuration, file and
//! stdin I/O, and the network boundary to the answer backend.

use thiserror::Error;

/// Unified error type for the citeline crates.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend rejected the request or could not be reached.
    ///
    /// `status` is `None` when no HTTP response was received at all.
    #[error("Backend error{}: {message}", status_suffix(.status))]
    Backend {
        status: Option<u16>,
        message: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({})", s)).unwrap_or_default()
}

impl AppError {
    /// Backend failure without an HTTP status (transport, timeout, stream).
    pub fn backend(message: impl Into<String>) -> Self {
        AppError::Backend {
            status: None,
            message: message.into(),
        }
    }

    /// Backend answered with a non-success status.
    pub fn backend_status(status: u16, message: impl Into<String>) -> Self {
        AppError::Backend {
            status: Some(status),
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
