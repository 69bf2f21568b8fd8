//! Error types for the Stow engine.

use crate::EntityId;
use thiserror::Error;

/// All possible errors from the Stow engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error("entity not found: {0}")]
    NotFound(EntityId),

    #[error("duplicate entity id: {0}")]
    DuplicateId(EntityId),

    // Persistence errors
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{}", transport_message(.status, .message))]
    Transport {
        status: Option<u16>,
        message: String,
    },
}

impl Error {
    /// Build a validation error for `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Build a transport error without an HTTP status (connection failures).
    pub fn transport(message: impl Into<String>) -> Self {
        Error::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Whether the error was raised before any state was touched.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. } | Error::NotFound(_) | Error::DuplicateId(_)
        )
    }
}

fn transport_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("transport error ({code}): {message}"),
        None => format!("transport error: {message}"),
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
