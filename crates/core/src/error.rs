//! Common error handling for the core crate

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Core error types shared by the client and the CLI
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid token: {message}")]
    InvalidToken { message: String },

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Credential storage failed: {message}")]
    Storage { message: String },

    #[error("Unrecognized response envelope: {message}")]
    Envelope { message: String },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid token error
    pub fn invalid_token(message: impl Into<String>) -> Self {
        Self::InvalidToken {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create an envelope error
    pub fn envelope(message: impl Into<String>) -> Self {
        Self::Envelope {
            message: message.into(),
        }
    }
}
