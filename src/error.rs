//! Error types for the debate arena

use thiserror::Error;

/// Result type alias for debate arena operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the debate arena
///
/// Completion-service failures only surface through this type at the client
/// layer. Agents convert them into [`crate::agent::Completion::Failed`] so a
/// debate keeps going with the error text standing in for an argument.
#[derive(Debug, Error)]
pub enum Error {
    /// The chat-completion service answered with a failure
    #[error("Completion service error: {0}")]
    Completion(String),

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An orchestrator operation was called in a phase that forbids it
    #[error("Invalid debate state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a completion-service error
    pub fn completion(msg: impl Into<String>) -> Self {
        Self::Completion(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid-state error
    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::InvalidState(msg.into())
    }

    /// Create an other error
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::completion("Request failed with status 429");
        assert_eq!(
            err.to_string(),
            "Completion service error: Request failed with status 429"
        );

        let err = Error::invalid_state("debate already started");
        assert_eq!(err.to_string(), "Invalid debate state: debate already started");
    }
}
