//! Custom error types for Gate.
//!
//! This module provides a centralized error handling system with specific error types
//! for the claim store, the Mazoku API client and configuration loading.

use std::fmt;

/// Main error type for Gate operations.
#[derive(Debug)]
pub enum GateError {
    /// Configuration errors (missing env vars, invalid values)
    Config(String),
    /// Claim store errors
    Database(String),
    /// Mazoku API errors (unexpected status, malformed payload)
    MazokuApi(String),
    /// Mazoku answered with a status that means its servers are down
    ServersUnavailable(u16),
    /// Network/HTTP errors
    Network(String),
    /// Validation errors (bad print numbers, empty ids, etc.)
    Validation(String),
    /// Generic I/O errors
    Io(std::io::Error),
    /// Invalid input errors
    InvalidInput(String),
}

impl GateError {
    /// Whether this error should be shown as "Mazoku servers unavailable"
    /// rather than a generic failure.
    pub fn is_servers_unavailable(&self) -> bool {
        matches!(self, Self::ServersUnavailable(_))
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::MazokuApi(msg) => write!(f, "Mazoku API error: {}", msg),
            Self::ServersUnavailable(status) => {
                write!(f, "Mazoku servers are unavailable (HTTP {})", status)
            }
            Self::Network(msg) => write!(f, "Network error: {}", msg),
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
            Self::Io(err) => write!(f, "I/O error: {}", err),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for GateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GateError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GateError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rusqlite::Error> for GateError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<reqwest::Error> for GateError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

impl From<serde_json::Error> for GateError {
    fn from(err: serde_json::Error) -> Self {
        Self::MazokuApi(format!("JSON parsing error: {}", err))
    }
}

impl From<std::env::VarError> for GateError {
    fn from(err: std::env::VarError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<tokio::task::JoinError> for GateError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Database(format!("Task join error: {}", err))
    }
}

/// Result type alias for Gate operations.
pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_servers_unavailable_classification() {
        assert!(GateError::ServersUnavailable(500).is_servers_unavailable());
        assert!(!GateError::MazokuApi("teapot".to_string()).is_servers_unavailable());
        assert!(!GateError::Network("reset".to_string()).is_servers_unavailable());
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            GateError::ServersUnavailable(404).to_string(),
            "Mazoku servers are unavailable (HTTP 404)"
        );
        assert_eq!(
            GateError::Validation("print must be >= 1".to_string()).to_string(),
            "Validation error: print must be >= 1"
        );
    }
}
