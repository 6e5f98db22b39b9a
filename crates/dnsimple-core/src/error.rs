//! Error types for the DNSimple convergence and caching library
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport errors (request never produced a response)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// API answered with an unexpected status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message reported by the API, or the raw body
        message: String,
    },

    /// Remote operation reached a state it will never leave
    #[error("{resource} reached terminal state '{state}'")]
    TerminalState {
        /// What was being polled (e.g. "domain registration")
        resource: String,
        /// The observed state
        state: String,
    },

    /// Remote operation has not reached its success state yet
    #[error("{resource} is still in state '{state}'")]
    NotConverged {
        /// What was being polled
        resource: String,
        /// The observed state
        state: String,
    },

    /// The caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an API status error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a terminal state error
    pub fn terminal_state(resource: impl Into<String>, state: impl Into<String>) -> Self {
        Self::TerminalState {
            resource: resource.into(),
            state: state.into(),
        }
    }

    /// Create a "not converged yet" error
    pub fn not_converged(resource: impl Into<String>, state: impl Into<String>) -> Self {
        Self::NotConverged {
            resource: resource.into(),
            state: state.into(),
        }
    }

    /// Whether polling again could plausibly produce a different answer
    ///
    /// Client errors are permanent except 404, 409 and 429, which an
    /// eventually-consistent registrar returns while an operation settles.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Authentication(_)
            | Self::Config(_)
            | Self::Cancelled
            | Self::TerminalState { .. } => false,
            Self::Api { status, .. } => !matches!(status, 400..=499) || matches!(status, 404 | 409 | 429),
            _ => true,
        }
    }
}
