//! Shared primitives for all Rust crates in Logdeck.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod auth;

use thiserror::Error;

pub use auth::CurrentUser;

/// Result type used across Logdeck crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
///
/// Errors are `Clone` so a single failure can be returned to the caller and
/// published to every lifecycle subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// User is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// User is authenticated but blocked by authorization policy.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Server answered with a non-success status not covered above.
    #[error("http error {status}: {message}")]
    Http {
        /// Response status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// Request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// Response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status this error represents, if it came from a response.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::Unauthorized(_) => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::Http { status, .. } => Some(*status),
            Self::Validation(_) | Self::Network(_) | Self::Decode(_) | Self::Internal(_) => None,
        }
    }

    /// Maps a non-success response status to the matching error category.
    #[must_use]
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Unauthorized(message),
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            409 => Self::Conflict(message),
            _ => Self::Http { status, message },
        }
    }
}
