//! Unified error types for the data-access layer and the HTTP surface.

use sea_orm::DbErr;
use thiserror::Error;

/// Every failure a resource manager or the server bootstrap can report.
#[derive(Debug, Error)]
pub enum Error {
    /// A payload failed its entity's validation function.
    #[error("Invalid {entity}: {message}")]
    Validation {
        /// Entity the payload was meant for
        entity: &'static str,
        /// What was wrong with it
        message: String,
    },

    /// Malformed list or lookup input (timestamps, page bounds, sort column).
    #[error("Bad request: {message}")]
    BadRequest {
        /// Description of the malformed input
        message: String,
    },

    /// A storage error raised while writing, wrapped with its context.
    #[error("Failed to {operation} {entity}: {source}")]
    Write {
        /// Entity being written
        entity: &'static str,
        /// Operation that failed (e.g. `"create"`, `"update"`, `"link"`)
        operation: &'static str,
        /// Underlying storage failure
        #[source]
        source: DbErr,
    },

    /// A referenced row does not exist.
    #[error("{entity} {id} not found")]
    NotFound {
        /// Entity that was looked up
        entity: &'static str,
        /// Identifier that failed to resolve
        id: String,
    },

    /// Any other storage failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A stored JSON column could not be encoded or decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The password hasher rejected its input
    #[error("Password hashing failed: {message}")]
    PasswordHash {
        /// Message from the hasher
        message: String,
    },

    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required environment variable is missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    pub(crate) fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid(entity: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            entity,
            message: message.into(),
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Builds a closure that wraps a storage error with write context.
    pub(crate) fn write(entity: &'static str, operation: &'static str) -> impl FnOnce(DbErr) -> Self {
        move |source| Self::Write {
            entity,
            operation,
            source,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
