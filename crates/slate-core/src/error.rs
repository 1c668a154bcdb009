//! Error types for the slate library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::TaskId;

/// Comprehensive error type for all store and editor operations.
#[derive(Error, Debug)]
pub enum SlateError {
    /// Database query or constraint errors reported by the store
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Task not found for the given ID
    #[error("Task with ID {id} not found")]
    TaskNotFound { id: TaskId },
    /// Board not found inside the open task
    #[error("Board with ID '{id}' not found")]
    BoardNotFound { id: String },
    /// The store could not be reached or the call did not complete
    #[error("Transport error: {message}")]
    Transport { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Coarse classification used to pick the user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// A required field is missing or malformed; the store was not contacted.
    Validation,
    /// The store answered with an error.
    Store,
    /// The store could not be reached.
    Transport,
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> SlateError {
        SlateError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> SlateError {
        SlateError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl SlateError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a transport error from anything printable.
    pub fn transport(message: impl std::fmt::Display) -> Self {
        Self::Transport {
            message: message.to_string(),
        }
    }

    /// Classifies the error for notification purposes.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::InvalidInput { .. } | Self::BoardNotFound { .. } => FailureKind::Validation,
            Self::Database { .. } | Self::TaskNotFound { .. } | Self::Serialization { .. } => {
                FailureKind::Store
            }
            Self::Transport { .. }
            | Self::FileSystem { .. }
            | Self::XdgDirectory(_)
            | Self::Configuration { .. } => FailureKind::Transport,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;

    /// Map errors raised while opening the store to transport errors.
    fn transport_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| SlateError::database(message).with_source(e))
    }

    fn transport_context(self, message: &str) -> Result<T> {
        self.map_err(|e| SlateError::transport(format!("{message}: {e}")))
    }
}

/// Maps a failed `spawn_blocking` join to a transport error.
pub(crate) fn join_error(e: tokio::task::JoinError) -> SlateError {
    SlateError::transport(format!("Task join error: {e}"))
}

/// Result type alias for slate operations
pub type Result<T> = std::result::Result<T, SlateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let validation = SlateError::invalid_input("title").with_reason("required");
        assert_eq!(validation.kind(), FailureKind::Validation);

        let missing = SlateError::TaskNotFound { id: 4 };
        assert_eq!(missing.kind(), FailureKind::Store);

        let db = SlateError::database("boom").with_source(rusqlite::Error::InvalidQuery);
        assert_eq!(db.kind(), FailureKind::Store);

        let transport = SlateError::transport("connection refused");
        assert_eq!(transport.kind(), FailureKind::Transport);
        assert_eq!(transport.to_string(), "Transport error: connection refused");
    }

    #[test]
    fn test_invalid_input_message() {
        let err = SlateError::invalid_input("start_date").with_reason("not a date");
        assert_eq!(
            err.to_string(),
            "Invalid input for field 'start_date': not a date"
        );
    }
}
