//! Error types for carrental.
//!
//! This module defines all error types used throughout the carrental crate.
//! Domain outcomes (a car that is not available, a duplicate username) and
//! infrastructure failures (I/O, database, configuration) share one enum so
//! that every operation can be surfaced at the command-line boundary.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::Role;
use crate::storage::StoreName;

/// The main error type for carrental operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Account Errors ===
    /// No credential matched the supplied username and password.
    #[error("invalid {role} credentials")]
    InvalidCredentials {
        /// Role whose store was searched.
        role: Role,
    },

    /// A credential with this username already exists.
    #[error("{role} '{username}' already exists")]
    AlreadyExists {
        /// Role whose store holds the username.
        role: Role,
        /// The conflicting username.
        username: String,
    },

    /// The session's role does not allow the operation.
    #[error("operation requires {required} role, session is {actual}")]
    Forbidden {
        /// Role the operation needs.
        required: Role,
        /// Role the session holds.
        actual: Role,
    },

    // === Rental Errors ===
    /// No car with this model is currently available.
    #[error("car '{model}' is not available")]
    NotAvailable {
        /// Model that was requested.
        model: String,
    },

    /// No car with this model is currently rented.
    #[error("car '{model}' is not rented")]
    NotRented {
        /// Model that was requested.
        model: String,
    },

    /// No car with this model exists.
    #[error("car '{model}' not found")]
    NotFound {
        /// Model that was requested.
        model: String,
    },

    // === Record Errors ===
    /// A stored line could not be parsed into a typed record.
    #[error("malformed record {record} in {store}: {reason}")]
    MalformedRecord {
        /// Store the record was read from.
        store: StoreName,
        /// One-based position among the store's non-blank records.
        record: usize,
        /// Description of what was wrong.
        reason: String,
    },

    /// A field value cannot be stored as a single whitespace-delimited token.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the problem.
        reason: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A store lock was poisoned by a panicking holder.
    #[error("lock on {store} poisoned")]
    LockPoisoned {
        /// Store whose lock was poisoned.
        store: StoreName,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for carrental operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a malformed record error.
    #[must_use]
    pub fn malformed(store: StoreName, record: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            store,
            record,
            reason: reason.into(),
        }
    }

    /// Create an invalid field error.
    #[must_use]
    pub fn invalid_field(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Check if this error is an expected outcome of a user action rather
    /// than an infrastructure failure.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials { .. }
                | Self::AlreadyExists { .. }
                | Self::Forbidden { .. }
                | Self::NotAvailable { .. }
                | Self::NotRented { .. }
                | Self::NotFound { .. }
                | Self::InvalidField { .. }
        )
    }
}
