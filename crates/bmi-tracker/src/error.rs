//! Error types for bmi-tracker.
//!
//! Input errors are recoverable and reported back to whoever typed the
//! values. Storage errors surface the failing database operation unchanged;
//! nothing is retried.

use std::path::PathBuf;
use thiserror::Error;

use crate::observation::Measurement;

/// The main error type for bmi-tracker operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Input Errors ===
    /// A weight or height value was not a positive, finite decimal number.
    #[error("invalid {measurement}: {reason}")]
    InvalidInput {
        /// Which measurement was rejected.
        measurement: Measurement,
        /// Why it was rejected.
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

    /// The store was used before `initialize` was called.
    #[error("record store at {path} is not initialized")]
    StoreNotInitialized {
        /// Path to the database file.
        path: PathBuf,
    },

    /// Failed to create the directory holding the database.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
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

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for bmi-tracker operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid input error for the given measurement.
    #[must_use]
    pub fn invalid_input(measurement: Measurement, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            measurement,
            reason: reason.into(),
        }
    }

    /// Check if this error was caused by rejected user input.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput { .. })
    }

    /// Check if this error came from the record store.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. }
                | Self::DatabaseQuery(_)
                | Self::StoreNotInitialized { .. }
                | Self::DirectoryCreate { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = Error::invalid_input(Measurement::Height, "must be greater than zero");
        assert_eq!(err.to_string(), "invalid height: must be greater than zero");
    }

    #[test]
    fn test_is_invalid_input() {
        assert!(Error::invalid_input(Measurement::Weight, "empty").is_invalid_input());
        let err = Error::StoreNotInitialized {
            path: PathBuf::from(":memory:"),
        };
        assert!(!err.is_invalid_input());
    }

    #[test]
    fn test_is_storage_error() {
        let err = Error::StoreNotInitialized {
            path: PathBuf::from("/tmp/bmi.db"),
        };
        assert!(err.is_storage_error());
        assert!(!Error::invalid_input(Measurement::Weight, "empty").is_storage_error());

        let err = Error::ConfigValidation {
            message: "bad".to_string(),
        };
        assert!(!err.is_storage_error());
    }

    #[test]
    fn test_store_not_initialized_display() {
        let err = Error::StoreNotInitialized {
            path: PathBuf::from("/tmp/bmi.db"),
        };
        assert!(err.to_string().contains("/tmp/bmi.db"));
        assert!(err.to_string().contains("not initialized"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
            assert!(err.is_storage_error());
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "history.limit must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("history.limit"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
        assert!(err.is_storage_error());
    }

    #[test]
    fn test_database_open_error_display() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err = Error::DatabaseOpen {
                path: PathBuf::from("/nonexistent/path/db.sqlite"),
                source: sqlite_err,
            };
            assert!(err.to_string().contains("/nonexistent/path/db.sqlite"));
        }
    }
}
