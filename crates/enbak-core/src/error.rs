//! Error types and exit codes for enbak
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure (empty database, filesystem errors)
//! - 2: Usage error (bad flags/args, invalid config values)
//! - 3: Data/store error (missing database, outdated schema)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes reported by the enbak binary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data/store error - missing or outdated database (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during enbak operations
#[derive(Error, Debug)]
pub enum EnbakError {
    // Usage errors (exit code 2)
    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data/store errors (exit code 3)
    #[error("database not found: {path:?}")]
    DatabaseNotFound { path: PathBuf },

    #[error("database already exists: {path:?} (use --force to overwrite)")]
    DatabaseExists { path: PathBuf },

    #[error("Full resync is required (database version {found}, expected {expected})")]
    ResyncRequired { found: String, expected: String },

    // Generic failures (exit code 1)
    #[error("Database is empty, nothing to export")]
    EmptyDatabase,

    #[error("failed to {operation} {path:?}: {source}")]
    Filesystem {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },

    #[error("{0}")]
    Other(String),

    #[error("Export interrupted, the last file may be incomplete")]
    Interrupted,
}

impl EnbakError {
    /// Create an error for a failed database operation
    pub fn db_operation(operation: &str, error: impl std::fmt::Display) -> Self {
        EnbakError::FailedOperation {
            operation: operation.to_string(),
            reason: error.to_string(),
        }
    }

    /// Create an error for a failed filesystem operation on a path
    pub fn filesystem(
        operation: &str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        EnbakError::Filesystem {
            operation: operation.to_string(),
            path: path.into(),
            source,
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        EnbakError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            EnbakError::UsageError(_) | EnbakError::InvalidValue { .. } => ExitCode::Usage,

            EnbakError::DatabaseNotFound { .. }
            | EnbakError::DatabaseExists { .. }
            | EnbakError::ResyncRequired { .. } => ExitCode::Data,

            EnbakError::EmptyDatabase
            | EnbakError::Filesystem { .. }
            | EnbakError::Io(_)
            | EnbakError::Json(_)
            | EnbakError::Toml(_)
            | EnbakError::FailedOperation { .. }
            | EnbakError::Other(_)
            | EnbakError::Interrupted => ExitCode::Failure,
        }
    }

    /// Stable identifier for structured logs
    pub fn error_type(&self) -> &'static str {
        match self {
            EnbakError::UsageError(_) => "usage_error",
            EnbakError::InvalidValue { .. } => "invalid_value",
            EnbakError::DatabaseNotFound { .. } => "database_not_found",
            EnbakError::DatabaseExists { .. } => "database_exists",
            EnbakError::ResyncRequired { .. } => "resync_required",
            EnbakError::EmptyDatabase => "empty_database",
            EnbakError::Filesystem { .. } => "filesystem_error",
            EnbakError::Io(_) => "io_error",
            EnbakError::Json(_) => "json_error",
            EnbakError::Toml(_) => "toml_error",
            EnbakError::FailedOperation { .. } => "failed_operation",
            EnbakError::Other(_) => "other",
            EnbakError::Interrupted => "interrupted",
        }
    }
}

/// Result type alias for enbak operations
pub type Result<T> = std::result::Result<T, EnbakError>;
