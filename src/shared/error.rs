use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems and job runners to distinguish between
/// different types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - every requested operation completed
    Success = 0,
    /// A batch import was accepted but some items failed to dispatch
    PartialFailure = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (archive error, validation error, network error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::PartialFailure => write!(f, "Partial Failure (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for the compliance core.
///
/// Fallible functions return [`crate::shared::Result`]; callers that need to
/// react to a specific failure use `err.downcast_ref::<OpenlcsError>()`.
#[derive(Debug, Error)]
pub enum OpenlcsError {
    /// Packing or extracting a source archive failed
    #[error("Archive operation failed: {path}\nDetails: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A working directory could not be (re)created
    #[error("Failed to create directory: {path}\nDetails: {source}\n\n💡 Hint: Please verify that the parent directory exists and you have write permissions")]
    Dir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A component record lacks a field required for grouping or NVR formatting
    #[error("Component record is missing required field '{field}': {record}")]
    KeyFieldMissing { field: String, record: String },

    #[error("Non-existent product release: {name}\n\n💡 Hint: Load the product release before importing packages into it")]
    UnknownRelease { name: String },

    /// The worker substrate rejected or could not receive a task
    #[error("Failed to dispatch task flow '{task_flow}'\nDetails: {details}")]
    Dispatch { task_flow: String, details: String },

    /// Store-level unique constraint violation
    #[error("Constraint violation ({constraint}): {details}")]
    Constraint { constraint: String, details: String },

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Validation error for requests and builder patterns
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },

    #[error("Invalid configuration: {message}")]
    ConfigError { message: String },
}

impl OpenlcsError {
    pub(crate) fn archive(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OpenlcsError::Archive {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn not_found(kind: &str, id: impl ToString) -> Self {
        OpenlcsError::NotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn constraint(constraint: &str, details: impl Into<String>) -> Self {
        OpenlcsError::Constraint {
            constraint: constraint.to_string(),
            details: details.into(),
        }
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        OpenlcsError::Validation {
            message: message.into(),
        }
    }
}
