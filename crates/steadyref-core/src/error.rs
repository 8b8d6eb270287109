//! Error types and error code constants for steadyref.
//!
//! This module provides a unified error type (`SteadyError`) that bridges
//! domain-specific errors from different subsystems (parsing, configuration,
//! fix application) into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! Exit codes:
//! - `1`: Findings reported (`check` only; not an error)
//! - `2`: Invalid arguments (bad input from caller, bad configuration)
//! - `3`: Resolution errors (file not found, no finding at location)
//! - `4`: Apply errors (conflicting edits, file changed since analysis)
//! - `10`: Internal errors (bugs, unexpected state)

use std::fmt;

use thiserror::Error;

use crate::patch::PatchError;

pub use crate::types::Location;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output and process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Analysis succeeded and reported at least one finding.
    FindingsReported = 1,
    /// Invalid arguments from caller (bad input, malformed request).
    InvalidArguments = 2,
    /// Resolution errors (file not found, no finding at location).
    ResolutionError = 3,
    /// Apply errors (conflicting edits, stale content).
    ApplyError = 4,
    /// Internal errors (bugs, unexpected state).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
///
/// Each variant includes enough context to produce a helpful error message
/// and an optional `details` field in the JSON error response.
#[derive(Debug, Error)]
pub enum SteadyError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Configuration could not be loaded.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// No finding starts at the requested location.
    #[error("no finding at {file}:{line}:{col}")]
    FindingNotFound { file: String, line: u32, col: u32 },

    /// Failed to apply changes.
    #[error("apply error: {message}")]
    ApplyError {
        message: String,
        file: Option<String>,
    },

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&SteadyError> for OutputErrorCode {
    fn from(err: &SteadyError) -> Self {
        match err {
            SteadyError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            SteadyError::InvalidConfig { .. } => OutputErrorCode::InvalidArguments,
            SteadyError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            SteadyError::FindingNotFound { .. } => OutputErrorCode::ResolutionError,
            SteadyError::ApplyError { .. } => OutputErrorCode::ApplyError,
            SteadyError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Bridge: PatchError -> SteadyError
// ============================================================================

impl From<PatchError> for SteadyError {
    fn from(err: PatchError) -> Self {
        SteadyError::ApplyError {
            message: err.to_string(),
            file: None,
        }
    }
}

impl From<std::io::Error> for SteadyError {
    fn from(err: std::io::Error) -> Self {
        SteadyError::internal(format!("IO error: {}", err))
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl SteadyError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        SteadyError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        SteadyError::FileNotFound { path: path.into() }
    }

    /// Create a finding not found error.
    pub fn finding_not_found(file: impl Into<String>, line: u32, col: u32) -> Self {
        SteadyError::FindingNotFound {
            file: file.into(),
            line,
            col,
        }
    }

    /// Create an apply error for `file`.
    pub fn apply(message: impl Into<String>, file: impl Into<String>) -> Self {
        SteadyError::ApplyError {
            message: message.into(),
            file: Some(file.into()),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        SteadyError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
