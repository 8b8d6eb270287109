//! Error bridge implementations for front-door errors.
//!
//! This module provides `impl From<X> for SteadyError` conversions from the
//! configuration, file collection and parsing errors to the unified
//! `SteadyError` type used for JSON output and exit codes.

use steadyref_core::error::SteadyError;

use crate::config::ConfigError;
use crate::files::FileError;

// ============================================================================
// Bridge: ConfigError -> SteadyError
// ============================================================================

impl From<ConfigError> for SteadyError {
    fn from(err: ConfigError) -> Self {
        SteadyError::InvalidConfig {
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Bridge: FileError -> SteadyError
// ============================================================================

impl From<FileError> for SteadyError {
    fn from(err: FileError) -> Self {
        match err {
            FileError::NotFound { path } => SteadyError::FileNotFound { path },
            FileError::InvalidPattern { .. } => SteadyError::InvalidConfig {
                message: err.to_string(),
            },
            FileError::Io(e) => SteadyError::from(e),
        }
    }
}

// The ParseError / RuleError -> SteadyError bridges live next to those types
// in steadyref-jsx (orphan rule).
