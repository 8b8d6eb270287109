//! JSON output types and serialization for CLI responses.
//!
//! ## Design Principles
//!
//! 1. **Status first:** Every response has `status` as first field
//! 2. **Deterministic:** Same input -> same output (field order, array ordering)
//! 3. **Nullable vs absent:** absent field means "not applicable"
//! 4. **Versioned:** Schema version in response enables forward compatibility

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use crate::error::{OutputErrorCode, SteadyError};
pub use crate::patch::{MaterializedPatch as Patch, OutputEdit as Edit, Span};
pub use crate::types::Location;

/// Current schema version for JSON output.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Diagnostics
// ============================================================================

/// One offered fix, materialized against the analyzed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionInfo {
    /// Human-readable description of the fix.
    pub description: String,
    /// The replacements the fix would make.
    pub edits: Vec<Edit>,
}

/// A reported finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    /// Rule that produced the finding.
    pub rule: String,
    /// Human-readable message.
    pub message: String,
    /// Where the implicated node starts.
    pub location: Location,
    /// Offered (never auto-applied) fixes.
    pub suggestions: Vec<SuggestionInfo>,
}

// ============================================================================
// Response Structs
// ============================================================================

/// Response for the `check` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Number of files analyzed.
    pub files_checked: u32,
    /// Findings, sorted by location then rule.
    pub diagnostics: Vec<DiagnosticInfo>,
}

impl CheckResponse {
    /// Create a check response.
    pub fn new(files_checked: u32, diagnostics: Vec<DiagnosticInfo>) -> Self {
        CheckResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            files_checked,
            diagnostics,
        }
    }
}

/// Response for the `fix` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Rule whose suggestion was selected.
    pub rule: String,
    /// The finding's message.
    pub message: String,
    /// The suggestion's description.
    pub description: String,
    /// The materialized patch.
    pub patch: Patch,
    /// Whether the patch was written to disk.
    pub applied: bool,
}

impl FixResponse {
    /// Create a fix response.
    pub fn new(
        rule: impl Into<String>,
        message: impl Into<String>,
        description: impl Into<String>,
        patch: Patch,
        applied: bool,
    ) -> Self {
        FixResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            rule: rule.into(),
            message: message.into(),
            description: description.into(),
            patch,
            applied,
        }
    }
}

/// One entry of the `rules` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleInfo {
    /// Rule name.
    pub name: String,
    /// What the rule enforces.
    pub description: String,
    /// Whether the active configuration enables it.
    pub enabled: bool,
}

/// Response for the `rules` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesResponse {
    /// Status: "ok".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Known rules.
    pub rules: Vec<RuleInfo>,
}

impl RulesResponse {
    /// Create a rules response.
    pub fn new(rules: Vec<RuleInfo>) -> Self {
        RulesResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            rules,
        }
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Error information for error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Numeric error code.
    pub code: u8,
    /// Human-readable message.
    pub message: String,
    /// Error-specific structured data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Where the error occurred.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ErrorInfo {
    /// Create from a SteadyError.
    pub fn from_error(err: &SteadyError) -> Self {
        let code = OutputErrorCode::from(err).code();
        let message = err.to_string();

        let (details, location) = match err {
            SteadyError::FindingNotFound { file, line, col } => {
                (None, Some(Location::new(file.clone(), *line, *col)))
            }
            SteadyError::FileNotFound { path } => {
                (Some(serde_json::json!({ "path": path })), None)
            }
            SteadyError::ApplyError { file, .. } => {
                let details = file.as_ref().map(|f| serde_json::json!({ "file": f }));
                (details, None)
            }
            _ => (None, None),
        };

        ErrorInfo {
            code,
            message,
            details,
            location,
        }
    }
}

/// Error response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Status: "error".
    pub status: String,
    /// Schema version for compatibility.
    pub schema_version: String,
    /// Error information.
    pub error: ErrorInfo,
}

impl ErrorResponse {
    /// Create an error response from a SteadyError.
    pub fn from_error(err: &SteadyError) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error: ErrorInfo::from_error(err),
        }
    }
}

// ============================================================================
// Emission
// ============================================================================

/// Emit a response as pretty-printed JSON to a writer.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}

// ============================================================================
// Tests
// ============================================================================
