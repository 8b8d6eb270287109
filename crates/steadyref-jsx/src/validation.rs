//! JavaScript identifier validation.
//!
//! Generated binding names must be usable as `const` declarations in both
//! script and module code, including strict mode.

use thiserror::Error;

/// Error for validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Invalid JavaScript identifier name.
    #[error("invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Words that cannot be used as a `const` binding name.
pub const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
];

/// Check if a name is reserved.
pub fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.contains(&name)
}

/// Validate that a string can be declared with `const <name> = ...`.
///
/// Checks:
/// - Non-empty
/// - Starts with a letter, `_` or `$`
/// - Contains only alphanumerics, `_` and `$`
/// - Not a reserved word
///
/// # Examples
///
/// ```
/// use steadyref_jsx::validation::validate_binding_name;
///
/// assert!(validate_binding_name("handleClick").is_ok());
/// assert!(validate_binding_name("$el").is_ok());
/// assert!(validate_binding_name("data-items").is_err());
/// assert!(validate_binding_name("default").is_err());
/// ```
pub fn validate_binding_name(name: &str) -> ValidationResult<()> {
    let invalid = |reason: String| ValidationError::InvalidName {
        name: name.to_string(),
        reason,
    };

    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(invalid("name cannot be empty".to_string()));
    };
    if !first.is_alphabetic() && first != '_' && first != '$' {
        return Err(invalid("must start with letter, underscore or '$'".to_string()));
    }
    if let Some(ch) = chars.find(|&ch| !ch.is_alphanumeric() && ch != '_' && ch != '$') {
        return Err(invalid(format!("invalid character: '{}'", ch)));
    }
    if is_reserved_word(name) {
        return Err(invalid("cannot use reserved word as identifier".to_string()));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
