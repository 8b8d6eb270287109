//! Rule trait, diagnostics and the rule registry.
//!
//! A [`Rule`] is offered every node of a tree in pre-order and pushes
//! [`Diagnostic`]s for the nodes it cares about. Each diagnostic carries its
//! fixes as [`Suggestion`]s. Suggestions are offered to the user, never
//! applied automatically: two suggestions for the same component can anchor
//! at the same statement, and applying one invalidates the spans of the
//! other.

pub mod memoize_jsx_attributes;
pub mod unstable_computed_value;

use std::collections::BTreeMap;

use steadyref_core::output::{DiagnosticInfo, Location, SuggestionInfo};
use steadyref_core::patch::{PatchError, Span, TextEdit};
use steadyref_core::text::byte_offset_to_position;
use thiserror::Error;

use crate::syntax::{NodeId, SyntaxTree};

pub use memoize_jsx_attributes::MemoizeJsxAttributes;
pub use unstable_computed_value::UnstableComputedValue;

// ============================================================================
// Diagnostics
// ============================================================================

/// A fix offered with a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Human-readable description.
    pub description: String,
    /// The edit, against the analyzed source.
    pub edit: TextEdit,
}

/// A finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Name of the rule.
    pub rule: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Span of the implicated node.
    pub span: Span,
    /// 1-indexed line of `span.start`.
    pub line: u32,
    /// 1-indexed byte column of `span.start`.
    pub col: u32,
    /// Offered fixes.
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    /// Convert to the output form, materializing every suggestion against
    /// `source`.
    pub fn to_info(&self, path: &str, source: &str) -> Result<DiagnosticInfo, PatchError> {
        let suggestions = self
            .suggestions
            .iter()
            .map(|s| {
                Ok(SuggestionInfo {
                    description: s.description.clone(),
                    edits: s.edit.materialize(path, source)?.edits,
                })
            })
            .collect::<Result<Vec<_>, PatchError>>()?;
        Ok(DiagnosticInfo {
            rule: self.rule.to_string(),
            message: self.message.clone(),
            location: Location::with_span(path, self.line, self.col, self.span.start, self.span.end),
            suggestions,
        })
    }
}

// ============================================================================
// Rule Trait
// ============================================================================

/// What a rule sees while checking one file.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a, 'src> {
    /// The file's syntax tree.
    pub tree: &'a SyntaxTree<'src>,
    /// Workspace-relative path of the file.
    pub path: &'a str,
}

impl<'a, 'src> RuleContext<'a, 'src> {
    /// Create a context.
    pub fn new(tree: &'a SyntaxTree<'src>, path: &'a str) -> Self {
        RuleContext { tree, path }
    }

    /// The file's source text.
    pub fn source(&self) -> &'src str {
        self.tree.source()
    }

    /// Build a diagnostic at `span`, filling in its line and column.
    pub fn diagnostic(
        &self,
        rule: &'static str,
        message: impl Into<String>,
        span: Span,
        suggestions: Vec<Suggestion>,
    ) -> Diagnostic {
        let (line, col) = byte_offset_to_position(self.source().as_bytes(), span.start as usize);
        Diagnostic {
            rule,
            message: message.into(),
            span,
            line,
            col,
            suggestions,
        }
    }
}

/// A check run over every node of a file.
pub trait Rule: Send + Sync {
    /// Stable rule name (`memoize-jsx-attributes`).
    fn name(&self) -> &'static str;

    /// One-line description of what the rule enforces.
    fn description(&self) -> &'static str;

    /// Check `node`, pushing any findings into `sink`.
    fn check(&self, cx: &RuleContext<'_, '_>, node: NodeId, sink: &mut Vec<Diagnostic>);
}

// ============================================================================
// Registry
// ============================================================================

/// Every known rule, in name order.
pub fn all_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(MemoizeJsxAttributes),
        Box::new(UnstableComputedValue),
    ]
}

/// Error for rule selection.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    /// A rule name that no rule has.
    #[error("unknown rule '{name}'")]
    UnknownRule { name: String },
}

impl From<RuleError> for steadyref_core::error::SteadyError {
    fn from(err: RuleError) -> Self {
        steadyref_core::error::SteadyError::invalid_args(err.to_string())
    }
}

/// The rules enabled for a run.
pub struct RuleSet {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleSet {
    /// All known rules enabled.
    pub fn all() -> Self {
        RuleSet { rules: all_rules() }
    }

    /// Enable rules from a `name -> enabled` table.
    ///
    /// Rules missing from the table stay enabled. An unknown name is an error.
    pub fn from_config(table: &BTreeMap<String, bool>) -> Result<Self, RuleError> {
        let rules = all_rules();
        if let Some(name) = table
            .keys()
            .find(|name| !rules.iter().any(|r| r.name() == name.as_str()))
        {
            return Err(RuleError::UnknownRule { name: name.clone() });
        }
        let rules = rules
            .into_iter()
            .filter(|r| table.get(r.name()).copied().unwrap_or(true))
            .collect();
        Ok(RuleSet { rules })
    }

    /// Keep only the rule called `name`.
    pub fn only(self, name: &str) -> Result<Self, RuleError> {
        let rules: Vec<_> = self.rules.into_iter().filter(|r| r.name() == name).collect();
        if rules.is_empty() {
            return Err(RuleError::UnknownRule {
                name: name.to_string(),
            });
        }
        Ok(RuleSet { rules })
    }

    /// Check if `name` is enabled.
    pub fn is_enabled(&self, name: &str) -> bool {
        self.rules.iter().any(|r| r.name() == name)
    }

    /// The enabled rules.
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Check if no rule is enabled.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet::all()
    }
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| r.name()))
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
