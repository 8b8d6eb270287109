//! TSX/JSX support for steadyref.
//!
//! This crate finds values that are re-created on every render where a
//! stable reference is expected, and synthesizes the edit that stabilizes
//! them:
//! - [`syntax`]: tree-sitter parsing lowered into an arena tree with a
//!   separate parent table
//! - [`navigator`]: upward navigation (enclosing unit, naming clues)
//! - [`classifier`]: which attribute values are unstable
//! - [`naming`]: binding names for extracted values
//! - [`synthesizer`]: the text edit for a finding
//! - [`rules`]: the rule trait, the registry and the two rules
//! - [`driver`]: running rules over a file

pub mod classifier;
pub mod driver;
pub mod naming;
pub mod navigator;
pub mod rules;
pub mod synthesizer;
pub mod syntax;
pub mod validation;

pub use driver::{analyze_source, analyze_tree};
pub use rules::{all_rules, Diagnostic, Rule, RuleContext, RuleError, RuleSet, Suggestion};
pub use syntax::{parse, Dialect, ParseError};
