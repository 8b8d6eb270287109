//! Rule driver: parse a file and run the enabled rules over every node.
//!
//! Analysis is a pure function of the source text. Nothing is shared between
//! files, so callers may analyze files in any order or in parallel.

use tracing::{debug, warn};

use crate::rules::{Diagnostic, RuleContext, RuleSet};
use crate::syntax::{parse, Dialect, ParseResult, SyntaxTree};

/// Parse `source` and run `rules` over it.
pub fn analyze_source(
    path: &str,
    source: &str,
    dialect: Dialect,
    rules: &RuleSet,
) -> ParseResult<Vec<Diagnostic>> {
    let tree = parse(source, dialect)?;
    Ok(analyze_tree(path, &tree, rules))
}

/// Run `rules` over every node of `tree` in pre-order.
///
/// Diagnostics are sorted by span start, then rule name.
pub fn analyze_tree(path: &str, tree: &SyntaxTree<'_>, rules: &RuleSet) -> Vec<Diagnostic> {
    if tree.has_errors() {
        warn!(file = path, "syntax errors; analyzing recovered tree");
    }

    let cx = RuleContext::new(tree, path);
    let mut diagnostics = Vec::new();
    for node in tree.preorder() {
        for rule in rules.rules() {
            rule.check(&cx, node, &mut diagnostics);
        }
    }
    diagnostics.sort_by(|a, b| {
        a.span
            .start
            .cmp(&b.span.start)
            .then_with(|| a.rule.cmp(b.rule))
    });

    debug!(file = path, nodes = tree.len(), diagnostics = diagnostics.len(), "analyzed");
    diagnostics
}

// ============================================================================
// Tests
// ============================================================================
