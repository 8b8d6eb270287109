//! `no-unstable-computed-value`: `computed(() => { ... return { ... } })`
//! derivations that build a fresh object on every evaluation.
//!
//! The suggested fix threads the previous value through the derivation and
//! returns it unchanged when every property is identical:
//!
//! ```text
//! computed((oldValue) => {
//!   const newValue = { a, b: x + 1 }
//!   if (oldValue && oldValue.a === newValue.a && oldValue.b === newValue.b) {
//!     return oldValue
//!   }
//!   return newValue
//! })
//! ```
//!
//! Without a type checker the object test is syntactic: the first direct
//! `return` of the callback must return an object literal whose properties
//! are all `key: value` pairs or shorthands with plain identifier keys.

use steadyref_core::patch::TextEdit;
use tracing::{debug, trace};

use crate::rules::{Diagnostic, Rule, RuleContext, Suggestion};
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

/// Rule name.
pub const NAME: &str = "no-unstable-computed-value";

const CALLEE: &str = "computed";
const MESSAGE: &str = "Computed object values should return stable references.";
const SUGGESTION: &str = "Compare with old value and retain it if nothing changed";

/// Reports `computed` callbacks that return fresh object literals.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnstableComputedValue;

/// The parts of a matching `computed(...)` call.
struct ComputedCall<'src> {
    /// Type arguments text (`<Point>`), if any.
    type_arguments: &'src str,
    /// Statements before the first `return`, in order.
    leading: Vec<&'src str>,
    /// The returned object literal.
    object: &'src str,
    /// The object's property names.
    properties: Vec<&'src str>,
}

impl Rule for UnstableComputedValue {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Enforce stable object values in `computed` calls"
    }

    fn check(&self, cx: &RuleContext<'_, '_>, node: NodeId, sink: &mut Vec<Diagnostic>) {
        let tree = cx.tree;
        if tree.kind(node) != SyntaxKind::CallExpression {
            return;
        }
        let Some(call) = match_computed_call(tree, node) else {
            return;
        };
        let span = tree.span(node);
        debug!(file = cx.path, call = %span, properties = call.properties.len(), "unstable computed value");

        let suggestion = Suggestion {
            description: SUGGESTION.to_string(),
            edit: TextEdit::new().replace(span, render_fix(&call)),
        };
        sink.push(cx.diagnostic(NAME, MESSAGE, span, vec![suggestion]));
    }
}

fn match_computed_call<'src>(tree: &SyntaxTree<'src>, call: NodeId) -> Option<ComputedCall<'src>> {
    let callee = tree.child_by_field(call, "function")?;
    if tree.kind(callee) != SyntaxKind::Identifier || tree.text(callee) != CALLEE {
        return None;
    }
    let arguments = tree.child_by_field(call, "arguments")?;
    let [callback] = tree.children(arguments) else {
        trace!(call = %tree.span(call), "computed call without exactly one argument");
        return None;
    };
    if tree.kind(*callback) != SyntaxKind::ArrowFunction {
        return None;
    }
    // The rewrite replaces the parameter list with `(oldValue)`.
    if let Some(params) = tree.child_by_field(*callback, "parameters") {
        if tree.children(params).len() > 1 {
            trace!(call = %tree.span(call), "computed callback takes several parameters");
            return None;
        }
    }
    let body = tree.child_by_field(*callback, "body")?;
    if tree.kind(body) != SyntaxKind::BlockBody {
        return None;
    }

    let statements = tree.children(body);
    let ret_index = statements
        .iter()
        .position(|&s| tree.kind(s) == SyntaxKind::ReturnStatement)?;
    let mut returned = tree.first_child(statements[ret_index])?;
    while tree.kind(returned) == SyntaxKind::Parenthesized {
        returned = tree.first_child(returned)?;
    }
    if tree.kind(returned) != SyntaxKind::ObjectLiteral {
        trace!(call = %tree.span(call), "computed value is not an object literal");
        return None;
    }
    let properties = plain_properties(tree, returned)?;
    if properties.is_empty() {
        return None;
    }

    Some(ComputedCall {
        type_arguments: tree
            .child_by_field(call, "type_arguments")
            .map(|t| tree.text(t))
            .unwrap_or(""),
        leading: statements[..ret_index]
            .iter()
            .map(|&s| tree.text(s))
            .collect(),
        object: tree.text(returned),
        properties,
    })
}

/// Property names of an object literal, or `None` if any member is not a
/// plain pair or shorthand.
fn plain_properties<'src>(tree: &SyntaxTree<'src>, object: NodeId) -> Option<Vec<&'src str>> {
    tree.children(object)
        .iter()
        .map(|&member| match tree.kind(member) {
            SyntaxKind::ShorthandProperty => Some(tree.text(member)),
            SyntaxKind::Property => {
                let key = tree.child_by_field(member, "key")?;
                (tree.kind(key) == SyntaxKind::Identifier).then(|| tree.text(key))
            }
            _ => None,
        })
        .collect()
}

fn render_fix(call: &ComputedCall<'_>) -> String {
    let leading: String = call
        .leading
        .iter()
        .map(|stmt| format!("  {}\n", stmt))
        .collect();
    let comparison = call
        .properties
        .iter()
        .map(|p| format!("oldValue.{p} === newValue.{p}"))
        .collect::<Vec<_>>()
        .join(" && ");
    format!(
        "{CALLEE}{}((oldValue) => {{\n{}  const newValue = {}\n  if (oldValue && {}) {{\n    return oldValue\n  }}\n  return newValue\n}})",
        call.type_arguments, leading, call.object, comparison
    )
}

// ============================================================================
// Tests
// ============================================================================
