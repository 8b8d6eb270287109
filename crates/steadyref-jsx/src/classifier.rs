//! Stability classification of markup attribute values.
//!
//! Only three literal shapes allocate a fresh reference on every render:
//! array literals, object literals and arrow functions. Everything else an
//! attribute can hold is treated as stable and never reported.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::navigator::{find_enclosing_unit, AttributeContext, EnclosingUnit};
use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

/// The unstable shapes an attribute value can have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Array,
    Object,
    Function,
}

impl ShapeKind {
    /// Map a value node's kind to a shape, if it is one of the unstable ones.
    pub fn of(kind: SyntaxKind) -> Option<ShapeKind> {
        match kind {
            SyntaxKind::ArrayLiteral => Some(ShapeKind::Array),
            SyntaxKind::ObjectLiteral => Some(ShapeKind::Object),
            SyntaxKind::ArrowFunction => Some(ShapeKind::Function),
            _ => None,
        }
    }
}

impl fmt::Display for ShapeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeKind::Array => write!(f, "array"),
            ShapeKind::Object => write!(f, "object"),
            ShapeKind::Function => write!(f, "function"),
        }
    }
}

/// An unstable attribute value inside a function unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// The `{...}` wrapper holding the value.
    pub wrapper: NodeId,
    /// The value itself (parentheses stripped).
    pub value: NodeId,
    /// The value's shape.
    pub shape: ShapeKind,
    /// The enclosing unit. The classifier only produces findings inside
    /// arrow or function units; `None` is accepted downstream as well.
    pub unit: Option<EnclosingUnit>,
    /// Naming clues.
    pub context: AttributeContext,
}

/// The expression held by a wrapper, with redundant parentheses removed.
///
/// Returns `None` for an empty wrapper.
pub fn wrapped_value(tree: &SyntaxTree<'_>, wrapper: NodeId) -> Option<NodeId> {
    let mut value = tree.first_child(wrapper)?;
    while tree.kind(value) == SyntaxKind::Parenthesized {
        value = tree.first_child(value)?;
    }
    Some(value)
}

/// Classify one wrapper node.
pub fn classify(tree: &SyntaxTree<'_>, wrapper: NodeId) -> Option<Finding> {
    if tree.kind(wrapper) != SyntaxKind::ExpressionWrapper {
        return None;
    }
    let value = wrapped_value(tree, wrapper)?;
    let Some(shape) = ShapeKind::of(tree.kind(value)) else {
        trace!(value = %tree.span(value), kind = ?tree.kind(value), "stable attribute value");
        return None;
    };

    let unit = match find_enclosing_unit(tree, wrapper) {
        Some(EnclosingUnit::Class(_)) => {
            trace!(value = %tree.span(value), "skipping value inside class unit");
            return None;
        }
        None => {
            trace!(value = %tree.span(value), "skipping value outside any unit");
            return None;
        }
        unit => unit,
    };

    Some(Finding {
        wrapper,
        value,
        shape,
        unit,
        context: AttributeContext::resolve(tree, wrapper, unit),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse, Dialect};

    fn classify_all(source: &str) -> Vec<Finding> {
        let tree = parse(source, Dialect::Tsx).unwrap();
        tree.preorder()
            .filter_map(|id| classify(&tree, id))
            .collect()
    }

    #[test]
    fn recognizes_the_three_shapes() {
        let source = "function F() {\n  return <X a={[1]} b={{ k: 1 }} c={() => 1} />\n}";
        let shapes: Vec<ShapeKind> = classify_all(source).iter().map(|f| f.shape).collect();
        assert_eq!(
            shapes,
            vec![ShapeKind::Array, ShapeKind::Object, ShapeKind::Function]
        );
    }

    #[test]
    fn stable_values_are_ignored() {
        let source = "function F() {\n  return <Foo bar={x} n={1} s={\"s\"} m={a.b} t={c ? d : e} call={g()} />\n}";
        assert!(classify_all(source).is_empty());
    }

    #[test]
    fn function_expressions_are_ignored() {
        let source = "function F() {\n  return <Foo cb={function () {}} />\n}";
        assert!(classify_all(source).is_empty());
    }

    #[test]
    fn parentheses_are_stripped() {
        let source = "const F = () => <Foo items={([1])} />";
        let tree = parse(source, Dialect::Tsx).unwrap();
        let finding = tree.preorder().find_map(|id| classify(&tree, id)).unwrap();
        assert_eq!(finding.shape, ShapeKind::Array);
        assert_eq!(tree.text(finding.value), "[1]");
    }

    #[test]
    fn class_units_are_rejected() {
        let source = "class Panel {\n  render() {\n    return <div style={{ a: 1 }} onClick={() => 1} />\n  }\n}";
        assert!(classify_all(source).is_empty());
    }

    #[test]
    fn values_outside_units_are_rejected() {
        assert!(classify_all("export default <div items={[1]} />").is_empty());
    }

    #[test]
    fn parameterized_arrows_are_reported() {
        let source = "const F = () => <input onChange={(e) => set(e.target.value)} />";
        let findings = classify_all(source);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].shape, ShapeKind::Function);
        assert_eq!(findings[0].context.attribute.as_deref(), Some("onChange"));
    }

    #[test]
    fn empty_wrapper() {
        assert!(classify_all("const F = () => <div>{}</div>").is_empty());
    }
}
