//! Upward navigation helpers over a [`SyntaxTree`].
//!
//! Every function here is total: when a shape does not match, the result is
//! `None` and the caller decides what absence means.

use crate::syntax::{NodeId, SyntaxKind, SyntaxTree};

// ============================================================================
// Enclosing Units
// ============================================================================

/// The nearest function or class definition around a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnclosingUnit {
    /// An arrow function, usually bound with `const Name = () => ...`.
    Arrow(NodeId),
    /// A `function Name() {}` declaration, or an anonymous
    /// `export default function () {}`.
    Function(NodeId),
    /// A `class Name {}` declaration. Never eligible for rewriting.
    Class(NodeId),
}

impl EnclosingUnit {
    /// The unit's node.
    pub fn node(self) -> NodeId {
        match self {
            EnclosingUnit::Arrow(id) | EnclosingUnit::Function(id) | EnclosingUnit::Class(id) => {
                id
            }
        }
    }

    /// Check if this is a class unit.
    pub fn is_class(self) -> bool {
        matches!(self, EnclosingUnit::Class(_))
    }

    /// The unit's body node (`body` field).
    pub fn body(self, tree: &SyntaxTree<'_>) -> Option<NodeId> {
        tree.child_by_field(self.node(), "body")
    }
}

/// Find the nearest enclosing unit of `node`, excluding `node` itself.
///
/// A function that is itself the expression of a markup wrapper (an inline
/// `onClick={() => ...}` callback) is not a unit; the walk resumes above the
/// wrapper so it reaches the component that renders the markup.
pub fn find_enclosing_unit(tree: &SyntaxTree<'_>, node: NodeId) -> Option<EnclosingUnit> {
    let mut current = tree.parent(node);
    while let Some(id) = current {
        let kind = tree.kind(id);
        if kind.is_function() {
            if let Some(wrapper) = wrapping_markup_expression(tree, id) {
                current = tree.parent(wrapper);
                continue;
            }
        }
        match kind {
            SyntaxKind::ArrowFunction => return Some(EnclosingUnit::Arrow(id)),
            SyntaxKind::FunctionDeclaration => return Some(EnclosingUnit::Function(id)),
            SyntaxKind::FunctionExpression if is_default_export(tree, id) => {
                return Some(EnclosingUnit::Function(id))
            }
            SyntaxKind::ClassDeclaration => return Some(EnclosingUnit::Class(id)),
            _ => {}
        }
        current = tree.parent(id);
    }
    None
}

/// The markup wrapper whose expression is `func`, looking through any
/// parentheses around it.
fn wrapping_markup_expression(tree: &SyntaxTree<'_>, func: NodeId) -> Option<NodeId> {
    let mut outer = func;
    while let Some(paren) = tree.parent_of_kind(outer, SyntaxKind::Parenthesized) {
        outer = paren;
    }
    tree.parent_of_kind(outer, SyntaxKind::ExpressionWrapper)
}

/// `export default function () {}`: the only function expression that is
/// a unit of its own.
fn is_default_export(tree: &SyntaxTree<'_>, func: NodeId) -> bool {
    tree.parent(func)
        .is_some_and(|p| tree.kind(p) == SyntaxKind::Other("export_statement"))
}

// ============================================================================
// Name Resolution
// ============================================================================

/// The unit's name.
///
/// Arrow units are named by the simple identifier they are bound to (a
/// destructuring pattern yields `None`). Declarations use their own name;
/// an anonymous default export has none.
pub fn resolve_unit_name<'src>(tree: &SyntaxTree<'src>, unit: EnclosingUnit) -> Option<&'src str> {
    let name = match unit {
        EnclosingUnit::Arrow(id) => {
            let declarator = tree.parent_of_kind(id, SyntaxKind::VariableDeclarator)?;
            tree.child_by_field(declarator, "name")?
        }
        EnclosingUnit::Function(id) | EnclosingUnit::Class(id) => tree.child_by_field(id, "name")?,
    };
    simple_identifier(tree, name)
}

/// The name of the attribute whose value is `wrapper`.
///
/// `None` when the wrapper is not an attribute value (an element child, a
/// spread attribute) or the attribute name is namespaced.
pub fn resolve_attribute_name<'src>(tree: &SyntaxTree<'src>, wrapper: NodeId) -> Option<&'src str> {
    let attribute = tree.parent_of_kind(wrapper, SyntaxKind::Attribute)?;
    simple_identifier(tree, tree.first_child(attribute)?)
}

/// The tag name of the element carrying the attribute whose value is
/// `wrapper`, when that name is a simple identifier (`Foo.Bar` yields `None`).
pub fn resolve_host_tag_name<'src>(tree: &SyntaxTree<'src>, wrapper: NodeId) -> Option<&'src str> {
    let tag = tree.parent(wrapper).and_then(|p| tree.parent(p))?;
    if tree.kind(tag) != SyntaxKind::OpeningTag {
        return None;
    }
    simple_identifier(tree, tree.child_by_field(tag, "name")?)
}

fn simple_identifier<'src>(tree: &SyntaxTree<'src>, id: NodeId) -> Option<&'src str> {
    (tree.kind(id) == SyntaxKind::Identifier).then(|| tree.text(id))
}

// ============================================================================
// Attribute Context
// ============================================================================

/// Naming clues around an attribute value, resolved once per finding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeContext {
    /// Name of the enclosing unit.
    pub unit_name: Option<String>,
    /// Tag name of the element carrying the attribute.
    pub host_tag: Option<String>,
    /// Attribute name.
    pub attribute: Option<String>,
}

impl AttributeContext {
    /// Resolve the context of `wrapper` inside `unit`.
    pub fn resolve(tree: &SyntaxTree<'_>, wrapper: NodeId, unit: Option<EnclosingUnit>) -> Self {
        AttributeContext {
            unit_name: unit
                .and_then(|u| resolve_unit_name(tree, u))
                .map(str::to_string),
            host_tag: resolve_host_tag_name(tree, wrapper).map(str::to_string),
            attribute: resolve_attribute_name(tree, wrapper).map(str::to_string),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
