//! Arena syntax tree for TSX/JSX sources.
//!
//! Sources are parsed with tree-sitter and lowered into a [`SyntaxTree`]: a
//! flat arena of [`SyntaxNode`]s in pre-order. Ownership is top-down (each
//! node owns the ids of its children); upward navigation goes through a
//! separate parent table built once during lowering, so no node ever holds a
//! reference to its parent.
//!
//! Only named grammar nodes are lowered. Punctuation and keywords carry no
//! information the analyzers need, and comments are dropped so that
//! `{/* note */ [1]}` still exposes the array as the wrapper's expression.
//!
//! # Usage
//!
//! ```
//! use steadyref_jsx::syntax::{parse, Dialect, SyntaxKind};
//!
//! let tree = parse("const a = [1]", Dialect::Tsx).unwrap();
//! assert!(tree.preorder().any(|id| tree.kind(id) == SyntaxKind::ArrayLiteral));
//! ```

use std::fmt;
use std::path::Path;

use steadyref_core::patch::Span;
use thiserror::Error;
use tree_sitter::{Language, Node, Parser};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while parsing a source file.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load {dialect} grammar: {message}")]
    Language { dialect: Dialect, message: String },

    /// The parser returned no tree.
    #[error("parser produced no tree")]
    NoTree,
}

impl From<ParseError> for steadyref_core::error::SteadyError {
    fn from(err: ParseError) -> Self {
        steadyref_core::error::SteadyError::internal(err.to_string())
    }
}

/// Result type for parsing.
pub type ParseResult<T> = Result<T, ParseError>;

// ============================================================================
// Dialects
// ============================================================================

/// Grammar dialect used to parse a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// TypeScript with JSX (also used for plain JavaScript and JSX files).
    Tsx,
    /// TypeScript without JSX, where `<T>expr` is a type assertion.
    TypeScript,
}

impl Dialect {
    /// Pick the dialect from a file extension.
    ///
    /// Returns `None` for files the analyzers do not handle.
    pub fn from_path(path: &Path) -> Option<Dialect> {
        match path.extension()?.to_str()? {
            "tsx" | "jsx" | "js" | "mjs" | "cjs" => Some(Dialect::Tsx),
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            _ => None,
        }
    }

    fn language(self) -> Language {
        match self {
            Dialect::Tsx => tree_sitter_typescript::language_tsx(),
            Dialect::TypeScript => tree_sitter_typescript::language_typescript(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Tsx => write!(f, "tsx"),
            Dialect::TypeScript => write!(f, "typescript"),
        }
    }
}

// ============================================================================
// Node Kinds
// ============================================================================

/// Closed set of node shapes the analyzers distinguish.
///
/// Every grammar kind without a dedicated variant lowers to
/// [`SyntaxKind::Other`], which keeps the grammar's name for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxKind {
    /// The file root.
    Program,
    /// `[a, b]`
    ArrayLiteral,
    /// `{ a: 1 }`
    ObjectLiteral,
    /// `(a) => body`
    ArrowFunction,
    /// `function name() {}`
    FunctionDeclaration,
    /// `function () {}` in expression position, including
    /// `export default function () {}`.
    FunctionExpression,
    /// `class Name {}`
    ClassDeclaration,
    /// `name = value` inside a `const`/`let`/`var` declaration.
    VariableDeclarator,
    /// `f(args)`
    CallExpression,
    /// The argument list of a call.
    Arguments,
    /// The parameter list of a function.
    Parameters,
    /// `{ ... }` statement block.
    BlockBody,
    /// `return expr`
    ReturnStatement,
    /// `(expr)`
    Parenthesized,
    /// `{expr}` in markup: an attribute value or a child expression.
    ExpressionWrapper,
    /// `name={...}` on a markup element.
    Attribute,
    /// `<Tag ...>` or `<Tag ... />`.
    OpeningTag,
    /// `key: value` inside an object literal.
    Property,
    /// `{ key }` shorthand property inside an object literal.
    ShorthandProperty,
    /// `...expr`
    Spread,
    /// A plain identifier, property name or type name.
    Identifier,
    /// Any other grammar node.
    Other(&'static str),
}

impl SyntaxKind {
    /// Map a tree-sitter node kind to a syntax kind.
    pub fn from_grammar(kind: &'static str) -> SyntaxKind {
        match kind {
            "program" => SyntaxKind::Program,
            "array" => SyntaxKind::ArrayLiteral,
            "object" => SyntaxKind::ObjectLiteral,
            "arrow_function" => SyntaxKind::ArrowFunction,
            "function_declaration" => SyntaxKind::FunctionDeclaration,
            "function_expression" => SyntaxKind::FunctionExpression,
            "class_declaration" | "abstract_class_declaration" => SyntaxKind::ClassDeclaration,
            "variable_declarator" => SyntaxKind::VariableDeclarator,
            "call_expression" => SyntaxKind::CallExpression,
            "arguments" => SyntaxKind::Arguments,
            "formal_parameters" => SyntaxKind::Parameters,
            "statement_block" => SyntaxKind::BlockBody,
            "return_statement" => SyntaxKind::ReturnStatement,
            "parenthesized_expression" => SyntaxKind::Parenthesized,
            "jsx_expression" => SyntaxKind::ExpressionWrapper,
            "jsx_attribute" => SyntaxKind::Attribute,
            "jsx_opening_element" | "jsx_self_closing_element" => SyntaxKind::OpeningTag,
            "pair" => SyntaxKind::Property,
            "shorthand_property_identifier" => SyntaxKind::ShorthandProperty,
            "spread_element" => SyntaxKind::Spread,
            "identifier" | "property_identifier" | "type_identifier" => SyntaxKind::Identifier,
            other => SyntaxKind::Other(other),
        }
    }

    /// Check if this kind is function-shaped (arrow, declaration or
    /// expression).
    pub fn is_function(self) -> bool {
        matches!(
            self,
            SyntaxKind::ArrowFunction
                | SyntaxKind::FunctionDeclaration
                | SyntaxKind::FunctionExpression
        )
    }
}

// ============================================================================
// Tree
// ============================================================================

/// Index of a node in a [`SyntaxTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

/// A lowered syntax node.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    /// Shape tag.
    pub kind: SyntaxKind,
    /// Byte span in the source.
    pub span: Span,
    /// Grammar field this node occupies in its parent (`name`, `body`, ...).
    pub field: Option<&'static str>,
    /// Owned children, in source order.
    pub children: Vec<NodeId>,
}

/// An immutable syntax tree over a borrowed source buffer.
///
/// Node ids are assigned in pre-order, so iterating ids in ascending order
/// visits every node before its descendants.
#[derive(Debug, Clone)]
pub struct SyntaxTree<'src> {
    source: &'src str,
    nodes: Vec<SyntaxNode>,
    parents: Vec<Option<NodeId>>,
    has_errors: bool,
}

impl<'src> SyntaxTree<'src> {
    /// The source buffer this tree was parsed from.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Number of nodes in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the parser had to recover from syntax errors.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Access a node.
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.index()]
    }

    /// A node's shape tag.
    pub fn kind(&self, id: NodeId) -> SyntaxKind {
        self.node(id).kind
    }

    /// A node's byte span.
    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    /// A node's source text.
    pub fn text(&self, id: NodeId) -> &'src str {
        &self.source[self.span(id).as_range()]
    }

    /// A node's parent, or `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents[id.index()]
    }

    /// A node's parent if it has the given kind.
    pub fn parent_of_kind(&self, id: NodeId, kind: SyntaxKind) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.kind(p) == kind)
    }

    /// A node's children.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// The first child occupying `field`.
    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&c| self.node(c).field == Some(field))
    }

    /// A node's first child.
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Iterate over a node's strict ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Iterate over every node in pre-order.
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    fn push(&mut self, node: Node<'_>, parent: Option<NodeId>, field: Option<&'static str>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SyntaxNode {
            kind: SyntaxKind::from_grammar(node.kind()),
            span: Span::from(node.start_byte()..node.end_byte()),
            field,
            children: Vec::new(),
        });
        self.parents.push(parent);
        if let Some(p) = parent {
            self.nodes[p.index()].children.push(id);
        }
        id
    }
}

// ============================================================================
// Parsing
// ============================================================================

/// Parse `source` and lower it into a [`SyntaxTree`].
///
/// A source with syntax errors still produces a tree; the recovered parts
/// are analyzable and [`SyntaxTree::has_errors`] reports the recovery.
pub fn parse(source: &str, dialect: Dialect) -> ParseResult<SyntaxTree<'_>> {
    let mut parser = Parser::new();
    parser
        .set_language(&dialect.language())
        .map_err(|e| ParseError::Language {
            dialect,
            message: e.to_string(),
        })?;
    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    Ok(lower(source, tree.root_node()))
}

/// Lower a tree-sitter tree into the arena, in pre-order.
fn lower<'src>(source: &'src str, root: Node<'_>) -> SyntaxTree<'src> {
    let mut tree = SyntaxTree {
        source,
        nodes: Vec::new(),
        parents: Vec::new(),
        has_errors: root.has_error(),
    };
    let root_id = tree.push(root, None, None);

    let mut cursor = root.walk();
    if !cursor.goto_first_child() {
        return tree;
    }
    // Ids of the lowered ancestors of the cursor's current node.
    let mut stack = vec![root_id];

    loop {
        let node = cursor.node();
        if node.is_named() && !node.is_extra() {
            let parent = stack.last().copied();
            let id = tree.push(node, parent, cursor.field_name());
            if cursor.goto_first_child() {
                stack.push(id);
                continue;
            }
        }

        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return tree;
            }
            stack.pop();
            if stack.is_empty() {
                return tree;
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
