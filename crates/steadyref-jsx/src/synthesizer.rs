//! Fix synthesis: turn a [`Finding`] into a [`TextEdit`].
//!
//! The extracted value is declared with a memoization hook and the use site
//! is rewired to the new binding. All spans are computed against the
//! original buffer; the synthesizer never edits its own output.
//!
//! Three strategies are tried in order:
//!
//! 1. [`Strategy::BeforeReturn`]: the unit body is a block. The declaration
//!    is inserted before the block's first direct `return` statement and the
//!    value is replaced by the binding name.
//! 2. [`Strategy::Inline`]: there is no unit. The value is replaced by the
//!    hook call in place, with no declaration.
//! 3. [`Strategy::RewrapBody`]: the unit body is an expression. The whole body
//!    is replaced by a block that declares the binding and returns the old
//!    body with the value replaced by the binding name.
//!
//! Anything else is refused: a block without a direct `return`, a class
//! unit, or a value that is not inside the unit's body (a default parameter
//! value, for example). A refused finding is not reported.

use std::fmt;

use steadyref_core::patch::{Span, TextEdit};
use steadyref_core::text::indentation_at;
use tracing::debug;

use crate::classifier::{Finding, ShapeKind};
use crate::syntax::{SyntaxKind, SyntaxTree};

/// How the edit was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    BeforeReturn,
    Inline,
    RewrapBody,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::BeforeReturn => write!(f, "before-return"),
            Strategy::Inline => write!(f, "inline"),
            Strategy::RewrapBody => write!(f, "rewrap-body"),
        }
    }
}

/// A synthesized fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub strategy: Strategy,
    pub edit: TextEdit,
}

/// The memoization hook call around a value's source text.
///
/// Object literals are parenthesized so the arrow body is not read as a block.
pub fn wrap_text(shape: ShapeKind, value_text: &str) -> String {
    match shape {
        ShapeKind::Array => format!("useMemo(() => {}, [])", value_text),
        ShapeKind::Object => format!("useMemo(() => ({}), [])", value_text),
        ShapeKind::Function => format!("useCallback({}, [])", value_text),
    }
}

/// Build the edit that extracts `finding`'s value into a binding called `name`.
///
/// Returns `None` when no strategy applies.
pub fn synthesize_edit(tree: &SyntaxTree<'_>, finding: &Finding, name: &str) -> Option<Rewrite> {
    let value_span = tree.span(finding.value);
    let wrap = wrap_text(finding.shape, tree.text(finding.value));

    let Some(unit) = finding.unit else {
        return Some(Rewrite {
            strategy: Strategy::Inline,
            edit: TextEdit::new().replace(value_span, wrap),
        });
    };
    if unit.is_class() {
        return None;
    }

    let body = unit.body(tree)?;
    let body_span = tree.span(body);
    if !body_span.contains(&value_span) {
        debug!(value = %value_span, body = %body_span, "value is outside the unit body");
        return None;
    }

    if tree.kind(body) == SyntaxKind::BlockBody {
        let Some(ret) = tree
            .children(body)
            .iter()
            .copied()
            .find(|&stmt| tree.kind(stmt) == SyntaxKind::ReturnStatement)
        else {
            debug!(body = %body_span, "unit body has no direct return statement");
            return None;
        };
        let anchor = tree.span(ret).start;
        let indent = indentation_at(tree.source(), anchor as usize);
        let edit = TextEdit::new()
            .insert(anchor, format!("const {} = {}\n{}", name, wrap, indent))
            .replace(value_span, name);
        return Some(Rewrite {
            strategy: Strategy::BeforeReturn,
            edit,
        });
    }

    let spliced = splice_name(tree.text(body), body_span, value_span, name)?;
    let block = format!(
        "{{\n  const {} = {}\n  return (\n    {}\n  )\n}}",
        name, wrap, spliced
    );
    Some(Rewrite {
        strategy: Strategy::RewrapBody,
        edit: TextEdit::new().replace(body_span, block),
    })
}

/// Replace `value_span` inside `body_text` (which starts at `body_span.start`)
/// with `name`.
fn splice_name(body_text: &str, body_span: Span, value_span: Span, name: &str) -> Option<String> {
    let relative = value_span.relative_to(body_span.start)?;
    let before = body_text.get(..relative.start as usize)?;
    let after = body_text.get(relative.end as usize..)?;
    Some(format!("{}{}{}", before, name, after))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::classify;
    use crate::naming::synthesize_name;
    use crate::syntax::{parse, Dialect, NodeId};

    /// Classify the first finding in `source` and apply its rewrite.
    fn rewrite(source: &str) -> Option<(Strategy, String)> {
        let tree = parse(source, Dialect::Tsx).unwrap();
        let finding = tree
            .preorder()
            .find_map(|id| classify(&tree, id))
            .expect("no finding");
        let name = synthesize_name(&finding.context, finding.shape);
        let rewrite = synthesize_edit(&tree, &finding, &name)?;
        rewrite.edit.validate(source).unwrap();
        Some((rewrite.strategy, rewrite.edit.apply(source).unwrap()))
    }

    mod wrap {
        use super::*;

        #[test]
        fn hook_shapes() {
            assert_eq!(wrap_text(ShapeKind::Array, "[1]"), "useMemo(() => [1], [])");
            assert_eq!(
                wrap_text(ShapeKind::Object, "{ a: 1 }"),
                "useMemo(() => ({ a: 1 }), [])"
            );
            assert_eq!(
                wrap_text(ShapeKind::Function, "() => 1"),
                "useCallback(() => 1, [])"
            );
        }
    }

    mod before_return {
        use super::*;

        #[test]
        fn inserts_before_return_on_same_line() {
            let (strategy, out) =
                rewrite("function List() { return <ul items={[1,2,3]} /> }").unwrap();
            assert_eq!(strategy, Strategy::BeforeReturn);
            assert_eq!(
                out,
                "function List() { const ulItems = useMemo(() => [1,2,3], [])\nreturn <ul items={ulItems} /> }"
            );
        }

        #[test]
        fn keeps_return_indentation() {
            let source = "function Form() {\n  const x = 1\n  return <form style={{ x }} />\n}\n";
            let (_, out) = rewrite(source).unwrap();
            assert_eq!(
                out,
                "function Form() {\n  const x = 1\n  const formStyle = useMemo(() => ({ x }), [])\n  return <form style={formStyle} />\n}\n"
            );
        }

        #[test]
        fn uses_first_direct_return() {
            let source = "const Item = () => {\n  if (a) {\n    return null\n  }\n  return <Row onSelect={() => pick()} />\n  return 2\n}";
            let (strategy, out) = rewrite(source).unwrap();
            assert_eq!(strategy, Strategy::BeforeReturn);
            assert_eq!(
                out,
                "const Item = () => {\n  if (a) {\n    return null\n  }\n  const handleRowSelect = useCallback(() => pick(), [])\n  return <Row onSelect={handleRowSelect} />\n  return 2\n}"
            );
        }

        #[test]
        fn block_without_return_is_refused() {
            let source = "function Side() {\n  render(<div items={[1]} />)\n}";
            assert_eq!(rewrite(source), None);
        }

        #[test]
        fn value_in_default_parameter_is_refused() {
            let source = "function Side(el = <div items={[1]} />) {\n  return el\n}";
            assert_eq!(rewrite(source), None);
        }
    }

    mod rewrap_body {
        use super::*;

        #[test]
        fn expression_body_becomes_block() {
            let source = "const Card = () => <div onClick={() => foo()} />";
            let (strategy, out) = rewrite(source).unwrap();
            assert_eq!(strategy, Strategy::RewrapBody);
            assert_eq!(
                out,
                "const Card = () => {\n  const handleClick = useCallback(() => foo(), [])\n  return (\n    <div onClick={handleClick} />\n  )\n}"
            );
        }

        #[test]
        fn parenthesized_body_is_kept() {
            let source = "const Tags = () => (<TagList tags={['a']} />)";
            let (_, out) = rewrite(source).unwrap();
            assert_eq!(
                out,
                "const Tags = () => {\n  const tagListTags = useMemo(() => ['a'], [])\n  return (\n    (<TagList tags={tagListTags} />)\n  )\n}"
            );
        }
    }

    mod inline {
        use super::*;

        #[test]
        fn no_unit_replaces_in_place() {
            let source = "const el = <div items={[1]} />";
            let tree = parse(source, Dialect::Tsx).unwrap();
            let wrapper = tree
                .preorder()
                .find(|&id| tree.kind(id) == SyntaxKind::ExpressionWrapper)
                .unwrap();
            let value: NodeId = tree.first_child(wrapper).unwrap();
            let finding = Finding {
                wrapper,
                value,
                shape: ShapeKind::Array,
                unit: None,
                context: Default::default(),
            };
            let rewrite = synthesize_edit(&tree, &finding, "memoizedValue").unwrap();
            assert_eq!(rewrite.strategy, Strategy::Inline);
            assert_eq!(
                rewrite.edit.apply(source).unwrap(),
                "const el = <div items={useMemo(() => [1], [])} />"
            );
        }
    }

    #[test]
    fn spans_are_disjoint_and_in_bounds() {
        let sources = [
            "function A() { return <a x={[1]} y={{}} z={() => 1} /> }",
            "const B = () => <b x={[1]} />",
            "const C = () => {\n  return <c onClick={() => 1} />\n}",
        ];
        for source in sources {
            let tree = parse(source, Dialect::Tsx).unwrap();
            for finding in tree.preorder().filter_map(|id| classify(&tree, id)) {
                let name = synthesize_name(&finding.context, finding.shape);
                let rewrite = synthesize_edit(&tree, &finding, &name).unwrap();
                assert!(rewrite.edit.validate(source).is_ok());
                for span in rewrite.edit.spans() {
                    assert!(span.end as usize <= source.len());
                }
            }
        }
    }
}
