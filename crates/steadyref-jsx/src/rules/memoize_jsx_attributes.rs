//! `memoize-jsx-attributes`: inline arrays, objects and arrow functions
//! passed to markup attributes inside function components.
//!
//! ```text
//! function List() { return <ul items={[1,2,3]} /> }
//! ```
//!
//! is reported as `Array attributes should be memoized`, with the suggestion
//!
//! ```text
//! function List() { const ulItems = useMemo(() => [1,2,3], [])
//! return <ul items={ulItems} /> }
//! ```

use tracing::debug;

use crate::classifier::{classify, ShapeKind};
use crate::naming::synthesize_name;
use crate::rules::{Diagnostic, Rule, RuleContext, Suggestion};
use crate::synthesizer::synthesize_edit;
use crate::syntax::NodeId;

/// Rule name.
pub const NAME: &str = "memoize-jsx-attributes";

/// Reports unstable attribute values and offers a memoized declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoizeJsxAttributes;

fn message(shape: ShapeKind) -> &'static str {
    match shape {
        ShapeKind::Array => "Array attributes should be memoized",
        ShapeKind::Object => "Object attributes should be memoized",
        ShapeKind::Function => "Function attributes should be memoized",
    }
}

fn suggestion_description(shape: ShapeKind) -> &'static str {
    match shape {
        ShapeKind::Array => "Declare the array in a `useMemo()`",
        ShapeKind::Object => "Declare the object in a `useMemo()`",
        ShapeKind::Function => "Declare the function in a `useCallback()`",
    }
}

impl Rule for MemoizeJsxAttributes {
    fn name(&self) -> &'static str {
        NAME
    }

    fn description(&self) -> &'static str {
        "Enforce memoization of array, object and function attribute values"
    }

    fn check(&self, cx: &RuleContext<'_, '_>, node: NodeId, sink: &mut Vec<Diagnostic>) {
        let tree = cx.tree;
        let Some(finding) = classify(tree, node) else {
            return;
        };
        let name = synthesize_name(&finding.context, finding.shape);
        let value_span = tree.span(finding.value);

        let Some(rewrite) = synthesize_edit(tree, &finding, &name) else {
            debug!(
                file = cx.path,
                value = %value_span,
                shape = %finding.shape,
                "no insertion point for memoized value; not reporting"
            );
            return;
        };
        debug!(
            file = cx.path,
            value = %value_span,
            name = %name,
            strategy = %rewrite.strategy,
            unit = ?finding.context.unit_name,
            "unstable attribute value"
        );

        let suggestion = Suggestion {
            description: suggestion_description(finding.shape).to_string(),
            edit: rewrite.edit,
        };
        sink.push(cx.diagnostic(NAME, message(finding.shape), value_span, vec![suggestion]));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse, Dialect};

    fn check_all(source: &str) -> Vec<Diagnostic> {
        let tree = parse(source, Dialect::Tsx).unwrap();
        let cx = RuleContext::new(&tree, "test.tsx");
        let mut sink = Vec::new();
        for id in tree.preorder() {
            MemoizeJsxAttributes.check(&cx, id, &mut sink);
        }
        sink
    }

    #[test]
    fn messages_per_shape() {
        let source = "function F() {\n  return <X a={[1]} b={{ k: 1 }} c={() => 1} />\n}";
        let diagnostics = check_all(source);
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "Array attributes should be memoized",
                "Object attributes should be memoized",
                "Function attributes should be memoized",
            ]
        );
        let descriptions: Vec<&str> = diagnostics
            .iter()
            .map(|d| d.suggestions[0].description.as_str())
            .collect();
        assert_eq!(
            descriptions,
            vec![
                "Declare the array in a `useMemo()`",
                "Declare the object in a `useMemo()`",
                "Declare the function in a `useCallback()`",
            ]
        );
    }

    #[test]
    fn diagnostic_points_at_value() {
        let source = "const Card = () => <div onClick={() => foo()} />";
        let diagnostics = check_all(source);
        assert_eq!(diagnostics.len(), 1);
        let d = &diagnostics[0];
        assert_eq!(d.rule, NAME);
        assert_eq!(&source[d.span.as_range()], "() => foo()");
        assert_eq!((d.line, d.col), (1, 34));
        assert_eq!(d.suggestions.len(), 1);
    }

    #[test]
    fn refused_findings_are_not_reported() {
        let source = "function Side() {\n  mount(<div items={[1]} />)\n}";
        assert!(check_all(source).is_empty());
    }

    #[test]
    fn independent_findings_share_an_anchor() {
        let source = "function F() {\n  return <X a={[1]} b={[2]} />\n}";
        let diagnostics = check_all(source);
        assert_eq!(diagnostics.len(), 2);
        let first = &diagnostics[0].suggestions[0].edit;
        let second = &diagnostics[1].suggestions[0].edit;
        assert!(first.collides_with(second).is_some());
    }
}
