//! Binding names for extracted attribute values.
//!
//! Names come from the host tag and the attribute:
//!
//! | value                        | name               |
//! |------------------------------|--------------------|
//! | `<ul items={[1]}>`           | `ulItems`          |
//! | `<Chart options={{}}>`       | `chartOptions`     |
//! | `<div onClick={() => x}>`    | `handleClick`      |
//! | `<Button onClick={() => x}>` | `handleButtonClick`|
//! | `<List renderItem={() => x}>`| `listrenderItem`   |
//! | `<Foo>{() => x}</Foo>`       | `memoizedFunction` |

use crate::classifier::ShapeKind;
use crate::navigator::AttributeContext;
use crate::validation::validate_binding_name;

/// Fallback name for array and object values.
pub const VALUE_FALLBACK: &str = "memoizedValue";

/// Fallback name for function values.
pub const FUNCTION_FALLBACK: &str = "memoizedFunction";

impl ShapeKind {
    /// The name used when no naming clue is available.
    pub fn fallback_name(self) -> &'static str {
        match self {
            ShapeKind::Array | ShapeKind::Object => VALUE_FALLBACK,
            ShapeKind::Function => FUNCTION_FALLBACK,
        }
    }
}

/// Synthesize a binding name for a value of `shape` in `context`.
///
/// The result is always a valid, non-reserved identifier.
pub fn synthesize_name(context: &AttributeContext, shape: ShapeKind) -> String {
    let tag = context.host_tag.as_deref();
    let attribute = context.attribute.as_deref().map(camel_case);

    let name = match shape {
        ShapeKind::Array | ShapeKind::Object => value_name(tag, attribute.as_deref()),
        ShapeKind::Function => function_name(tag, attribute.as_deref()),
    };
    match name {
        Some(name) if validate_binding_name(&name).is_ok() => name,
        _ => shape.fallback_name().to_string(),
    }
}

fn value_name(tag: Option<&str>, attribute: Option<&str>) -> Option<String> {
    if tag.is_none() && attribute.is_none() {
        return None;
    }
    let joined: String = [tag, attribute].into_iter().flatten().map(capitalize).collect();
    Some(lowercase_first(&joined))
}

fn function_name(tag: Option<&str>, attribute: Option<&str>) -> Option<String> {
    let attribute = attribute?;
    if let Some(event) = event_name(attribute) {
        // Intrinsic elements (`div`, `input`) add nothing to a handler name.
        let component = tag.filter(|t| t.starts_with(|c: char| c.is_uppercase()));
        return Some(format!("handle{}{}", component.unwrap_or(""), event));
    }
    Some(format!("{}{}", lowercase_first(tag.unwrap_or("")), attribute))
}

/// `onClick` -> `Click`; `None` unless the name is `on` plus an uppercase letter.
fn event_name(attribute: &str) -> Option<&str> {
    let rest = attribute.strip_prefix("on")?;
    rest.starts_with(|c: char| c.is_ascii_uppercase()).then_some(rest)
}

/// Join `-` separated segments: `data-items` -> `dataItems`.
fn camel_case(name: &str) -> String {
    let mut segments = name.split('-').filter(|s| !s.is_empty());
    let first = segments.next().unwrap_or("").to_string();
    segments.fold(first, |mut acc, s| {
        acc.push_str(&capitalize(s));
        acc
    })
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn context(tag: Option<&str>, attribute: Option<&str>) -> AttributeContext {
        AttributeContext {
            unit_name: Some("Component".to_string()),
            host_tag: tag.map(str::to_string),
            attribute: attribute.map(str::to_string),
        }
    }

    mod value_names {
        use super::*;

        #[test]
        fn tag_then_attribute() {
            let name = synthesize_name(&context(Some("ul"), Some("items")), ShapeKind::Array);
            assert_eq!(name, "ulItems");
            let name = synthesize_name(&context(Some("Chart"), Some("options")), ShapeKind::Object);
            assert_eq!(name, "chartOptions");
        }

        #[test]
        fn missing_parts_are_skipped() {
            let name = synthesize_name(&context(None, Some("items")), ShapeKind::Array);
            assert_eq!(name, "items");
            let name = synthesize_name(&context(Some("Grid"), None), ShapeKind::Object);
            assert_eq!(name, "grid");
        }

        #[test]
        fn fallback_without_clues() {
            assert_eq!(
                synthesize_name(&context(None, None), ShapeKind::Array),
                VALUE_FALLBACK
            );
        }

        #[test]
        fn hyphenated_attribute() {
            let name = synthesize_name(&context(Some("div"), Some("data-items")), ShapeKind::Array);
            assert_eq!(name, "divDataItems");
            let name = synthesize_name(&context(None, Some("aria-label-by")), ShapeKind::Array);
            assert_eq!(name, "ariaLabelBy");
        }

        #[test]
        fn reserved_result_falls_back() {
            let name = synthesize_name(&context(None, Some("default")), ShapeKind::Object);
            assert_eq!(name, VALUE_FALLBACK);
        }
    }

    mod function_names {
        use super::*;

        #[test]
        fn event_handler_on_intrinsic_tag() {
            let name = synthesize_name(&context(Some("div"), Some("onClick")), ShapeKind::Function);
            assert_eq!(name, "handleClick");
        }

        #[test]
        fn event_handler_on_component() {
            let name = synthesize_name(&context(Some("Button"), Some("onClick")), ShapeKind::Function);
            assert_eq!(name, "handleButtonClick");
            let name = synthesize_name(&context(None, Some("onChange")), ShapeKind::Function);
            assert_eq!(name, "handleChange");
        }

        #[test]
        fn lowercase_after_on_is_not_an_event() {
            let name = synthesize_name(&context(None, Some("once")), ShapeKind::Function);
            assert_eq!(name, "once");
        }

        #[test]
        fn plain_attribute_is_appended_verbatim() {
            let name = synthesize_name(&context(Some("List"), Some("renderItem")), ShapeKind::Function);
            assert_eq!(name, "listrenderItem");
        }

        #[test]
        fn fallback_without_attribute() {
            let name = synthesize_name(&context(Some("Foo"), None), ShapeKind::Function);
            assert_eq!(name, FUNCTION_FALLBACK);
        }
    }

    #[test]
    fn naming_is_pure() {
        let ctx = context(Some("Select"), Some("onChange"));
        let first = synthesize_name(&ctx, ShapeKind::Function);
        for _ in 0..3 {
            assert_eq!(synthesize_name(&ctx, ShapeKind::Function), first);
        }
    }

    #[test]
    fn every_combination_is_a_valid_identifier() {
        let tags = [None, Some("div"), Some("Button")];
        let attributes = [None, Some("items"), Some("onClick"), Some("data-x"), Some("class")];
        for tag in tags {
            for attribute in attributes {
                for shape in [ShapeKind::Array, ShapeKind::Object, ShapeKind::Function] {
                    let name = synthesize_name(&context(tag, attribute), shape);
                    assert!(
                        validate_binding_name(&name).is_ok(),
                        "{:?}/{:?}/{} -> {}",
                        tag,
                        attribute,
                        shape,
                        name
                    );
                }
            }
        }
    }
}
