//! Abstract Syntax Tree for compiled JSX.
//!
//! A program is a flat list of JS chunks and element nodes. Embedded
//! JavaScript stays opaque text all the way through; only the element
//! structure is modeled.

/// A complete parsed source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub body: Vec<Node>,
}

/// A top-level node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A span of JavaScript copied through verbatim.
    JsChunk(String),

    /// A JSX element, rewritten to a factory call at emission.
    Element(CreateElement),
}

/// One element expression.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateElement {
    /// Tag or component name. Fragments carry the fragment pragma here.
    pub name: String,
    /// True when the name is emitted bare (component reference) rather
    /// than as a string literal (HTML tag).
    pub is_class: bool,
    pub props: Vec<Prop>,
    pub children: Vec<Child>,
    /// Nesting depth, used only to pick indentation in generated code.
    pub depth: usize,
}

/// An attribute on an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    /// Attribute name, or the literal `{...expr}` for a spread.
    pub name: String,
    /// `None` for a bare attribute (true at emission).
    pub value: Option<PropValue>,
}

/// An attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    /// Emission-ready text: a JSON-encoded string literal or a raw JS
    /// expression.
    Text(String),
    /// A nested element used directly as the value.
    Element(CreateElement),
    /// An expression with embedded elements, reassembled in order.
    Mixed(Vec<MixedPart>),
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    /// Literal text (contains at least one non-whitespace character).
    Text(String),
    /// A whitespace run between children.
    Whitespace(String),
    /// A complete `{…}` child expression, braces already stripped.
    Js(String),
    /// A nested element.
    Element(CreateElement),
    /// A `{…}` expression with embedded elements: the JS fragments and
    /// elements concatenate back into a single expression.
    Mixed(Vec<MixedPart>),
}

/// One piece of a mixed JS-and-elements expression.
#[derive(Debug, Clone, PartialEq)]
pub enum MixedPart {
    Js(String),
    Element(CreateElement),
}

/// Check if a tag name refers to a component: it starts with an uppercase
/// ASCII letter or is a member access. Everything else is an HTML tag.
pub fn is_component_tag(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_uppercase()) || name.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_component_tag() {
        assert!(is_component_tag("Button"));
        assert!(is_component_tag("Foo.Bar"));
        assert!(is_component_tag("foo.bar"));
        assert!(!is_component_tag("div"));
        assert!(!is_component_tag("my-widget"));
        assert!(!is_component_tag(""));
    }
}
