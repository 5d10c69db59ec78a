//! JavaScript code generator.
//!
//! Walks the parsed program and emits JavaScript: JS chunks are copied
//! verbatim, element nodes become factory calls
//! `pragma(name, props, ...children)`. Layout (newlines, indentation,
//! prop wrapping) is purely cosmetic; the emitted code is equivalent
//! either way.

use crate::entities::decode_entities;
use crate::CodegenError;
use jsxc_parser::{Child, CreateElement, MixedPart, Node, Program, Prop, PropValue};

/// Prop lists longer than this many characters wrap one prop per line.
const PROP_WRAP_WIDTH: usize = 80;

/// Generate JavaScript from a program.
///
/// `pragma` is the factory invoked per element (fragments already carry
/// the fragment pragma as their name). When `add_use_strict` is set and
/// the output does not already contain a strict-mode directive, the
/// result is prefixed with one.
pub fn generate(
    program: &Program,
    pragma: &str,
    add_use_strict: bool,
) -> Result<String, CodegenError> {
    let mut out = String::new();
    for node in &program.body {
        match node {
            Node::JsChunk(text) => out.push_str(text),
            Node::Element(el) => out.push_str(&emit_element(el, pragma, true)?),
        }
    }

    if add_use_strict && !out.contains("\"use strict\"") && !out.contains("'use strict'") {
        out.insert_str(0, "\"use strict\";\n");
    }
    Ok(out)
}

/// Emit one element as a factory call. With `skip_indent` the call is laid
/// out inline; otherwise nested elements get their own indented lines.
fn emit_element(
    el: &CreateElement,
    pragma: &str,
    skip_indent: bool,
) -> Result<String, CodegenError> {
    let name = if el.is_class {
        el.name.clone()
    } else {
        json_string(&el.name)
    };
    let props = emit_props(el, pragma, skip_indent)?;
    let children = emit_children(el, pragma)?;
    Ok(format!("{pragma}({name}, {props}{children})"))
}

/// Emit the props object, or `null` when the element has none.
fn emit_props(
    el: &CreateElement,
    pragma: &str,
    skip_indent: bool,
) -> Result<String, CodegenError> {
    if el.props.is_empty() {
        return Ok("null".into());
    }

    let mut parts = Vec::with_capacity(el.props.len());
    for prop in &el.props {
        parts.push(emit_prop(prop, pragma)?);
    }

    let joined = parts.join(", ");
    if joined.len() <= PROP_WRAP_WIDTH {
        return Ok(format!("{{{joined}}}"));
    }

    // Long prop lists go one per line.
    let indent = if skip_indent {
        " ".to_string()
    } else {
        " ".repeat((el.depth + 3) * 4)
    };
    let lines: Vec<String> = parts.iter().map(|p| format!("{indent}{p}")).collect();
    Ok(format!("{{\n{}}}", lines.join(",\n")))
}

fn emit_prop(prop: &Prop, pragma: &str) -> Result<String, CodegenError> {
    // Spread props carry their braces in the name; unwrap to `...expr`.
    if prop.value.is_none() && prop.name.starts_with("{...") && prop.name.ends_with('}') {
        return Ok(prop.name[1..prop.name.len() - 1].trim().to_string());
    }

    let key = if prop.name.contains('-') {
        json_string(&prop.name)
    } else {
        prop.name.clone()
    };
    let value = match &prop.value {
        None => "true".to_string(),
        Some(PropValue::Text(text)) => text.clone(),
        Some(PropValue::Element(el)) => emit_element(el, pragma, true)?,
        Some(PropValue::Mixed(parts)) => emit_mixed(parts, pragma)?,
    };
    Ok(format!("{key}: {value}"))
}

/// Emit the child arguments, each prefixed by its separator. Returns the
/// empty string when the element has no content children.
fn emit_children(el: &CreateElement, pragma: &str) -> Result<String, CodegenError> {
    // First scan: drop pure whitespace at the very start and end.
    let first = match el
        .children
        .iter()
        .position(|c| !matches!(c, Child::Whitespace(_)))
    {
        Some(i) => i,
        None => return Ok(String::new()),
    };
    let last = el
        .children
        .iter()
        .rposition(|c| !matches!(c, Child::Whitespace(_)))
        .unwrap_or(first);
    let slice = &el.children[first..=last];

    // Second scan: emit. `concat_next` joins an element onto a preceding
    // JS child that is syntactically incomplete without it.
    let mut out = String::new();
    let mut concat_next = false;
    for (idx, child) in slice.iter().enumerate() {
        match child {
            Child::Whitespace(ws) => {
                out.push_str(", ");
                out.push_str(&json_string(ws));
                concat_next = false;
            }
            Child::Text(text) => {
                let mut t = text.as_str();
                if idx == 0 {
                    t = t.trim_start();
                }
                if idx == slice.len() - 1 {
                    t = t.trim_end();
                }
                let decoded = if t.contains('&') {
                    decode_entities(t)
                } else {
                    t.to_string()
                };
                out.push_str(", ");
                out.push_str(&json_string(&decoded));
                concat_next = false;
            }
            Child::Js(expr) => {
                out.push_str(", ");
                out.push_str(expr);
                concat_next = ends_open(expr);
            }
            Child::Mixed(parts) => {
                out.push_str(", ");
                out.push_str(&emit_mixed(parts, pragma)?);
                concat_next = false;
            }
            Child::Element(child_el) => {
                if concat_next {
                    out.push_str(&emit_element(child_el, pragma, true)?);
                } else {
                    out.push_str(",\n");
                    out.push_str(&" ".repeat((el.depth + 2) * 4));
                    out.push_str(&emit_element(child_el, pragma, false)?);
                }
                concat_next = false;
            }
        }
    }
    Ok(out)
}

/// Reassemble a mixed JS-and-elements expression; the pieces concatenate
/// with no separators because they form a single expression.
fn emit_mixed(parts: &[MixedPart], pragma: &str) -> Result<String, CodegenError> {
    let mut out = String::new();
    for part in parts {
        match part {
            MixedPart::Js(text) => out.push_str(text),
            MixedPart::Element(el) => out.push_str(&emit_element(el, pragma, true)?),
        }
    }
    Ok(out)
}

/// A JS child ending this way is the left half of an expression whose
/// value is the element that follows it.
fn ends_open(expr: &str) -> bool {
    let t = expr.trim_end();
    t.ends_with("&&")
        || t.ends_with('?')
        || t.ends_with('(')
        || t.ends_with(':')
        || t.ends_with(" return")
        || t == "return"
}

fn json_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_default()
}
