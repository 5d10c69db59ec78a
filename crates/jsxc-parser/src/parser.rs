//! Token-stream parser.
//!
//! Converts the scanner's flat token stream into a [`Program`] using
//! recursive descent: one call per element, consuming until the matching
//! close. Embedded JavaScript is carried through as opaque text.

use crate::ast::{
    is_component_tag, Child, CreateElement, MixedPart, Node, Program, Prop, PropValue,
};
use crate::ParseError;
use jsxc_lexer::{Token, TokenKind};

/// JSX token parser.
pub struct Parser<'a> {
    tokens: &'a [Token],
    source: &'a str,
    fragment: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// Parse a token stream into a program.
    ///
    /// `source` is the original input, used only to resolve error
    /// positions. `fragment` is the fragment pragma substituted for empty
    /// element names (`<>…</>`).
    pub fn parse(
        tokens: &'a [Token],
        source: &'a str,
        fragment: &'a str,
    ) -> Result<Program, ParseError> {
        let mut parser = Parser {
            tokens,
            source,
            fragment,
            pos: 0,
        };

        let mut body = Vec::new();
        while !parser.is_at_end() {
            body.push(parser.walk(0)?);
        }

        let starts = count_kind(tokens, TokenKind::ElementStart);
        let ends = count_kind(tokens, TokenKind::ElementEnd);
        if starts != ends {
            return Err(ParseError::unpositioned("unbalanced elements"));
        }

        Ok(Program { body })
    }

    /// Parse one top-level node.
    fn walk(&mut self, depth: usize) -> Result<Node, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Js) => Ok(Node::JsChunk(self.take_value())),
            Some(TokenKind::ElementStart) => Ok(Node::Element(self.parse_element(depth)?)),
            Some(_) => Err(self.order_error()),
            None => Err(ParseError::unpositioned("unexpected end of tokens")),
        }
    }

    /// Parse an element from its `ElementStart` through the matching
    /// `ElementEnd`, building props and children along the way.
    fn parse_element(&mut self, depth: usize) -> Result<CreateElement, ParseError> {
        let raw = self.take_value();
        let open_name = tag_name(&raw).to_string();
        let name = if open_name.is_empty() {
            self.fragment.to_string()
        } else {
            open_name.clone()
        };
        let is_class = is_component_tag(&name);

        let mut element = CreateElement {
            name,
            is_class,
            props: Vec::new(),
            children: Vec::new(),
            depth,
        };

        loop {
            let Some(kind) = self.peek_kind() else {
                return Err(ParseError::unpositioned("unbalanced elements"));
            };
            match kind {
                TokenKind::ElementEnd => {
                    let pos = self.peek_pos();
                    let close = self.take_value();
                    let close_name = tag_name(&close);
                    if !close_name.is_empty() && close_name != open_name {
                        let message =
                            format!("mismatched tags: <{open_name}> closed by </{close_name}>");
                        return Err(match pos {
                            Some(p) => ParseError::positioned(message, self.source, p),
                            None => ParseError::unpositioned(message),
                        });
                    }
                    return Ok(element);
                }
                TokenKind::PropName => {
                    let prop_name = self.take_value();
                    let value = match self.peek_kind() {
                        Some(TokenKind::PropValue) => Some(PropValue::Text(self.take_value())),
                        Some(TokenKind::ElementStart) => {
                            Some(PropValue::Element(self.parse_element(depth + 1)?))
                        }
                        Some(TokenKind::ChildJsStart) => {
                            Some(PropValue::Mixed(self.collect_mixed(depth)?))
                        }
                        _ => None,
                    };
                    element.props.push(Prop {
                        name: prop_name,
                        value,
                    });
                }
                TokenKind::ChildText => element.children.push(Child::Text(self.take_value())),
                TokenKind::ChildWhitespace => {
                    element.children.push(Child::Whitespace(self.take_value()))
                }
                TokenKind::ChildJs => {
                    let expr = strip_child_braces(&self.take_value());
                    element.children.push(Child::Js(expr));
                }
                TokenKind::ChildJsStart => {
                    element.children.push(Child::Mixed(self.collect_mixed(depth)?));
                }
                TokenKind::ElementStart => {
                    element
                        .children
                        .push(Child::Element(self.parse_element(depth + 1)?));
                }
                TokenKind::Js | TokenKind::PropValue | TokenKind::ChildJsEnd => {
                    return Err(self.order_error());
                }
            }
        }
    }

    /// Collect a `[glue, element, …, glue]` expression starting at a
    /// `ChildJsStart` and ending at the matching `ChildJsEnd`.
    fn collect_mixed(&mut self, depth: usize) -> Result<Vec<MixedPart>, ParseError> {
        let mut parts = Vec::new();
        loop {
            let Some(kind) = self.peek_kind() else {
                return Err(ParseError::unpositioned("unbalanced elements"));
            };
            match kind {
                TokenKind::ChildJsStart => parts.push(MixedPart::Js(self.take_value())),
                TokenKind::ChildJsEnd => {
                    parts.push(MixedPart::Js(self.take_value()));
                    return Ok(parts);
                }
                TokenKind::ElementStart => {
                    parts.push(MixedPart::Element(self.parse_element(depth + 1)?));
                }
                _ => return Err(self.order_error()),
            }
        }
    }

    // =========================================================================
    // Token navigation helpers
    // =========================================================================

    fn peek_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn peek_pos(&self) -> Option<usize> {
        self.tokens.get(self.pos).and_then(|t| t.pos)
    }

    /// Clone the current token's value and advance past it.
    fn take_value(&mut self) -> String {
        let value = self.tokens[self.pos].value.clone();
        self.pos += 1;
        value
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn order_error(&self) -> ParseError {
        match self.tokens.get(self.pos) {
            Some(token) => {
                let message = format!("unexpected {} token", token.kind.name());
                match token.pos {
                    Some(p) => ParseError::positioned(message, self.source, p),
                    None => ParseError::unpositioned(message),
                }
            }
            None => ParseError::unpositioned("unexpected end of tokens"),
        }
    }
}

/// Strip `<`, `>`, and `/` from tag text: `<div` and `</div>` both yield
/// `div`; `<`, `/>`, and `</>` yield the empty (fragment) name.
fn tag_name(raw: &str) -> &str {
    raw.trim_matches(|c| matches!(c, '<' | '>' | '/'))
}

/// Trim a child expression and drop exactly one surrounding brace pair.
fn strip_child_braces(text: &str) -> String {
    let t = text.trim();
    let t = t.strip_prefix('{').unwrap_or(t);
    let t = t.strip_suffix('}').unwrap_or(t);
    t.to_string()
}

fn count_kind(tokens: &[Token], kind: TokenKind) -> usize {
    tokens.iter().filter(|t| t.kind == kind).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsxc_lexer::{strip_comments, Scanner};

    fn parse(source: &str) -> Program {
        try_parse(source).unwrap()
    }

    fn try_parse(source: &str) -> Result<Program, ParseError> {
        let stripped = strip_comments(source);
        let tokens = Scanner::tokenize(&stripped).unwrap();
        Parser::parse(&tokens, source, "React.Fragment")
    }

    fn first_element(program: &Program) -> &CreateElement {
        program
            .body
            .iter()
            .find_map(|n| match n {
                Node::Element(el) => Some(el),
                Node::JsChunk(_) => None,
            })
            .expect("no element in program")
    }

    // =========================================================================
    // Plain JS
    // =========================================================================

    #[test]
    fn test_empty_program() {
        assert!(parse("").body.is_empty());
    }

    #[test]
    fn test_js_only() {
        let program = parse("const a = 1;");
        assert_eq!(program.body, vec![Node::JsChunk("const a = 1;".into())]);
    }

    // =========================================================================
    // Elements
    // =========================================================================

    #[test]
    fn test_simple_element() {
        let program = parse("let x = <div>hi</div>;");
        let el = first_element(&program);
        assert_eq!(el.name, "div");
        assert!(!el.is_class);
        assert_eq!(el.depth, 0);
        assert_eq!(el.children, vec![Child::Text("hi".into())]);
    }

    #[test]
    fn test_component_is_class() {
        let el_program = parse("<Foo/>");
        assert!(first_element(&el_program).is_class);

        let dotted = parse("<foo.bar/>");
        assert!(first_element(&dotted).is_class);
    }

    #[test]
    fn test_fragment_gets_fragment_name() {
        let program = parse("<></>");
        let el = first_element(&program);
        assert_eq!(el.name, "React.Fragment");
        assert!(el.is_class);
    }

    #[test]
    fn test_nested_depth_stamping() {
        let program = parse("<a><b><c/></b></a>");
        let a = first_element(&program);
        assert_eq!(a.depth, 0);
        let Child::Element(b) = &a.children[0] else {
            panic!("expected element child");
        };
        assert_eq!(b.depth, 1);
        let Child::Element(c) = &b.children[0] else {
            panic!("expected element child");
        };
        assert_eq!(c.depth, 2);
    }

    // =========================================================================
    // Props
    // =========================================================================

    #[test]
    fn test_string_prop() {
        let program = parse("<div id=\"a\"/>");
        let el = first_element(&program);
        assert_eq!(el.props.len(), 1);
        assert_eq!(el.props[0].name, "id");
        assert_eq!(el.props[0].value, Some(PropValue::Text("\"a\"".into())));
    }

    #[test]
    fn test_expression_prop() {
        let program = parse("<Foo bar={1+2}/>");
        let el = first_element(&program);
        assert_eq!(el.props[0].value, Some(PropValue::Text("1+2".into())));
    }

    #[test]
    fn test_bare_prop_has_no_value() {
        let program = parse("<input disabled/>");
        let el = first_element(&program);
        assert_eq!(el.props[0].name, "disabled");
        assert_eq!(el.props[0].value, None);
    }

    #[test]
    fn test_spread_prop_name() {
        let program = parse("<div {...rest}/>");
        let el = first_element(&program);
        assert_eq!(el.props[0].name, "{...rest}");
        assert_eq!(el.props[0].value, None);
    }

    #[test]
    fn test_element_prop_value() {
        let program = parse("<Page header=<Nav/> />");
        let el = first_element(&program);
        match &el.props[0].value {
            Some(PropValue::Element(nav)) => assert_eq!(nav.name, "Nav"),
            other => panic!("expected element prop value, got {other:?}"),
        }
    }

    #[test]
    fn test_mixed_prop_value() {
        let program = parse("<Page header={wrap(<Nav/>)} />");
        let el = first_element(&program);
        match &el.props[0].value {
            Some(PropValue::Mixed(parts)) => {
                assert_eq!(parts.len(), 3);
                assert_eq!(parts[0], MixedPart::Js("wrap(".into()));
                assert!(matches!(&parts[1], MixedPart::Element(e) if e.name == "Nav"));
                assert_eq!(parts[2], MixedPart::Js(")".into()));
            }
            other => panic!("expected mixed prop value, got {other:?}"),
        }
    }

    // =========================================================================
    // Children
    // =========================================================================

    #[test]
    fn test_child_expression_braces_stripped() {
        let program = parse("<div>{count}</div>");
        let el = first_element(&program);
        assert_eq!(el.children, vec![Child::Js("count".into())]);
    }

    #[test]
    fn test_whitespace_children_kept() {
        let program = parse("<div> <b/> </div>");
        let el = first_element(&program);
        assert!(matches!(&el.children[0], Child::Whitespace(_)));
        assert!(matches!(&el.children[1], Child::Element(_)));
        assert!(matches!(&el.children[2], Child::Whitespace(_)));
    }

    #[test]
    fn test_mixed_child_expression() {
        let program = parse("<ul>{items.map(i => <li>{i}</li>)}</ul>");
        let el = first_element(&program);
        assert_eq!(el.children.len(), 1);
        match &el.children[0] {
            Child::Mixed(parts) => {
                assert_eq!(parts[0], MixedPart::Js("items.map(i => ".into()));
                assert!(matches!(&parts[1], MixedPart::Element(li) if li.name == "li"));
                assert_eq!(parts[2], MixedPart::Js(")".into()));
            }
            other => panic!("expected mixed child, got {other:?}"),
        }
    }

    #[test]
    fn test_comment_in_source_ignored() {
        let program = parse("// note\nlet a = <div/>;");
        assert_eq!(first_element(&program).name, "div");
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn test_mismatched_tags() {
        let err = try_parse("<div>x</span>").unwrap_err();
        assert!(err.to_string().contains("mismatched tags"));
        assert!(err.to_string().contains("Line #: 1"));
    }

    #[test]
    fn test_unbalanced_elements() {
        let err = try_parse("<div>").unwrap_err();
        assert_eq!(err.to_string(), "unbalanced elements");
    }

    #[test]
    fn test_unbalanced_error_has_no_position() {
        let err = try_parse("let a = 1;\n<div>").unwrap_err();
        assert!(matches!(err, ParseError::Unpositioned { .. }));
    }

    #[test]
    fn test_self_closing_matches_itself() {
        assert!(try_parse("<br/>").is_ok());
    }

    #[test]
    fn test_fragment_close_matches_any_open() {
        // A named element may be closed by the empty close form.
        assert!(try_parse("<div>x</>").is_ok());
    }
}
