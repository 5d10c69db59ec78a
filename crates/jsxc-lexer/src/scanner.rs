//! JSX-aware scanner.
//!
//! Walks comment-stripped source and produces the token stream consumed by
//! the parser: plain-JS spans interleaved with element tokens. The scanner
//! must decide whether each `<` starts an element or is a less-than
//! operator, and it tracks JS-inside-JSX-inside-JS nesting to arbitrary
//! depth by recursing once per element.
//!
//! Two tripwires bound every scan: a step counter proportional to the
//! input length, and a cap on recursive element calls.

use crate::token::{Token, TokenKind};
use crate::{LexerError, DEFAULT_MAX_RECURSIVE_CALLS};

/// True when the `<` at `pos` begins an element: it must be followed by an
/// ASCII letter (a tag) or `>` (a fragment), and must fail the less-than
/// test.
pub(crate) fn element_begins_at(bytes: &[u8], pos: usize) -> bool {
    if bytes.get(pos) != Some(&b'<') {
        return false;
    }
    match bytes.get(pos + 1) {
        Some(&b'>') => true,
        Some(&c) if c.is_ascii_alphabetic() => !is_less_than_expression(bytes, pos),
        _ => false,
    }
}

/// Decide element-vs-operator for a `<` followed by an identifier.
///
/// Scanning right from the `<`: a space after at least one identifier
/// character reads as an element (`<div foo>`); `)`, `&`, `|`, `?`, or `;`
/// before any `>` reads as a comparison (`a<b?c:d`); a `>` reads as an
/// element. Running out of input resolves to a comparison so plain
/// JavaScript is left untouched. The test is deliberately approximate.
pub(crate) fn is_less_than_expression(bytes: &[u8], pos: usize) -> bool {
    let mut seen_ident = false;
    let mut j = pos + 1;
    while j < bytes.len() {
        let c = bytes[j];
        if c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'.') {
            seen_ident = true;
        } else if c.is_ascii_whitespace() {
            if seen_ident {
                return false;
            }
        } else if matches!(c, b')' | b'&' | b'|' | b'?' | b';') {
            return true;
        } else if c == b'>' {
            return false;
        }
        j += 1;
    }
    true
}

fn is_tag_name_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'.' | b'-' | b'_' | b'$')
}

fn is_prop_name_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || matches!(c, b'_' | b'$')
}

/// Attribute names run until whitespace, `=`, `/`, or `>`.
fn is_prop_name_byte(c: u8) -> bool {
    c != 0 && !c.is_ascii_whitespace() && !matches!(c, b'=' | b'/' | b'>')
}

fn json_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_default()
}

/// JSX source scanner.
///
/// Operates on bytes; every byte the scanner branches on is ASCII, so
/// multi-byte characters flow through untouched and all recorded offsets
/// are valid char boundaries.
pub struct Scanner<'a> {
    source: &'a str,
    bytes: &'a [u8],
    pos: usize,
    tokens: Vec<Token>,
    steps: usize,
    step_limit: usize,
    element_calls: usize,
    max_recursive_calls: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given source.
    pub fn new(source: &'a str, max_recursive_calls: usize) -> Self {
        Self {
            source,
            bytes: source.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
            steps: 0,
            step_limit: source.len() * 2 + 64,
            element_calls: 0,
            max_recursive_calls,
        }
    }

    /// Tokenize the entire source with the default recursion limit.
    pub fn tokenize(source: &str) -> Result<Vec<Token>, LexerError> {
        Self::tokenize_with_limit(source, DEFAULT_MAX_RECURSIVE_CALLS)
    }

    /// Tokenize with an explicit bound on recursive element calls.
    pub fn tokenize_with_limit(
        source: &str,
        max_recursive_calls: usize,
    ) -> Result<Vec<Token>, LexerError> {
        let mut scanner = Scanner::new(source, max_recursive_calls);
        scanner.scan()?;
        Ok(scanner.tokens)
    }

    /// Top-level scan: alternate between plain-JS spans and elements.
    fn scan(&mut self) -> Result<(), LexerError> {
        let mut current = 0;
        while let Some(pos) = self.next_element_pos(current) {
            if pos > current {
                self.tokens
                    .push(Token::new(TokenKind::Js, &self.source[current..pos], pos));
            }
            self.pos = pos;
            self.tokenize_element()?;
            current = self.pos;
        }
        if current < self.bytes.len() {
            self.tokens.push(Token::new(
                TokenKind::Js,
                &self.source[current..],
                self.bytes.len(),
            ));
        }
        Ok(())
    }

    /// Position of the next element start at or after `from`, honoring
    /// string states so `"<div>"` in a literal is never an element.
    fn next_element_pos(&self, from: usize) -> Option<usize> {
        let bytes = self.bytes;
        let mut in_single = false;
        let mut in_double = false;
        let mut in_template = false;
        let mut i = from;
        while i < bytes.len() {
            let c = bytes[i];
            if in_single || in_double || in_template {
                match c {
                    b'\\' => {
                        i += 2;
                        continue;
                    }
                    b'\'' if in_single => in_single = false,
                    b'"' if in_double => in_double = false,
                    b'`' if in_template => in_template = false,
                    _ => {}
                }
                i += 1;
                continue;
            }
            match c {
                b'\'' => in_single = true,
                b'"' => in_double = true,
                b'`' => in_template = true,
                b'<' if element_begins_at(bytes, i) => return Some(i),
                _ => {}
            }
            i += 1;
        }
        None
    }

    /// Tokenize one element starting at the current `<`: the opening tag,
    /// its attributes, then its children through the matching close.
    /// Nested elements recurse.
    fn tokenize_element(&mut self) -> Result<(), LexerError> {
        self.element_calls += 1;
        if self.element_calls > self.max_recursive_calls {
            return Err(LexerError::at(
                "too many recursive element calls",
                self.source,
                self.pos,
            ));
        }

        let start = self.pos;
        self.advance(); // '<'
        while is_tag_name_byte(self.cur()) {
            self.advance();
        }
        self.tokens.push(Token::new(
            TokenKind::ElementStart,
            &self.source[start..self.pos],
            self.pos,
        ));

        loop {
            self.tick()?;
            self.skip_whitespace();
            match self.cur() {
                // Unclosed tag at end of input: the parser reports the
                // start/end imbalance.
                0 => return Ok(()),
                b'/' => {
                    if self.peek(1) == b'>' {
                        self.advance_n(2);
                        self.tokens
                            .push(Token::unpositioned(TokenKind::ElementEnd, "/>"));
                        return Ok(());
                    }
                    return Err(LexerError::at(
                        "unexpected '/' inside element tag",
                        self.source,
                        self.pos,
                    ));
                }
                b'>' => {
                    self.advance();
                    break;
                }
                b'{' => {
                    // Spread in name position: {...expr} is the prop name.
                    let s = self.pos;
                    self.consume_braced()?;
                    self.tokens.push(Token::new(
                        TokenKind::PropName,
                        &self.source[s..self.pos],
                        self.pos,
                    ));
                }
                c if is_prop_name_start(c) => {
                    let s = self.pos;
                    while is_prop_name_byte(self.cur()) {
                        self.advance();
                    }
                    self.tokens.push(Token::new(
                        TokenKind::PropName,
                        &self.source[s..self.pos],
                        self.pos,
                    ));
                    self.skip_whitespace();
                    if self.cur() == b'=' {
                        self.advance();
                        self.skip_whitespace();
                        match self.cur() {
                            b'"' | b'\'' => {
                                let value = self.read_quoted()?;
                                self.tokens.push(Token::new(
                                    TokenKind::PropValue,
                                    json_string(&value),
                                    self.pos,
                                ));
                            }
                            b'{' => self.tokenize_prop_expression()?,
                            b'<' => self.tokenize_element()?,
                            _ => {
                                return Err(LexerError::at(
                                    "expected attribute value after '='",
                                    self.source,
                                    self.pos,
                                ));
                            }
                        }
                    }
                }
                c => {
                    return Err(LexerError::at(
                        format!("unexpected character '{}' inside element tag", c as char),
                        self.source,
                        self.pos,
                    ));
                }
            }
        }

        self.tokenize_children()
    }

    /// Children loop: text runs, `{…}` expressions, nested elements, and
    /// the closing tag. Returns after emitting the close; the parser
    /// validates that its name matches.
    fn tokenize_children(&mut self) -> Result<(), LexerError> {
        let mut text_start = self.pos;
        loop {
            self.tick()?;
            match self.cur() {
                0 => {
                    self.flush_text(text_start);
                    return Ok(());
                }
                b'<' => {
                    if self.peek(1) == b'/' {
                        self.flush_text(text_start);
                        let s = self.pos;
                        self.advance_n(2);
                        while is_tag_name_byte(self.cur()) {
                            self.advance();
                        }
                        self.skip_whitespace();
                        if self.cur() != b'>' {
                            return Err(LexerError::at(
                                "expected '>' in closing tag",
                                self.source,
                                self.pos,
                            ));
                        }
                        self.advance();
                        self.tokens.push(Token::new(
                            TokenKind::ElementEnd,
                            &self.source[s..self.pos],
                            self.pos,
                        ));
                        return Ok(());
                    }
                    if element_begins_at(self.bytes, self.pos) {
                        self.flush_text(text_start);
                        self.tokenize_element()?;
                        text_start = self.pos;
                    } else {
                        // A literal '<' in child text.
                        self.advance();
                    }
                }
                b'{' => {
                    self.flush_text(text_start);
                    self.tokenize_child_expression()?;
                    text_start = self.pos;
                }
                _ => self.advance(),
            }
        }
    }

    /// Emit accumulated child text as `ChildText` or, when the run is all
    /// whitespace, `ChildWhitespace`.
    fn flush_text(&mut self, from: usize) {
        if from >= self.pos {
            return;
        }
        let text = &self.source[from..self.pos];
        let kind = if text.chars().all(char::is_whitespace) {
            TokenKind::ChildWhitespace
        } else {
            TokenKind::ChildText
        };
        self.tokens.push(Token::new(kind, text, self.pos));
    }

    /// A `{…}` expression in child position. Without embedded elements the
    /// whole span (braces included) becomes one `ChildJs` token. When an
    /// element appears inside, the surrounding JS is split into
    /// `ChildJsStart` / `ChildJsEnd` fragments around the recursion.
    fn tokenize_child_expression(&mut self) -> Result<(), LexerError> {
        let open = self.pos;
        self.advance(); // '{'
        let mut seg_start = self.pos;
        let mut depth = 1usize;
        let mut emitted_element = false;
        let mut in_single = false;
        let mut in_double = false;
        let mut in_template = false;
        loop {
            self.tick()?;
            let c = self.cur();
            if c == 0 {
                // Unterminated expression: emit what we have and let the
                // parser report the enclosing imbalance.
                let (kind, from) = if emitted_element {
                    (TokenKind::ChildJsEnd, seg_start)
                } else {
                    (TokenKind::ChildJs, open)
                };
                self.tokens
                    .push(Token::new(kind, &self.source[from..self.pos], self.pos));
                return Ok(());
            }
            if in_single || in_double || in_template {
                match c {
                    b'\\' => {
                        self.advance_n(2);
                        continue;
                    }
                    b'\'' if in_single => in_single = false,
                    b'"' if in_double => in_double = false,
                    b'`' if in_template => in_template = false,
                    _ => {}
                }
                self.advance();
                continue;
            }
            match c {
                b'\'' => in_single = true,
                b'"' => in_double = true,
                b'`' => in_template = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        if emitted_element {
                            let text = &self.source[seg_start..self.pos];
                            self.advance();
                            self.tokens
                                .push(Token::new(TokenKind::ChildJsEnd, text, self.pos));
                        } else {
                            self.advance();
                            self.tokens.push(Token::new(
                                TokenKind::ChildJs,
                                &self.source[open..self.pos],
                                self.pos,
                            ));
                        }
                        return Ok(());
                    }
                }
                b'<' if element_begins_at(self.bytes, self.pos) => {
                    let from = if emitted_element { seg_start } else { open + 1 };
                    self.tokens.push(Token::new(
                        TokenKind::ChildJsStart,
                        &self.source[from..self.pos],
                        self.pos,
                    ));
                    self.tokenize_element()?;
                    seg_start = self.pos;
                    emitted_element = true;
                    continue;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// A `{…}` attribute value. Plain expressions become a `PropValue`
    /// carrying the inner text; expressions with embedded elements are
    /// split like child expressions.
    fn tokenize_prop_expression(&mut self) -> Result<(), LexerError> {
        self.advance(); // '{'
        let mut seg_start = self.pos;
        let mut depth = 1usize;
        let mut emitted_element = false;
        let mut in_single = false;
        let mut in_double = false;
        let mut in_template = false;
        loop {
            self.tick()?;
            let c = self.cur();
            if c == 0 {
                return Err(LexerError::at(
                    "unterminated expression in attribute value",
                    self.source,
                    self.pos,
                ));
            }
            if in_single || in_double || in_template {
                match c {
                    b'\\' => {
                        self.advance_n(2);
                        continue;
                    }
                    b'\'' if in_single => in_single = false,
                    b'"' if in_double => in_double = false,
                    b'`' if in_template => in_template = false,
                    _ => {}
                }
                self.advance();
                continue;
            }
            match c {
                b'\'' => in_single = true,
                b'"' => in_double = true,
                b'`' => in_template = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        let text = &self.source[seg_start..self.pos];
                        self.advance();
                        let kind = if emitted_element {
                            TokenKind::ChildJsEnd
                        } else {
                            TokenKind::PropValue
                        };
                        self.tokens.push(Token::new(kind, text, self.pos));
                        return Ok(());
                    }
                }
                b'<' if element_begins_at(self.bytes, self.pos) => {
                    self.tokens.push(Token::new(
                        TokenKind::ChildJsStart,
                        &self.source[seg_start..self.pos],
                        self.pos,
                    ));
                    self.tokenize_element()?;
                    seg_start = self.pos;
                    emitted_element = true;
                    continue;
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Consume a balanced `{…}` span (spread props), strings respected.
    fn consume_braced(&mut self) -> Result<(), LexerError> {
        let mut depth = 0usize;
        let mut in_single = false;
        let mut in_double = false;
        let mut in_template = false;
        loop {
            self.tick()?;
            let c = self.cur();
            if c == 0 {
                return Err(LexerError::at(
                    "unterminated '{' inside element tag",
                    self.source,
                    self.pos,
                ));
            }
            if in_single || in_double || in_template {
                match c {
                    b'\\' => {
                        self.advance_n(2);
                        continue;
                    }
                    b'\'' if in_single => in_single = false,
                    b'"' if in_double => in_double = false,
                    b'`' if in_template => in_template = false,
                    _ => {}
                }
                self.advance();
                continue;
            }
            match c {
                b'\'' => in_single = true,
                b'"' => in_double = true,
                b'`' => in_template = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    /// Read a quoted attribute value, returning its contents with the
    /// quote and backslash escapes resolved.
    fn read_quoted(&mut self) -> Result<String, LexerError> {
        let quote = self.cur();
        self.advance();
        let mut value = String::new();
        let mut seg = self.pos;
        loop {
            self.tick()?;
            let c = self.cur();
            if c == 0 {
                return Err(LexerError::at(
                    "unterminated string in attribute value",
                    self.source,
                    self.pos,
                ));
            }
            if c == b'\\' {
                let next = self.peek(1);
                if next == quote || next == b'\\' {
                    value.push_str(&self.source[seg..self.pos]);
                    value.push(next as char);
                    self.advance_n(2);
                    seg = self.pos;
                } else {
                    self.advance_n(2);
                }
            } else if c == quote {
                value.push_str(&self.source[seg..self.pos]);
                self.advance();
                return Ok(value);
            } else {
                self.advance();
            }
        }
    }

    // --- Byte navigation helpers ---

    /// Current byte, or 0 at end of input.
    fn cur(&self) -> u8 {
        self.bytes.get(self.pos).copied().unwrap_or(0)
    }

    fn peek(&self, offset: usize) -> u8 {
        self.bytes.get(self.pos + offset).copied().unwrap_or(0)
    }

    fn advance(&mut self) {
        self.pos = (self.pos + 1).min(self.bytes.len());
    }

    fn advance_n(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.bytes.len());
    }

    fn skip_whitespace(&mut self) {
        while self.cur().is_ascii_whitespace() {
            self.advance();
        }
    }

    /// Endless-loop tripwire, charged once per loop iteration.
    fn tick(&mut self) -> Result<(), LexerError> {
        self.steps += 1;
        if self.steps > self.step_limit {
            return Err(LexerError::at(
                "endless loop detected",
                self.source,
                self.pos,
            ));
        }
        Ok(())
    }
}
