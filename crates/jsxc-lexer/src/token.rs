/// Token classification for JSX source.
///
/// `Js` carries plain JavaScript copied through untouched; the remaining
/// kinds describe the pieces of an element expression in the order the
/// scanner encountered them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A span of raw JavaScript between or around elements.
    Js,

    /// Opening tag text through the name, including the leading `<`.
    ElementStart,
    /// Closing text: `</name>` or the self-closing `/>`.
    ElementEnd,

    /// An attribute name, or a spread `{...expr}` in name position.
    PropName,
    /// An attribute value: a JSON-encoded string literal or a raw JS expression.
    PropValue,

    /// Literal child text containing at least one non-whitespace character.
    ChildText,
    /// A run of whitespace between children.
    ChildWhitespace,
    /// A complete `{…}` expression used as a child, braces included.
    ChildJs,
    /// The JS fragment preceding an element nested inside a `{…}` expression.
    ChildJsStart,
    /// The JS fragment following an element nested inside a `{…}` expression.
    ChildJsEnd,
}

impl TokenKind {
    /// Human-readable kind name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Js => "js",
            TokenKind::ElementStart => "element start",
            TokenKind::ElementEnd => "element end",
            TokenKind::PropName => "prop name",
            TokenKind::PropValue => "prop value",
            TokenKind::ChildText => "child text",
            TokenKind::ChildWhitespace => "child whitespace",
            TokenKind::ChildJs => "child js",
            TokenKind::ChildJsStart => "child js start",
            TokenKind::ChildJsEnd => "child js end",
        }
    }
}

/// A token produced by the scanner.
///
/// `pos` is the byte offset at which the token ends in the original source.
/// It is consulted only when building error messages. The `ElementEnd`
/// emitted for a self-closing tag carries no position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub pos: Option<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, pos: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            pos: Some(pos),
        }
    }

    /// A token without a source position (self-closing `ElementEnd`).
    pub fn unpositioned(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            pos: None,
        }
    }
}

/// Line, column, and trimmed line text derived from a byte offset.
///
/// Shared by the lexer and parser error types so every positioned message
/// renders the same way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
    pub line_text: String,
}

impl SourcePosition {
    /// Resolve a byte offset against the source it was taken from.
    ///
    /// Offsets past the end of the source clamp to the final line; offsets
    /// inside a multi-byte character floor to its start.
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while offset > 0 && !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = offset - line_start + 1;
        let line_end = source[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(source.len());
        Self {
            line,
            column,
            line_text: source[line_start..line_end].trim().to_string(),
        }
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Line #: {}, Column #: {}, Line: {}",
            self.line, self.column, self.line_text
        )
    }
}
