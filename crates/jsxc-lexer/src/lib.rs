//! jsxc Lexer
//!
//! Turns JSX source text into a stream of tokens. The pass before it,
//! [`strip_comments`], blanks out comments while preserving every byte
//! offset, so token positions always map back to the original source.
//!
//! The scanner is aware of strings, template literals, JS expressions
//! embedded in elements, and elements nested inside those expressions to
//! arbitrary depth.
//!
//! # Example
//!
//! ```
//! use jsxc_lexer::{Scanner, TokenKind};
//!
//! let tokens = Scanner::tokenize("const a = 1;").unwrap();
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].kind, TokenKind::Js);
//! ```

pub mod scanner;
pub mod strip;
pub mod token;

pub use scanner::Scanner;
pub use strip::strip_comments;
pub use token::{SourcePosition, Token, TokenKind};

/// Default bound on recursive element tokenization.
pub const DEFAULT_MAX_RECURSIVE_CALLS: usize = 1000;

/// Lexer error with position information.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message} at {position}")]
pub struct LexerError {
    pub message: String,
    pub position: SourcePosition,
}

impl LexerError {
    pub(crate) fn at(message: impl Into<String>, source: &str, offset: usize) -> Self {
        Self {
            message: message.into(),
            position: SourcePosition::from_offset(source, offset),
        }
    }
}
