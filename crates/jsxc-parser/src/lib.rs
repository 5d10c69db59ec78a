//! jsxc Parser
//!
//! Consumes the scanner's token stream and builds a [`Program`]: JS chunks
//! interleaved with element nodes, each element carrying its props,
//! children, and nesting depth. Also scans sources for `@jsx` /
//! `@jsxFrag` pragma directives.
//!
//! Runs in a single left-to-right pass over the tokens.

pub mod ast;
pub mod parser;
pub mod pragma;

pub use ast::{Child, CreateElement, MixedPart, Node, Program, Prop, PropValue};
pub use parser::Parser;

use jsxc_lexer::SourcePosition;

/// Parser error. Most failures carry a source position; the
/// element-balance check happens after the tokens are exhausted, where no
/// reliable offset exists.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("{message} at {position}")]
    Positioned {
        message: String,
        position: SourcePosition,
    },
    #[error("{message}")]
    Unpositioned { message: String },
}

impl ParseError {
    pub(crate) fn positioned(message: impl Into<String>, source: &str, offset: usize) -> Self {
        Self::Positioned {
            message: message.into(),
            position: SourcePosition::from_offset(source, offset),
        }
    }

    pub(crate) fn unpositioned(message: impl Into<String>) -> Self {
        Self::Unpositioned {
            message: message.into(),
        }
    }
}
