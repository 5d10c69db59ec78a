//! jsxc Code Generator
//!
//! The back half of the compiler and its front door: [`generate`] turns a
//! parsed program into JavaScript, and [`compile`] runs the whole
//! pipeline on source text.
//!
//! ```text
//! source → strip_comments → Scanner → Parser → generate → JavaScript
//! ```
//!
//! Every element becomes a call of the configured pragma
//! (`React.createElement` by default); fragments use the fragment pragma.
//! Sources can override both per compile with `@jsx` / `@jsxFrag`
//! directives.

pub mod entities;
pub mod js;

pub use js::generate;

use jsxc_lexer::{strip_comments, LexerError, Scanner};
use jsxc_parser::{pragma, ParseError, Parser};

/// Compiler configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Factory invoked per element.
    pub pragma: String,
    /// Name used for fragment elements (`<>…</>`).
    pub pragma_frag: String,
    /// Prefix the output with `"use strict";` when it has no strict
    /// directive of its own.
    pub add_use_strict: bool,
    /// Bound on recursive element tokenization.
    pub max_recursive_calls: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pragma: "React.createElement".into(),
            pragma_frag: "React.Fragment".into(),
            add_use_strict: true,
            max_recursive_calls: jsxc_lexer::DEFAULT_MAX_RECURSIVE_CALLS,
        }
    }
}

/// Code generation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("codegen error: {message}")]
pub struct CodegenError {
    pub message: String,
}

/// Any failure of the compile pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Lexer(#[from] LexerError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

/// Compile JSX source to JavaScript.
///
/// Pure and reentrant: no state survives the call, and concurrent calls
/// share nothing beyond the read-only options. All errors are fatal; no
/// partial output is returned.
pub fn compile(input: &str, options: &Options) -> Result<String, CompileError> {
    let stripped = strip_comments(input);
    let tokens = Scanner::tokenize_with_limit(&stripped, options.max_recursive_calls)?;

    // Directives live inside comments, so they are scanned on the
    // original input rather than the stripped text.
    let factory = pragma::jsx_override(input).unwrap_or_else(|| options.pragma.clone());
    let fragment = pragma::fragment_override(input).unwrap_or_else(|| options.pragma_frag.clone());

    let program = Parser::parse(&tokens, input, &fragment)?;
    let output = js::generate(&program, &factory, options.add_use_strict)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile_default(source: &str) -> String {
        compile(source, &Options::default()).unwrap()
    }

    fn compile_plain(source: &str) -> String {
        let options = Options {
            add_use_strict: false,
            ..Options::default()
        };
        compile(source, &options).unwrap()
    }

    // =========================================================================
    // End-to-end scenarios
    // =========================================================================

    #[test]
    fn test_simple_element_with_prop_and_text() {
        let out = compile_default("const x = <div id=\"a\">hi</div>;");
        assert!(out.contains("React.createElement(\"div\", {id: \"a\"}, \"hi\")"));
    }

    #[test]
    fn test_component_with_expression_prop() {
        let out = compile_default("const x = <Foo bar={1+2} />;");
        assert!(out.contains("React.createElement(Foo, {bar: 1+2})"));
    }

    #[test]
    fn test_list_rendering() {
        let out = compile_plain("<ul>{items.map(i => <li key={i}>{i}</li>)}</ul>");
        assert_eq!(
            out,
            "React.createElement(\"ul\", null, items.map(i => React.createElement(\"li\", {key: i}, i)))"
        );
    }

    #[test]
    fn test_pragma_directives() {
        let out =
            compile_default("// @jsx h\n// @jsxFrag Fragment\nconst a = <><span/></>;");
        assert!(out.contains("h(Fragment, null,"));
        assert!(out.contains("h(\"span\", null)"));
        assert!(!out.contains("React.createElement"));
    }

    #[test]
    fn test_dashed_prop_spread_and_entity() {
        let out = compile_default("const a = <div data-x=\"1\" {...rest}>&amp;</div>;");
        assert!(out.contains("{\"data-x\": \"1\", ...rest}"));
        assert!(out.contains("\"&\""));
    }

    #[test]
    fn test_logical_and_element() {
        let out = compile_plain("const a = cond && <X/>;");
        assert_eq!(out, "const a = cond && React.createElement(X, null);");
    }

    // =========================================================================
    // Strict-mode prefix
    // =========================================================================

    #[test]
    fn test_strict_prefix_on_by_default() {
        assert_eq!(compile_default("let a;"), "\"use strict\";\nlet a;");
    }

    #[test]
    fn test_strict_prefix_disabled() {
        assert_eq!(compile_plain("let a;"), "let a;");
    }

    #[test]
    fn test_existing_strict_directive_kept() {
        let out = compile_default("\"use strict\";\nlet a;");
        assert_eq!(out, "\"use strict\";\nlet a;");
    }

    // =========================================================================
    // Properties
    // =========================================================================

    #[test]
    fn test_js_without_elements_passes_through() {
        let corpus = [
            "const a = 1;",
            "function f(a, b) { return a < b ? a : b; }",
            "a<b?c:d",
            "for (let i = 0; i<10; i++) {}",
            "const s = '<div>' + `<br/>`;",
        ];
        for src in corpus {
            assert_eq!(compile_plain(src), src, "input: {src:?}");
        }
    }

    #[test]
    fn test_comments_removed_from_output() {
        let out = compile_plain("let a = 1; // note\nlet b = <br/>;");
        assert!(!out.contains("note"));
        assert!(out.contains("React.createElement(\"br\", null)"));
    }

    #[test]
    fn test_no_state_leaks_between_compiles() {
        let first = compile_default("// @jsx h\nconst a = <div/>;");
        let second = compile_default("const a = <div/>;");
        assert!(first.contains("h(\"div\", null)"));
        assert!(second.contains("React.createElement(\"div\", null)"));
    }

    #[test]
    fn test_custom_options() {
        let options = Options {
            pragma: "m".into(),
            pragma_frag: "m.Frag".into(),
            add_use_strict: false,
            ..Options::default()
        };
        let out = compile("<><hr/></>", &options).unwrap();
        assert!(out.starts_with("m(m.Frag, null,"));
        assert!(out.contains("m(\"hr\", null)"));
    }

    // =========================================================================
    // Errors
    // =========================================================================

    #[test]
    fn test_lexer_error_surfaces() {
        let err = compile("<div /x>", &Options::default()).unwrap_err();
        assert!(matches!(err, CompileError::Lexer(_)));
        assert!(err.to_string().contains("Line #: 1"));
    }

    #[test]
    fn test_parser_error_surfaces() {
        let err = compile("<div>x</span>", &Options::default()).unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));
        assert!(err.to_string().contains("mismatched tags"));
    }

    #[test]
    fn test_unbalanced_error_has_bare_message() {
        let err = compile("<div>", &Options::default()).unwrap_err();
        assert_eq!(err.to_string(), "unbalanced elements");
    }

    #[test]
    fn test_recursion_limit_respected() {
        let options = Options {
            max_recursive_calls: 2,
            ..Options::default()
        };
        let err = compile("<a><b><c/></b></a>", &options).unwrap_err();
        assert!(err.to_string().contains("too many recursive element calls"));
    }
}
