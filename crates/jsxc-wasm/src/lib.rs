//! WASM bindings for the jsxc compiler.
//!
//! Exposes `compile()` to JavaScript via wasm-bindgen for browser-side
//! harnesses that fetch JSX script tags and inject the compiled output.
//! Returns the generated JavaScript string or throws on error.

use jsxc_codegen::Options;
use wasm_bindgen::prelude::*;

/// Compile JSX source to JavaScript with default options
/// (`React.createElement` / `React.Fragment`, strict-mode prefix on).
///
/// Throws a JS error if the source fails to compile.
#[wasm_bindgen]
pub fn compile(source: &str) -> Result<String, JsError> {
    jsxc_codegen::compile(source, &Options::default()).map_err(|e| JsError::new(&e.to_string()))
}

/// Compile with explicit pragma configuration.
#[wasm_bindgen]
pub fn compile_with(
    source: &str,
    pragma: &str,
    pragma_frag: &str,
    add_use_strict: bool,
) -> Result<String, JsError> {
    let options = Options {
        pragma: pragma.to_string(),
        pragma_frag: pragma_frag.to_string(),
        add_use_strict,
        ..Options::default()
    };
    jsxc_codegen::compile(source, &options).map_err(|e| JsError::new(&e.to_string()))
}

/// Get the compiler version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
