//! Pragma directive scanning.
//!
//! Sources may override the configured factory and fragment names for a
//! single compile with `@jsx <name>` and `@jsxFrag <name>` directives.
//! A directive counts only inside a comment lead-in (`//`, `/*`, or
//! `/**`), and the first match wins.
//!
//! Scanning happens on the original source, before comment stripping —
//! the directives live inside the very comments the stripper removes.

use regex::Regex;
use std::sync::LazyLock;

static JSX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?://|/\*+)\s*@jsx\s+([A-Za-z_$][A-Za-z0-9_$.]*)").unwrap()
});

static JSX_FRAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?://|/\*+)\s*@jsxFrag\s+([A-Za-z_$][A-Za-z0-9_$.]*)").unwrap()
});

/// The `@jsx` factory override, if the source declares one.
pub fn jsx_override(source: &str) -> Option<String> {
    JSX_RE
        .captures(source)
        .map(|caps| caps[1].to_string())
}

/// The `@jsxFrag` fragment override, if the source declares one.
pub fn fragment_override(source: &str) -> Option<String> {
    JSX_FRAG_RE
        .captures(source)
        .map(|caps| caps[1].to_string())
}
