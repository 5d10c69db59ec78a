//! Comment elision.
//!
//! Replaces every comment span with spaces before the source reaches the
//! scanner. Newlines inside comments are kept, so the output has the same
//! length as the input and every byte offset in it matches the original —
//! downstream error positions stay truthful.
//!
//! Three comment forms are recognized: `// …` line comments, `/* … */`
//! block comments, and JSX comments `{/* … */}` between element children
//! (where the braces are blanked too). A comment can only open in plain
//! JavaScript or inside a `{…}` expression embedded in an element; this is
//! what keeps `</path>` and attribute URLs from being misread as comments.

use crate::scanner::element_begins_at;

/// Strip comments from `source`, preserving its length exactly.
///
/// Never fails: input that defeats the heuristics passes through unchanged
/// apart from whatever comments were recognized.
pub fn strip_comments(source: &str) -> String {
    let bytes = source.as_bytes();
    let mut out = bytes.to_vec();

    let mut in_single = false;
    let mut in_double = false;
    let mut in_template = false;
    let mut element_depth: usize = 0;
    let mut js_depth: usize = 0;

    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];

        if in_single || in_double || in_template {
            match c {
                // Escapes never close a quote. Templates are not scanned
                // for `${…}`, so comment markers inside them stay literal.
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

        let in_js = element_depth == 0 || js_depth > 0;

        match c {
            // Quotes only open strings in JS context; in element child text
            // an apostrophe is just text.
            b'\'' if in_js => in_single = true,
            b'"' if in_js => in_double = true,
            b'`' if in_js => in_template = true,

            b'<' => {
                if bytes.get(i + 1) == Some(&b'/') {
                    element_depth = element_depth.saturating_sub(1);
                } else if element_begins_at(bytes, i) {
                    element_depth += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'>') && element_depth > 0 => {
                element_depth -= 1;
                i += 2;
                continue;
            }

            b'{' if element_depth > 0 && js_depth == 0 => {
                // JSX comment between children: blank `{/*` through `*/}`.
                if bytes.get(i + 1) == Some(&b'/') && bytes.get(i + 2) == Some(&b'*') {
                    if let Some(end) = find(bytes, i + 3, b"*/}") {
                        blank(&mut out, i, end + 3);
                        i = end + 3;
                        continue;
                    }
                }
                js_depth += 1;
            }
            b'{' if js_depth > 0 => js_depth += 1,
            b'}' if js_depth > 0 => js_depth -= 1,

            b'/' if in_js => {
                match bytes.get(i + 1) {
                    Some(&b'/') => {
                        let end = find(bytes, i + 2, b"\n").unwrap_or(bytes.len());
                        blank(&mut out, i, end);
                        i = end;
                        continue;
                    }
                    Some(&b'*') => {
                        let end = find(bytes, i + 2, b"*/")
                            .map(|e| e + 2)
                            .unwrap_or(bytes.len());
                        blank(&mut out, i, end);
                        i = end;
                        continue;
                    }
                    _ => {}
                }
            }

            _ => {}
        }

        i += 1;
    }

    // The input was valid UTF-8 and only ASCII bytes were overwritten.
    String::from_utf8(out).unwrap_or_else(|_| source.to_string())
}

/// Overwrite `out[from..to]` with spaces, keeping newlines.
fn blank(out: &mut [u8], from: usize, to: usize) {
    let to = to.min(out.len());
    for b in &mut out[from..to] {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

/// Find `needle` in `bytes` at or after `from`.
fn find(bytes: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    if from > bytes.len() {
        return None;
    }
    bytes[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}
