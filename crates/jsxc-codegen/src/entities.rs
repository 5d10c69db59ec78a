//! HTML entity decoding for child text.
//!
//! The browser build of this compiler family leans on the DOM to decode
//! entities; running standalone we carry a small deterministic decoder
//! instead. It covers the common named entities plus decimal (`&#169;`)
//! and hexadecimal (`&#xA9;`) numeric references. Anything it does not
//! recognize passes through unchanged — this is intentionally not a full
//! HTML entity table.

/// Decode HTML entities in `text`.
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        // An entity is `&` + up to a handful of chars + `;`.
        let semi = tail[1..].find(';').map(|i| i + 1);
        match semi {
            Some(semi) if semi > 1 && semi <= 10 => {
                let body = &tail[1..semi];
                match decode_one(body) {
                    Some(c) => {
                        out.push(c);
                        rest = &tail[semi + 1..];
                    }
                    None => {
                        out.push('&');
                        rest = &tail[1..];
                    }
                }
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_one(body: &str) -> Option<char> {
    if let Some(num) = body.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        return char::from_u32(code);
    }

    Some(match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "copy" => '\u{a9}',
        "reg" => '\u{ae}',
        "trade" => '\u{2122}',
        "hellip" => '\u{2026}',
        "mdash" => '\u{2014}',
        "ndash" => '\u{2013}',
        "laquo" => '\u{ab}',
        "raquo" => '\u{bb}',
        "times" => '\u{d7}',
        "divide" => '\u{f7}',
        _ => return None,
    })
}
