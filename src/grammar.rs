//! Shared textual conventions of the TOON grammar.
//!
//! Both the encoder and the decoder go through this module, so the two
//! escaping conventions cannot drift apart:
//!
//! - **generic escaping** (standalone strings, keys, bulleted items):
//!   wrap in double quotes and backslash-escape; `\\ \" \n \r \t` are the
//!   recognized escapes, so a quoted string always stays on one line.
//! - **CSV escaping** (cells of tabular rows only): wrap in double quotes
//!   and escape embedded quotes by doubling them.
//!
//! Quoting is triggered not just by the delimiter characters but by any
//! bare text the line scanner would misread: literals (`null`, `true`,
//! ...), numerals, empty strings, leading `-`/`#`/`[`/`{`, and so on.
//! That over-approximation is what makes `decode(encode(v)) == v` hold.

use crate::{Number, ToonMap, Value};

/// Bare text that would be read back as something other than a string.
fn is_ambiguous(s: &str) -> bool {
    s.is_empty()
        || s == "null"
        || s == "undefined"
        || s == "true"
        || s == "false"
        || s == "[]"
        || s == "{}"
        || s.parse::<f64>().is_ok()
}

/// Whether a string must be quoted in generic (line) position.
pub fn needs_generic_quotes(s: &str) -> bool {
    is_ambiguous(s)
        || s.contains(':')
        || s.contains(',')
        || s.contains('"')
        || s.contains('\\')
        || s.contains('\n')
        || s.contains('\r')
        || s.contains('\t')
        || s.starts_with(' ')
        || s.ends_with(' ')
        || s.starts_with('-')
        || s.starts_with('#')
        || s.starts_with('[')
        || s.starts_with('{')
}

/// Whether a string must be quoted inside a tabular row cell.
///
/// A leading `#` is included: a row whose first cell started with `#`
/// would otherwise be stripped as a comment line.
pub fn needs_csv_quotes(s: &str) -> bool {
    is_ambiguous(s)
        || s.contains(',')
        || s.contains('"')
        || s.starts_with(' ')
        || s.ends_with(' ')
        || s.starts_with('#')
}

/// Generic-escapes a string for line position.
pub fn escape_generic(s: &str) -> String {
    if !needs_generic_quotes(s) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

/// CSV-escapes a string for a row cell. Strings with embedded newlines
/// never reach a cell; the encoder demotes such sequences to the bulleted
/// form instead.
pub fn escape_csv(s: &str) -> String {
    if !needs_csv_quotes(s) {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
    out
}

/// Scans a generic-quoted string starting at its opening quote.
///
/// Returns the unescaped contents and the remainder after the closing
/// quote, or `None` when the quoting is malformed.
pub fn scan_quoted_generic(s: &str) -> Option<(String, &str)> {
    let mut chars = s.char_indices();
    match chars.next() {
        Some((_, '"')) => {}
        _ => return None,
    }
    let mut out = String::new();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '"' => return Some((out, &s[i + 1..])),
            '\\' => match chars.next() {
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                _ => return None,
            },
            _ => out.push(ch),
        }
    }
    None
}

/// Unescapes one raw, fully quoted CSV cell (quote-doubling convention).
pub fn unquote_csv(cell: &str) -> Option<String> {
    let inner = cell.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == '"' {
            // a lone quote inside a cell is malformed
            if chars.next() != Some('"') {
                return None;
            }
            out.push('"');
        } else {
            out.push(ch);
        }
    }
    Some(out)
}

/// Splits one tabular row on the commas that sit outside quoted cells.
/// Cells are returned raw (quotes intact). `None` on an unterminated cell.
pub fn split_csv_row(line: &str) -> Option<Vec<String>> {
    let bytes = line.as_bytes();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut in_quotes = false;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => {
                if in_quotes && bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                    continue;
                }
                in_quotes = !in_quotes;
                i += 1;
            }
            b',' if !in_quotes => {
                cells.push(line[start..i].to_string());
                start = i + 1;
                i += 1;
            }
            _ => i += 1,
        }
    }
    if in_quotes {
        return None;
    }
    cells.push(line[start..].to_string());
    Some(cells)
}

/// Splits a `key: value` or `key:` line into its key and, for the former,
/// the inline remainder. `None` when the line is not a mapping entry.
pub fn split_key(text: &str) -> Option<(String, Option<&str>)> {
    if text.starts_with('"') {
        let (key, rest) = scan_quoted_generic(text)?;
        return match rest {
            ":" => Some((key, None)),
            _ => rest.strip_prefix(": ").map(|r| (key, Some(r))),
        };
    }
    let (key, rest) = text.split_once(':')?;
    // unquoted keys never carry quotes; the encoder quotes such keys
    if key.is_empty() || key.contains('"') {
        return None;
    }
    if rest.is_empty() {
        return Some((key.to_string(), None));
    }
    rest.strip_prefix(' ').map(|r| (key.to_string(), Some(r)))
}

/// Parses a bare (unquoted) single-line token into a scalar value.
pub fn parse_bare_scalar(tok: &str) -> Value {
    match tok {
        "null" => Value::Null,
        "undefined" => Value::Undefined,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "[]" => Value::Array(Vec::new()),
        "{}" => Value::Object(ToonMap::new()),
        _ => {
            if let Ok(i) = tok.parse::<i64>() {
                return Value::Number(Number::Integer(i));
            }
            if looks_numeric(tok) {
                if let Ok(f) = tok.parse::<f64>() {
                    if f.is_finite() {
                        return Value::Number(Number::Float(f));
                    }
                }
            }
            Value::String(tok.to_string())
        }
    }
}

// Keeps "nan"/"inf" style spellings out of the number path; the encoder
// quotes anything f64-parseable, so only digit-led numerals appear bare.
fn looks_numeric(tok: &str) -> bool {
    tok.bytes()
        .next()
        .map_or(false, |b| b.is_ascii_digit() || b == b'-' || b == b'+')
}

/// Canonical text for a finite float: always carries a decimal point.
pub fn format_f64(f: f64) -> String {
    if f == f.trunc() {
        format!("{:.1}", f)
    } else {
        format!("{}", f)
    }
}

/// Whether a key may sit unquoted in a `[N]{...}:` header. Keys that fail
/// this test force the sequence into the bulleted form.
pub fn is_plain_header_key(k: &str) -> bool {
    !k.is_empty()
        && !k.starts_with(' ')
        && !k.ends_with(' ')
        && !k.chars().any(|c| {
            matches!(
                c,
                ',' | '"' | ':' | '{' | '}' | '[' | ']' | '\n' | '\r' | '\t'
            )
        })
}
