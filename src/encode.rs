//! TOON encoding: a single depth-first traversal from [`Value`] to text.
//!
//! The rule set, per value shape:
//!
//! - scalars, empty containers, and one-entry mappings with single-line
//!   values render inline;
//! - a uniform object sequence renders as a `[N]{fields}:` header with one
//!   CSV row per element, one indent level deeper;
//! - any other non-empty sequence renders as `- ` bulleted items;
//! - mapping entries render `key: value` when the value is single-line,
//!   otherwise `key:` followed by an indented block.
//!
//! Traversal depth is bounded by [`EncodeOptions::max_depth`]; exceeding it
//! fails with [`Error::DepthLimit`] before the native stack is at risk.
//! Owned `Value` trees cannot contain cycles, so the depth bound is the
//! whole traversal guard.

use crate::size::{estimate_size, savings_percent};
use crate::{grammar, EncodeOptions, Error, Number, Result, ToonMap, Value};

/// Encodes a value with default options.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{encode, toon};
///
/// let users = toon!([
///     {"id": 1, "name": "Alice"},
///     {"id": 2, "name": "Bob"}
/// ]);
/// assert_eq!(encode(&users).unwrap(), "[2]{id,name}:\n  1,Alice\n  2,Bob");
/// ```
///
/// # Errors
///
/// Fails on values outside the model (non-finite numbers) and on nesting
/// beyond the depth limit.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode(value: &Value) -> Result<String> {
    encode_with_options(value, EncodeOptions::default())
}

/// Encodes a value with explicit per-call options.
///
/// With `size_banner` set, the body is preceded by a comment line of the
/// shape `# TOON Format - Estimated {N} tokens ({P}% savings vs generic
/// JSON)`; comment lines are never data and the decoder strips them.
///
/// # Errors
///
/// Fails on values outside the model (non-finite numbers) and on nesting
/// beyond `options.max_depth`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn encode_with_options(value: &Value, options: EncodeOptions) -> Result<String> {
    let mut encoder = Encoder {
        out: String::with_capacity(256),
        options,
    };
    encoder.emit(value, 0)?;
    let body = encoder.out;
    if !encoder.options.size_banner {
        return Ok(body);
    }
    let json_text = serde_json::to_string(value).map_err(Error::custom)?;
    let toon_tokens = estimate_size(&body);
    let json_tokens = estimate_size(&json_text);
    Ok(format!(
        "# TOON Format - Estimated {} tokens ({:.1}% savings vs generic JSON)\n{}",
        toon_tokens,
        savings_percent(json_tokens, toon_tokens),
        body
    ))
}

struct Encoder {
    out: String,
    options: EncodeOptions,
}

impl Encoder {
    fn push_line(&mut self, depth: usize, text: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        for _ in 0..depth * self.options.indent {
            self.out.push(' ');
        }
        self.out.push_str(text);
    }

    /// Writes `value` starting at `depth`, inline when possible.
    fn emit(&mut self, value: &Value, depth: usize) -> Result<()> {
        if let Some(line) = self.inline(value, depth)? {
            self.push_line(depth, &line);
            return Ok(());
        }
        match value {
            Value::Array(items) => match tabular(items) {
                Some((fields, rows)) => self.table(&fields, &rows, depth),
                None => self.bullets(items, depth),
            },
            Value::Object(map) => self.entries(map, depth),
            // scalars always render inline
            _ => Ok(()),
        }
    }

    /// The single-line rendering of `value`, if it has one.
    fn inline(&self, value: &Value, depth: usize) -> Result<Option<String>> {
        if depth > self.options.max_depth {
            return Err(Error::depth_limit(self.options.max_depth));
        }
        Ok(match value {
            Value::Null => Some("null".to_string()),
            Value::Undefined => Some("undefined".to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Number(n) => Some(number_text(n)?),
            Value::String(s) => Some(grammar::escape_generic(s)),
            Value::Array(items) if items.is_empty() => Some("[]".to_string()),
            Value::Object(map) if map.is_empty() => Some("{}".to_string()),
            Value::Object(map) if map.len() == 1 => match map.iter().next() {
                Some((key, inner)) => self
                    .inline(inner, depth + 1)?
                    .map(|text| format!("{}: {}", grammar::escape_generic(key), text)),
                None => None,
            },
            _ => None,
        })
    }

    fn entries(&mut self, map: &ToonMap, depth: usize) -> Result<()> {
        for (key, value) in map.iter() {
            let key = grammar::escape_generic(key);
            match self.inline(value, depth + 1)? {
                Some(text) => self.push_line(depth, &format!("{}: {}", key, text)),
                None => {
                    self.push_line(depth, &format!("{}:", key));
                    self.emit(value, depth + 1)?;
                }
            }
        }
        Ok(())
    }

    fn bullets(&mut self, items: &[Value], depth: usize) -> Result<()> {
        for item in items {
            match self.inline(item, depth + 1)? {
                Some(text) => self.push_line(depth, &format!("- {}", text)),
                None => {
                    self.push_line(depth, "-");
                    self.emit(item, depth + 1)?;
                }
            }
        }
        Ok(())
    }

    fn table(&mut self, fields: &[&str], rows: &[Vec<&Value>], depth: usize) -> Result<()> {
        self.push_line(
            depth,
            &format!("[{}]{{{}}}:", rows.len(), fields.join(",")),
        );
        for row in rows {
            let mut cells = Vec::with_capacity(row.len());
            for value in row {
                cells.push(cell_text(value)?);
            }
            self.push_line(depth + 1, &cells.join(","));
        }
        Ok(())
    }
}

fn number_text(n: &Number) -> Result<String> {
    match n {
        Number::Integer(i) => Ok(i.to_string()),
        Number::Float(f) if f.is_finite() => Ok(grammar::format_f64(*f)),
        Number::Float(f) => Err(Error::unsupported(format!("non-finite number {}", f))),
    }
}

/// Decides whether a sequence qualifies for the tabular form and, if so,
/// returns the header fields (first element's insertion order) together
/// with each row's values in header order.
///
/// Every element must be a mapping with the same key set, every key must
/// be plain enough for the header, and every field value must fit in one
/// CSV cell. Sequences that miss any of those render as bullets instead,
/// which keeps the round trip lossless.
fn tabular(items: &[Value]) -> Option<(Vec<&str>, Vec<Vec<&Value>>)> {
    let first = match items.first()? {
        Value::Object(map) if !map.is_empty() => map,
        _ => return None,
    };
    let fields: Vec<&str> = first.keys().map(String::as_str).collect();
    if !fields.iter().all(|f| grammar::is_plain_header_key(f)) {
        return None;
    }
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let map = match item {
            Value::Object(map) if map.len() == fields.len() => map,
            _ => return None,
        };
        let mut row = Vec::with_capacity(fields.len());
        for field in &fields {
            let value = map.get(field)?;
            if !fits_in_cell(value) {
                return None;
            }
            row.push(value);
        }
        rows.push(row);
    }
    Some((fields, rows))
}

fn fits_in_cell(value: &Value) -> bool {
    match value {
        Value::Null | Value::Undefined | Value::Bool(_) | Value::Number(_) => true,
        Value::String(s) => !s.contains('\n') && !s.contains('\r'),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

fn cell_text(value: &Value) -> Result<String> {
    Ok(match value {
        Value::Null => "null".to_string(),
        Value::Undefined => "undefined".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_text(n)?,
        Value::String(s) => grammar::escape_csv(s),
        Value::Array(_) => "[]".to_string(),
        Value::Object(_) => "{}".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toon;

    #[test]
    fn scalars() {
        assert_eq!(encode(&Value::Null).unwrap(), "null");
        assert_eq!(encode(&Value::Undefined).unwrap(), "undefined");
        assert_eq!(encode(&toon!(true)).unwrap(), "true");
        assert_eq!(encode(&toon!(42)).unwrap(), "42");
        assert_eq!(encode(&toon!(1.0)).unwrap(), "1.0");
        assert_eq!(encode(&toon!("hello")).unwrap(), "hello");
        assert_eq!(encode(&toon!("a,b")).unwrap(), "\"a,b\"");
    }

    #[test]
    fn empty_containers() {
        assert_eq!(encode(&toon!([])).unwrap(), "[]");
        assert_eq!(encode(&toon!({})).unwrap(), "{}");
    }

    #[test]
    fn mapping_blocks() {
        let value = toon!({"id": 7, "meta": {"a": 1, "b": 2}});
        assert_eq!(encode(&value).unwrap(), "id: 7\nmeta:\n  a: 1\n  b: 2");
    }

    #[test]
    fn one_entry_mapping_inlines() {
        assert_eq!(encode(&toon!({"a": 1})).unwrap(), "a: 1");
        assert_eq!(encode(&toon!({"a": {"b": 1}})).unwrap(), "a: b: 1");
    }

    #[test]
    fn uniform_array_is_tabular() {
        let value = toon!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob"}
        ]);
        assert_eq!(encode(&value).unwrap(), "[2]{id,name}:\n  1,Alice\n  2,Bob");
    }

    #[test]
    fn header_order_follows_first_element() {
        let mut first = ToonMap::new();
        first.insert("a".to_string(), toon!(1));
        first.insert("b".to_string(), toon!(2));
        let mut second = ToonMap::new();
        second.insert("b".to_string(), toon!(4));
        second.insert("a".to_string(), toon!(3));
        let value = Value::Array(vec![Value::Object(first), Value::Object(second)]);
        assert_eq!(encode(&value).unwrap(), "[2]{a,b}:\n  1,2\n  3,4");
    }

    #[test]
    fn mixed_sequences_are_bulleted() {
        let value = toon!([1, "two", {"a": 1}]);
        assert_eq!(encode(&value).unwrap(), "- 1\n- two\n- a: 1");
    }

    #[test]
    fn multiline_sequence_elements_use_bare_dash() {
        let value = toon!([1, {"a": 1, "b": 2}]);
        assert_eq!(encode(&value).unwrap(), "- 1\n-\n  a: 1\n  b: 2");
    }

    #[test]
    fn newline_in_field_value_demotes_to_bullets() {
        let value = toon!([{"note": "line1\nline2"}]);
        assert_eq!(encode(&value).unwrap(), "- note: \"line1\\nline2\"");
    }

    #[test]
    fn nested_container_field_demotes_to_bullets() {
        let value = toon!([{"xs": [1, 2]}]);
        assert_eq!(encode(&value).unwrap(), "-\n  xs:\n    - 1\n    - 2");
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let err = encode(&Value::Number(Number::Float(f64::NAN))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
        let err = encode(&Value::Number(Number::Float(f64::INFINITY))).unwrap_err();
        assert!(matches!(err, Error::UnsupportedType(_)));
    }

    #[test]
    fn depth_limit_is_enforced() {
        let mut value = toon!(1);
        for _ in 0..200 {
            value = Value::Array(vec![value]);
        }
        let err = encode(&value).unwrap_err();
        assert!(matches!(err, Error::DepthLimit { .. }));
    }

    #[test]
    fn custom_indent_width() {
        let value = toon!({"outer": {"a": 1, "b": 2}});
        let text =
            encode_with_options(&value, EncodeOptions::new().with_indent(4)).unwrap();
        assert_eq!(text, "outer:\n    a: 1\n    b: 2");
    }

    #[test]
    fn banner_shape() {
        let value = toon!({"a": 1, "b": 2});
        let text =
            encode_with_options(&value, EncodeOptions::new().with_size_banner(true)).unwrap();
        let mut lines = text.lines();
        let banner = lines.next().unwrap();
        assert!(banner.starts_with("# TOON Format - Estimated "));
        assert!(banner.ends_with("% savings vs generic JSON)"));
        assert_eq!(lines.collect::<Vec<_>>().join("\n"), "a: 1\nb: 2");
    }
}
