//! TOON decoding: a single forward scan over lines back to [`Value`].
//!
//! Comment lines (first non-space character `#`) and blank lines are
//! stripped before any structural parsing, so a size banner never reaches
//! the parser. Nesting depth is recovered from indentation: the indent
//! unit is inferred from the first indented line and every indent must be
//! a whole multiple of it.
//!
//! Decoding is not best-effort. Any malformed structure fails with
//! [`Error::Format`] carrying the offending 1-based line, and no partial
//! value is returned.

use crate::options::DEFAULT_MAX_DEPTH;
use crate::{grammar, Error, Result, ToonMap, Value};

/// Decodes TOON text into a value.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{decode, toon};
///
/// let value = decode("[2]{id,name}:\n  1,Alice\n  2,Bob").unwrap();
/// assert_eq!(value, toon!([
///     {"id": 1, "name": "Alice"},
///     {"id": 2, "name": "Bob"}
/// ]));
/// ```
///
/// # Errors
///
/// Returns [`Error::Format`] on malformed input and [`Error::DepthLimit`]
/// on nesting beyond the guard.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn decode(text: &str) -> Result<Value> {
    Decoder::new(text)?.finish()
}

/// One structural line: indentation-derived depth, content, and the
/// 1-based position in the original input for error reporting.
struct Line<'a> {
    depth: usize,
    text: &'a str,
    number: usize,
}

struct Decoder<'a> {
    lines: Vec<Line<'a>>,
    pos: usize,
}

impl<'a> Decoder<'a> {
    fn new(input: &'a str) -> Result<Self> {
        // first pass: drop comments and blanks, record raw indents
        let mut raw = Vec::new();
        let mut unit = 0usize;
        for (idx, line) in input.lines().enumerate() {
            let number = idx + 1;
            let text = line.trim_start_matches(' ');
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            if text.starts_with('\t') {
                return Err(Error::format(number, "tabs are not valid indentation"));
            }
            let spaces = line.len() - text.len();
            if spaces > 0 && unit == 0 {
                unit = spaces;
            }
            raw.push((number, spaces, text));
        }
        let mut lines = Vec::with_capacity(raw.len());
        for (number, spaces, text) in raw {
            let depth = if spaces == 0 {
                0
            } else if spaces % unit == 0 {
                spaces / unit
            } else {
                return Err(Error::format(
                    number,
                    format!(
                        "indentation of {} spaces is not a multiple of the {}-space unit",
                        spaces, unit
                    ),
                ));
            };
            lines.push(Line {
                depth,
                text,
                number,
            });
        }
        Ok(Decoder { lines, pos: 0 })
    }

    fn finish(mut self) -> Result<Value> {
        match self.current() {
            Some((0, _, _)) => {}
            Some((_, _, number)) => {
                return Err(Error::format(
                    number,
                    "unexpected indentation on the first line",
                ))
            }
            None => return Err(Error::format(1, "no content to decode")),
        }
        let value = self.block(0, 0)?;
        if let Some((_, _, number)) = self.current() {
            return Err(Error::format(
                number,
                "unexpected content after the top-level value",
            ));
        }
        Ok(value)
    }

    fn current(&self) -> Option<(usize, &'a str, usize)> {
        self.lines
            .get(self.pos)
            .map(|line| (line.depth, line.text, line.number))
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn end_line(&self) -> usize {
        self.lines.last().map_or(1, |line| line.number)
    }

    /// Parses the block of lines starting at the cursor, all at `depth`.
    /// Callers have already verified the first line sits at `depth`.
    fn block(&mut self, depth: usize, level: usize) -> Result<Value> {
        if level > DEFAULT_MAX_DEPTH {
            return Err(Error::depth_limit(DEFAULT_MAX_DEPTH));
        }
        let (_, text, number) = match self.current() {
            Some(line) => line,
            None => return Err(Error::format(self.end_line(), "unexpected end of input")),
        };
        if text.starts_with('[') && text != "[]" {
            return match parse_header(text) {
                Some((count, fields)) => self.table(depth, count, fields, number),
                None => Err(Error::format(number, "malformed table header")),
            };
        }
        if text == "-" || text.starts_with("- ") {
            return self.bullet_list(depth, level);
        }
        if grammar::split_key(text).is_some() {
            return self.mapping(depth, level);
        }
        // a lone scalar line
        self.advance();
        let value = self.parse_inline(text, number, level)?;
        if let Some((d, _, n)) = self.current() {
            if d >= depth {
                return Err(Error::format(n, "unexpected content after a scalar value"));
            }
        }
        Ok(value)
    }

    fn mapping(&mut self, depth: usize, level: usize) -> Result<Value> {
        let mut map = ToonMap::new();
        while let Some((d, text, number)) = self.current() {
            if d < depth {
                break;
            }
            if d > depth {
                return Err(Error::format(number, "unexpected indentation"));
            }
            let (key, rest) = match grammar::split_key(text) {
                Some(entry) => entry,
                None => return Err(Error::format(number, "expected a 'key: value' entry")),
            };
            self.advance();
            let value = match rest {
                Some(inline) => self.parse_inline(inline, number, level + 1)?,
                None => match self.current() {
                    Some((d2, _, _)) if d2 == depth + 1 => self.block(depth + 1, level + 1)?,
                    Some((_, _, n2)) => {
                        return Err(Error::format(n2, "expected an indented block after 'key:'"))
                    }
                    None => return Err(Error::format(number, "missing value after 'key:'")),
                },
            };
            if map.insert(key, value).is_some() {
                return Err(Error::format(number, "duplicate key"));
            }
        }
        Ok(Value::Object(map))
    }

    fn bullet_list(&mut self, depth: usize, level: usize) -> Result<Value> {
        let mut items = Vec::new();
        while let Some((d, text, number)) = self.current() {
            if d < depth {
                break;
            }
            if d > depth {
                return Err(Error::format(number, "unexpected indentation"));
            }
            if text == "-" {
                self.advance();
                match self.current() {
                    Some((d2, _, _)) if d2 == depth + 1 => {
                        items.push(self.block(depth + 1, level + 1)?);
                    }
                    Some((_, _, n2)) => {
                        return Err(Error::format(n2, "expected an indented block after '-'"))
                    }
                    None => return Err(Error::format(number, "missing value after '-'")),
                }
            } else if let Some(rest) = text.strip_prefix("- ") {
                self.advance();
                items.push(self.parse_inline(rest, number, level + 1)?);
            } else {
                return Err(Error::format(number, "expected a '- ' list item"));
            }
        }
        Ok(Value::Array(items))
    }

    fn table(
        &mut self,
        depth: usize,
        count: usize,
        fields: Vec<String>,
        header_number: usize,
    ) -> Result<Value> {
        self.advance();
        // the declared count is untrusted; cap the pre-allocation
        let mut items = Vec::with_capacity(count.min(1024));
        for found in 0..count {
            let (d, text, number) = match self.current() {
                Some(line) => line,
                None => {
                    return Err(Error::format(
                        header_number,
                        format!("table declares {} rows but only {} found", count, found),
                    ))
                }
            };
            if d != depth + 1 {
                return Err(Error::format(
                    number,
                    format!("table declares {} rows but only {} found", count, found),
                ));
            }
            self.advance();
            let cells = grammar::split_csv_row(text)
                .ok_or_else(|| Error::format(number, "unterminated quoted cell"))?;
            if cells.len() != fields.len() {
                return Err(Error::format(
                    number,
                    format!(
                        "row has {} values but the header lists {} fields",
                        cells.len(),
                        fields.len()
                    ),
                ));
            }
            let mut map = ToonMap::with_capacity(fields.len());
            for (field, cell) in fields.iter().zip(cells) {
                let value = parse_cell(&cell, number)?;
                if map.insert(field.clone(), value).is_some() {
                    return Err(Error::format(header_number, "duplicate field in header"));
                }
            }
            items.push(Value::Object(map));
        }
        if let Some((d, _, number)) = self.current() {
            if d > depth {
                return Err(Error::format(
                    number,
                    format!("table declares {} rows but more follow", count),
                ));
            }
        }
        Ok(Value::Array(items))
    }

    /// Parses same-line content: a quoted or bare scalar, or an inline
    /// `key: value` mapping entry.
    fn parse_inline(&self, text: &str, number: usize, level: usize) -> Result<Value> {
        if level > DEFAULT_MAX_DEPTH {
            return Err(Error::depth_limit(DEFAULT_MAX_DEPTH));
        }
        if text.is_empty() {
            return Err(Error::format(number, "missing value"));
        }
        if text.starts_with('"') {
            let (string, rest) = grammar::scan_quoted_generic(text)
                .ok_or_else(|| Error::format(number, "malformed quoted string"))?;
            if rest.is_empty() {
                return Ok(Value::String(string));
            }
            let rest = rest.strip_prefix(": ").ok_or_else(|| {
                Error::format(number, "unexpected text after quoted string")
            })?;
            let value = self.parse_inline(rest, number, level + 1)?;
            let mut map = ToonMap::new();
            map.insert(string, value);
            return Ok(Value::Object(map));
        }
        if let Some((key, rest)) = text.split_once(':') {
            if key.is_empty() || key.contains('"') {
                return Err(Error::format(number, "malformed key"));
            }
            let rest = rest
                .strip_prefix(' ')
                .ok_or_else(|| Error::format(number, "expected a space after ':'"))?;
            let value = self.parse_inline(rest, number, level + 1)?;
            let mut map = ToonMap::new();
            map.insert(key.to_string(), value);
            return Ok(Value::Object(map));
        }
        Ok(grammar::parse_bare_scalar(text))
    }
}

/// Recognizes a `[count]{field,field,...}:` header line.
fn parse_header(text: &str) -> Option<(usize, Vec<String>)> {
    let rest = text.strip_prefix('[')?;
    let (count, rest) = rest.split_once(']')?;
    let count: usize = count.parse().ok()?;
    let rest = rest.strip_prefix('{')?;
    let fields = rest.strip_suffix("}:")?;
    if fields.is_empty() {
        return None;
    }
    let fields: Vec<String> = fields.split(',').map(str::to_string).collect();
    if fields.iter().any(|f| f.is_empty()) {
        return None;
    }
    Some((count, fields))
}

fn parse_cell(cell: &str, number: usize) -> Result<Value> {
    // an empty unquoted cell reads as null
    if cell.is_empty() {
        return Ok(Value::Null);
    }
    if cell.starts_with('"') {
        return grammar::unquote_csv(cell)
            .map(Value::String)
            .ok_or_else(|| Error::format(number, "malformed quoted cell"));
    }
    Ok(grammar::parse_bare_scalar(cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toon;

    #[test]
    fn scalars() {
        assert_eq!(decode("null").unwrap(), Value::Null);
        assert_eq!(decode("undefined").unwrap(), Value::Undefined);
        assert_eq!(decode("true").unwrap(), toon!(true));
        assert_eq!(decode("42").unwrap(), toon!(42));
        assert_eq!(decode("4.25").unwrap(), toon!(4.25));
        assert_eq!(decode("hello").unwrap(), toon!("hello"));
        assert_eq!(decode("\"a,b\"").unwrap(), toon!("a,b"));
        assert_eq!(decode("[]").unwrap(), toon!([]));
        assert_eq!(decode("{}").unwrap(), toon!({}));
    }

    #[test]
    fn mappings() {
        let value = decode("id: 7\nmeta:\n  a: 1\n  b: 2").unwrap();
        assert_eq!(value, toon!({"id": 7, "meta": {"a": 1, "b": 2}}));
    }

    #[test]
    fn inline_key_chain() {
        assert_eq!(decode("a: b: 1").unwrap(), toon!({"a": {"b": 1}}));
    }

    #[test]
    fn tables() {
        let value = decode("[2]{id,name}:\n  1,Alice\n  2,Bob").unwrap();
        assert_eq!(
            value,
            toon!([{"id": 1, "name": "Alice"}, {"id": 2, "name": "Bob"}])
        );
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let value = decode("[1]{v}:\n  \"a,b\"").unwrap();
        assert_eq!(value, toon!([{"v": "a,b"}]));
    }

    #[test]
    fn bullets() {
        let value = decode("- 1\n- two\n- a: 1").unwrap();
        assert_eq!(value, toon!([1, "two", {"a": 1}]));
    }

    #[test]
    fn bare_dash_consumes_a_block() {
        let value = decode("- 1\n-\n  a: 1\n  b: 2").unwrap();
        assert_eq!(value, toon!([1, {"a": 1, "b": 2}]));
    }

    #[test]
    fn comments_and_blanks_are_stripped() {
        let value = decode("# banner\n\na: 1\n# trailing note\nb: 2").unwrap();
        assert_eq!(value, toon!({"a": 1, "b": 2}));
    }

    #[test]
    fn missing_rows_fail_with_the_mismatch() {
        let err = decode("[2]{id,name}:\n  1,Alice").unwrap_err();
        match err {
            Error::Format { line, msg } => {
                assert_eq!(line, 1);
                assert!(msg.contains("2 rows"), "unexpected message: {}", msg);
            }
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn extra_rows_fail() {
        let err = decode("[1]{id}:\n  1\n  2").unwrap_err();
        assert!(matches!(err, Error::Format { line: 3, .. }));
    }

    #[test]
    fn row_width_mismatch_fails() {
        let err = decode("[1]{id,name}:\n  1").unwrap_err();
        match err {
            Error::Format { line, msg } => {
                assert_eq!(line, 2);
                assert!(msg.contains("2 fields"), "unexpected message: {}", msg);
            }
            other => panic!("expected Format error, got {:?}", other),
        }
    }

    #[test]
    fn malformed_header_fails() {
        let err = decode("[x]{id}:\n  1").unwrap_err();
        assert!(matches!(err, Error::Format { line: 1, .. }));
    }

    #[test]
    fn inconsistent_indentation_fails() {
        let err = decode("a:\n  b:\n   c: 1").unwrap_err();
        assert!(matches!(err, Error::Format { line: 3, .. }));
    }

    #[test]
    fn over_indented_sibling_fails() {
        let err = decode("a: 1\n    b: 2").unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn duplicate_keys_fail() {
        let err = decode("a: 1\na: 2").unwrap_err();
        assert!(matches!(err, Error::Format { line: 2, .. }));
    }

    #[test]
    fn empty_input_fails() {
        assert!(decode("").is_err());
        assert!(decode("# only a comment").is_err());
    }

    #[test]
    fn deep_inline_chains_hit_the_depth_guard() {
        let mut text = String::new();
        for _ in 0..200 {
            text.push_str("a: ");
        }
        text.push('1');
        let err = decode(&text).unwrap_err();
        assert!(matches!(err, Error::DepthLimit { .. }));
    }

    #[test]
    fn deep_blocks_hit_the_depth_guard() {
        let mut text = String::new();
        for i in 0..200 {
            text.push_str(&" ".repeat(2 * i));
            text.push_str("k:\n");
        }
        text.push_str(&" ".repeat(2 * 200));
        text.push('1');
        let err = decode(&text).unwrap_err();
        assert!(matches!(err, Error::DepthLimit { .. }));
    }
}
