//! Size estimation and format comparison.
//!
//! The estimator is deliberately approximate: one token per four
//! characters, rounded up. It is a pure function over text and plays no
//! part in the round trip; it exists so callers (and the encoder's banner)
//! can report roughly what a size-metered consumer will be charged.

use crate::{encode, Error, Result, Value};

/// Approximates the token cost of a piece of text as `ceil(chars / 4)`.
///
/// # Examples
///
/// ```rust
/// use toon_codec::estimate_size;
///
/// assert_eq!(estimate_size(""), 0);
/// assert_eq!(estimate_size("abcd"), 1);
/// assert_eq!(estimate_size("abcde"), 2);
/// ```
#[must_use]
pub fn estimate_size(text: &str) -> usize {
    (text.chars().count() + 3) / 4
}

/// Side-by-side sizing of one value in generic JSON and in TOON.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// The value rendered as compact generic JSON.
    pub json_text: String,
    /// Estimated token cost of `json_text`.
    pub json_size: usize,
    /// The value rendered as TOON (no banner).
    pub toon_text: String,
    /// Estimated token cost of `toon_text`.
    pub toon_size: usize,
    /// `(json_size - toon_size) / json_size * 100`. Negative when TOON's
    /// structural overhead exceeds its compaction, which legitimately
    /// happens for small or deeply irregular values; never clamped.
    pub savings_percent: f64,
}

/// Renders `value` both ways and reports the estimated savings.
///
/// # Errors
///
/// Fails when the value cannot be encoded (non-finite numbers, nesting
/// beyond the depth limit).
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn compare(value: &Value) -> Result<Comparison> {
    let json_text = serde_json::to_string(value).map_err(Error::custom)?;
    let toon_text = encode(value)?;
    let json_size = estimate_size(&json_text);
    let toon_size = estimate_size(&toon_text);
    let savings_percent = savings_percent(json_size, toon_size);
    Ok(Comparison {
        json_text,
        json_size,
        toon_text,
        toon_size,
        savings_percent,
    })
}

pub(crate) fn savings_percent(json_size: usize, toon_size: usize) -> f64 {
    if json_size == 0 {
        return 0.0;
    }
    (json_size as f64 - toon_size as f64) / json_size as f64 * 100.0
}
