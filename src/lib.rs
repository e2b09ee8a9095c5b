//! # toon-codec
//!
//! A bidirectional codec for TOON (Token-Oriented Object Notation), a
//! compact, whitespace- and delimiter-sensitive text format for shipping
//! structured data to size/cost-metered text consumers such as LLMs.
//!
//! TOON trims the syntactic overhead of generic JSON — braces, brackets,
//! redundant quotes — and collapses uniform object arrays into CSV-style
//! tables behind a `[N]{fields}:` header, typically saving 30-50% of the
//! estimated tokens while remaining losslessly invertible.
//!
//! ## Quick start
//!
//! ```rust
//! use toon_codec::{decode, encode, toon};
//!
//! let users = toon!([
//!     {"id": 1, "name": "Alice"},
//!     {"id": 2, "name": "Bob"}
//! ]);
//!
//! let text = encode(&users).unwrap();
//! assert_eq!(text, "[2]{id,name}:\n  1,Alice\n  2,Bob");
//! assert_eq!(decode(&text).unwrap(), users);
//! ```
//!
//! ## Shape of the format
//!
//! - Mappings are YAML-style `key: value` lines, nested by indentation.
//! - Sequences of mappings sharing one key set become tables; anything
//!   else becomes a `- ` bulleted list.
//! - Two escaping conventions coexist and must never be mixed: generic
//!   backslash escaping for standalone strings and list items, and CSV
//!   quote-doubling inside table rows only.
//! - An optional leading `#` banner reports estimated size; the decoder
//!   strips comment lines before parsing.
//!
//! ## Guarantees
//!
//! - `decode(encode(v)) == v` for every supported value.
//! - `encode(decode(encode(v))) == encode(v)`.
//! - Both directions are pure, synchronous, and safe to call from any
//!   number of threads; formatting choices travel in a per-call
//!   [`EncodeOptions`], never in process-wide state.
//! - Failures are atomic: no partial text from a failed encode, no
//!   partial value from a failed decode.

pub mod decode;
pub mod encode;
pub mod error;
pub mod grammar;
pub mod macros;
pub mod map;
pub mod options;
pub mod size;
pub mod value;

pub use decode::decode;
pub use encode::{encode, encode_with_options};
pub use error::{Error, Result};
pub use map::ToonMap;
pub use options::{EncodeOptions, DEFAULT_MAX_DEPTH};
pub use size::{compare, estimate_size, Comparison};
pub use value::{Number, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_through_public_api() {
        let value = toon!({
            "id": 7,
            "name": "Ada",
            "scores": [1, 2, 3],
            "profile": {"active": true, "note": null}
        });
        let text = encode(&value).unwrap();
        assert_eq!(decode(&text).unwrap(), value);
    }

    #[test]
    fn re_encoding_is_idempotent() {
        let value = toon!([{"a": 1, "b": "x,y"}, {"a": 2, "b": "z"}]);
        let once = encode(&value).unwrap();
        let twice = encode(&decode(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn banner_is_stripped_by_decode() {
        let value = toon!({"a": 1, "b": [true, false]});
        let options = EncodeOptions::new().with_size_banner(true);
        let with_banner = encode_with_options(&value, options).unwrap();
        assert!(with_banner.starts_with("# TOON Format - Estimated "));
        assert_eq!(decode(&with_banner).unwrap(), value);
    }

    #[test]
    fn options_are_per_call() {
        let value = toon!({"k": {"a": 1, "b": 2}});
        let two = encode(&value).unwrap();
        let four =
            encode_with_options(&value, EncodeOptions::new().with_indent(4)).unwrap();
        assert_ne!(two, four);
        assert_eq!(decode(&two).unwrap(), decode(&four).unwrap());
    }
}
