//! Configuration options for TOON encoding.
//!
//! Formatting choices are passed per call so concurrent callers with
//! different needs cannot interfere with one another; there is no
//! process-wide mutable state anywhere in the codec.

/// Default nesting bound shared by the encoder and the decoder.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Per-call configuration for [`encode_with_options`](crate::encode_with_options).
///
/// # Examples
///
/// ```rust
/// use toon_codec::EncodeOptions;
///
/// let options = EncodeOptions::new()
///     .with_indent(4)
///     .with_size_banner(true);
/// assert_eq!(options.indent, 4);
/// assert!(options.size_banner);
/// ```
#[derive(Clone, Debug)]
pub struct EncodeOptions {
    /// Spaces per nesting level. Always at least 1.
    pub indent: usize,
    /// Prepend a `#` comment line reporting estimated tokens and savings
    /// versus generic JSON.
    pub size_banner: bool,
    /// Maximum nesting depth before encoding fails with
    /// [`Error::DepthLimit`](crate::Error::DepthLimit).
    pub max_depth: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        EncodeOptions {
            indent: 2,
            size_banner: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EncodeOptions {
    /// Creates default options (2-space indent, no banner).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indent width (number of spaces per nesting level).
    /// Widths below 1 are clamped to 1.
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent.max(1);
        self
    }

    /// Enables or disables the size-comparison banner comment.
    #[must_use]
    pub fn with_size_banner(mut self, banner: bool) -> Self {
        self.size_banner = banner;
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}
