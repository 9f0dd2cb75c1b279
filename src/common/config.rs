/// How strictly structural problems in a tag are treated
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ParsingMode {
    /// Any structural mismatch aborts the decode with an error
    #[default]
    Strict,
    /// Structural mismatches are logged and the decoded values are kept
    Relaxed,
}

/// Options to control how a byte window is decoded
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
    pub(crate) parsing_mode: ParsingMode,
    pub(crate) read_id3v2: bool,
    pub(crate) read_id3v1: bool,
}

impl Default for ParseOptions {
    /// The defaults are as follows:
    ///
    /// ```rust,ignore
    /// ParseOptions {
    ///     parsing_mode: ParsingMode::Strict,
    ///     read_id3v2: true,
    ///     read_id3v1: true,
    /// }
    /// ```
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOptions {
    /// Default parsing mode
    pub const DEFAULT_PARSING_MODE: ParsingMode = ParsingMode::Strict;

    /// Creates a new `ParseOptions`, alias for `Default` implementation
    ///
    /// # Examples
    ///
    /// ```rust
    /// use id3_reader::ParseOptions;
    ///
    /// let options = ParseOptions::new();
    /// ```
    #[must_use]
    pub const fn new() -> Self {
        Self {
            parsing_mode: Self::DEFAULT_PARSING_MODE,
            read_id3v2: true,
            read_id3v1: true,
        }
    }

    /// The parsing mode to use, see [`ParsingMode`] for details
    ///
    /// # Examples
    ///
    /// ```rust
    /// use id3_reader::{ParseOptions, ParsingMode};
    ///
    /// // Keep extended headers whose declared size is off
    /// let options = ParseOptions::new().parsing_mode(ParsingMode::Relaxed);
    /// ```
    pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
        self.parsing_mode = parsing_mode;
        *self
    }

    /// Whether or not to look for an ID3v2 tag at the start of the window
    pub fn read_id3v2(&mut self, read_id3v2: bool) -> Self {
        self.read_id3v2 = read_id3v2;
        *self
    }

    /// Whether or not to fall back to an ID3v1 tag at the end of the window
    pub fn read_id3v1(&mut self, read_id3v1: bool) -> Self {
        self.read_id3v1 = read_id3v1;
        *self
    }
}
