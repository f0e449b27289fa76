//! Low-level byte scanner over in-memory UTF-8 text.
//!
//! This module provides [ByteParser] with peeking, consuming and atom
//! extraction. It is the foundation of the bracket reader in
//! [crate::bracket::parser]. All structural bytes it looks for are ASCII, so
//! every slice it hands out starts and ends on a character boundary.

/// Whitespace bytes recognized between atoms.
const WHITESPACE: &[u8] = b" \t\n\r";

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte scanner over a borrowed string.
///
/// # Example
/// ```
/// use chunktree::parser::byte_parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  (NNP John)");
/// parser.skip_whitespace();
/// assert!(parser.consume_if(b'('));
/// assert_eq!(parser.parse_atom(b"()"), "NNP");
/// parser.skip_whitespace();
/// assert_eq!(parser.parse_atom(b"()"), "John");
/// assert!(parser.consume_if(b')'));
/// assert!(parser.is_eof());
/// ```
#[derive(Debug, Clone)]
pub struct ByteParser<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> ByteParser<'a> {
    /// Creates a new `ByteParser` reading the given string from its start.
    ///
    /// # Arguments
    /// * `input` - The text to scan
    pub fn for_str(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn next(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    /// Checks if the current byte equals `ch` (exact match).
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it equals `ch`.
    ///
    /// # Returns
    /// `true` if the byte was consumed, `false` otherwise (position unchanged)
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space (' '), tab ('\t'), newline ('\n'), and carriage return ('\r').
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if WHITESPACE.contains(&b) {
                self.position += 1;
            } else {
                break;
            }
        }
    }

    /// Consumes an atom, i.e. the longest run of bytes that are neither
    /// whitespace nor one of the given delimiters.
    ///
    /// # Arguments
    /// * `delimiters` - Additional ASCII bytes that end the atom
    ///
    /// # Returns
    /// The atom as a slice of the input; empty if the current byte already
    /// ends an atom (or at EOF).
    pub fn parse_atom(&mut self, delimiters: &[u8]) -> &'a str {
        let start = self.position;
        while let Some(b) = self.peek() {
            if WHITESPACE.contains(&b) || delimiters.contains(&b) {
                break;
            }
            self.position += 1;
        }

        &self.input[start..self.position]
    }

    /// Returns whether all input has been consumed.
    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Returns the current byte offset into the input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns up to `k` upcoming bytes (without consuming them) as a string,
    /// shortened if needed so it does not end inside a multi-byte character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        let start = self.position.min(self.input.len());
        let mut end = (start + k).min(self.input.len());
        while !self.input.is_char_boundary(end) {
            end -= 1;
        }

        self.input[start..end].to_string()
    }
}
