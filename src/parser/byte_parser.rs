//! Low-level byte-by-byte parser for Newick text.
//!
//! This module provides [ByteParser] with support for peeking, consuming,
//! comment skipping and quote-aware label parsing. Used as the foundation of
//! the [Newick reader](crate::newick::NewickParser).

use crate::parser::parsing_error::{ParsingError, ParsingErrorKind};

/// Default length of context provided by errors from the parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser over in-memory text.
///
/// Structural characters of Newick are all ASCII, so labels are collected as
/// raw bytes and only decoded once complete; multi-byte UTF-8 characters in
/// labels (e.g. `†Dinornis`) are therefore preserved.
///
/// # Example
/// ```
/// use cladewick::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [comment] (A,B)R;");
/// parser.skip_comment_and_whitespace()?;
/// assert!(parser.consume_if(b'('));
/// assert_eq!(parser.parse_label(b"(),:;")?, "A");
/// # Ok::<(), cladewick::parser::ParsingError>(())
/// ```
pub struct ByteParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> ByteParser<'a> {
    /// Creates a new `ByteParser` over the given string.
    pub fn for_str(input: &'a str) -> Self {
        Self::for_bytes(input.as_bytes())
    }

    /// Creates a new `ByteParser` over the given bytes.
    pub fn for_bytes(input: &'a [u8]) -> Self {
        ByteParser { input, pos: 0 }
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Returns `true` if the current byte equals `ch`.
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it equals `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skips (consumes) all consecutive ASCII whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|b| b.is_ascii_whitespace()) {
            self.pos += 1;
        }
    }

    /// Skips (consumes) a comment `[...]` if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if !self.peek_is(b'[') {
            return Ok(false);
        }

        let start = self.pos;
        while let Some(b) = self.next_byte() {
            if b == b']' {
                return Ok(true);
            }
        }

        self.pos = start;
        Err(self.error(ParsingErrorKind::UnclosedComment))
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();
        while self.skip_comment()? {
            self.skip_whitespace();
        }
        Ok(())
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns a string from up to `k` bytes from the current position for
    /// error context.
    pub fn context(&self, k: usize) -> String {
        let end = (self.pos + k).min(self.input.len());
        String::from_utf8_lossy(&self.input[self.pos.min(end)..end]).into_owned()
    }

    /// Creates a [ParsingError] at the current position.
    pub fn error(&self, kind: ParsingErrorKind) -> ParsingError {
        ParsingError::new(kind, self.pos, self.context(DEFAULT_CONTEXT_LENGTH))
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Skips leading whitespace and comments, then dispatches on whether the
    /// label starts with a single quote.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek_is(b'\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a label enclosed in single quotes, where a doubled quote
    /// stands for one quote (e.g. `'Baillon''s crake'`).
    ///
    /// # Errors
    /// Returns an error if the closing quote is missing.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        let start = self.pos;
        self.pos += 1; // opening '

        let mut label = Vec::new();
        loop {
            match self.next_byte() {
                Some(b'\'') => {
                    if self.consume_if(b'\'') {
                        label.push(b'\'');
                    } else {
                        break;
                    }
                }
                Some(b) => label.push(b),
                None => {
                    self.pos = start;
                    return Err(self.error(ParsingErrorKind::UnclosedQuote));
                }
            }
        }

        Ok(String::from_utf8_lossy(&label).into_owned())
    }

    /// Parses an unquoted label until any of the given delimiters or
    /// whitespace is encountered.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|b| !delimiters.contains(&b) && !b.is_ascii_whitespace())
        {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }
}
