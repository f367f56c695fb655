//! Cursor-tracked readers over raw command input.
//!
//! [`StringStream`] is the mutable reader the dispatcher hands to parsers:
//! every read operates at the current cursor and advances it on success.
//! [`StreamView`] is the immutable variant with the same read contract,
//! where each read returns the value together with the advanced view;
//! suggestion providers receive views so they cannot disturb the walk.
//!
//! The input is shared behind `Arc<str>`, so forking a stream for a
//! branch attempt is a cursor copy, not a string copy.

use std::num::IntErrorKind;
use std::sync::Arc;

use crate::error::{Error, ErrorKind};
use crate::Result;

/// Mutable cursor over an input string.
#[derive(Clone, Debug)]
pub struct StringStream {
    input: Arc<str>,
    cursor: usize,
}

impl StringStream {
    /// Creates a stream over the given input, cursor at the start.
    pub fn new(input: impl Into<Arc<str>>) -> Self {
        Self {
            input: input.into(),
            cursor: 0,
        }
    }

    /// The complete underlying input.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Current cursor position, in bytes.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Moves the cursor to an absolute position.
    ///
    /// Positions past the end clamp to the end of input.
    pub fn set_position(&mut self, position: usize) {
        self.cursor = position.min(self.input.len());
    }

    /// Returns true if any input remains past the cursor.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.cursor < self.input.len()
    }

    /// The unread remainder of the input.
    #[must_use]
    pub fn remaining(&self) -> &str {
        &self.input[self.cursor..]
    }

    /// Next code point without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Forks the stream: an independent cursor over the same input.
    #[must_use]
    pub fn fork(&self) -> Self {
        self.clone()
    }

    /// An immutable view at the current position.
    #[must_use]
    pub fn view(&self) -> StreamView {
        StreamView {
            input: Arc::clone(&self.input),
            cursor: self.cursor,
        }
    }

    /// Advances past any whitespace at the cursor.
    pub fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.cursor += c.len_utf8();
        }
    }

    /// Consumes input until the next whitespace character.
    ///
    /// Returns an empty string if the cursor is at whitespace.
    ///
    /// # Errors
    ///
    /// Fails with `ExpectedInput` at end of input.
    pub fn read_unquoted_string(&mut self) -> Result<String> {
        if !self.has_remaining() {
            return Err(Error::expected_input().with_position(self.cursor));
        }
        Ok(self.take_token())
    }

    /// Consumes a string token.
    ///
    /// If the next character is `"`, reads a quoted string honoring `\"`
    /// and `\\` escapes; otherwise behaves as [`read_unquoted_string`].
    ///
    /// # Errors
    ///
    /// Fails with `ExpectedInput` at end of input and with
    /// `UnterminatedQuote` if a quoted string is not closed.
    ///
    /// [`read_unquoted_string`]: StringStream::read_unquoted_string
    pub fn read_string(&mut self) -> Result<String> {
        if self.peek() != Some('"') {
            return self.read_unquoted_string();
        }

        let open = self.cursor;
        self.cursor += 1;
        let mut out = String::new();
        let mut chars = self.input[self.cursor..].chars();

        while let Some(c) = chars.next() {
            self.cursor += c.len_utf8();
            match c {
                '"' => return Ok(out),
                '\\' => match chars.next() {
                    Some(escaped @ ('"' | '\\')) => {
                        self.cursor += escaped.len_utf8();
                        out.push(escaped);
                    }
                    Some(other) => {
                        // Unknown escape: keep both characters verbatim.
                        self.cursor += other.len_utf8();
                        out.push('\\');
                        out.push(other);
                    }
                    None => break,
                },
                other => out.push(other),
            }
        }

        self.cursor = open;
        Err(Error::new(ErrorKind::UnterminatedQuote { position: open }).with_position(open))
    }

    /// Consumes an integer literal.
    ///
    /// # Errors
    ///
    /// Fails with `ExpectedInput` at end of input, `InvalidNumber` if the
    /// token is not an integer, and `NumberOutOfRange` on overflow.
    pub fn read_int(&mut self) -> Result<i64> {
        let (token, start) = self.numeric_token()?;
        match token.parse::<i64>() {
            Ok(n) => Ok(n),
            Err(e)
                if matches!(
                    e.kind(),
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                ) =>
            {
                self.cursor = start;
                Err(Error::number_out_of_range(token).with_position(start))
            }
            Err(_) => {
                self.cursor = start;
                Err(Error::invalid_number(token).with_position(start))
            }
        }
    }

    /// Consumes a floating-point literal.
    ///
    /// # Errors
    ///
    /// Fails with `ExpectedInput` at end of input, `InvalidNumber` if the
    /// token is not a number, and `NumberOutOfRange` if the value does not
    /// fit a finite f64.
    pub fn read_float(&mut self) -> Result<f64> {
        let (token, start) = self.numeric_token()?;
        match token.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            Ok(_) => {
                self.cursor = start;
                Err(Error::number_out_of_range(token).with_position(start))
            }
            Err(_) => {
                self.cursor = start;
                Err(Error::invalid_number(token).with_position(start))
            }
        }
    }

    /// Consumes a boolean literal, matching `true`/`false` case-insensitively.
    ///
    /// # Errors
    ///
    /// Fails with `ExpectedInput` at end of input and `InvalidBoolean`
    /// otherwise.
    pub fn read_boolean(&mut self) -> Result<bool> {
        if !self.has_remaining() {
            return Err(Error::expected_input().with_position(self.cursor));
        }
        let start = self.cursor;
        let token = self.take_token();
        if token.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if token.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            self.cursor = start;
            Err(Error::new(ErrorKind::InvalidBoolean { token }).with_position(start))
        }
    }

    /// Consumes the rest of the input. Never fails; may be empty.
    pub fn read_remaining(&mut self) -> String {
        let rest = self.remaining().to_string();
        self.cursor = self.input.len();
        rest
    }

    fn take_token(&mut self) -> String {
        let start = self.cursor;
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                break;
            }
            self.cursor += c.len_utf8();
        }
        self.input[start..self.cursor].to_string()
    }

    fn numeric_token(&mut self) -> Result<(String, usize)> {
        if !self.has_remaining() {
            return Err(Error::expected_input().with_position(self.cursor));
        }
        let start = self.cursor;
        let token = self.take_token();
        if token.is_empty() {
            self.cursor = start;
            return Err(Error::invalid_number(token).with_position(start));
        }
        Ok((token, start))
    }
}

/// Quotes a string so that [`StringStream::read_string`] reads it back
/// verbatim, escaping embedded quotes and backslashes.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Immutable cursor over an input string.
///
/// Reads return the value paired with the advanced view, leaving the
/// original untouched.
#[derive(Clone, Debug)]
pub struct StreamView {
    input: Arc<str>,
    cursor: usize,
}

impl StreamView {
    /// Creates a view over the given input, cursor at the start.
    pub fn new(input: impl Into<Arc<str>>) -> Self {
        Self {
            input: input.into(),
            cursor: 0,
        }
    }

    /// Current cursor position, in bytes.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.cursor
    }

    /// Returns true if any input remains past the cursor.
    #[must_use]
    pub fn has_remaining(&self) -> bool {
        self.cursor < self.input.len()
    }

    /// The unread remainder of the input.
    #[must_use]
    pub fn remaining(&self) -> &str {
        &self.input[self.cursor..]
    }

    /// Next code point without advancing.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// A view advanced past any whitespace at the cursor.
    #[must_use]
    pub fn skip_whitespace(&self) -> Self {
        let mut stream = self.to_stream();
        stream.skip_whitespace();
        stream.view()
    }

    /// Reads a token until whitespace; see [`StringStream::read_unquoted_string`].
    ///
    /// # Errors
    ///
    /// Fails with `ExpectedInput` at end of input.
    pub fn read_unquoted_string(&self) -> Result<(String, Self)> {
        let mut stream = self.to_stream();
        let value = stream.read_unquoted_string()?;
        Ok((value, stream.view()))
    }

    /// Reads a possibly-quoted string token; see [`StringStream::read_string`].
    ///
    /// # Errors
    ///
    /// Fails as [`StringStream::read_string`] does.
    pub fn read_string(&self) -> Result<(String, Self)> {
        let mut stream = self.to_stream();
        let value = stream.read_string()?;
        Ok((value, stream.view()))
    }

    /// Materializes a mutable stream at this view's position.
    #[must_use]
    pub fn to_stream(&self) -> StringStream {
        StringStream {
            input: Arc::clone(&self.input),
            cursor: self.cursor,
        }
    }
}
