//! Token recognition and reading for the lexer.
//!
//! This module contains the readers for multi-character tokens: numbers,
//! string literals, and identifiers/keywords.

use super::Lexer;
use super::error::LexError;
use crate::token::{Span, Token, TokenKind, keyword_kind};

impl<'a> Lexer<'a> {
    /// Reads a numeric literal from the input.
    ///
    /// A number is one or more decimal digits. A single dot inside the
    /// digit run promotes the literal to a float; a second dot terminates
    /// the number (it belongs to whatever follows). There is no exponent
    /// form, no underscores, and no hex.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] if an integer literal does not fit in `i64`.
    pub(super) fn read_number(&mut self) -> Result<Token, LexError> {
        let start_pos = self.pos;
        let start_line = self.line;
        let start_column = self.column;
        let mut has_dot = false;

        while let Some(c) = self.current_char() {
            if c == '.' {
                if has_dot {
                    break;
                }
                has_dot = true;
                self.advance();
            } else if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.input[start_pos..self.pos];
        let span = Span::new(start_pos, self.pos, start_line, start_column);

        let kind = if has_dot {
            let value = text
                .parse::<f64>()
                .map_err(|_| LexError::invalid_number(text, span))?;
            TokenKind::Float(value)
        } else {
            let value = text
                .parse::<i64>()
                .map_err(|_| LexError::integer_out_of_range(text, span))?;
            TokenKind::Int(value)
        };

        Ok(Token::new(kind, span))
    }

    /// Reads a string literal delimited by `quote` (either `'` or `"`).
    ///
    /// The opening quote should be at the current position. Escape
    /// sequences `\n`, `\t`, `\\`, and the matching quote are decoded; any
    /// other escaped character passes through literally. Strings may span
    /// lines.
    ///
    /// # Errors
    ///
    /// Returns a [`LexError`] if end of file is reached before the
    /// closing quote.
    pub(super) fn read_string(&mut self, quote: char) -> Result<Token, LexError> {
        let start_pos = self.pos;
        let start_line = self.line;
        let start_column = self.column;

        self.advance(); // skip opening quote
        let mut value = String::new();

        loop {
            match self.current_char() {
                Some(c) if c == quote => {
                    self.advance(); // skip closing quote
                    let span = Span::new(start_pos, self.pos, start_line, start_column);
                    return Ok(Token::new(TokenKind::Str(value), span));
                }
                Some('\\') => {
                    self.advance(); // skip backslash
                    match self.current_char() {
                        Some('n') => {
                            value.push('\n');
                            self.advance();
                        }
                        Some('t') => {
                            value.push('\t');
                            self.advance();
                        }
                        Some('\\') => {
                            value.push('\\');
                            self.advance();
                        }
                        Some(c) if c == quote => {
                            value.push(quote);
                            self.advance();
                        }
                        Some(c) => {
                            // Unknown escapes pass through literally.
                            value.push(c);
                            self.advance();
                        }
                        None => {
                            return Err(LexError::unterminated_string(Span::new(
                                start_pos,
                                self.pos,
                                start_line,
                                start_column,
                            )));
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
                None => {
                    return Err(LexError::unterminated_string(Span::new(
                        start_pos,
                        self.pos,
                        start_line,
                        start_column,
                    )));
                }
            }
        }
    }

    /// Reads an identifier or keyword from the input.
    ///
    /// Identifiers consist of an ASCII letter or underscore followed by any
    /// number of ASCII alphanumerics or underscores. The text is looked up
    /// against the fixed keyword table before emission; matches become
    /// keyword tokens (`true`/`false`/`null` become literal tokens with
    /// their value payload), non-matches become identifier tokens.
    pub(super) fn read_identifier(&mut self) -> Token {
        let start_pos = self.pos;
        let start_line = self.line;
        let start_column = self.column;

        while let Some(c) = self.current_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.input[start_pos..self.pos];
        let span = Span::new(start_pos, self.pos, start_line, start_column);
        let kind = keyword_kind(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()));
        Token::new(kind, span)
    }
}
