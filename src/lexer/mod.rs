//! Lexical analyzer for the Vela programming language.
//!
//! This module provides the [`Lexer`] struct which converts source code text
//! into a stream of [`Token`]s for parsing.
//!
//! # Overview
//!
//! The lexer performs the following tasks:
//! - Scans the input character by character with one character of lookahead
//! - Recognizes numbers, string literals, identifiers, keywords, and operators
//! - Tracks source positions for error reporting
//! - Skips spaces, tabs, carriage returns, and `#` line comments
//! - Preserves newlines as explicit [`TokenKind::Newline`] tokens
//!
//! # Supported Tokens
//!
//! - **Numbers**: decimal digits, one `.` promotes to float; integer
//!   literals that do not fit `i64` are rejected
//! - **Strings**: delimited by matching `'` or `"` with `\n`, `\t`, `\\`,
//!   and quote escapes; other escaped characters pass through literally
//! - **Identifiers**: ASCII letter or underscore followed by ASCII
//!   alphanumerics/underscores, checked against the keyword table
//! - **Operators**: two-character operators (`==`, `!=`, `<=`, `>=`, `+=`,
//!   `-=`, `->`, `=>`, `|>`, `**`) are recognized before single-character ones
//!
//! # Examples
//!
//! ```
//! use vela::lexer::Lexer;
//! use vela::token::TokenKind;
//!
//! let mut lexer = Lexer::new("print(\"hello\")");
//! let tokens = lexer.tokenize().unwrap();
//!
//! assert!(matches!(tokens[0].kind, TokenKind::Identifier(_)));
//! assert!(matches!(tokens[1].kind, TokenKind::LeftParen));
//! ```
//!
//! # Module Structure
//!
//! - [`error`] - Error types for lexical analysis
//! - [`cursor`] - Position tracking and character navigation
//! - [`skip`] - Whitespace and comment handling
//! - [`tokens`] - Token recognition and reading
//! - `tests` - Unit tests (test-only)
//!
//! # See Also
//!
//! * [`crate::token`] - Token type definitions
//! * [`crate::parser`] - Parser that consumes the token stream

mod cursor;
mod error;
mod skip;
mod tokens;

#[cfg(test)]
mod tests;

pub use error::LexError;

use crate::token::{Span, Token, TokenKind};

/// A lexical analyzer that tokenizes Vela source code.
///
/// The `Lexer` maintains its position within the input and tracks line/column
/// numbers for error reporting. It is designed to be used once per source file.
///
/// # Lifetime
///
/// The `'a` lifetime parameter ties the lexer to the input string slice,
/// ensuring the input remains valid while the lexer is in use.
pub struct Lexer<'a> {
    /// The input source code being tokenized.
    pub(super) input: &'a str,
    /// Current byte position in the input.
    pub(super) pos: usize,
    /// Current line number (1-indexed).
    pub(super) line: usize,
    /// Current column number (1-indexed).
    pub(super) column: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new `Lexer` for the given input string.
    ///
    /// The lexer starts at the beginning of the input with line and column
    /// numbers initialized to 1.
    pub fn new(input: &'a str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenizes the entire input and returns a vector of tokens.
    ///
    /// This method consumes the input from start to end, producing tokens
    /// until the end of input is reached. The returned vector always ends
    /// with an [`TokenKind::Eof`] token. On error the whole token vector is
    /// discarded; the lexer never returns partial output.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An unrecognized character is encountered
    /// - A string literal reaches end of file without its closing quote
    /// - An integer literal does not fit in `i64`
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_trivia();

            if self.is_eof() {
                let span = Span::new(self.pos, self.pos, self.line, self.column);
                tokens.push(Token::new(TokenKind::Eof, span));
                break;
            }

            let token = self.next_token()?;
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Reads and returns the next token from the input.
    ///
    /// This method is called repeatedly by [`tokenize`](Self::tokenize) to
    /// produce the token stream. It assumes whitespace and comments have
    /// already been skipped.
    fn next_token(&mut self) -> Result<Token, LexError> {
        let c = match self.current_char() {
            Some(c) => c,
            None => {
                let span = Span::new(self.pos, self.pos, self.line, self.column);
                return Ok(Token::new(TokenKind::Eof, span));
            }
        };

        if c == '\n' {
            let span = Span::new(self.pos, self.pos + 1, self.line, self.column);
            self.advance();
            return Ok(Token::new(TokenKind::Newline, span));
        }

        if c.is_ascii_digit() {
            return self.read_number();
        }

        if c == '"' || c == '\'' {
            return self.read_string(c);
        }

        if c.is_ascii_alphabetic() || c == '_' {
            return Ok(self.read_identifier());
        }

        self.read_operator(c)
    }

    /// Reads an operator or delimiter token.
    ///
    /// Two-character operators are recognized with one character of
    /// lookahead before falling back to single-character operators.
    fn read_operator(&mut self, c: char) -> Result<Token, LexError> {
        let start_pos = self.pos;
        let start_line = self.line;
        let start_column = self.column;

        let two = match (c, self.peek_char()) {
            ('=', Some('=')) => Some(TokenKind::EqualEqual),
            ('!', Some('=')) => Some(TokenKind::BangEqual),
            ('<', Some('=')) => Some(TokenKind::LessEqual),
            ('>', Some('=')) => Some(TokenKind::GreaterEqual),
            ('+', Some('=')) => Some(TokenKind::PlusAssign),
            ('-', Some('=')) => Some(TokenKind::MinusAssign),
            ('-', Some('>')) => Some(TokenKind::Arrow),
            ('=', Some('>')) => Some(TokenKind::FatArrow),
            ('|', Some('>')) => Some(TokenKind::PipeForward),
            ('*', Some('*')) => Some(TokenKind::Power),
            _ => None,
        };

        if let Some(kind) = two {
            self.advance();
            self.advance();
            let span = Span::new(start_pos, self.pos, start_line, start_column);
            return Ok(Token::new(kind, span));
        }

        let kind = match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '%' => TokenKind::Percent,
            '=' => TokenKind::Assign,
            '<' => TokenKind::LessThan,
            '>' => TokenKind::GreaterThan,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '.' => TokenKind::Dot,
            '?' => TokenKind::Question,
            '|' => TokenKind::Pipe,
            _ => {
                return Err(LexError::unexpected_character(
                    c,
                    Span::new(self.pos, self.pos + c.len_utf8(), self.line, self.column),
                ));
            }
        };

        self.advance();
        let span = Span::new(start_pos, self.pos, start_line, start_column);
        Ok(Token::new(kind, span))
    }
}
