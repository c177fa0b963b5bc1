//! Lexical error types.

use crate::token::Span;

/// An error that occurred during lexical analysis.
///
/// `LexError` contains a human-readable message and the source location
/// where the error occurred, enabling rich error reporting with tools
/// like [`ariadne`].
///
/// [`ariadne`]: https://docs.rs/ariadne
#[derive(Debug)]
pub struct LexError {
    /// A human-readable description of the error.
    pub message: String,
    /// The source location where the error occurred.
    pub span: Span,
}

impl LexError {
    /// Creates an error for a character the lexer does not recognize.
    pub fn unexpected_character(c: char, span: Span) -> Self {
        LexError {
            message: format!("Unexpected character: '{}'", c),
            span,
        }
    }

    /// Creates an error for a string literal that reaches end of file
    /// before its closing quote.
    pub fn unterminated_string(span: Span) -> Self {
        LexError {
            message: "Unterminated string literal".to_string(),
            span,
        }
    }

    /// Creates an error for an integer literal that does not fit in `i64`.
    pub fn integer_out_of_range(text: &str, span: Span) -> Self {
        LexError {
            message: format!("Integer literal '{}' is out of range for int", text),
            span,
        }
    }

    /// Creates an error for a malformed numeric literal.
    pub fn invalid_number(text: &str, span: Span) -> Self {
        LexError {
            message: format!("Invalid numeric literal '{}'", text),
            span,
        }
    }
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.span.line, self.span.column, self.message
        )
    }
}

impl std::error::Error for LexError {}
