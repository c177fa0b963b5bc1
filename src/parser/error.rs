//! Parse error types.

use crate::token::Span;

/// An error that occurred during parsing.
///
/// `ParseError` contains a human-readable message and the source location
/// where the error occurred, enabling rich error reporting. The parser
/// aborts on the first error; there is no recovery.
///
/// # See Also
///
/// * [`crate::lexer::LexError`] - Similar error type for lexical errors
#[derive(Debug)]
pub struct ParseError {
    /// A human-readable description of the error.
    pub message: String,
    /// The source location where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates an error for a token that does not match the expected one.
    pub fn unexpected_token(expected: &str, got: &str, span: Span) -> Self {
        ParseError {
            message: format!("Expected {}, found {}", expected, got),
            span,
        }
    }

    /// Creates an error for a missing identifier.
    pub fn expected_identifier(got: &str, span: Span) -> Self {
        ParseError {
            message: format!("Expected identifier, found {}", got),
            span,
        }
    }

    /// Creates an error for a missing type reference.
    pub fn expected_type(got: &str, span: Span) -> Self {
        ParseError {
            message: format!("Expected a type, found {}", got),
            span,
        }
    }

    /// Creates an error for a token that cannot begin an expression.
    pub fn unexpected_expression_start(got: &str, span: Span) -> Self {
        ParseError {
            message: format!("Expected an expression, found {}", got),
            span,
        }
    }

    /// Creates an error for a parameter name that repeats within one
    /// parameter list.
    pub fn duplicate_parameter(name: &str, span: Span) -> Self {
        ParseError {
            message: format!("Duplicate parameter name '{}'", name),
            span,
        }
    }

    /// Creates an error for a field name that repeats within one class.
    pub fn duplicate_field(name: &str, class: &str, span: Span) -> Self {
        ParseError {
            message: format!("Duplicate field '{}' in class '{}'", name, class),
            span,
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {}",
            self.span.line, self.span.column, self.message
        )
    }
}

impl std::error::Error for ParseError {}
