//! Type annotation parsing.

use super::Parser;
use super::error::ParseError;
use crate::token::TokenKind;

impl Parser {
    /// Parses a type reference and returns its type string.
    ///
    /// A type reference is one of the type keywords (`int`, `float`, `str`,
    /// `bool`, `void`, `auto`) or a bare identifier naming a user class.
    /// Array and generic type syntax are reserved but not parsed.
    pub(super) fn parse_type(&mut self) -> Result<String, ParseError> {
        let name = match self.current_kind() {
            TokenKind::IntType => "int".to_string(),
            TokenKind::FloatType => "float".to_string(),
            TokenKind::StrType => "str".to_string(),
            TokenKind::BoolType => "bool".to_string(),
            TokenKind::VoidType => "void".to_string(),
            TokenKind::AutoType => "auto".to_string(),
            TokenKind::Identifier(name) => name.clone(),
            _ => {
                return Err(ParseError::expected_type(
                    &Self::token_kind_display(self.current_kind()),
                    self.current_span(),
                ));
            }
        };
        self.advance();
        Ok(name)
    }
}
