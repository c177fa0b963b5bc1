//! Parser helper methods for token navigation and basic operations.

use super::Parser;
use super::error::ParseError;
use crate::ast::{Expr, ExprId, ExprKind, Stmt, StmtId, StmtKind};
use crate::token::{Span, Token, TokenKind};

impl Parser {
    /// Returns a user-friendly display string for a token kind.
    pub(super) fn token_kind_display(kind: &TokenKind) -> String {
        match kind {
            TokenKind::Identifier(s) => format!("identifier '{}'", s),
            TokenKind::Int(n) => format!("integer '{}'", n),
            TokenKind::Float(v) => format!("float '{}'", v),
            TokenKind::Str(s) => {
                if s.len() > 20 {
                    format!("string \"{}...\"", &s[..20])
                } else {
                    format!("string \"{}\"", s)
                }
            }
            TokenKind::Bool(b) => format!("'{}'", b),
            TokenKind::Null => "'null'".to_string(),
            TokenKind::Func => "'func' keyword".to_string(),
            TokenKind::Return => "'return' keyword".to_string(),
            TokenKind::If => "'if' keyword".to_string(),
            TokenKind::Else => "'else' keyword".to_string(),
            TokenKind::While => "'while' keyword".to_string(),
            TokenKind::For => "'for' keyword".to_string(),
            TokenKind::In => "'in' keyword".to_string(),
            TokenKind::Break => "'break' keyword".to_string(),
            TokenKind::Continue => "'continue' keyword".to_string(),
            TokenKind::IntType => "'int' type".to_string(),
            TokenKind::FloatType => "'float' type".to_string(),
            TokenKind::StrType => "'str' type".to_string(),
            TokenKind::BoolType => "'bool' type".to_string(),
            TokenKind::VoidType => "'void' type".to_string(),
            TokenKind::AutoType => "'auto' type".to_string(),
            TokenKind::Const => "'const' keyword".to_string(),
            TokenKind::Async => "'async' keyword".to_string(),
            TokenKind::Await => "'await' keyword".to_string(),
            TokenKind::Parallel => "'parallel' keyword".to_string(),
            TokenKind::Match => "'match' keyword".to_string(),
            TokenKind::With => "'with' keyword".to_string(),
            TokenKind::Import => "'import' keyword".to_string(),
            TokenKind::From => "'from' keyword".to_string(),
            TokenKind::As => "'as' keyword".to_string(),
            TokenKind::Class => "'class' keyword".to_string(),
            TokenKind::Trait => "'trait' keyword".to_string(),
            TokenKind::Impl => "'impl' keyword".to_string(),
            TokenKind::And => "'and'".to_string(),
            TokenKind::Or => "'or'".to_string(),
            TokenKind::Not => "'not'".to_string(),
            TokenKind::Plus => "'+'".to_string(),
            TokenKind::Minus => "'-'".to_string(),
            TokenKind::Star => "'*'".to_string(),
            TokenKind::Slash => "'/'".to_string(),
            TokenKind::Percent => "'%'".to_string(),
            TokenKind::Power => "'**'".to_string(),
            TokenKind::Assign => "'='".to_string(),
            TokenKind::PlusAssign => "'+='".to_string(),
            TokenKind::MinusAssign => "'-='".to_string(),
            TokenKind::EqualEqual => "'=='".to_string(),
            TokenKind::BangEqual => "'!='".to_string(),
            TokenKind::LessThan => "'<'".to_string(),
            TokenKind::GreaterThan => "'>'".to_string(),
            TokenKind::LessEqual => "'<='".to_string(),
            TokenKind::GreaterEqual => "'>='".to_string(),
            TokenKind::Arrow => "'->'".to_string(),
            TokenKind::FatArrow => "'=>'".to_string(),
            TokenKind::PipeForward => "'|>'".to_string(),
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::LeftBrace => "'{'".to_string(),
            TokenKind::RightBrace => "'}'".to_string(),
            TokenKind::LeftBracket => "'['".to_string(),
            TokenKind::RightBracket => "']'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Semicolon => "';'".to_string(),
            TokenKind::Colon => "':'".to_string(),
            TokenKind::Dot => "'.'".to_string(),
            TokenKind::Question => "'?'".to_string(),
            TokenKind::Pipe => "'|'".to_string(),
            TokenKind::Newline => "newline".to_string(),
            TokenKind::Eof => "end of file".to_string(),
        }
    }

    /// Returns a reference to the current token.
    ///
    /// This method is safe to call at any time - if the position is past
    /// the end, it returns the last token (which should be `Eof`).
    pub(super) fn current(&self) -> &Token {
        // new() ensures tokens is non-empty and advance() doesn't move
        // past Eof, so idx is always valid.
        let idx = self.pos.min(self.tokens.len() - 1);
        &self.tokens[idx]
    }

    /// Returns the kind of the current token.
    pub(super) fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    /// Returns the span of the current token.
    pub(super) fn current_span(&self) -> Span {
        self.current().span
    }

    /// Returns `true` if the current token is `Eof`.
    pub(super) fn is_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    /// Advances to the next token.
    ///
    /// Does nothing if already at `Eof`.
    pub(super) fn advance(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    /// Skips all consecutive newline tokens.
    ///
    /// Newlines act as optional statement separators; this is used in
    /// contexts where line breaks are not significant (between statements,
    /// inside delimiters, between match cases).
    pub(super) fn skip_newlines(&mut self) {
        while matches!(self.current_kind(), TokenKind::Newline) {
            self.advance();
        }
    }

    /// Expects the current token to match `expected` and advances.
    pub(super) fn expect(&mut self, expected: &TokenKind) -> Result<(), ParseError> {
        if self.current_kind() == expected {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::unexpected_token(
                &Self::token_kind_display(expected),
                &Self::token_kind_display(self.current_kind()),
                self.current_span(),
            ))
        }
    }

    /// Expects an identifier token and returns its name.
    pub(super) fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Identifier(name) = self.current_kind() {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(ParseError::expected_identifier(
                &Self::token_kind_display(self.current_kind()),
                self.current_span(),
            ))
        }
    }

    /// Allocates a fresh expression node with the next [`ExprId`].
    pub(super) fn new_expr(&mut self, kind: ExprKind, span: Span) -> Expr {
        let id = ExprId(self.next_expr_id);
        self.next_expr_id += 1;
        Expr::new(id, kind, span)
    }

    /// Allocates a fresh statement node with the next [`StmtId`].
    pub(super) fn new_stmt(&mut self, kind: StmtKind, span: Span) -> Stmt {
        let id = StmtId(self.next_stmt_id);
        self.next_stmt_id += 1;
        Stmt::new(id, kind, span)
    }
}
