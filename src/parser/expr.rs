//! Expression parsing using precedence climbing.
//!
//! This module implements expression parsing with proper operator
//! precedence. The parser handles:
//! - Primary expressions (literals, identifiers, array and object
//!   literals, parenthesized expressions, match expressions, lambdas)
//! - Postfix operators (calls, index access, member access)
//! - Prefix operators (`not`, unary `-`, `await`)
//! - Binary operations with correct precedence and associativity
//! - The pipeline operator `|>`, which binds loosest and builds a
//!   dedicated node

use super::Parser;
use super::error::ParseError;
use crate::ast::{BinaryOp, Expr, ExprKind, LambdaBody, MatchCase, Param, UnaryOp};
use crate::token::{Span, TokenKind};

/// Operator precedence levels (higher number = lower precedence = looser
/// binding).
///
/// Lower precedence operators are parsed later, forming parent nodes in the
/// AST. For example, `2 + 3 * 4` is parsed as `2 + (3 * 4)` because
/// multiplication binds tighter than addition.
///
/// Levels follow the Vela grammar, tightest to loosest:
/// - unary `not` / `-` / `await` (handled as prefixes)
/// - `**` (right-associative)
/// - `*`, `/`, `%`
/// - `+`, `-`
/// - `<`, `>`, `<=`, `>=`
/// - `==`, `!=`
/// - `and`
/// - `or`
/// - `|>` (handled above the climbing loop)
const PRECEDENCE_UNARY: u8 = 1;
const PRECEDENCE_POWER: u8 = 2;
const PRECEDENCE_MULTIPLICATIVE: u8 = 3;
const PRECEDENCE_ADDITIVE: u8 = 4;
const PRECEDENCE_COMPARISON: u8 = 5;
const PRECEDENCE_EQUALITY: u8 = 6;
const PRECEDENCE_LOGICAL_AND: u8 = 7;
const PRECEDENCE_LOGICAL_OR: u8 = 8;

/// Returns the precedence of a binary operator token, if it is one.
fn binary_op_precedence(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Power => Some(PRECEDENCE_POWER),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(PRECEDENCE_MULTIPLICATIVE),
        TokenKind::Plus | TokenKind::Minus => Some(PRECEDENCE_ADDITIVE),
        TokenKind::LessThan
        | TokenKind::GreaterThan
        | TokenKind::LessEqual
        | TokenKind::GreaterEqual => Some(PRECEDENCE_COMPARISON),
        TokenKind::EqualEqual | TokenKind::BangEqual => Some(PRECEDENCE_EQUALITY),
        TokenKind::And => Some(PRECEDENCE_LOGICAL_AND),
        TokenKind::Or => Some(PRECEDENCE_LOGICAL_OR),
        _ => None,
    }
}

/// Converts a token kind to a binary operator.
fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Power => Some(BinaryOp::Pow),
        TokenKind::EqualEqual => Some(BinaryOp::Eq),
        TokenKind::BangEqual => Some(BinaryOp::Ne),
        TokenKind::LessThan => Some(BinaryOp::Lt),
        TokenKind::GreaterThan => Some(BinaryOp::Gt),
        TokenKind::LessEqual => Some(BinaryOp::Le),
        TokenKind::GreaterEqual => Some(BinaryOp::Ge),
        TokenKind::And => Some(BinaryOp::And),
        TokenKind::Or => Some(BinaryOp::Or),
        _ => None,
    }
}

impl Parser {
    /// Parses an expression.
    ///
    /// This is the main entry point for expression parsing. The pipeline
    /// operator is handled here since it binds loosest and produces a
    /// dedicated node (initial value plus ordered stage list) rather than
    /// a binary tree.
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let value = self.parse_expr_pratt(u8::MAX)?;

        if !matches!(self.current_kind(), TokenKind::PipeForward) {
            return Ok(value);
        }

        let mut stages = Vec::new();
        while matches!(self.current_kind(), TokenKind::PipeForward) {
            self.advance();
            self.skip_newlines();
            stages.push(self.parse_expr_pratt(u8::MAX)?);
        }

        // stages is non-empty: the loop above runs at least once.
        let span = value.span.to(stages.last().expect("pipeline stage").span);
        Ok(self.new_expr(
            ExprKind::Pipeline {
                value: Box::new(value),
                stages,
            },
            span,
        ))
    }

    /// Parses an expression with object literals disallowed at the top
    /// level.
    ///
    /// Used for `if`/`while` conditions, `for` iterables, and `match`
    /// scrutinees, where `name {` must begin the statement's block rather
    /// than an object literal. Parenthesized sub-expressions lift the
    /// restriction.
    pub(super) fn parse_expr_no_object(&mut self) -> Result<Expr, ParseError> {
        let saved = self.allow_object_literal;
        self.allow_object_literal = false;
        let result = self.parse_expr();
        self.allow_object_literal = saved;
        result
    }

    /// Parses an expression with precedence climbing, respecting minimum
    /// precedence.
    ///
    /// 1. Parse a prefix/postfix expression (the left-hand side)
    /// 2. While the current token is a binary operator with precedence
    ///    <= `min_precedence`: consume it, parse the right-hand side, and
    ///    build a `Binary` node
    ///
    /// Binary operators are left-associative except `**`, which is
    /// right-associative: the right-hand side of `**` is parsed at the
    /// operator's own level so another `**` nests to the right.
    fn parse_expr_pratt(&mut self, min_precedence: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary_expr()?;

        loop {
            let Some(precedence) = binary_op_precedence(self.current_kind()) else {
                break;
            };

            if precedence > min_precedence {
                break;
            }

            let op = token_to_binary_op(self.current_kind()).expect("operator with precedence");
            self.advance();
            self.skip_newlines(); // allow multi-line expressions

            let next_min = if op == BinaryOp::Pow {
                precedence
            } else {
                precedence - 1
            };
            let right = self.parse_expr_pratt(next_min)?;

            let span = left.span.to(right.span);
            left = self.new_expr(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        Ok(left)
    }

    /// Parses prefix operators: `not`, unary `-`, and `await`.
    ///
    /// Prefix operators bind tighter than every binary operator and are
    /// right-associative through direct recursion.
    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.current_span();

        let op = match self.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Not => Some(UnaryOp::Not),
            TokenKind::Await => None,
            _ => return self.parse_postfix_expr(),
        };

        self.advance();
        self.skip_newlines();
        let operand = self.parse_unary_expr()?;
        let span = start_span.to(operand.span);

        let kind = match op {
            Some(op) => ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            None => ExprKind::Await(Box::new(operand)),
        };
        Ok(self.new_expr(kind, span))
    }

    /// Parses postfix operators: calls `(...)`, index access `[...]`, and
    /// member access `.name`, applied left to right.
    fn parse_postfix_expr(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.current_span();
        let mut expr = self.parse_atom()?;

        loop {
            match self.current_kind() {
                TokenKind::LeftParen => {
                    self.advance();
                    let args = self.parse_comma_separated(&TokenKind::RightParen)?;
                    let end_span = self.current_span();
                    self.expect(&TokenKind::RightParen)?;
                    let span = start_span.to(end_span);
                    expr = self.new_expr(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LeftBracket => {
                    self.advance();
                    self.skip_newlines();
                    let index = self.in_delimited(Self::parse_expr)?;
                    self.skip_newlines();
                    let end_span = self.current_span();
                    self.expect(&TokenKind::RightBracket)?;
                    let span = start_span.to(end_span);
                    expr = self.new_expr(
                        ExprKind::Index {
                            target: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    let field_span = self.current_span();
                    let field = self.expect_identifier()?;
                    let span = start_span.to(field_span);
                    expr = self.new_expr(
                        ExprKind::Member {
                            target: Box::new(expr),
                            field,
                        },
                        span,
                    );
                }
                _ => break,
            }
        }

        Ok(expr)
    }

    /// Parses a primary expression.
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        let start_span = self.current_span();

        match self.current_kind() {
            TokenKind::Int(value) => {
                let value = *value;
                self.advance();
                Ok(self.new_expr(ExprKind::Int(value), start_span))
            }
            TokenKind::Float(value) => {
                let value = *value;
                self.advance();
                Ok(self.new_expr(ExprKind::Float(value), start_span))
            }
            TokenKind::Str(value) => {
                let value = value.clone();
                self.advance();
                Ok(self.new_expr(ExprKind::Str(value), start_span))
            }
            TokenKind::Bool(value) => {
                let value = *value;
                self.advance();
                Ok(self.new_expr(ExprKind::Bool(value), start_span))
            }
            TokenKind::Null => {
                self.advance();
                Ok(self.new_expr(ExprKind::Null, start_span))
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();

                if self.allow_object_literal
                    && matches!(self.current_kind(), TokenKind::LeftBrace)
                {
                    return self.parse_object_literal(name, start_span);
                }

                Ok(self.new_expr(ExprKind::Identifier(name), start_span))
            }
            TokenKind::LeftBracket => self.parse_array_literal(start_span),
            TokenKind::LeftParen => {
                self.advance();
                self.skip_newlines();
                let inner = self.in_delimited(Self::parse_expr)?;
                self.skip_newlines();
                let end_span = self.current_span();
                self.expect(&TokenKind::RightParen)?;

                // Return the inner expression with its span widened to
                // cover the parentheses.
                let span = start_span.to(end_span);
                Ok(Expr::new(inner.id, inner.kind, span))
            }
            TokenKind::Match => self.parse_match_expr(start_span),
            TokenKind::Pipe => self.parse_lambda(start_span),
            _ => Err(ParseError::unexpected_expression_start(
                &Self::token_kind_display(self.current_kind()),
                start_span,
            )),
        }
    }

    /// Runs `f` with object literals re-enabled.
    ///
    /// Delimited sub-expressions (parentheses, brackets, argument lists)
    /// lift the condition-position restriction on object literals.
    fn in_delimited<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = self.allow_object_literal;
        self.allow_object_literal = true;
        let result = f(self);
        self.allow_object_literal = saved;
        result
    }

    /// Parses a comma-separated expression list up to (but not consuming)
    /// the closing delimiter.
    fn parse_comma_separated(&mut self, close: &TokenKind) -> Result<Vec<Expr>, ParseError> {
        self.skip_newlines();
        let mut items = Vec::new();

        if self.current_kind() != close {
            loop {
                let item = self.in_delimited(Self::parse_expr)?;
                items.push(item);
                self.skip_newlines();

                if matches!(self.current_kind(), TokenKind::Comma) {
                    self.advance();
                    self.skip_newlines();
                } else {
                    break;
                }
            }
        }

        self.skip_newlines();
        Ok(items)
    }

    /// Parses an array literal; the `[` is at the current position.
    fn parse_array_literal(&mut self, start_span: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftBracket)?;
        let elements = self.parse_comma_separated(&TokenKind::RightBracket)?;
        let end_span = self.current_span();
        self.expect(&TokenKind::RightBracket)?;
        let span = start_span.to(end_span);
        Ok(self.new_expr(ExprKind::Array(elements), span))
    }

    /// Parses an object literal body; the class name has been consumed and
    /// the `{` is at the current position.
    ///
    /// # Grammar
    ///
    /// ```text
    /// object → IDENTIFIER "{" (IDENTIFIER "=" expr ("," IDENTIFIER "=" expr)*)? "}"
    /// ```
    fn parse_object_literal(
        &mut self,
        class: String,
        start_span: Span,
    ) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftBrace)?;
        self.skip_newlines();

        let mut fields = Vec::new();
        if !matches!(self.current_kind(), TokenKind::RightBrace) {
            loop {
                let field_name = self.expect_identifier()?;
                self.expect(&TokenKind::Assign)?;
                let value = self.in_delimited(Self::parse_expr)?;
                fields.push((field_name, value));
                self.skip_newlines();

                if matches!(self.current_kind(), TokenKind::Comma) {
                    self.advance();
                    self.skip_newlines();
                } else {
                    break;
                }
            }
        }

        self.skip_newlines();
        let end_span = self.current_span();
        self.expect(&TokenKind::RightBrace)?;
        let span = start_span.to(end_span);
        Ok(self.new_expr(ExprKind::Object { class, fields }, span))
    }

    /// Parses a match expression; the `match` keyword is at the current
    /// position.
    ///
    /// # Grammar
    ///
    /// ```text
    /// match → "match" expr "{" (expr "=>" expr ","?)* "}"
    /// ```
    ///
    /// Cases are separated by newlines; a trailing comma after a case is
    /// also accepted. Both patterns and results are full expressions.
    fn parse_match_expr(&mut self, start_span: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::Match)?;
        let scrutinee = self.parse_expr_no_object()?;

        self.expect(&TokenKind::LeftBrace)?;
        self.skip_newlines();

        let mut cases = Vec::new();
        while !matches!(self.current_kind(), TokenKind::RightBrace) && !self.is_eof() {
            let pattern = self.in_delimited(Self::parse_expr)?;
            self.expect(&TokenKind::FatArrow)?;
            let result = self.in_delimited(Self::parse_expr)?;
            cases.push(MatchCase { pattern, result });

            if matches!(self.current_kind(), TokenKind::Comma) {
                self.advance();
            }
            self.skip_newlines();
        }

        let end_span = self.current_span();
        self.expect(&TokenKind::RightBrace)?;
        let span = start_span.to(end_span);
        Ok(self.new_expr(
            ExprKind::Match {
                scrutinee: Box::new(scrutinee),
                cases,
            },
            span,
        ))
    }

    /// Parses a lambda expression; the opening `|` is at the current
    /// position.
    ///
    /// # Grammar
    ///
    /// ```text
    /// lambda → "|" params? "|" ("->" type)? (block | expr)
    /// params → IDENTIFIER (":" type)? ("," IDENTIFIER (":" type)?)*
    /// ```
    ///
    /// Parameter types default to `auto` when the annotation is omitted.
    fn parse_lambda(&mut self, start_span: Span) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::Pipe)?;

        let mut params: Vec<Param> = Vec::new();
        if !matches!(self.current_kind(), TokenKind::Pipe) {
            loop {
                let param_span = self.current_span();
                let name = self.expect_identifier()?;

                let type_name = if matches!(self.current_kind(), TokenKind::Colon) {
                    self.advance();
                    self.parse_type()?
                } else {
                    "auto".to_string()
                };

                if params.iter().any(|p| p.name == name) {
                    return Err(ParseError::duplicate_parameter(&name, param_span));
                }
                params.push(Param {
                    name,
                    type_name,
                    span: param_span,
                });

                if matches!(self.current_kind(), TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.expect(&TokenKind::Pipe)?;

        let return_type = if matches!(self.current_kind(), TokenKind::Arrow) {
            self.advance();
            Some(self.parse_type()?)
        } else {
            None
        };

        let (body, end) = if matches!(self.current_kind(), TokenKind::LeftBrace) {
            let stmts = self.parse_block_stmts()?;
            let end = stmts
                .last()
                .map(|stmt| stmt.span)
                .unwrap_or(start_span);
            (LambdaBody::Block(stmts), end)
        } else {
            let expr = self.parse_expr()?;
            let end = expr.span;
            (LambdaBody::Expr(Box::new(expr)), end)
        };

        let span = start_span.to(end);
        Ok(self.new_expr(
            ExprKind::Lambda {
                params,
                return_type,
                body,
            },
            span,
        ))
    }
}
