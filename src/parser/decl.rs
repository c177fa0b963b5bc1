//! Declaration parsing: functions, classes, and traits.

use super::Parser;
use super::error::ParseError;
use crate::ast::{ClassDecl, FieldDecl, FuncDecl, Param, Stmt, StmtKind, TraitDecl};
use crate::token::TokenKind;

impl Parser {
    /// Parses a function declaration statement.
    pub(super) fn parse_func_stmt(&mut self) -> Result<Stmt, ParseError> {
        let decl = self.parse_func_decl(true)?;
        let span = decl.span;
        Ok(self.new_stmt(StmtKind::Func(decl), span))
    }

    /// Parses a function declaration.
    ///
    /// # Grammar
    ///
    /// ```text
    /// func_decl → "func" "async"? IDENTIFIER "(" params? ")" ("->" type)? block?
    /// params    → IDENTIFIER ":" type ("," IDENTIFIER ":" type)*
    /// ```
    ///
    /// The return type defaults to `void` when the arrow clause is
    /// omitted. When `require_body` is `false` (trait method signatures)
    /// no block is parsed and the body is `None`.
    pub(super) fn parse_func_decl(&mut self, require_body: bool) -> Result<FuncDecl, ParseError> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Func)?;

        let is_async = matches!(self.current_kind(), TokenKind::Async);
        if is_async {
            self.advance();
        }

        let name = self.expect_identifier()?;

        self.expect(&TokenKind::LeftParen)?;
        let params = self.parse_param_list()?;
        let mut end_span = self.current_span();
        self.expect(&TokenKind::RightParen)?;

        let return_type = if matches!(self.current_kind(), TokenKind::Arrow) {
            self.advance();
            end_span = self.current_span();
            self.parse_type()?
        } else {
            "void".to_string()
        };

        let body = if require_body {
            let stmts = self.parse_block_stmts()?;
            if let Some(last) = stmts.last() {
                end_span = last.span;
            }
            Some(stmts)
        } else {
            None
        };

        Ok(FuncDecl {
            name,
            params,
            return_type,
            body,
            is_async,
            span: start_span.to(end_span),
        })
    }

    /// Parses a parameter list up to (but not consuming) the closing `)`.
    ///
    /// Parameter names must be unique within the list.
    fn parse_param_list(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params: Vec<Param> = Vec::new();

        if !matches!(self.current_kind(), TokenKind::RightParen) {
            loop {
                let param_span = self.current_span();
                let name = self.expect_identifier()?;
                self.expect(&TokenKind::Colon)?;
                let type_name = self.parse_type()?;

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

        Ok(params)
    }

    /// Parses a class declaration statement.
    ///
    /// # Grammar
    ///
    /// ```text
    /// class_decl → "class" IDENTIFIER (":" IDENTIFIER ("," IDENTIFIER)*)?
    ///              "{" (func_decl | field_decl)* "}"
    /// field_decl → type IDENTIFIER ("=" expr)?
    /// ```
    ///
    /// Field names must be unique within the class.
    pub(super) fn parse_class_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Class)?;
        let name = self.expect_identifier()?;

        let mut traits = Vec::new();
        if matches!(self.current_kind(), TokenKind::Colon) {
            self.advance();
            loop {
                traits.push(self.expect_identifier()?);
                if matches!(self.current_kind(), TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.skip_newlines();
        self.expect(&TokenKind::LeftBrace)?;
        self.skip_newlines();

        let mut fields: Vec<FieldDecl> = Vec::new();
        let mut methods = Vec::new();

        while !matches!(self.current_kind(), TokenKind::RightBrace) && !self.is_eof() {
            if matches!(self.current_kind(), TokenKind::Func) {
                methods.push(self.parse_func_decl(true)?);
            } else {
                let field = self.parse_field_decl()?;
                if fields.iter().any(|f| f.name == field.name) {
                    return Err(ParseError::duplicate_field(&field.name, &name, field.span));
                }
                fields.push(field);
            }
            self.skip_newlines();
        }

        let end_span = self.current_span();
        self.expect(&TokenKind::RightBrace)?;

        let span = start_span.to(end_span);
        Ok(self.new_stmt(
            StmtKind::Class(ClassDecl {
                name,
                fields,
                methods,
                traits,
                span,
            }),
            span,
        ))
    }

    /// Parses a single class field declaration.
    fn parse_field_decl(&mut self) -> Result<FieldDecl, ParseError> {
        let start_span = self.current_span();
        let type_name = self.parse_type()?;
        let mut end_span = self.current_span();
        let name = self.expect_identifier()?;

        let init = if matches!(self.current_kind(), TokenKind::Assign) {
            self.advance();
            let expr = self.parse_expr()?;
            end_span = expr.span;
            Some(expr)
        } else {
            None
        };

        Ok(FieldDecl {
            name,
            declared_type: Some(type_name),
            init,
            span: start_span.to(end_span),
        })
    }

    /// Parses a trait declaration statement.
    ///
    /// # Grammar
    ///
    /// ```text
    /// trait_decl → "trait" IDENTIFIER "{" func_signature* "}"
    /// ```
    ///
    /// Trait methods are signatures without bodies.
    pub(super) fn parse_trait_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Trait)?;
        let name = self.expect_identifier()?;

        self.skip_newlines();
        self.expect(&TokenKind::LeftBrace)?;
        self.skip_newlines();

        let mut methods = Vec::new();
        while !matches!(self.current_kind(), TokenKind::RightBrace) && !self.is_eof() {
            methods.push(self.parse_func_decl(false)?);
            self.skip_newlines();
        }

        let end_span = self.current_span();
        self.expect(&TokenKind::RightBrace)?;

        let span = start_span.to(end_span);
        Ok(self.new_stmt(
            StmtKind::Trait(TraitDecl {
                name,
                methods,
                span,
            }),
            span,
        ))
    }
}
