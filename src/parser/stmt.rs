//! Statement parsing.

use super::Parser;
use super::error::ParseError;
use crate::ast::{AssignOp, Stmt, StmtKind};
use crate::token::TokenKind;

impl Parser {
    /// Parses a single statement.
    ///
    /// Statement dispatch checks the leading token kind: declaration and
    /// control-flow keywords select their productions, a type keyword
    /// begins a typed variable declaration, and any other token begins an
    /// expression. An expression followed by `=`, `+=`, or `-=` becomes an
    /// assignment; otherwise it is an expression statement.
    pub(super) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.current_kind() {
            TokenKind::Func => self.parse_func_stmt(),
            TokenKind::Class => self.parse_class_stmt(),
            TokenKind::Trait => self.parse_trait_stmt(),
            TokenKind::Return => self.parse_return_stmt(),
            TokenKind::If => self.parse_if_stmt(),
            TokenKind::While => self.parse_while_stmt(),
            TokenKind::For => self.parse_for_stmt(),
            TokenKind::Break => {
                let span = self.current_span();
                self.advance();
                Ok(self.new_stmt(StmtKind::Break, span))
            }
            TokenKind::Continue => {
                let span = self.current_span();
                self.advance();
                Ok(self.new_stmt(StmtKind::Continue, span))
            }
            TokenKind::Parallel => self.parse_parallel_stmt(),
            TokenKind::Import | TokenKind::From => self.parse_import_stmt(),
            TokenKind::LeftBrace => {
                let start_span = self.current_span();
                let stmts = self.parse_block_stmts()?;
                let end = stmts.last().map(|s| s.span).unwrap_or(start_span);
                let span = start_span.to(end);
                Ok(self.new_stmt(StmtKind::Block(stmts), span))
            }
            TokenKind::IntType
            | TokenKind::FloatType
            | TokenKind::StrType
            | TokenKind::BoolType
            | TokenKind::AutoType => self.parse_var_decl(false),
            TokenKind::Const => {
                self.advance();
                self.parse_var_decl(true)
            }
            _ => self.parse_expr_or_assign_stmt(),
        }
    }

    /// Parses a typed variable declaration.
    ///
    /// # Grammar
    ///
    /// ```text
    /// var_decl → "const"? type IDENTIFIER ("=" expr)?
    /// ```
    ///
    /// The leading `const`, if any, has already been consumed by the
    /// dispatcher.
    fn parse_var_decl(&mut self, is_const: bool) -> Result<Stmt, ParseError> {
        let start_span = self.current_span();
        let type_name = self.parse_type()?;
        let name_span = self.current_span();
        let name = self.expect_identifier()?;

        let init = if matches!(self.current_kind(), TokenKind::Assign) {
            self.advance();
            self.skip_newlines();
            Some(self.parse_expr()?)
        } else {
            None
        };

        let end = init.as_ref().map(|e| e.span).unwrap_or(name_span);
        let span = start_span.to(end);
        Ok(self.new_stmt(
            StmtKind::VarDecl {
                name,
                declared_type: Some(type_name),
                init,
                is_const,
            },
            span,
        ))
    }

    /// Parses a statement that begins with an expression.
    ///
    /// If the expression is followed by `=`, `+=`, or `-=`, the statement
    /// is an assignment with the expression as target; otherwise it is an
    /// expression statement.
    fn parse_expr_or_assign_stmt(&mut self) -> Result<Stmt, ParseError> {
        let target = self.parse_expr()?;

        let op = match self.current_kind() {
            TokenKind::Assign => Some(AssignOp::Assign),
            TokenKind::PlusAssign => Some(AssignOp::AddAssign),
            TokenKind::MinusAssign => Some(AssignOp::SubAssign),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            self.skip_newlines();
            let value = self.parse_expr()?;
            let span = target.span.to(value.span);
            return Ok(self.new_stmt(StmtKind::Assign { target, op, value }, span));
        }

        let span = target.span;
        Ok(self.new_stmt(StmtKind::Expr(target), span))
    }

    /// Parses a return statement.
    ///
    /// # Grammar
    ///
    /// ```text
    /// return_stmt → "return" expr?
    /// ```
    fn parse_return_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Return)?;

        // Bare return if the statement ends immediately.
        if matches!(
            self.current_kind(),
            TokenKind::Newline | TokenKind::RightBrace | TokenKind::Eof
        ) {
            return Ok(self.new_stmt(StmtKind::Return(None), start_span));
        }

        let value = self.parse_expr()?;
        let span = start_span.to(value.span);
        Ok(self.new_stmt(StmtKind::Return(Some(value)), span))
    }

    /// Parses an if statement.
    ///
    /// # Grammar
    ///
    /// ```text
    /// if_stmt → "if" expr "{" stmt* "}" ("else" (if_stmt | "{" stmt* "}"))?
    /// ```
    ///
    /// An `else if` chain becomes an else branch holding a single nested
    /// if statement.
    fn parse_if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current_span();
        self.expect(&TokenKind::If)?;

        let condition = self.parse_expr_no_object()?;
        let then_branch = self.parse_block_stmts()?;

        let else_branch = if self.consume_newlines_before_else() {
            self.expect(&TokenKind::Else)?;
            if matches!(self.current_kind(), TokenKind::If) {
                let nested_if = self.parse_if_stmt()?;
                Some(vec![nested_if])
            } else {
                Some(self.parse_block_stmts()?)
            }
        } else {
            None
        };

        let end = else_branch
            .as_ref()
            .and_then(|branch| branch.last())
            .map(|stmt| stmt.span)
            .unwrap_or_else(|| {
                then_branch
                    .last()
                    .map(|stmt| stmt.span)
                    .unwrap_or(condition.span)
            });
        let span = start_span.to(end);

        Ok(self.new_stmt(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    /// Parses a while statement.
    ///
    /// # Grammar
    ///
    /// ```text
    /// while_stmt → "while" expr "{" stmt* "}"
    /// ```
    fn parse_while_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current_span();
        self.expect(&TokenKind::While)?;

        let condition = self.parse_expr_no_object()?;
        let body = self.parse_block_stmts()?;

        let end = body
            .last()
            .map(|stmt| stmt.span)
            .unwrap_or(condition.span);
        let span = start_span.to(end);

        Ok(self.new_stmt(StmtKind::While { condition, body }, span))
    }

    /// Parses a for statement.
    ///
    /// # Grammar
    ///
    /// ```text
    /// for_stmt → "for" IDENTIFIER "in" expr "{" stmt* "}"
    /// ```
    fn parse_for_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current_span();
        self.expect(&TokenKind::For)?;

        let variable = self.expect_identifier()?;
        self.expect(&TokenKind::In)?;
        let iterable = self.parse_expr_no_object()?;
        let body = self.parse_block_stmts()?;

        let end = body
            .last()
            .map(|stmt| stmt.span)
            .unwrap_or(iterable.span);
        let span = start_span.to(end);

        Ok(self.new_stmt(
            StmtKind::For {
                variable,
                iterable,
                body,
            },
            span,
        ))
    }

    /// Parses a parallel block.
    ///
    /// # Grammar
    ///
    /// ```text
    /// parallel_stmt → "parallel" "{" (expr NEWLINE*)* "}"
    /// ```
    fn parse_parallel_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current_span();
        self.expect(&TokenKind::Parallel)?;
        self.expect(&TokenKind::LeftBrace)?;
        self.skip_newlines();

        let mut tasks = Vec::new();
        while !matches!(self.current_kind(), TokenKind::RightBrace) && !self.is_eof() {
            tasks.push(self.parse_expr()?);
            self.skip_newlines();
        }

        let end_span = self.current_span();
        self.expect(&TokenKind::RightBrace)?;
        let span = start_span.to(end_span);

        Ok(self.new_stmt(StmtKind::Parallel(tasks), span))
    }

    /// Parses an import statement.
    ///
    /// # Grammar
    ///
    /// ```text
    /// import_stmt → "import" IDENTIFIER ("as" IDENTIFIER)?
    ///             | "from" IDENTIFIER "import" IDENTIFIER ("," IDENTIFIER)*
    /// ```
    fn parse_import_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current_span();

        if matches!(self.current_kind(), TokenKind::From) {
            self.advance();
            let module = self.expect_identifier()?;
            self.expect(&TokenKind::Import)?;

            let mut items = Vec::new();
            let mut end_span;
            loop {
                end_span = self.current_span();
                items.push(self.expect_identifier()?);
                if matches!(self.current_kind(), TokenKind::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }

            let span = start_span.to(end_span);
            return Ok(self.new_stmt(
                StmtKind::Import {
                    module,
                    items,
                    alias: None,
                },
                span,
            ));
        }

        self.expect(&TokenKind::Import)?;
        let mut end_span = self.current_span();
        let module = self.expect_identifier()?;

        let alias = if matches!(self.current_kind(), TokenKind::As) {
            self.advance();
            end_span = self.current_span();
            Some(self.expect_identifier()?)
        } else {
            None
        };

        let span = start_span.to(end_span);
        Ok(self.new_stmt(
            StmtKind::Import {
                module,
                items: Vec::new(),
                alias,
            },
            span,
        ))
    }

    /// Parses a braced statement block and returns its statements.
    pub(super) fn parse_block_stmts(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(&TokenKind::LeftBrace)?;
        self.skip_newlines();

        let mut body = Vec::new();
        while !matches!(self.current_kind(), TokenKind::RightBrace) && !self.is_eof() {
            let stmt = self.parse_stmt()?;
            body.push(stmt);
            self.skip_newlines();
        }

        self.expect(&TokenKind::RightBrace)?;
        Ok(body)
    }

    /// If the next non-newline token is `else`, consumes preceding
    /// newlines and positions the parser at `else`.
    fn consume_newlines_before_else(&mut self) -> bool {
        let mut lookahead = self.pos;
        while lookahead < self.tokens.len()
            && matches!(self.tokens[lookahead].kind, TokenKind::Newline)
        {
            lookahead += 1;
        }

        if lookahead < self.tokens.len() && matches!(self.tokens[lookahead].kind, TokenKind::Else) {
            self.pos = lookahead;
            true
        } else {
            false
        }
    }
}
