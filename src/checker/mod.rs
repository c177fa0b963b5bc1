//! Static type checking for the Vela programming language.
//!
//! This module provides the [`TypeChecker`], which walks the AST with a
//! lexically scoped [`TypeEnv`], infers a type for every expression, and
//! validates assignability, conditions, calls, and declarations.
//!
//! # Error discipline
//!
//! Unlike the lexer and parser, the checker never aborts: every error
//! discovered in one traversal is accumulated into an ordered list, and
//! inference falls back to `auto` so later code can still be examined.
//! Checking succeeds iff the error list is empty.
//!
//! # Output
//!
//! The AST is never mutated. The checker's result is a [`TypeTable`]: side
//! tables keyed by node identity recording every expression's inferred
//! type and every variable declaration's resolved binding type. The
//! lowerer reads these tables to dispatch int/float instruction variants
//! and to size stack slots.
//!
//! # Scoping
//!
//! A fresh scope is pushed for every function body; inner blocks share
//! their enclosing function's scope. The outermost scope is seeded with
//! the built-ins `print`, `len`, `range`, and `str`.
//!
//! # Module Structure
//!
//! - [`env`] - The scope stack ([`TypeEnv`])
//! - [`error`] - [`TypeError`] and its kinds
//! - `infer` - Expression type inference
//! - `tests` - Unit tests (test-only)
//!
//! # See Also
//!
//! * [`crate::ast`] - The AST being checked
//! * [`crate::lower`] - Consumes the [`TypeTable`] produced here

mod env;
mod error;
mod infer;


pub use error::{TypeError, TypeErrorKind};

use std::collections::HashMap;

use crate::ast::{
    AssignOp, BinaryOp, ClassDecl, Expr, ExprId, ExprKind, FuncDecl, Program, Stmt, StmtId,
    StmtKind, TraitDecl, Type,
};
use crate::token::Span;
use env::{ClassInfo, TraitInfo, TypeEnv, VariableInfo};

/// The checker's output: type annotations keyed by node identity.
///
/// The AST itself stays immutable; these side tables carry everything the
/// lowerer needs to know about types.
#[derive(Debug, Default)]
pub struct TypeTable {
    exprs: HashMap<ExprId, Type>,
    decls: HashMap<StmtId, Type>,
}

impl TypeTable {
    /// Returns the inferred type of the given expression, if recorded.
    ///
    /// After a successful check every expression has an entry.
    pub fn expr_type(&self, id: ExprId) -> Option<&Type> {
        self.exprs.get(&id)
    }

    /// Returns the resolved binding type of the given variable
    /// declaration statement, if recorded.
    pub fn decl_type(&self, id: StmtId) -> Option<&Type> {
        self.decls.get(&id)
    }

    fn record_expr(&mut self, id: ExprId, ty: Type) {
        self.exprs.insert(id, ty);
    }

    fn record_decl(&mut self, id: StmtId, ty: Type) {
        self.decls.insert(id, ty);
    }
}

/// The static type checker.
///
/// Create one with [`TypeChecker::new`] and call
/// [`check`](TypeChecker::check) with a parsed program.
pub struct TypeChecker {
    env: TypeEnv,
    table: TypeTable,
    errors: Vec<TypeError>,
    /// Declared return types of the functions currently being checked,
    /// innermost last.
    return_types: Vec<Type>,
}

impl TypeChecker {
    /// Creates a new checker with the built-ins seeded in the outermost
    /// scope.
    pub fn new() -> Self {
        let mut env = TypeEnv::new();

        env.define_function(
            "print",
            Type::Function {
                params: vec![Type::Auto],
                ret: Box::new(Type::Void),
            },
        );
        env.define_function(
            "len",
            Type::Function {
                params: vec![Type::Array(Box::new(Type::Auto))],
                ret: Box::new(Type::Int),
            },
        );
        // range also accepts a single argument; the call rule in infer
        // handles the 1- and 2-argument forms.
        env.define_function(
            "range",
            Type::Function {
                params: vec![Type::Int, Type::Int],
                ret: Box::new(Type::Array(Box::new(Type::Int))),
            },
        );
        env.define_function(
            "str",
            Type::Function {
                params: vec![Type::Auto],
                ret: Box::new(Type::Str),
            },
        );

        TypeChecker {
            env,
            table: TypeTable::default(),
            errors: Vec::new(),
            return_types: Vec::new(),
        }
    }

    /// Checks a whole program.
    ///
    /// Top-level function, class, and trait declarations are registered
    /// first so later statements (and earlier bodies) can reference them,
    /// then every statement is checked in order.
    ///
    /// # Errors
    ///
    /// Returns the ordered list of every [`TypeError`] discovered when the
    /// list is non-empty; otherwise returns the completed [`TypeTable`].
    pub fn check(mut self, program: &Program) -> Result<TypeTable, Vec<TypeError>> {
        self.declare_top_level(program);

        for stmt in &program.statements {
            self.check_stmt(stmt);
        }

        if self.errors.is_empty() {
            Ok(self.table)
        } else {
            Err(self.errors)
        }
    }

    fn declare_top_level(&mut self, program: &Program) {
        for stmt in &program.statements {
            match &stmt.kind {
                StmtKind::Func(decl) => {
                    let ty = self.function_type(decl);
                    self.env.define_function(&decl.name, ty);
                }
                StmtKind::Class(decl) => {
                    let info = self.class_info(decl);
                    self.env.define_class(&decl.name, info);
                }
                StmtKind::Trait(decl) => {
                    let info = self.trait_info(decl);
                    self.env.define_trait(&decl.name, info);
                }
                _ => {}
            }
        }
    }

    pub(super) fn error(&mut self, error: TypeError) {
        self.errors.push(error);
    }

    /// The directed assignability relation.
    ///
    /// `can_assign(target, source)` holds when:
    /// 1. the target is `auto`,
    /// 2. the types are structurally equal,
    /// 3. the source is `null` and the target is a reference kind
    ///    (`class`, `str`, `array`), or
    /// 4. the target is `float` and the source is `int` (widening).
    ///
    /// A source of `auto` is also accepted: it only arises from inference
    /// fallback after an earlier error, and rejecting it would cascade.
    pub(super) fn can_assign(target: &Type, source: &Type) -> bool {
        if target.is_auto() || source.is_auto() {
            return true;
        }
        if target == source {
            return true;
        }
        if matches!(source, Type::Null) && target.is_reference() {
            return true;
        }
        matches!(target, Type::Float) && matches!(source, Type::Int)
    }

    /// Resolves a type annotation, reporting unknown class names.
    ///
    /// An annotation naming a declared trait resolves to the trait type;
    /// an identifier naming neither a class nor a trait is an error and
    /// resolves to `auto`.
    fn resolve_annotation(&mut self, name: &str, span: Span) -> Type {
        match Type::from_annotation(name) {
            Type::Class(class_name) => {
                if self.env.lookup_class(&class_name).is_some() {
                    Type::Class(class_name)
                } else if self.env.lookup_trait(&class_name).is_some() {
                    Type::Trait(class_name)
                } else {
                    self.error(TypeError::unknown_class(&class_name, span));
                    Type::Auto
                }
            }
            ty => ty,
        }
    }

    /// Resolves a type annotation without reporting errors.
    ///
    /// Used by signature registration, which happens before all classes
    /// are necessarily known; the erroring resolution runs when the
    /// declaration itself is checked.
    fn annotation_type(&self, name: &str) -> Type {
        match Type::from_annotation(name) {
            Type::Class(class_name) if self.env.lookup_trait(&class_name).is_some() => {
                Type::Trait(class_name)
            }
            ty => ty,
        }
    }

    fn function_type(&self, decl: &FuncDecl) -> Type {
        Type::Function {
            params: decl
                .params
                .iter()
                .map(|param| self.annotation_type(&param.type_name))
                .collect(),
            ret: Box::new(self.annotation_type(&decl.return_type)),
        }
    }

    fn class_info(&self, decl: &ClassDecl) -> ClassInfo {
        ClassInfo {
            fields: decl
                .fields
                .iter()
                .map(|field| {
                    let ty = field
                        .declared_type
                        .as_deref()
                        .map(|t| self.annotation_type(t))
                        .unwrap_or(Type::Auto);
                    (field.name.clone(), ty)
                })
                .collect(),
            methods: decl
                .methods
                .iter()
                .map(|method| (method.name.clone(), self.function_type(method)))
                .collect(),
            traits: decl.traits.clone(),
        }
    }

    fn trait_info(&self, decl: &TraitDecl) -> TraitInfo {
        TraitInfo {
            methods: decl
                .methods
                .iter()
                .map(|method| (method.name.clone(), self.function_type(method)))
                .collect(),
        }
    }

    fn check_block(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.check_stmt(stmt);
        }
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::VarDecl {
                name,
                declared_type,
                init,
                is_const,
            } => self.check_var_decl(stmt, name, declared_type.as_deref(), init.as_ref(), *is_const),
            StmtKind::Assign { target, op, value } => {
                self.check_assign(target, *op, value);
            }
            StmtKind::Expr(expr) => {
                self.infer_expr(expr);
            }
            StmtKind::Return(value) => {
                let value_span = value.as_ref().map(|e| e.span).unwrap_or(stmt.span);
                let value_ty = value
                    .as_ref()
                    .map(|e| self.infer_expr(e))
                    .unwrap_or(Type::Void);
                if let Some(expected) = self.return_types.last().cloned()
                    && !Self::can_assign(&expected, &value_ty)
                {
                    self.error(TypeError::cannot_assign(&value_ty, &expected, value_span));
                }
            }
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(condition);
                self.check_block(then_branch);
                if let Some(else_branch) = else_branch {
                    self.check_block(else_branch);
                }
            }
            StmtKind::While { condition, body } => {
                self.check_condition(condition);
                self.check_block(body);
            }
            StmtKind::For {
                variable,
                iterable,
                body,
            } => {
                let iterable_ty = self.infer_expr(iterable);
                let element_ty = match iterable_ty {
                    Type::Array(elem) => *elem,
                    _ => Type::Auto,
                };
                self.env.define_variable(
                    variable,
                    VariableInfo {
                        ty: element_ty,
                        is_const: false,
                    },
                );
                self.check_block(body);
            }
            StmtKind::Break | StmtKind::Continue => {}
            StmtKind::Block(stmts) => self.check_block(stmts),
            StmtKind::Parallel(tasks) => {
                for task in tasks {
                    self.infer_expr(task);
                }
            }
            StmtKind::Import { .. } => {
                // Import recognition is syntactic only; module resolution
                // is outside the core.
            }
            StmtKind::Func(decl) => self.check_function(decl),
            StmtKind::Class(decl) => self.check_class(decl),
            StmtKind::Trait(decl) => {
                let info = self.trait_info(decl);
                self.env.define_trait(&decl.name, info);
            }
        }
    }

    fn check_var_decl(
        &mut self,
        stmt: &Stmt,
        name: &str,
        declared_type: Option<&str>,
        init: Option<&Expr>,
        is_const: bool,
    ) {
        let declared = declared_type.map(|t| self.resolve_annotation(t, stmt.span));
        let init_ty = init.map(|e| self.infer_expr(e));

        let var_ty = match (declared, init_ty) {
            (Some(declared), Some(init_ty)) => {
                if declared.is_auto() {
                    init_ty
                } else {
                    if !Self::can_assign(&declared, &init_ty) {
                        let span = init.map(|e| e.span).unwrap_or(stmt.span);
                        self.error(TypeError::cannot_assign(&init_ty, &declared, span));
                    }
                    declared
                }
            }
            (None, Some(init_ty)) => init_ty,
            (Some(declared), None) => declared,
            (None, None) => Type::Auto,
        };

        self.table.record_decl(stmt.id, var_ty.clone());
        self.env.define_variable(
            name,
            VariableInfo {
                ty: var_ty,
                is_const,
            },
        );
    }

    fn check_assign(&mut self, target: &Expr, op: AssignOp, value: &Expr) {
        if let ExprKind::Identifier(name) = &target.kind {
            let reassigns_const = self
                .env
                .lookup_variable(name)
                .map(|info| info.is_const)
                .unwrap_or(false);
            if reassigns_const {
                self.error(TypeError::const_reassignment(name, target.span));
            }
        }

        let target_ty = self.infer_expr(target);
        let value_ty = self.infer_expr(value);

        let effective = match op {
            AssignOp::Assign => value_ty,
            AssignOp::AddAssign => {
                self.arithmetic_result(BinaryOp::Add, &target_ty, &value_ty, value.span)
            }
            AssignOp::SubAssign => {
                self.arithmetic_result(BinaryOp::Sub, &target_ty, &value_ty, value.span)
            }
        };

        if !Self::can_assign(&target_ty, &effective) {
            self.error(TypeError::cannot_assign(&effective, &target_ty, value.span));
        }
    }

    fn check_condition(&mut self, condition: &Expr) {
        let ty = self.infer_expr(condition);
        if !matches!(ty, Type::Bool | Type::Auto) {
            self.error(TypeError::condition_not_bool(&ty, condition.span));
        }
    }

    fn check_function(&mut self, decl: &FuncDecl) {
        let fn_ty = self.function_type(decl);
        self.env.define_function(&decl.name, fn_ty);

        let Some(body) = &decl.body else {
            return;
        };

        self.env.enter_scope();
        for param in &decl.params {
            let ty = self.resolve_annotation(&param.type_name, param.span);
            self.env.define_variable(
                &param.name,
                VariableInfo {
                    ty,
                    is_const: false,
                },
            );
        }

        let ret = self.resolve_annotation(&decl.return_type, decl.span);
        self.return_types.push(ret);
        self.check_block(body);
        self.return_types.pop();
        self.env.exit_scope();
    }

    fn check_class(&mut self, decl: &ClassDecl) {
        let info = self.class_info(decl);
        self.env.define_class(&decl.name, info);

        for field in &decl.fields {
            let declared = field
                .declared_type
                .as_deref()
                .map(|t| self.resolve_annotation(t, field.span));
            if let Some(init) = &field.init {
                let init_ty = self.infer_expr(init);
                if let Some(declared) = &declared
                    && !Self::can_assign(declared, &init_ty)
                {
                    self.error(TypeError::cannot_assign(&init_ty, declared, init.span));
                }
            }
        }

        for method in &decl.methods {
            // A method's name must not leak into the enclosing scope.
            self.env.enter_scope();
            self.check_function(method);
            self.env.exit_scope();
        }
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}
