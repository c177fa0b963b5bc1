//! Expression type inference.
//!
//! Every inferred type is recorded in the checker's side table keyed by
//! the expression's identity; after a successful check the lowerer can
//! look up any expression's type. Inference never aborts: when a
//! sub-expression is erroneous its type falls back to `auto` and checking
//! continues.

use super::env::VariableInfo;
use super::{TypeChecker, TypeError};
use crate::ast::{BinaryOp, Expr, ExprKind, LambdaBody, Type, UnaryOp};
use crate::token::Span;

impl TypeChecker {
    /// Infers the type of an expression and records it in the type table.
    pub(super) fn infer_expr(&mut self, expr: &Expr) -> Type {
        let ty = self.infer_expr_kind(expr);
        self.table.record_expr(expr.id, ty.clone());
        ty
    }

    fn infer_expr_kind(&mut self, expr: &Expr) -> Type {
        match &expr.kind {
            ExprKind::Int(_) => Type::Int,
            ExprKind::Float(_) => Type::Float,
            ExprKind::Str(_) => Type::Str,
            ExprKind::Bool(_) => Type::Bool,
            ExprKind::Null => Type::Null,

            ExprKind::Identifier(name) => {
                if let Some(info) = self.env.lookup_variable(name) {
                    return info.ty.clone();
                }
                // A bare function name is a valid value, e.g. a pipeline
                // stage or a call argument.
                if let Some(fn_ty) = self.env.lookup_function(name) {
                    return fn_ty.clone();
                }
                self.error(TypeError::unbound_variable(name, expr.span));
                Type::Auto
            }

            ExprKind::Binary { op, left, right } => {
                let left_ty = self.infer_expr(left);
                let right_ty = self.infer_expr(right);
                self.binary_result(*op, &left_ty, &right_ty, expr.span)
            }

            ExprKind::Unary { op, operand } => {
                let operand_ty = self.infer_expr(operand);
                match op {
                    UnaryOp::Not => {
                        if !matches!(operand_ty, Type::Bool | Type::Auto) {
                            self.error(TypeError::invalid_unary_operand(
                                *op,
                                &operand_ty,
                                expr.span,
                            ));
                        }
                        Type::Bool
                    }
                    UnaryOp::Neg => {
                        if !operand_ty.is_numeric() && !operand_ty.is_auto() {
                            self.error(TypeError::invalid_unary_operand(
                                *op,
                                &operand_ty,
                                expr.span,
                            ));
                        }
                        operand_ty
                    }
                }
            }

            ExprKind::Call { callee, args } => self.infer_call(callee, args, expr.span),

            ExprKind::Array(elements) => {
                let mut element_ty = Type::Auto;
                for (i, element) in elements.iter().enumerate() {
                    let ty = self.infer_expr(element);
                    if i == 0 {
                        element_ty = ty;
                    }
                }
                Type::Array(Box::new(element_ty))
            }

            ExprKind::Index { target, index } => {
                let target_ty = self.infer_expr(target);
                self.infer_expr(index);
                match target_ty {
                    Type::Array(elem) => *elem,
                    Type::Str => Type::Str,
                    _ => Type::Auto,
                }
            }

            ExprKind::Member { target, field } => {
                let target_ty = self.infer_expr(target);
                if let Type::Class(class_name) = &target_ty
                    && let Some(info) = self.env.lookup_class(class_name)
                {
                    if let Some(field_ty) = info.field_type(field) {
                        return field_ty.clone();
                    }
                    if let Some(method_ty) = info.method_type(field) {
                        return method_ty.clone();
                    }
                }
                Type::Auto
            }

            ExprKind::Lambda {
                params,
                return_type,
                body,
            } => {
                let param_tys: Vec<Type> = params
                    .iter()
                    .map(|param| self.annotation_type(&param.type_name))
                    .collect();
                let ret = return_type
                    .as_deref()
                    .map(|t| self.annotation_type(t))
                    .unwrap_or(Type::Void);

                self.env.enter_scope();
                for (param, ty) in params.iter().zip(&param_tys) {
                    self.env.define_variable(
                        &param.name,
                        VariableInfo {
                            ty: ty.clone(),
                            is_const: false,
                        },
                    );
                }
                self.return_types.push(ret.clone());
                match body {
                    LambdaBody::Block(stmts) => self.check_block(stmts),
                    LambdaBody::Expr(body_expr) => {
                        self.infer_expr(body_expr);
                    }
                }
                self.return_types.pop();
                self.env.exit_scope();

                Type::Function {
                    params: param_tys,
                    ret: Box::new(ret),
                }
            }

            ExprKind::Pipeline { value, stages } => {
                let mut current = self.infer_expr(value);
                for stage in stages {
                    let stage_ty = self.infer_expr(stage);
                    current = match stage_ty {
                        Type::Function { ret, .. } => *ret,
                        _ => Type::Auto,
                    };
                }
                current
            }

            ExprKind::Match { scrutinee, cases } => {
                self.infer_expr(scrutinee);
                let mut result_ty: Option<Type> = None;
                for case in cases {
                    self.infer_expr(&case.pattern);
                    let case_ty = self.infer_expr(&case.result);
                    result_ty = match result_ty {
                        None => Some(case_ty),
                        Some(previous) if previous == case_ty => Some(previous),
                        Some(_) => Some(Type::Auto),
                    };
                }
                result_ty.unwrap_or(Type::Auto)
            }

            ExprKind::Object { class, fields } => {
                let info = self.env.lookup_class(class).cloned();
                if info.is_none() {
                    self.error(TypeError::unknown_class(class, expr.span));
                }

                for (field_name, value) in fields {
                    let value_ty = self.infer_expr(value);
                    if let Some(info) = &info
                        && let Some(field_ty) = info.field_type(field_name)
                        && !Self::can_assign(field_ty, &value_ty)
                    {
                        self.error(TypeError::cannot_assign(&value_ty, field_ty, value.span));
                    }
                }

                match info {
                    Some(_) => Type::Class(class.clone()),
                    None => Type::Auto,
                }
            }

            ExprKind::Await(inner) => self.infer_expr(inner),
        }
    }

    /// Infers the result of a binary operation.
    ///
    /// Arithmetic follows the float-absorbs-int rule; comparisons and
    /// logical operators produce `bool`. `**` requires integer operands:
    /// its lowering is an integer power routine.
    fn binary_result(&mut self, op: BinaryOp, left: &Type, right: &Type, span: Span) -> Type {
        if op.is_arithmetic() {
            return self.arithmetic_result(op, left, right, span);
        }

        if op.is_comparison() {
            // Ordering comparisons need numeric operands; equality accepts
            // any pair of operands.
            if matches!(op, BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge) {
                for ty in [left, right] {
                    if !ty.is_numeric() && !ty.is_auto() {
                        self.error(TypeError::invalid_binary_operand(op, ty, span));
                    }
                }
            }
            return Type::Bool;
        }

        // and / or: operands must be canonical booleans so the
        // short-circuit lowering is sound.
        for ty in [left, right] {
            if !matches!(ty, Type::Bool | Type::Auto) {
                self.error(TypeError::invalid_binary_operand(op, ty, span));
            }
        }
        Type::Bool
    }

    /// Infers the result of an arithmetic operation, also used for the
    /// compound assignment operators.
    pub(super) fn arithmetic_result(
        &mut self,
        op: BinaryOp,
        left: &Type,
        right: &Type,
        span: Span,
    ) -> Type {
        if op == BinaryOp::Pow {
            for ty in [left, right] {
                if !matches!(ty, Type::Int | Type::Auto) {
                    self.error(TypeError::power_requires_int(ty, span));
                }
            }
            return Type::Int;
        }

        for ty in [left, right] {
            if !ty.is_numeric() && !ty.is_auto() {
                self.error(TypeError::invalid_binary_operand(op, ty, span));
            }
        }

        if matches!(left, Type::Float) || matches!(right, Type::Float) {
            Type::Float
        } else {
            Type::Int
        }
    }

    /// Infers the result of a call expression.
    ///
    /// The built-ins have bespoke argument rules (`range` accepts one or
    /// two arguments); user functions are resolved in the function
    /// namespace, then the variable namespace (for lambdas bound to
    /// variables). Argument types are checked when both sides are
    /// non-`auto`.
    fn infer_call(&mut self, callee: &Expr, args: &[Expr], span: Span) -> Type {
        if let ExprKind::Identifier(name) = &callee.kind {
            // Record a type for the callee node as well so every
            // expression ends up annotated.
            let callee_ty = self
                .env
                .lookup_function(name)
                .cloned()
                .or_else(|| self.env.lookup_variable(name).map(|info| info.ty.clone()))
                .unwrap_or(Type::Auto);
            self.table.record_expr(callee.id, callee_ty);

            match name.as_str() {
                "print" | "str" => {
                    if args.len() != 1 {
                        self.error(TypeError::argument_count(name, 1, args.len(), span));
                    }
                    for arg in args {
                        self.infer_expr(arg);
                    }
                    return if name == "print" { Type::Void } else { Type::Str };
                }
                "len" => {
                    if args.len() != 1 {
                        self.error(TypeError::argument_count(name, 1, args.len(), span));
                    }
                    for arg in args {
                        let arg_ty = self.infer_expr(arg);
                        if !matches!(arg_ty, Type::Array(_) | Type::Str | Type::Auto) {
                            self.error(TypeError::cannot_assign(
                                &arg_ty,
                                &Type::Array(Box::new(Type::Auto)),
                                arg.span,
                            ));
                        }
                    }
                    return Type::Int;
                }
                "range" => {
                    if args.is_empty() || args.len() > 2 {
                        self.error(TypeError::argument_count(name, 2, args.len(), span));
                    }
                    for arg in args {
                        let arg_ty = self.infer_expr(arg);
                        if !Self::can_assign(&Type::Int, &arg_ty) {
                            self.error(TypeError::cannot_assign(&arg_ty, &Type::Int, arg.span));
                        }
                    }
                    return Type::Array(Box::new(Type::Int));
                }
                _ => {}
            }

            if let Some(fn_ty) = self.env.lookup_function(name).cloned() {
                return self.check_call_signature(name, &fn_ty, args, span);
            }
            if let Some(var_ty) = self.env.lookup_variable(name).map(|info| info.ty.clone()) {
                if matches!(var_ty, Type::Function { .. }) {
                    return self.check_call_signature(name, &var_ty, args, span);
                }
                if var_ty.is_auto() {
                    for arg in args {
                        self.infer_expr(arg);
                    }
                    return Type::Auto;
                }
                self.error(TypeError::not_callable(&var_ty, span));
                for arg in args {
                    self.infer_expr(arg);
                }
                return Type::Auto;
            }

            self.error(TypeError::unbound_function(name, span));
            for arg in args {
                self.infer_expr(arg);
            }
            return Type::Auto;
        }

        // Computed callee: a member access, an index, a lambda, etc.
        let callee_ty = self.infer_expr(callee);
        match callee_ty {
            Type::Function { ref ret, .. } => {
                let fn_ty = callee_ty.clone();
                let ret = (**ret).clone();
                self.check_call_signature("<expression>", &fn_ty, args, span);
                ret
            }
            _ => {
                for arg in args {
                    self.infer_expr(arg);
                }
                Type::Auto
            }
        }
    }

    /// Checks a call against a known function type and returns the
    /// function's return type.
    fn check_call_signature(
        &mut self,
        name: &str,
        fn_ty: &Type,
        args: &[Expr],
        span: Span,
    ) -> Type {
        let Type::Function { params, ret } = fn_ty else {
            return Type::Auto;
        };

        if args.len() != params.len() {
            self.error(TypeError::argument_count(name, params.len(), args.len(), span));
        }

        for (arg, param_ty) in args.iter().zip(params.iter()) {
            let arg_ty = self.infer_expr(arg);
            if !Self::can_assign(param_ty, &arg_ty) {
                self.error(TypeError::cannot_assign(&arg_ty, param_ty, arg.span));
            }
        }
        // Arguments past the declared parameters still get inferred so
        // their nodes carry annotations.
        for arg in args.iter().skip(params.len()) {
            self.infer_expr(arg);
        }

        (**ret).clone()
    }
}
