//! Type checking error types.
//!
//! This module defines [`TypeError`], which represents errors discovered
//! during type checking. Unlike lexing and parsing, the checker accumulates
//! every error found in one traversal.

use crate::ast::{BinaryOp, Type, UnaryOp};
use crate::token::Span;

/// The kind of type checking error.
///
/// This enum allows error handling code to match on error types
/// structurally rather than relying on string matching, which is fragile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeErrorKind {
    /// A variable was referenced but never bound.
    UnboundVariable,
    /// A function was called but never declared.
    UnboundFunction,
    /// A class name was used but never declared.
    UnknownClass,
    /// A value of one type cannot initialize or be stored into another.
    TypeMismatch,
    /// An `if` or `while` condition is not `bool`.
    ConditionNotBool,
    /// An operator was applied to operands of the wrong type.
    InvalidOperand,
    /// A call passed the wrong number of arguments.
    ArgumentCount,
    /// A callee expression is not a function.
    NotCallable,
    /// A `const` binding was reassigned.
    ConstReassignment,
}

/// An error that occurred during type checking.
///
/// Contains a human-readable message and optionally the source location
/// where the error occurred. The checker collects these into an ordered
/// list; checking succeeds iff the list is empty.
#[derive(Debug, Clone)]
pub struct TypeError {
    message: String,
    span: Option<Span>,
    kind: TypeErrorKind,
}

impl TypeError {
    /// Creates a new error with a source location.
    pub fn new(kind: TypeErrorKind, message: impl Into<String>, span: Span) -> Self {
        TypeError {
            message: message.into(),
            span: Some(span),
            kind,
        }
    }

    /// Creates an error for an unbound variable reference.
    pub fn unbound_variable(name: &str, span: Span) -> Self {
        Self::new(
            TypeErrorKind::UnboundVariable,
            format!("Unbound variable '{}'", name),
            span,
        )
    }

    /// Creates an error for a call to an undeclared function.
    pub fn unbound_function(name: &str, span: Span) -> Self {
        Self::new(
            TypeErrorKind::UnboundFunction,
            format!("Unbound function '{}'", name),
            span,
        )
    }

    /// Creates an error for a reference to an undeclared class.
    pub fn unknown_class(name: &str, span: Span) -> Self {
        Self::new(
            TypeErrorKind::UnknownClass,
            format!("Unknown class '{}'", name),
            span,
        )
    }

    /// Creates an error for a value that cannot be assigned to a target
    /// type.
    pub fn cannot_assign(source: &Type, target: &Type, span: Span) -> Self {
        Self::new(
            TypeErrorKind::TypeMismatch,
            format!("Cannot assign {} to {}", source, target),
            span,
        )
    }

    /// Creates an error for a non-bool `if`/`while` condition.
    pub fn condition_not_bool(actual: &Type, span: Span) -> Self {
        Self::new(
            TypeErrorKind::ConditionNotBool,
            format!("condition must be bool, got {}", actual),
            span,
        )
    }

    /// Creates an error for a binary operator applied to an operand of the
    /// wrong type.
    pub fn invalid_binary_operand(op: BinaryOp, actual: &Type, span: Span) -> Self {
        Self::new(
            TypeErrorKind::InvalidOperand,
            format!("Operator '{}' cannot be applied to {}", op, actual),
            span,
        )
    }

    /// Creates an error for `**` with a non-integer operand.
    pub fn power_requires_int(actual: &Type, span: Span) -> Self {
        Self::new(
            TypeErrorKind::InvalidOperand,
            format!("Operator '**' requires int operands, got {}", actual),
            span,
        )
    }

    /// Creates an error for a unary operator applied to an operand of the
    /// wrong type.
    pub fn invalid_unary_operand(op: UnaryOp, actual: &Type, span: Span) -> Self {
        Self::new(
            TypeErrorKind::InvalidOperand,
            format!("Operator '{}' cannot be applied to {}", op, actual),
            span,
        )
    }

    /// Creates an error for a call with the wrong number of arguments.
    pub fn argument_count(name: &str, expected: usize, got: usize, span: Span) -> Self {
        Self::new(
            TypeErrorKind::ArgumentCount,
            format!(
                "Function '{}' expects {} argument{}, got {}",
                name,
                expected,
                if expected == 1 { "" } else { "s" },
                got
            ),
            span,
        )
    }

    /// Creates an error for calling a non-function value.
    pub fn not_callable(actual: &Type, span: Span) -> Self {
        Self::new(
            TypeErrorKind::NotCallable,
            format!("Value of type {} is not callable", actual),
            span,
        )
    }

    /// Creates an error for reassigning a `const` binding.
    pub fn const_reassignment(name: &str, span: Span) -> Self {
        Self::new(
            TypeErrorKind::ConstReassignment,
            format!("Cannot reassign const variable '{}'", name),
            span,
        )
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the source location where the error occurred, if available.
    pub fn span(&self) -> Option<Span> {
        self.span
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> TypeErrorKind {
        self.kind
    }
}

impl std::fmt::Display for TypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(span) = &self.span {
            write!(f, "{}:{}: {}", span.line, span.column, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for TypeError {}
