//! Expression nodes for the Vela AST.

use super::decl::Param;
use super::stmt::Stmt;
use super::ExprId;
use crate::token::Span;

/// A binary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition `+`.
    Add,
    /// Subtraction `-`.
    Sub,
    /// Multiplication `*`.
    Mul,
    /// Division `/`.
    Div,
    /// Modulo `%`.
    Mod,
    /// Exponentiation `**`.
    Pow,
    /// Equality `==`.
    Eq,
    /// Inequality `!=`.
    Ne,
    /// Less than `<`.
    Lt,
    /// Greater than `>`.
    Gt,
    /// Less than or equal `<=`.
    Le,
    /// Greater than or equal `>=`.
    Ge,
    /// Logical `and`.
    And,
    /// Logical `or`.
    Or,
}

impl BinaryOp {
    /// Returns `true` for the arithmetic operators `+ - * / % **`.
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOp::Add
                | BinaryOp::Sub
                | BinaryOp::Mul
                | BinaryOp::Div
                | BinaryOp::Mod
                | BinaryOp::Pow
        )
    }

    /// Returns `true` for the comparison operators `== != < > <= >=`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Gt | BinaryOp::Le | BinaryOp::Ge
        )
    }

    /// Returns `true` for `and` and `or`.
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let symbol = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Pow => "**",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::Le => "<=",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
        };
        write!(f, "{}", symbol)
    }
}

/// A unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Arithmetic negation `-`.
    Neg,
    /// Logical negation `not`.
    Not,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "not"),
        }
    }
}

/// An assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// Plain assignment `=`.
    Assign,
    /// Compound addition `+=`.
    AddAssign,
    /// Compound subtraction `-=`.
    SubAssign,
}

impl std::fmt::Display for AssignOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignOp::Assign => write!(f, "="),
            AssignOp::AddAssign => write!(f, "+="),
            AssignOp::SubAssign => write!(f, "-="),
        }
    }
}

/// The body of a lambda expression: either a block or a bare expression.
#[derive(Debug, Clone)]
pub enum LambdaBody {
    /// A braced block body.
    Block(Vec<Stmt>),
    /// A bare expression body.
    Expr(Box<Expr>),
}

/// One case of a match expression.
///
/// Both the pattern and the result are full expressions.
#[derive(Debug, Clone)]
pub struct MatchCase {
    /// The pattern the scrutinee is compared against.
    pub pattern: Expr,
    /// The result produced when the pattern matches.
    pub result: Expr,
}

/// The kind of an expression in the Vela language.
///
/// This enum represents the different types of expressions without
/// source location information. Use [`Expr`] for the full AST node
/// with span and identity.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// An integer literal value.
    Int(i64),

    /// A floating-point literal value.
    Float(f64),

    /// A string literal value.
    ///
    /// The contained `String` is the unescaped content of the literal
    /// (escape sequences have already been processed by the lexer).
    Str(String),

    /// A boolean literal value.
    Bool(bool),

    /// The `null` literal.
    Null,

    /// A variable reference.
    ///
    /// The name must be bound before use; this is verified during type
    /// checking, not parsing.
    Identifier(String),

    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// The left operand.
        left: Box<Expr>,
        /// The right operand.
        right: Box<Expr>,
    },

    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },

    /// A function call expression.
    Call {
        /// The callee expression (an identifier in the common case).
        callee: Box<Expr>,
        /// The arguments passed to the function.
        args: Vec<Expr>,
    },

    /// An array literal `[a, b, c]`.
    Array(Vec<Expr>),

    /// An index access `target[index]`.
    Index {
        /// The indexed expression.
        target: Box<Expr>,
        /// The index expression.
        index: Box<Expr>,
    },

    /// A member access `target.field`.
    Member {
        /// The accessed expression.
        target: Box<Expr>,
        /// The member name.
        field: String,
    },

    /// A lambda expression `|params| body`.
    Lambda {
        /// The parameter list; parameter types default to `auto`.
        params: Vec<Param>,
        /// The declared return type, if any.
        return_type: Option<String>,
        /// The lambda body.
        body: LambdaBody,
    },

    /// A pipeline expression `value |> f |> g`.
    ///
    /// Semantically a left fold of application: `g(f(value))`.
    Pipeline {
        /// The initial value fed into the pipeline.
        value: Box<Expr>,
        /// The callables applied in order.
        stages: Vec<Expr>,
    },

    /// A match expression `match scrutinee { pattern => result, ... }`.
    Match {
        /// The matched value.
        scrutinee: Box<Expr>,
        /// The ordered case list.
        cases: Vec<MatchCase>,
    },

    /// An object literal `ClassName { field = value, ... }`.
    Object {
        /// The class being instantiated.
        class: String,
        /// The ordered field initializers.
        fields: Vec<(String, Expr)>,
    },

    /// An `await` expression.
    ///
    /// The core lowering treats this as a transparent pass-through.
    Await(Box<Expr>),
}

/// An expression in the Vela language with identity and source location.
#[derive(Debug, Clone)]
pub struct Expr {
    /// The parser-assigned identity of this node.
    pub id: ExprId,
    /// The kind of expression.
    pub kind: ExprKind,
    /// The source location of this expression.
    pub span: Span,
}

impl Expr {
    /// Creates a new expression with the given identity, kind, and span.
    pub fn new(id: ExprId, kind: ExprKind, span: Span) -> Self {
        Expr { id, kind, span }
    }
}
