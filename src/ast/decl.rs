//! Function, class, and trait declarations for the Vela AST.

use super::expr::Expr;
use super::stmt::Stmt;
use crate::token::Span;

/// A single function or lambda parameter.
#[derive(Debug, Clone)]
pub struct Param {
    /// The parameter name. Names are unique within one parameter list;
    /// the parser enforces this.
    pub name: String,
    /// The declared type string (`auto` when omitted in lambdas).
    pub type_name: String,
    /// The source location of the parameter.
    pub span: Span,
}

/// A function declaration.
///
/// Functions appear at the top level, inside other functions, as class
/// methods, and (without a body) as trait method signatures.
#[derive(Debug, Clone)]
pub struct FuncDecl {
    /// The function name.
    pub name: String,
    /// The ordered parameter list.
    pub params: Vec<Param>,
    /// The declared return type string; defaults to `void` when the
    /// arrow clause is omitted.
    pub return_type: String,
    /// The body statements. `None` for trait method signatures.
    pub body: Option<Vec<Stmt>>,
    /// Whether the function was declared `async`.
    pub is_async: bool,
    /// The source location of the declaration.
    pub span: Span,
}

/// A field declaration inside a class body.
#[derive(Debug, Clone)]
pub struct FieldDecl {
    /// The field name. Names are unique within one class; the parser
    /// enforces this.
    pub name: String,
    /// The declared type string, if any.
    pub declared_type: Option<String>,
    /// The field initializer, if any.
    pub init: Option<Expr>,
    /// The source location of the field.
    pub span: Span,
}

/// A class declaration.
#[derive(Debug, Clone)]
pub struct ClassDecl {
    /// The class name.
    pub name: String,
    /// The ordered field list.
    pub fields: Vec<FieldDecl>,
    /// The ordered method list.
    pub methods: Vec<FuncDecl>,
    /// The traits the class declares after a colon, e.g. `class C: T1, T2`.
    pub traits: Vec<String>,
    /// The source location of the declaration.
    pub span: Span,
}

/// A trait declaration.
///
/// Trait methods are signatures only; their `body` is always `None`.
#[derive(Debug, Clone)]
pub struct TraitDecl {
    /// The trait name.
    pub name: String,
    /// The ordered method signature list.
    pub methods: Vec<FuncDecl>,
    /// The source location of the declaration.
    pub span: Span,
}
