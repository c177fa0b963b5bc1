//! Lowering error types.

use crate::token::Span;

/// The kind of lowering error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowerErrorKind {
    /// A name could not be resolved to a slot or function.
    ///
    /// After a successful type check this indicates a checker bug.
    UnresolvedName,
    /// A construct the core lowering does not support.
    Unsupported,
    /// An internal inconsistency, e.g. a missing type annotation.
    Internal,
}

/// An error that occurred during IR lowering.
///
/// The lowerer assumes a clean type-checked AST: unresolved names are
/// fatal internal inconsistencies, while [`Unsupported`] errors mark
/// surface the language admits but the core lowering deliberately rejects
/// instead of emitting silent no-ops.
///
/// [`Unsupported`]: LowerErrorKind::Unsupported
#[derive(Debug)]
pub struct LowerError {
    /// A human-readable description of the error.
    pub message: String,
    /// The source location where the error occurred, if available.
    pub span: Option<Span>,
    kind: LowerErrorKind,
}

impl LowerError {
    /// Creates an error for a name with no slot or function binding.
    pub fn unresolved_name(name: &str, span: Span) -> Self {
        LowerError {
            message: format!("Unresolved name '{}' during lowering", name),
            span: Some(span),
            kind: LowerErrorKind::UnresolvedName,
        }
    }

    /// Creates an error for a construct outside the core lowering.
    pub fn unsupported(what: &str, span: Span) -> Self {
        LowerError {
            message: format!("{} is not supported by the core lowering", what),
            span: Some(span),
            kind: LowerErrorKind::Unsupported,
        }
    }

    /// Creates an error for a built-in the IR has no runtime for.
    pub fn builtin_not_lowered(name: &str, span: Span) -> Self {
        LowerError {
            message: format!(
                "Built-in '{}' has no runtime support in the core lowering",
                name
            ),
            span: Some(span),
            kind: LowerErrorKind::Unsupported,
        }
    }

    /// Creates the explicit error for `for` loops, which are parsed and
    /// type-checked but await an iterator protocol design.
    pub fn for_not_implemented(span: Span) -> Self {
        LowerError {
            message: "for loops are not yet implemented in the lowering".to_string(),
            span: Some(span),
            kind: LowerErrorKind::Unsupported,
        }
    }

    /// Creates an internal-inconsistency error.
    pub fn internal(message: impl Into<String>) -> Self {
        LowerError {
            message: message.into(),
            span: None,
            kind: LowerErrorKind::Internal,
        }
    }

    /// Returns the kind of error.
    pub fn kind(&self) -> LowerErrorKind {
        self.kind
    }
}

impl std::fmt::Display for LowerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(span) = &self.span {
            write!(f, "{}:{}: {}", span.line, span.column, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for LowerError {}
