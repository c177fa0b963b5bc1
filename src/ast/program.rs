//! The program root node.

use super::stmt::Stmt;

/// The root node of a Vela program's AST.
///
/// A `Program` is the ordered sequence of top-level statements, including
/// function, class, and trait declarations.
#[derive(Debug)]
pub struct Program {
    /// The top-level statements in source order.
    pub statements: Vec<Stmt>,
}
