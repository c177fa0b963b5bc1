//! The Vela compiler front-end library.
//!
//! Vela is a statically-typed, ahead-of-time compiled language. This
//! library implements the front-end and lowering pipeline: source text is
//! lexed into tokens, parsed into an immutable AST, type-checked with
//! inference, and lowered into a typed IR module whose textual form a
//! machine-code back-end consumes.
//!
//! The pipeline is strictly linear:
//!
//! ```text
//! source → Lexer → tokens → Parser → AST → TypeChecker → annotations → Lowerer → IR module
//! ```
//!
//! # Modules
//!
//! - [`token`] - Tokens and source spans
//! - [`lexer`] - Lexical analysis
//! - [`ast`] - The AST and the [`Type`](ast::Type) model
//! - [`parser`] - Recursive descent parsing
//! - [`checker`] - Type checking and inference
//! - [`ir`] - The IR module data model and its textual form
//! - [`lower`] - AST-to-IR lowering
//!
//! # Example
//!
//! ```
//! use vela::checker::TypeChecker;
//! use vela::lexer::Lexer;
//! use vela::lower::Lowerer;
//! use vela::parser::Parser;
//!
//! let source = "func main() -> void { print(\"Hello\") }";
//!
//! let mut lexer = Lexer::new(source);
//! let tokens = lexer.tokenize().expect("lex error");
//!
//! let mut parser = Parser::new(tokens);
//! let program = parser.parse().expect("parse error");
//!
//! let table = TypeChecker::new().check(&program).expect("type errors");
//! let module = Lowerer::new(&table).lower(&program).expect("lowering error");
//!
//! assert!(module.to_string().contains("define void @main()"));
//! ```

pub mod ast;
pub mod checker;
pub mod ir;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod token;
