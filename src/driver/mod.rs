//! Binary-side pipeline orchestration.
//!
//! The driver reads a source file, runs the front-end phases in order,
//! and unifies their error types for reporting. The lexer and parser
//! fail fast; type errors arrive as the checker's accumulated list.

use vela::checker::{TypeChecker, TypeError, TypeTable};
use vela::ir::Module;
use vela::lexer::{LexError, Lexer};
use vela::lower::{LowerError, Lowerer};
use vela::parser::{ParseError, Parser};

/// A compilation error from any phase of the pipeline.
#[derive(Debug)]
pub(crate) enum CompileError {
    /// A lexical error.
    Lex(LexError),
    /// A syntax error.
    Parse(ParseError),
    /// The type checker's accumulated error list (never empty).
    Type(Vec<TypeError>),
    /// A lowering error.
    Lower(LowerError),
    /// Failed to read the source file.
    FileRead {
        path: String,
        source: std::io::Error,
    },
    /// Failed to write the IR output.
    FileWrite {
        path: String,
        source: std::io::Error,
    },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "{}", e),
            CompileError::Parse(e) => write!(f, "{}", e),
            CompileError::Type(errors) => {
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "{}", error)?;
                }
                Ok(())
            }
            CompileError::Lower(e) => write!(f, "{}", e),
            CompileError::FileRead { path, source } => {
                write!(f, "Failed to read file '{}': {}", path, source)
            }
            CompileError::FileWrite { path, source } => {
                write!(f, "Failed to write file '{}': {}", path, source)
            }
        }
    }
}

/// Context needed to report errors against a source file.
#[derive(Clone)]
pub(crate) struct CompileContext {
    filename: String,
    source: String,
}

impl CompileContext {
    fn new(filename: impl Into<String>, source: impl Into<String>) -> Self {
        CompileContext {
            filename: filename.into(),
            source: source.into(),
        }
    }

    /// Combines this context with an error to create a reportable error.
    fn with_error(self, error: CompileError) -> CompileErrorWithContext {
        CompileErrorWithContext {
            context: self,
            error,
        }
    }
}

/// A compilation error with the context needed for reporting.
pub(crate) struct CompileErrorWithContext {
    context: CompileContext,
    error: CompileError,
}

impl CompileErrorWithContext {
    pub(crate) fn filename(&self) -> &str {
        &self.context.filename
    }

    pub(crate) fn source(&self) -> &str {
        &self.context.source
    }

    pub(crate) fn error(&self) -> &CompileError {
        &self.error
    }
}

/// Runs lexing, parsing, and type checking over a source string.
fn front_end(source: &str) -> Result<(vela::ast::Program, TypeTable), CompileError> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize().map_err(CompileError::Lex)?;

    let mut parser = Parser::new(tokens);
    let program = parser.parse().map_err(CompileError::Parse)?;

    let table = TypeChecker::new()
        .check(&program)
        .map_err(CompileError::Type)?;

    Ok((program, table))
}

/// Runs the full pipeline over a source string, producing the IR module.
fn compile_module(source: &str) -> Result<Module, CompileError> {
    let (program, table) = front_end(source)?;
    Lowerer::new(&table)
        .lower(&program)
        .map_err(CompileError::Lower)
}

fn read_source(file: &str) -> Result<String, Box<CompileErrorWithContext>> {
    std::fs::read_to_string(file).map_err(|e| {
        Box::new(CompileContext::new(file, "").with_error(CompileError::FileRead {
            path: file.to_string(),
            source: e,
        }))
    })
}

/// Runs lexer, parser, and type checker over a file; exit code 0 iff no
/// errors.
pub(crate) fn check(file: &str) -> Result<(), Box<CompileErrorWithContext>> {
    let source = read_source(file)?;
    let context = CompileContext::new(file, source.clone());

    front_end(&source)
        .map(|_| ())
        .map_err(|e| Box::new(context.with_error(e)))
}

/// Runs the full pipeline over a file and writes the textual IR module
/// to `output`, or to stdout when no output path is given.
pub(crate) fn emit(file: &str, output: Option<&str>) -> Result<(), Box<CompileErrorWithContext>> {
    let source = read_source(file)?;
    let context = CompileContext::new(file, source.clone());

    let module = compile_module(&source).map_err(|e| Box::new(context.clone().with_error(e)))?;
    let text = module.to_string();

    match output {
        Some(path) => std::fs::write(path, text).map_err(|e| {
            Box::new(context.with_error(CompileError::FileWrite {
                path: path.to_string(),
                source: e,
            }))
        })?,
        None => print!("{}", text),
    }

    Ok(())
}
