//! Common test utilities for Vela integration tests.
//!
//! This module provides shared helper functions used across the
//! integration test files.

// Each test file is compiled as a separate crate, so not all functions
// are used in every test file. This is expected behavior.
#![allow(dead_code)]

use vela::checker::TypeChecker;
use vela::lexer::Lexer;
use vela::lower::Lowerer;
use vela::parser::Parser;

/// Runs the full pipeline over `source` and returns the textual IR
/// module, or the first phase error rendered as a string.
pub fn compile_to_ir(source: &str) -> Result<String, String> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize().map_err(|e| e.to_string())?;

    let mut parser = Parser::new(tokens);
    let program = parser.parse().map_err(|e| e.to_string())?;

    let table = TypeChecker::new().check(&program).map_err(|errors| {
        errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    })?;

    let module = Lowerer::new(&table)
        .lower(&program)
        .map_err(|e| e.to_string())?;
    Ok(module.to_string())
}

/// Runs lexer, parser, and type checker over `source`, returning the
/// type error messages on failure.
pub fn check_source(source: &str) -> Result<(), Vec<String>> {
    let mut lexer = Lexer::new(source);
    let tokens = lexer.tokenize().map_err(|e| vec![e.to_string()])?;

    let mut parser = Parser::new(tokens);
    let program = parser.parse().map_err(|e| vec![e.to_string()])?;

    TypeChecker::new()
        .check(&program)
        .map(|_| ())
        .map_err(|errors| errors.iter().map(|e| e.to_string()).collect())
}

/// Returns the path to the vela binary built by cargo.
pub fn vela_binary() -> String {
    env!("CARGO_BIN_EXE_vela").to_string()
}

/// Counts non-overlapping occurrences of `needle` in `haystack`.
pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
