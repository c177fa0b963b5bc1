use std::ops::Range;

use ariadne::{Color, Config, IndexType, Label, Report, ReportKind, Source};
use vela::token::Span;

use crate::driver::CompileError;

fn print_range_report(
    filename: &str,
    source: &str,
    span_range: Range<usize>,
    message: &str,
) -> std::io::Result<()> {
    Report::build(ReportKind::Error, (filename, span_range.clone()))
        .with_config(Config::default().with_index_type(IndexType::Byte))
        .with_message(message)
        .with_label(
            Label::new((filename, span_range))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .eprint((filename, Source::from(source)))
}

fn report_spanned(filename: &str, source: &str, span: Span, message: &str) {
    if let Err(report_err) = print_range_report(filename, source, span.start..span.end, message) {
        eprintln!("Error: {} (at {}:{})", message, span.line, span.column);
        eprintln!("(Failed to display detailed error report: {})", report_err);
    }
}

/// Renders a compilation error against its source file.
///
/// Lex, parse, and lowering errors produce a single labeled report; the
/// type checker's accumulated errors are printed together, one report
/// each. Errors without a span fall back to plain messages.
pub(crate) fn report_error(filename: &str, source: &str, error: &CompileError) {
    match error {
        CompileError::Lex(e) => report_spanned(filename, source, e.span, &e.message),
        CompileError::Parse(e) => report_spanned(filename, source, e.span, &e.message),
        CompileError::Type(errors) => {
            for type_error in errors {
                match type_error.span() {
                    Some(span) => report_spanned(filename, source, span, type_error.message()),
                    None => eprintln!("Error: {}", type_error.message()),
                }
            }
            eprintln!(
                "{} type error{} found",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            );
        }
        CompileError::Lower(e) => match e.span {
            Some(span) => report_spanned(filename, source, span, &e.message),
            None => eprintln!("Error: {}", e.message),
        },
        CompileError::FileRead { .. } | CompileError::FileWrite { .. } => {
            eprintln!("Error: {}", error);
        }
    }
}
