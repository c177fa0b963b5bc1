use super::*;

/// Helper function to tokenize input and return only the kinds.
fn tokenize_kinds(input: &str) -> Vec<TokenKind> {
    let mut lexer = Lexer::new(input);
    lexer
        .tokenize()
        .unwrap_or_else(|e| panic!("Tokenization failed for input {:?}: {}", input, e))
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

/// Helper function to tokenize input and return the error.
fn tokenize_error(input: &str) -> LexError {
    let mut lexer = Lexer::new(input);
    match lexer.tokenize() {
        Ok(tokens) => panic!(
            "Expected tokenization to fail for input {:?}, but it succeeded with {} tokens",
            input,
            tokens.len()
        ),
        Err(e) => e,
    }
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

// ===================
// Basic tokens
// ===================

#[test]
fn test_empty_input() {
    let kinds = tokenize_kinds("");
    assert_eq!(kinds, vec![TokenKind::Eof]);
}

#[test]
fn test_whitespace_only() {
    let kinds = tokenize_kinds("   \t\r");
    assert_eq!(kinds, vec![TokenKind::Eof]);
}

#[test]
fn test_newlines_are_preserved() {
    let kinds = tokenize_kinds("\n\n");
    assert_eq!(
        kinds,
        vec![TokenKind::Newline, TokenKind::Newline, TokenKind::Eof]
    );
}

#[test]
fn test_delimiters() {
    let kinds = tokenize_kinds("(){}[],;:.?");
    assert_eq!(
        kinds,
        vec![
            TokenKind::LeftParen,
            TokenKind::RightParen,
            TokenKind::LeftBrace,
            TokenKind::RightBrace,
            TokenKind::LeftBracket,
            TokenKind::RightBracket,
            TokenKind::Comma,
            TokenKind::Semicolon,
            TokenKind::Colon,
            TokenKind::Dot,
            TokenKind::Question,
            TokenKind::Eof
        ]
    );
}

// ===================
// Numbers
// ===================

#[test]
fn test_int_literal() {
    let kinds = tokenize_kinds("42");
    assert_eq!(kinds, vec![TokenKind::Int(42), TokenKind::Eof]);
}

#[test]
fn test_int_literal_zero() {
    let kinds = tokenize_kinds("0");
    assert_eq!(kinds, vec![TokenKind::Int(0), TokenKind::Eof]);
}

#[test]
fn test_int_literal_i64_max() {
    let kinds = tokenize_kinds("9223372036854775807");
    assert_eq!(kinds, vec![TokenKind::Int(i64::MAX), TokenKind::Eof]);
}

#[test]
fn test_int_literal_too_large() {
    let err = tokenize_error("9223372036854775808");
    assert!(err.message.contains("out of range"));
}

#[test]
fn test_float_literal() {
    let kinds = tokenize_kinds("3.14");
    assert_eq!(kinds, vec![TokenKind::Float(3.14), TokenKind::Eof]);
}

#[test]
fn test_float_single_dot_promotes() {
    let kinds = tokenize_kinds("1.0");
    assert!(matches!(kinds[0], TokenKind::Float(v) if v == 1.0));
}

#[test]
fn test_second_dot_terminates_number() {
    // `1.2.3` lexes as float 1.2 followed by `.` and int 3.
    let kinds = tokenize_kinds("1.2.3");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Float(1.2),
            TokenKind::Dot,
            TokenKind::Int(3),
            TokenKind::Eof
        ]
    );
}

// ===================
// Strings
// ===================

#[test]
fn test_string_double_quoted() {
    let kinds = tokenize_kinds(r#""hello""#);
    assert_eq!(
        kinds,
        vec![TokenKind::Str("hello".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_string_single_quoted() {
    let kinds = tokenize_kinds("'hello'");
    assert_eq!(
        kinds,
        vec![TokenKind::Str("hello".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_string_empty() {
    let kinds = tokenize_kinds(r#""""#);
    assert_eq!(kinds, vec![TokenKind::Str("".to_string()), TokenKind::Eof]);
}

#[test]
fn test_string_escapes() {
    let kinds = tokenize_kinds(r#""a\nb\tc\\d""#);
    assert_eq!(
        kinds,
        vec![TokenKind::Str("a\nb\tc\\d".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_string_escaped_matching_quote() {
    let kinds = tokenize_kinds(r#""a\"b""#);
    assert_eq!(
        kinds,
        vec![TokenKind::Str("a\"b".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_string_other_quote_inside() {
    // A single quote needs no escape inside a double-quoted string.
    let kinds = tokenize_kinds(r#""it's""#);
    assert_eq!(
        kinds,
        vec![TokenKind::Str("it's".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_string_unknown_escape_passes_through() {
    let kinds = tokenize_kinds(r#""a\qb""#);
    assert_eq!(
        kinds,
        vec![TokenKind::Str("aqb".to_string()), TokenKind::Eof]
    );
}

#[test]
fn test_string_unterminated() {
    let err = tokenize_error(r#""hello"#);
    assert!(err.message.contains("Unterminated string"));
}

#[test]
fn test_string_unterminated_after_backslash() {
    let err = tokenize_error(r#""hello\"#);
    assert!(err.message.contains("Unterminated string"));
}

// ===================
// Identifiers and keywords
// ===================

#[test]
fn test_identifier_simple() {
    let kinds = tokenize_kinds("main");
    assert_eq!(kinds, vec![ident("main"), TokenKind::Eof]);
}

#[test]
fn test_identifier_with_underscore() {
    let kinds = tokenize_kinds("_private my_var x1");
    assert_eq!(
        kinds,
        vec![ident("_private"), ident("my_var"), ident("x1"), TokenKind::Eof]
    );
}

#[test]
fn test_keywords() {
    let kinds = tokenize_kinds("func return if else while for in break continue");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Func,
            TokenKind::Return,
            TokenKind::If,
            TokenKind::Else,
            TokenKind::While,
            TokenKind::For,
            TokenKind::In,
            TokenKind::Break,
            TokenKind::Continue,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_type_keywords() {
    let kinds = tokenize_kinds("int float str bool void auto");
    assert_eq!(
        kinds,
        vec![
            TokenKind::IntType,
            TokenKind::FloatType,
            TokenKind::StrType,
            TokenKind::BoolType,
            TokenKind::VoidType,
            TokenKind::AutoType,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_literal_keywords() {
    let kinds = tokenize_kinds("true false null");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Bool(true),
            TokenKind::Bool(false),
            TokenKind::Null,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_keyword_prefix_is_identifier() {
    let kinds = tokenize_kinds("iffy formal classic");
    assert_eq!(
        kinds,
        vec![ident("iffy"), ident("formal"), ident("classic"), TokenKind::Eof]
    );
}

// ===================
// Operators
// ===================

#[test]
fn test_single_char_operators() {
    let kinds = tokenize_kinds("+ - * / % = < >");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Assign,
            TokenKind::LessThan,
            TokenKind::GreaterThan,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_two_char_operators() {
    let kinds = tokenize_kinds("== != <= >= += -= -> => |> **");
    assert_eq!(
        kinds,
        vec![
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
            TokenKind::PlusAssign,
            TokenKind::MinusAssign,
            TokenKind::Arrow,
            TokenKind::FatArrow,
            TokenKind::PipeForward,
            TokenKind::Power,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_power_vs_star() {
    let kinds = tokenize_kinds("a ** b * c");
    assert_eq!(
        kinds,
        vec![
            ident("a"),
            TokenKind::Power,
            ident("b"),
            TokenKind::Star,
            ident("c"),
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_pipe_alone() {
    let kinds = tokenize_kinds("|x|");
    assert_eq!(
        kinds,
        vec![TokenKind::Pipe, ident("x"), TokenKind::Pipe, TokenKind::Eof]
    );
}

#[test]
fn test_bang_alone_is_error() {
    let err = tokenize_error("!");
    assert!(err.message.contains("Unexpected character"));
}

// ===================
// Comments
// ===================

#[test]
fn test_comment_only() {
    let kinds = tokenize_kinds("# just a comment");
    assert_eq!(kinds, vec![TokenKind::Eof]);
}

#[test]
fn test_comment_preserves_newline() {
    let kinds = tokenize_kinds("a # comment\nb");
    assert_eq!(
        kinds,
        vec![ident("a"), TokenKind::Newline, ident("b"), TokenKind::Eof]
    );
}

#[test]
fn test_comments_and_whitespace_only() {
    let kinds = tokenize_kinds("  # one\n# two\n  ");
    assert_eq!(
        kinds,
        vec![TokenKind::Newline, TokenKind::Newline, TokenKind::Eof]
    );
}

// ===================
// Compound input
// ===================

#[test]
fn test_function_header() {
    let kinds = tokenize_kinds("func add(a: int, b: int) -> int");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Func,
            ident("add"),
            TokenKind::LeftParen,
            ident("a"),
            TokenKind::Colon,
            TokenKind::IntType,
            TokenKind::Comma,
            ident("b"),
            TokenKind::Colon,
            TokenKind::IntType,
            TokenKind::RightParen,
            TokenKind::Arrow,
            TokenKind::IntType,
            TokenKind::Eof
        ]
    );
}

#[test]
fn test_windows_line_endings() {
    let kinds = tokenize_kinds("a\r\nb");
    assert_eq!(
        kinds,
        vec![ident("a"), TokenKind::Newline, ident("b"), TokenKind::Eof]
    );
}

// ===================
// Span verification
// ===================

#[test]
fn test_span_positions() {
    let mut lexer = Lexer::new("foo");
    let tokens = lexer.tokenize().unwrap();

    assert_eq!(tokens[0].span.start, 0);
    assert_eq!(tokens[0].span.end, 3);
    assert_eq!(tokens[0].span.line, 1);
    assert_eq!(tokens[0].span.column, 1);
}

#[test]
fn test_span_multiline() {
    let mut lexer = Lexer::new("a\nb");
    let tokens = lexer.tokenize().unwrap();

    // 'a' on line 1, newline, then 'b' on line 2.
    assert_eq!(tokens[0].span.line, 1);
    assert_eq!(tokens[2].span.line, 2);
    assert_eq!(tokens[2].span.column, 1);
}

#[test]
fn test_error_span_location() {
    let err = tokenize_error("foo @");
    assert_eq!(err.span.start, 4);
    assert_eq!(err.span.column, 5);
}

#[test]
fn test_lex_error_display() {
    let err = tokenize_error("@");
    let display = format!("{}", err);
    assert!(display.contains("1:1"));
    assert!(display.contains("Unexpected character"));
}
