use super::*;
use crate::token::Span;

fn span() -> Span {
    Span::new(0, 0, 1, 1)
}

fn expr(id: u32, kind: ExprKind) -> Expr {
    Expr::new(ExprId(id), kind, span())
}

#[test]
fn test_expr_int_literal() {
    let e = expr(0, ExprKind::Int(42));
    assert!(matches!(e.kind, ExprKind::Int(42)));
}

#[test]
fn test_expr_binary_has_two_children() {
    let e = expr(
        2,
        ExprKind::Binary {
            op: BinaryOp::Add,
            left: Box::new(expr(0, ExprKind::Int(1))),
            right: Box::new(expr(1, ExprKind::Int(2))),
        },
    );
    match e.kind {
        ExprKind::Binary { op, left, right } => {
            assert_eq!(op, BinaryOp::Add);
            assert!(matches!(left.kind, ExprKind::Int(1)));
            assert!(matches!(right.kind, ExprKind::Int(2)));
        }
        _ => panic!("Expected Binary"),
    }
}

#[test]
fn test_expr_call_with_args() {
    let e = expr(
        2,
        ExprKind::Call {
            callee: Box::new(expr(0, ExprKind::Identifier("print".to_string()))),
            args: vec![expr(1, ExprKind::Str("hi".to_string()))],
        },
    );
    match e.kind {
        ExprKind::Call { callee, args } => {
            assert!(matches!(callee.kind, ExprKind::Identifier(ref s) if s == "print"));
            assert_eq!(args.len(), 1);
        }
        _ => panic!("Expected Call"),
    }
}

#[test]
fn test_expr_ids_key_side_tables() {
    let a = expr(7, ExprKind::Null);
    let b = expr(8, ExprKind::Null);
    assert_ne!(a.id, b.id);
    assert_eq!(a.id, ExprId(7));
}

#[test]
fn test_stmt_var_decl() {
    let stmt = Stmt::new(
        StmtId(0),
        StmtKind::VarDecl {
            name: "x".to_string(),
            declared_type: Some("int".to_string()),
            init: Some(expr(0, ExprKind::Int(1))),
            is_const: false,
        },
        span(),
    );
    match stmt.kind {
        StmtKind::VarDecl {
            name,
            declared_type,
            init,
            is_const,
        } => {
            assert_eq!(name, "x");
            assert_eq!(declared_type.as_deref(), Some("int"));
            assert!(init.is_some());
            assert!(!is_const);
        }
        _ => panic!("Expected VarDecl"),
    }
}

#[test]
fn test_program_holds_statements_in_order() {
    let program = Program {
        statements: vec![
            Stmt::new(StmtId(0), StmtKind::Break, span()),
            Stmt::new(StmtId(1), StmtKind::Continue, span()),
        ],
    };
    assert_eq!(program.statements.len(), 2);
    assert!(matches!(program.statements[0].kind, StmtKind::Break));
    assert!(matches!(program.statements[1].kind, StmtKind::Continue));
}

#[test]
fn test_trait_methods_have_no_body() {
    let decl = TraitDecl {
        name: "Greeter".to_string(),
        methods: vec![FuncDecl {
            name: "greet".to_string(),
            params: vec![],
            return_type: "void".to_string(),
            body: None,
            is_async: false,
            span: span(),
        }],
        span: span(),
    };
    assert!(decl.methods[0].body.is_none());
}

#[test]
fn test_binary_op_display() {
    assert_eq!(BinaryOp::Add.to_string(), "+");
    assert_eq!(BinaryOp::Pow.to_string(), "**");
    assert_eq!(BinaryOp::And.to_string(), "and");
}

#[test]
fn test_assign_op_display() {
    assert_eq!(AssignOp::Assign.to_string(), "=");
    assert_eq!(AssignOp::AddAssign.to_string(), "+=");
    assert_eq!(AssignOp::SubAssign.to_string(), "-=");
}

#[test]
fn test_expr_clone() {
    let original = expr(
        1,
        ExprKind::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(expr(0, ExprKind::Int(5))),
        },
    );
    let cloned = original.clone();
    assert_eq!(original.id, cloned.id);
    assert!(matches!(cloned.kind, ExprKind::Unary { op: UnaryOp::Neg, .. }));
}
