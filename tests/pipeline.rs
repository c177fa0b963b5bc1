//! End-to-end pipeline tests: source text in, textual IR module out.
//!
//! Each test drives the whole front-end (lexer, parser, type checker,
//! lowerer) through the public library API and inspects the emitted
//! module text.

mod common;

use common::{compile_to_ir, count};

#[test]
fn test_hello_world_module() {
    let ir = compile_to_ir("func main() -> void { print(\"Hello\") }").unwrap();

    // One NUL-terminated string global, one %s format global.
    assert!(ir.contains("@.str.0 = internal constant [6 x i8] c\"Hello\\00\""));
    assert!(ir.contains("@.fmt.0 = internal constant [4 x i8] c\"%s\\0A\\00\""));

    // main is void(), with two i8* bitcasts and one printf call.
    assert!(ir.contains("define void @main() {"));
    assert_eq!(count(&ir, "bitcast"), 2);
    assert_eq!(count(&ir, "@printf("), 2); // the declare and the call
    assert!(ir.contains("call i32 (i8*, ...) @printf"));
    assert!(ir.contains("ret void"));
}

#[test]
fn test_module_declares_c_interop_externs() {
    let ir = compile_to_ir("func main() -> void { }").unwrap();
    assert!(ir.contains("; ModuleID = 'vela_module'"));
    assert!(ir.contains("declare i32 @printf(i8*, ...)"));
    assert!(ir.contains("declare i8* @malloc(i64)"));
    assert!(ir.contains("declare void @free(i8*)"));
}

#[test]
fn test_add_function() {
    let ir = compile_to_ir("func add(a: int, b: int) -> int { return a + b }").unwrap();

    assert!(ir.contains("define i64 @add(i64 %a, i64 %b) {"));
    // The entry block allocates a slot per parameter and stores the
    // incoming arguments.
    assert!(ir.contains("%a.addr = alloca i64"));
    assert!(ir.contains("%b.addr = alloca i64"));
    assert!(ir.contains("store i64 %a, i64* %a.addr"));
    assert!(ir.contains("store i64 %b, i64* %b.addr"));
    assert!(ir.contains("add i64"));
    assert!(ir.contains("ret i64"));
}

#[test]
fn test_local_mutation() {
    let ir = compile_to_ir("func f() -> int { auto x = 2\nx = x + 3\nreturn x }").unwrap();

    // One slot for x: initial store, load/add/store, load/ret.
    assert_eq!(count(&ir, "alloca"), 1);
    assert!(ir.contains("store i64 2, i64* %x.addr"));
    assert!(ir.contains("add i64 %0, 3"));
    assert_eq!(count(&ir, "load i64, i64* %x.addr"), 2);
}

#[test]
fn test_early_return_branches() {
    let ir = compile_to_ir("func g(n: int) -> int { if n < 0 { return 0 } return n * n }").unwrap();

    assert!(ir.contains("icmp slt i64"));
    assert!(ir.contains("br i1"));
    // Two returns: one per path.
    assert_eq!(count(&ir, "ret i64"), 2);
}

#[test]
fn test_while_loop_blocks() {
    let ir = compile_to_ir("func loop() -> void { auto i = 0\nwhile i < 3 { i = i + 1 } }").unwrap();

    assert!(ir.contains("while.cond:"));
    assert!(ir.contains("while.body:"));
    assert!(ir.contains("while.end:"));
    // The entry branches to the condition and the body branches back.
    assert_eq!(count(&ir, "br label %while.cond"), 2);
    assert!(ir.contains("label %while.body, label %while.end"));
}

#[test]
fn test_widening_initialization() {
    // int-to-float widening checks clean and lowers through a float slot.
    let ir = compile_to_ir("auto x = 1\nfloat y = x").unwrap();
    assert!(ir.contains("define void @vela.module_init()"));
    assert!(ir.contains("%y.addr = alloca double"));
    assert!(ir.contains("sitofp i64 %0 to double"));
}

#[test]
fn test_print_formats_by_type() {
    let ir = compile_to_ir(
        "func main() -> void { print(7)\nprint(2.5)\nprint(true)\nprint(\"s\") }",
    )
    .unwrap();

    assert!(ir.contains("c\"%ld\\0A\\00\""));
    assert!(ir.contains("c\"%f\\0A\\00\""));
    assert!(ir.contains("c\"%s\\0A\\00\""));
    assert!(ir.contains("zext i1 true to i64"));
    // %ld is shared between the int and bool prints.
    assert_eq!(count(&ir, "c\"%ld\\0A\\00\""), 1);
}

#[test]
fn test_exponentiation_uses_power_routine() {
    let ir = compile_to_ir("func p(n: int) -> int { return n ** 3 }").unwrap();
    assert!(ir.contains("define i64 @vela.powi(i64 %base, i64 %exp)"));
    assert!(ir.contains("call i64 @vela.powi"));
    // The routine is a real loop, not a single multiply.
    assert!(ir.contains("pow.cond:"));
    assert!(ir.contains("pow.body:"));
}

#[test]
fn test_short_circuit_and() {
    let ir = compile_to_ir("func f(a: bool, b: bool) -> bool { return a and b }").unwrap();
    assert!(ir.contains("and.rhs:"));
    assert!(ir.contains("and.end:"));
    assert!(ir.contains("%and.addr = alloca i1"));
}

#[test]
fn test_pipeline_application_order() {
    let ir = compile_to_ir(
        "func inc(n: int) -> int { return n + 1 }\nfunc double(n: int) -> int { return n * 2 }\nfunc main() -> void { print(1 |> inc |> double) }",
    )
    .unwrap();

    // v |> inc |> double is double(inc(v)).
    let inc_at = ir.find("call i64 @inc(i64 1)").expect("inc applied first");
    let double_at = ir.find("call i64 @double(i64 %0)").expect("double applied second");
    assert!(inc_at < double_at);
}

#[test]
fn test_functions_keep_source_order() {
    let ir = compile_to_ir("func a() -> void { }\nfunc b() -> void { }\nfunc main() -> void { a()\nb() }")
        .unwrap();
    let a_at = ir.find("define void @a()").unwrap();
    let b_at = ir.find("define void @b()").unwrap();
    let main_at = ir.find("define void @main()").unwrap();
    assert!(a_at < b_at);
    assert!(b_at < main_at);
}

#[test]
fn test_nested_if_else_chain() {
    let ir = compile_to_ir(
        "func sign(n: int) -> int { if n < 0 { return 0 - 1 } else if n == 0 { return 0 } else { return 1 } }",
    )
    .unwrap();
    assert!(ir.contains("if.then:"));
    assert!(ir.contains("if.else:"));
    assert_eq!(count(&ir, "ret i64"), 4); // three arms plus the outer fall-off
}

#[test]
fn test_recursive_function() {
    let ir = compile_to_ir(
        "func fact(n: int) -> int { if n < 2 { return 1 } return n * fact(n - 1) }",
    )
    .unwrap();
    assert!(ir.contains("call i64 @fact"));
}

#[test]
fn test_fall_off_void_function_returns() {
    let ir = compile_to_ir("func f() -> void { auto x = 1 }").unwrap();
    assert!(ir.contains("ret void"));
}

#[test]
fn test_fall_off_int_function_returns_zero() {
    let ir = compile_to_ir("func f() -> int { auto x = 1 }").unwrap();
    assert!(ir.contains("ret i64 0"));
}

#[test]
fn test_empty_source_produces_externs_only_module() {
    let ir = compile_to_ir("").unwrap();
    assert!(ir.contains("declare i32 @printf(i8*, ...)"));
    assert!(!ir.contains("define"));
}

#[test]
fn test_comments_and_whitespace_only_source() {
    let ir = compile_to_ir("# greeting program\n\n   # nothing else\n").unwrap();
    assert!(!ir.contains("define"));
}

#[test]
fn test_larger_program_compiles() {
    let source = r#"# sum the integers below a bound
func sum_below(n: int) -> int {
    auto total = 0
    auto i = 0
    while i < n {
        total += i
        i = i + 1
    }
    return total
}

func main() -> void {
    const int bound = 10
    print(sum_below(bound))
}
"#;
    let ir = compile_to_ir(source).unwrap();
    assert!(ir.contains("define i64 @sum_below(i64 %n)"));
    assert!(ir.contains("define void @main()"));
    assert!(ir.contains("while.cond"));
}
