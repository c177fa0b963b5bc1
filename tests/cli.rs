//! End-to-end tests driving the `vela` binary.

mod common;

use std::fs;
use std::process::Command;

use common::vela_binary;
use tempfile::tempdir;

fn write_source(dir: &std::path::Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write source file");
    path
}

#[test]
fn test_check_succeeds_on_valid_program() {
    let dir = tempdir().unwrap();
    let source = write_source(dir.path(), "ok.vela", "func main() -> void { print(\"hi\") }");

    let status = Command::new(vela_binary())
        .arg("check")
        .arg(&source)
        .status()
        .expect("run vela check");
    assert!(status.success());
}

#[test]
fn test_check_fails_on_type_error() {
    let dir = tempdir().unwrap();
    let source = write_source(dir.path(), "bad.vela", "bool b = 5");

    let output = Command::new(vela_binary())
        .arg("check")
        .arg(&source)
        .output()
        .expect("run vela check");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Cannot assign int to bool"));
}

#[test]
fn test_check_fails_on_missing_file() {
    let output = Command::new(vela_binary())
        .arg("check")
        .arg("does-not-exist.vela")
        .output()
        .expect("run vela check");
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read file"));
}

#[test]
fn test_emit_writes_ir_to_stdout() {
    let dir = tempdir().unwrap();
    let source = write_source(
        dir.path(),
        "hello.vela",
        "func main() -> void { print(\"Hello\") }",
    );

    let output = Command::new(vela_binary())
        .arg("emit")
        .arg(&source)
        .output()
        .expect("run vela emit");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("; ModuleID = 'vela_module'"));
    assert!(stdout.contains("define void @main()"));
    assert!(stdout.contains("call i32 (i8*, ...) @printf"));
}

#[test]
fn test_emit_writes_ir_to_output_file() {
    let dir = tempdir().unwrap();
    let source = write_source(
        dir.path(),
        "add.vela",
        "func add(a: int, b: int) -> int { return a + b }",
    );
    let out_path = dir.path().join("add.ll");

    let status = Command::new(vela_binary())
        .arg("emit")
        .arg(&source)
        .arg("-o")
        .arg(&out_path)
        .status()
        .expect("run vela emit");
    assert!(status.success());

    let ir = fs::read_to_string(&out_path).expect("read emitted IR");
    assert!(ir.contains("define i64 @add(i64 %a, i64 %b)"));
}

#[test]
fn test_emit_fails_on_parse_error_with_nonzero_exit() {
    let dir = tempdir().unwrap();
    let source = write_source(dir.path(), "broken.vela", "func main( {");

    let output = Command::new(vela_binary())
        .arg("emit")
        .arg(&source)
        .output()
        .expect("run vela emit");
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}
