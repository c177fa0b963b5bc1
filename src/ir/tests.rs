use super::*;

// ===================
// Types and values
// ===================

#[test]
fn test_type_display() {
    assert_eq!(IrType::I64.to_string(), "i64");
    assert_eq!(IrType::F64.to_string(), "double");
    assert_eq!(IrType::i8_ptr().to_string(), "i8*");
    assert_eq!(IrType::ptr(IrType::I64).to_string(), "i64*");
    assert_eq!(
        IrType::Array(6, Box::new(IrType::I8)).to_string(),
        "[6 x i8]"
    );
}

#[test]
fn test_value_display() {
    assert_eq!(Value::Temp(3).to_string(), "%3");
    assert_eq!(Value::Slot("x.addr".to_string()).to_string(), "%x.addr");
    assert_eq!(Value::Global(".str.0".to_string()).to_string(), "@.str.0");
    assert_eq!(Value::ConstInt(-7).to_string(), "-7");
    assert_eq!(Value::ConstBool(true).to_string(), "true");
    assert_eq!(Value::NullPtr.to_string(), "null");
}

#[test]
fn test_format_double() {
    assert_eq!(format_double(2.0), "2.000000e+00");
    assert_eq!(format_double(0.0), "0.000000e+00");
    assert_eq!(format_double(-1.5), "-1.500000e+00");
    assert_eq!(format_double(0.25), "2.500000e-01");
    assert_eq!(format_double(1234.5), "1.234500e+03");
}

// ===================
// Globals
// ===================

#[test]
fn test_global_display_with_nul() {
    let global = Global {
        name: ".str.0".to_string(),
        bytes: b"Hello\0".to_vec(),
    };
    assert_eq!(
        global.to_string(),
        "@.str.0 = internal constant [6 x i8] c\"Hello\\00\""
    );
}

#[test]
fn test_global_display_escapes_newline() {
    let global = Global {
        name: ".fmt.0".to_string(),
        bytes: b"%s\n\0".to_vec(),
    };
    assert_eq!(
        global.to_string(),
        "@.fmt.0 = internal constant [4 x i8] c\"%s\\0A\\00\""
    );
}

// ===================
// Instructions
// ===================

#[test]
fn test_instr_display_core() {
    let alloca = Instr::Alloca {
        dest: Value::Slot("x.addr".to_string()),
        ty: IrType::I64,
    };
    assert_eq!(alloca.to_string(), "%x.addr = alloca i64");

    let load = Instr::Load {
        dest: Value::Temp(0),
        ty: IrType::I64,
        ptr: Value::Slot("x.addr".to_string()),
    };
    assert_eq!(load.to_string(), "%0 = load i64, i64* %x.addr");

    let store = Instr::Store {
        ty: IrType::I64,
        value: Value::ConstInt(2),
        ptr: Value::Slot("x.addr".to_string()),
    };
    assert_eq!(store.to_string(), "store i64 2, i64* %x.addr");

    let add = Instr::Bin {
        dest: Value::Temp(1),
        op: BinOp::Add,
        ty: IrType::I64,
        lhs: Value::Temp(0),
        rhs: Value::ConstInt(3),
    };
    assert_eq!(add.to_string(), "%1 = add i64 %0, 3");

    let cmp = Instr::ICmp {
        dest: Value::Temp(2),
        pred: ICmpPred::Slt,
        ty: IrType::I64,
        lhs: Value::Temp(1),
        rhs: Value::ConstInt(0),
    };
    assert_eq!(cmp.to_string(), "%2 = icmp slt i64 %1, 0");
}

#[test]
fn test_variadic_call_display() {
    let call = Instr::Call {
        dest: Some(Value::Temp(2)),
        ret: IrType::I32,
        callee: "printf".to_string(),
        args: vec![
            (IrType::i8_ptr(), Value::Temp(0)),
            (IrType::i8_ptr(), Value::Temp(1)),
        ],
        variadic_params: Some(vec![IrType::i8_ptr()]),
    };
    assert_eq!(
        call.to_string(),
        "%2 = call i32 (i8*, ...) @printf(i8* %0, i8* %1)"
    );
}

#[test]
fn test_void_call_display() {
    let call = Instr::Call {
        dest: None,
        ret: IrType::Void,
        callee: "free".to_string(),
        args: vec![(IrType::i8_ptr(), Value::Temp(0))],
        variadic_params: None,
    };
    assert_eq!(call.to_string(), "call void @free(i8* %0)");
}

#[test]
fn test_terminator_display() {
    assert_eq!(
        Terminator::Br("while.cond".to_string()).to_string(),
        "br label %while.cond"
    );
    assert_eq!(
        Terminator::CondBr {
            cond: Value::Temp(0),
            then_label: "while.body".to_string(),
            else_label: "while.end".to_string(),
        }
        .to_string(),
        "br i1 %0, label %while.body, label %while.end"
    );
    assert_eq!(Terminator::Ret(None).to_string(), "ret void");
    assert_eq!(
        Terminator::Ret(Some((IrType::I64, Value::Temp(3)))).to_string(),
        "ret i64 %3"
    );
}

// ===================
// Functions and modules
// ===================

#[test]
fn test_add_block_makes_labels_unique() {
    let mut func = Function::new("f", vec![], IrType::Void);
    let first = func.add_block("while.cond");
    let second = func.add_block("while.cond");
    assert_eq!(func.blocks[first].label, "while.cond");
    assert_eq!(func.blocks[second].label, "while.cond1");
}

#[test]
fn test_new_temp_increments() {
    let mut func = Function::new("f", vec![], IrType::Void);
    assert_eq!(func.new_temp(), Value::Temp(0));
    assert_eq!(func.new_temp(), Value::Temp(1));
}

#[test]
fn test_function_display() {
    let mut func = Function::new(
        "add",
        vec![
            ("a".to_string(), IrType::I64),
            ("b".to_string(), IrType::I64),
        ],
        IrType::I64,
    );
    let entry = func.add_block("entry");
    func.block_mut(entry).terminator =
        Some(Terminator::Ret(Some((IrType::I64, Value::ConstInt(0)))));

    let text = func.to_string();
    assert!(text.starts_with("define i64 @add(i64 %a, i64 %b) {"));
    assert!(text.contains("entry:"));
    assert!(text.contains("  ret i64 0"));
    assert!(text.ends_with("}"));
}

#[test]
fn test_module_has_fixed_externs() {
    let module = Module::new("vela_module");
    let text = module.to_string();
    assert!(text.contains("; ModuleID = 'vela_module'"));
    assert!(text.contains("declare i32 @printf(i8*, ...)"));
    assert!(text.contains("declare i8* @malloc(i64)"));
    assert!(text.contains("declare void @free(i8*)"));
}

#[test]
fn test_module_display_orders_sections() {
    let mut module = Module::new("m");
    module.globals.push(Global {
        name: ".str.0".to_string(),
        bytes: b"x\0".to_vec(),
    });
    let mut func = Function::new("main", vec![], IrType::Void);
    let entry = func.add_block("entry");
    func.block_mut(entry).terminator = Some(Terminator::Ret(None));
    module.functions.push(func);

    let text = module.to_string();
    let externs_at = text.find("declare i32 @printf").unwrap();
    let globals_at = text.find("@.str.0").unwrap();
    let define_at = text.find("define void @main").unwrap();
    assert!(externs_at < globals_at);
    assert!(globals_at < define_at);
}
