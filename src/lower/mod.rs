//! Lowering from the typed AST to the IR module.
//!
//! This module provides the [`Lowerer`], which traverses a type-checked
//! program and emits a [`Module`] of typed three-address instructions.
//!
//! # Conventions
//!
//! - `int` lowers to `i64`, `float` to `double`, `bool` to `i1`, `str`
//!   to `i8*`, and arrays to pointers to contiguous elements.
//! - Every local variable gets one stack slot, allocated in its
//!   function's entry block; reads load from the slot and writes store to
//!   it, which trivially satisfies SSA without dominance analysis.
//! - `print` is a privileged call lowered to `printf` with a
//!   content-deduplicated format global per argument type.
//! - `and`/`or` lower to short-circuit control flow; `**` calls a
//!   synthesized integer power routine; `parallel` blocks run their tasks
//!   sequentially and `await` passes through.
//! - Top-level executable statements are gathered into a synthesized
//!   `vela.module_init` function so their slots and stores are observable
//!   in the module.
//!
//! The lowerer assumes a clean type-checked AST and treats any
//! inconsistency as a fatal [`LowerError`]; constructs the core lowering
//! deliberately does not cover (match, lambdas, classes, `for` loops, the
//! `len`/`range`/`str` built-ins) fail with explicit errors rather than
//! emitting silent no-ops.
//!
//! # Module Structure
//!
//! - [`error`] - [`LowerError`]
//! - `stmt` - Statement lowering (control flow, slots, assignment)
//! - `expr` - Expression lowering (operators, calls, print, globals)
//! - `tests` - Unit tests (test-only)
//!
//! # See Also
//!
//! * [`crate::checker`] - Produces the [`TypeTable`] consumed here
//! * [`crate::ir`] - The output data model

mod error;
mod expr;
mod stmt;


pub use error::{LowerError, LowerErrorKind};

use std::collections::{HashMap, HashSet};

use crate::ast::{Expr, FuncDecl, Program, Stmt, StmtKind, Type};
use crate::checker::TypeTable;
use crate::ir::{Function, Instr, IrType, Module, Terminator, Value};

/// The name of the synthesized function holding top-level statements.
const MODULE_INIT: &str = "vela.module_init";

/// The name of the synthesized integer power routine.
const POWI: &str = "vela.powi";

/// The signature of a lowered function, used at call sites.
#[derive(Debug, Clone)]
pub(super) struct FnSig {
    pub(super) params: Vec<IrType>,
    pub(super) ret: IrType,
}

/// Labels a `break`/`continue` statement branches to inside a loop.
pub(super) struct LoopLabels {
    pub(super) continue_label: String,
    pub(super) break_label: String,
}

/// Per-function lowering state: the function under construction, the
/// current insertion block, and the local symbol table mapping names to
/// stack slots.
pub(super) struct FuncCx {
    pub(super) func: Function,
    /// Index of the block instructions are currently appended to.
    pub(super) current: usize,
    /// Local name to (slot pointer, slot type).
    pub(super) vars: HashMap<String, (Value, IrType)>,
    /// Innermost loop last.
    pub(super) loops: Vec<LoopLabels>,
    /// Slot names already taken in this function.
    slot_names: HashSet<String>,
    /// How many allocas sit at the top of the entry block.
    entry_allocas: usize,
}

impl FuncCx {
    fn new(func: Function) -> Self {
        FuncCx {
            func,
            current: 0,
            vars: HashMap::new(),
            loops: Vec::new(),
            slot_names: HashSet::new(),
            entry_allocas: 0,
        }
    }

    /// Appends an instruction to the current block.
    pub(super) fn emit(&mut self, instr: Instr) {
        self.func.block_mut(self.current).instrs.push(instr);
    }

    /// Returns `true` if the current block already has a terminator.
    pub(super) fn is_terminated(&self) -> bool {
        self.func.blocks[self.current].is_terminated()
    }

    /// Sets the current block's terminator unless it already has one.
    pub(super) fn terminate(&mut self, terminator: Terminator) {
        let block = self.func.block_mut(self.current);
        if block.terminator.is_none() {
            block.terminator = Some(terminator);
        }
    }

    /// Makes the block at `index` the insertion point.
    pub(super) fn switch_to(&mut self, index: usize) {
        self.current = index;
    }

    /// Returns the label of the block at `index`.
    pub(super) fn label_of(&self, index: usize) -> String {
        self.func.blocks[index].label.clone()
    }

    /// Allocates a stack slot for `name` in the entry block and returns
    /// its pointer value.
    ///
    /// Allocas are kept grouped at the top of the entry block, so slots
    /// declared inside loops or branches still satisfy the one-slot-in-
    /// entry invariant. Shadowed names get a numeric suffix.
    pub(super) fn alloc_slot(&mut self, name: &str, ty: IrType) -> Value {
        let mut slot_name = format!("{}.addr", name);
        let mut suffix = 0usize;
        while self.slot_names.contains(&slot_name) {
            suffix += 1;
            slot_name = format!("{}.addr{}", name, suffix);
        }
        self.slot_names.insert(slot_name.clone());

        let slot = Value::Slot(slot_name);
        self.func.blocks[0].instrs.insert(
            self.entry_allocas,
            Instr::Alloca {
                dest: slot.clone(),
                ty: ty.clone(),
            },
        );
        self.entry_allocas += 1;
        self.vars.insert(name.to_string(), (slot.clone(), ty));
        slot
    }
}

/// Maps a Vela type onto its IR representation.
///
/// Strings and arrays are raw pointers; types with no dedicated lowering
/// (classes, traits, functions, `auto`) take the default integer word,
/// matching the reference-free core model.
pub(super) fn ir_type(ty: &Type) -> IrType {
    match ty {
        Type::Int => IrType::I64,
        Type::Float => IrType::F64,
        Type::Bool => IrType::I1,
        Type::Void => IrType::Void,
        Type::Str => IrType::i8_ptr(),
        Type::Null => IrType::i8_ptr(),
        Type::Array(elem) => IrType::ptr(ir_type(elem)),
        Type::Auto
        | Type::Function { .. }
        | Type::Class(_)
        | Type::Trait(_)
        | Type::Generic(_) => IrType::I64,
    }
}

/// The AST-to-IR lowerer.
///
/// Create one with [`Lowerer::new`] over the checker's [`TypeTable`] and
/// call [`lower`](Lowerer::lower) with the program. On failure the module
/// is discarded as a whole.
pub struct Lowerer<'a> {
    pub(super) table: &'a TypeTable,
    pub(super) module: Module,
    /// Global constants interned by content.
    pub(super) globals_by_content: HashMap<Vec<u8>, String>,
    str_count: usize,
    fmt_count: usize,
    /// Known function signatures by name.
    pub(super) functions: HashMap<String, FnSig>,
    /// Names declared by top-level variable declarations.
    ///
    /// Their slots live in `vela.module_init`; reading them from another
    /// function is rejected explicitly, since the core has no global
    /// variable storage.
    pub(super) top_level_vars: HashSet<String>,
    powi_emitted: bool,
}

impl<'a> Lowerer<'a> {
    /// Creates a lowerer producing a module named `vela_module`.
    pub fn new(table: &'a TypeTable) -> Self {
        Lowerer {
            table,
            module: Module::new("vela_module"),
            globals_by_content: HashMap::new(),
            str_count: 0,
            fmt_count: 0,
            functions: HashMap::new(),
            top_level_vars: HashSet::new(),
            powi_emitted: false,
        }
    }

    /// Lowers a whole program into an IR module.
    ///
    /// Function declarations lower to module functions in source order;
    /// other executable top-level statements are gathered, in order, into
    /// the synthesized `vela.module_init`. Class and trait declarations
    /// and imports have no lowering.
    ///
    /// # Errors
    ///
    /// Returns the first [`LowerError`] encountered; the partial module
    /// is dropped.
    pub fn lower(mut self, program: &Program) -> Result<Module, LowerError> {
        // Register every top-level signature first so calls can resolve
        // regardless of declaration order.
        for stmt in &program.statements {
            match &stmt.kind {
                StmtKind::Func(decl) => {
                    let sig = self.signature_of(decl);
                    self.functions.insert(decl.name.clone(), sig);
                }
                StmtKind::VarDecl { name, .. } => {
                    self.top_level_vars.insert(name.clone());
                }
                _ => {}
            }
        }

        let mut top_level: Vec<&Stmt> = Vec::new();
        for stmt in &program.statements {
            match &stmt.kind {
                StmtKind::Func(decl) => self.lower_function(decl)?,
                StmtKind::Class(_) | StmtKind::Trait(_) | StmtKind::Import { .. } => {}
                _ => top_level.push(stmt),
            }
        }

        if !top_level.is_empty() {
            let func = Function::new(MODULE_INIT, Vec::new(), IrType::Void);
            let mut cx = FuncCx::new(func);
            cx.func.add_block("entry");
            for stmt in top_level {
                if cx.is_terminated() {
                    break;
                }
                self.lower_stmt(&mut cx, stmt)?;
            }
            self.finish_function(cx);
        }

        Ok(self.module)
    }

    pub(super) fn signature_of(&self, decl: &FuncDecl) -> FnSig {
        FnSig {
            params: decl
                .params
                .iter()
                .map(|param| ir_type(&Type::from_annotation(&param.type_name)))
                .collect(),
            ret: ir_type(&Type::from_annotation(&decl.return_type)),
        }
    }

    /// Lowers one function declaration into a module function.
    ///
    /// The entry block binds each formal parameter to a fresh stack slot
    /// storing the incoming argument. If control falls off the end
    /// without a terminator, a `ret void` or `ret 0` matching the
    /// signature is appended.
    pub(super) fn lower_function(&mut self, decl: &FuncDecl) -> Result<(), LowerError> {
        let Some(body) = &decl.body else {
            return Ok(());
        };

        let sig = self.signature_of(decl);
        let params: Vec<(String, IrType)> = decl
            .params
            .iter()
            .zip(sig.params.iter())
            .map(|(param, ty)| (param.name.clone(), ty.clone()))
            .collect();

        let func = Function::new(decl.name.clone(), params.clone(), sig.ret.clone());
        let mut cx = FuncCx::new(func);
        cx.func.add_block("entry");

        for (name, ty) in &params {
            let slot = cx.alloc_slot(name, ty.clone());
            cx.emit(Instr::Store {
                ty: ty.clone(),
                value: Value::Arg(name.clone()),
                ptr: slot,
            });
        }

        for stmt in body {
            if cx.is_terminated() {
                break;
            }
            self.lower_stmt(&mut cx, stmt)?;
        }

        self.finish_function(cx);
        Ok(())
    }

    /// Appends the fall-off terminator if needed and moves the finished
    /// function into the module.
    fn finish_function(&mut self, mut cx: FuncCx) {
        if !cx.is_terminated() {
            let terminator = match &cx.func.ret {
                IrType::Void => Terminator::Ret(None),
                ret => Terminator::Ret(Some((ret.clone(), zero_of(ret)))),
            };
            cx.terminate(terminator);
        }

        // Blocks other than the current one can be left unterminated when
        // every path out of them already returned (e.g. an if.end after
        // two returning arms). Give them the same fall-off return so
        // every block ends in exactly one terminator.
        let ret = cx.func.ret.clone();
        for block in &mut cx.func.blocks {
            if block.terminator.is_none() {
                block.terminator = Some(match &ret {
                    IrType::Void => Terminator::Ret(None),
                    ret => Terminator::Ret(Some((ret.clone(), zero_of(ret)))),
                });
            }
        }

        self.module.functions.push(cx.func);
    }

    /// Interns a NUL-terminated byte string as an internal global,
    /// de-duplicated by content. Returns the global's name and length.
    pub(super) fn intern_global(&mut self, bytes: Vec<u8>, is_format: bool) -> (String, usize) {
        let len = bytes.len();
        if let Some(name) = self.globals_by_content.get(&bytes) {
            return (name.clone(), len);
        }

        let name = if is_format {
            let name = format!(".fmt.{}", self.fmt_count);
            self.fmt_count += 1;
            name
        } else {
            let name = format!(".str.{}", self.str_count);
            self.str_count += 1;
            name
        };

        self.globals_by_content.insert(bytes.clone(), name.clone());
        self.module.globals.push(crate::ir::Global {
            name: name.clone(),
            bytes,
        });
        (name, len)
    }

    /// Looks up the checker's annotation for an expression.
    pub(super) fn expr_ty(&self, expr: &Expr) -> Result<Type, LowerError> {
        self.table.expr_type(expr.id).cloned().ok_or_else(|| {
            LowerError::internal(format!(
                "missing type annotation at {}:{}",
                expr.span.line, expr.span.column
            ))
        })
    }

    /// Emits the synthesized `vela.powi` routine on first use and returns
    /// its name.
    ///
    /// The routine computes `base ** exp` by iterated multiplication and
    /// returns 0 for negative exponents.
    pub(super) fn ensure_powi(&mut self) -> String {
        if self.powi_emitted {
            return POWI.to_string();
        }
        self.powi_emitted = true;

        let func = Function::new(
            POWI,
            vec![
                ("base".to_string(), IrType::I64),
                ("exp".to_string(), IrType::I64),
            ],
            IrType::I64,
        );
        let mut cx = FuncCx::new(func);
        let entry = cx.func.add_block("entry");
        let neg = cx.func.add_block("pow.neg");
        let cond = cx.func.add_block("pow.cond");
        let body = cx.func.add_block("pow.body");
        let end = cx.func.add_block("pow.end");

        cx.switch_to(entry);
        let result = cx.alloc_slot("result", IrType::I64);
        let counter = cx.alloc_slot("count", IrType::I64);
        cx.emit(Instr::Store {
            ty: IrType::I64,
            value: Value::ConstInt(1),
            ptr: result.clone(),
        });
        cx.emit(Instr::Store {
            ty: IrType::I64,
            value: Value::Arg("exp".to_string()),
            ptr: counter.clone(),
        });
        let is_negative = cx.func.new_temp();
        cx.emit(Instr::ICmp {
            dest: is_negative.clone(),
            pred: crate::ir::ICmpPred::Slt,
            ty: IrType::I64,
            lhs: Value::Arg("exp".to_string()),
            rhs: Value::ConstInt(0),
        });
        cx.terminate(Terminator::CondBr {
            cond: is_negative,
            then_label: cx.label_of(neg),
            else_label: cx.label_of(cond),
        });

        cx.switch_to(neg);
        cx.terminate(Terminator::Ret(Some((IrType::I64, Value::ConstInt(0)))));

        cx.switch_to(cond);
        let remaining = cx.func.new_temp();
        cx.emit(Instr::Load {
            dest: remaining.clone(),
            ty: IrType::I64,
            ptr: counter.clone(),
        });
        let keep_going = cx.func.new_temp();
        cx.emit(Instr::ICmp {
            dest: keep_going.clone(),
            pred: crate::ir::ICmpPred::Sgt,
            ty: IrType::I64,
            lhs: remaining,
            rhs: Value::ConstInt(0),
        });
        cx.terminate(Terminator::CondBr {
            cond: keep_going,
            then_label: cx.label_of(body),
            else_label: cx.label_of(end),
        });

        cx.switch_to(body);
        let acc = cx.func.new_temp();
        cx.emit(Instr::Load {
            dest: acc.clone(),
            ty: IrType::I64,
            ptr: result.clone(),
        });
        let product = cx.func.new_temp();
        cx.emit(Instr::Bin {
            dest: product.clone(),
            op: crate::ir::BinOp::Mul,
            ty: IrType::I64,
            lhs: acc,
            rhs: Value::Arg("base".to_string()),
        });
        cx.emit(Instr::Store {
            ty: IrType::I64,
            value: product,
            ptr: result.clone(),
        });
        let count_now = cx.func.new_temp();
        cx.emit(Instr::Load {
            dest: count_now.clone(),
            ty: IrType::I64,
            ptr: counter.clone(),
        });
        let decremented = cx.func.new_temp();
        cx.emit(Instr::Bin {
            dest: decremented.clone(),
            op: crate::ir::BinOp::Sub,
            ty: IrType::I64,
            lhs: count_now,
            rhs: Value::ConstInt(1),
        });
        cx.emit(Instr::Store {
            ty: IrType::I64,
            value: decremented,
            ptr: counter,
        });
        cx.terminate(Terminator::Br(cx.label_of(cond)));

        cx.switch_to(end);
        let final_value = cx.func.new_temp();
        cx.emit(Instr::Load {
            dest: final_value.clone(),
            ty: IrType::I64,
            ptr: result,
        });
        cx.terminate(Terminator::Ret(Some((IrType::I64, final_value))));

        self.module.functions.push(cx.func);
        POWI.to_string()
    }
}

/// The zero constant of an IR type, used for fall-off returns.
fn zero_of(ty: &IrType) -> Value {
    match ty {
        IrType::F64 => Value::ConstFloat(0.0),
        IrType::I1 => Value::ConstBool(false),
        IrType::Ptr(_) => Value::NullPtr,
        _ => Value::ConstInt(0),
    }
}
