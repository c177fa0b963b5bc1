//! Expression lowering: operators, calls, `print`, and literals.

use super::error::LowerError;
use super::{FuncCx, Lowerer, ir_type};
use crate::ast::{BinaryOp, Expr, ExprKind, Type, UnaryOp};
use crate::ir::{BinOp, FCmpPred, ICmpPred, Instr, IrType, Terminator, Value};

impl<'a> Lowerer<'a> {
    /// Lowers an expression, returning the produced value and its IR
    /// type.
    pub(super) fn lower_expr(
        &mut self,
        cx: &mut FuncCx,
        expr: &Expr,
    ) -> Result<(Value, IrType), LowerError> {
        match &expr.kind {
            ExprKind::Int(value) => Ok((Value::ConstInt(*value), IrType::I64)),
            ExprKind::Float(value) => Ok((Value::ConstFloat(*value), IrType::F64)),
            ExprKind::Bool(value) => Ok((Value::ConstBool(*value), IrType::I1)),
            ExprKind::Null => Ok((Value::NullPtr, IrType::i8_ptr())),

            ExprKind::Str(text) => {
                let mut bytes = text.clone().into_bytes();
                bytes.push(0);
                let ptr = self.global_ptr(cx, bytes, false);
                Ok((ptr, IrType::i8_ptr()))
            }

            ExprKind::Identifier(name) => {
                let Some((slot, ty)) = cx.vars.get(name).cloned() else {
                    // A top-level variable's slot lives in the module
                    // init function; cross-function access has no global
                    // storage to lower to.
                    if self.top_level_vars.contains(name) {
                        return Err(LowerError::unsupported(
                            "access to a top-level variable from a function",
                            expr.span,
                        ));
                    }
                    return Err(LowerError::unresolved_name(name, expr.span));
                };
                let dest = cx.func.new_temp();
                cx.emit(Instr::Load {
                    dest: dest.clone(),
                    ty: ty.clone(),
                    ptr: slot,
                });
                Ok((dest, ty))
            }

            ExprKind::Binary { op, left, right } => self.lower_binary(cx, *op, left, right),

            ExprKind::Unary { op, operand } => {
                let (value, ty) = self.lower_expr(cx, operand)?;
                match op {
                    UnaryOp::Neg => {
                        let dest = cx.func.new_temp();
                        let (bin_op, zero) = if matches!(ty, IrType::F64) {
                            (BinOp::FSub, Value::ConstFloat(0.0))
                        } else {
                            (BinOp::Sub, Value::ConstInt(0))
                        };
                        cx.emit(Instr::Bin {
                            dest: dest.clone(),
                            op: bin_op,
                            ty: ty.clone(),
                            lhs: zero,
                            rhs: value,
                        });
                        Ok((dest, ty))
                    }
                    UnaryOp::Not => {
                        let dest = cx.func.new_temp();
                        cx.emit(Instr::Bin {
                            dest: dest.clone(),
                            op: BinOp::Xor,
                            ty: IrType::I1,
                            lhs: value,
                            rhs: Value::ConstBool(true),
                        });
                        Ok((dest, IrType::I1))
                    }
                }
            }

            ExprKind::Call { callee, args } => self.lower_call(cx, callee, args, expr),

            ExprKind::Array(elements) => self.lower_array(cx, expr, elements),

            ExprKind::Index { target, index } => {
                let (base, base_ty) = self.lower_expr(cx, target)?;
                let IrType::Ptr(elem_ty) = base_ty else {
                    return Err(LowerError::unsupported(
                        "indexing a non-array value",
                        expr.span,
                    ));
                };
                let (index_value, _) = self.lower_expr(cx, index)?;
                let slot = cx.func.new_temp();
                cx.emit(Instr::Gep {
                    dest: slot.clone(),
                    elem_ty: (*elem_ty).clone(),
                    ptr: base,
                    index: index_value,
                });
                let dest = cx.func.new_temp();
                cx.emit(Instr::Load {
                    dest: dest.clone(),
                    ty: (*elem_ty).clone(),
                    ptr: slot,
                });
                Ok((dest, *elem_ty))
            }

            // Pipelines fold application left to right: v |> f |> g is
            // g(f(v)).
            ExprKind::Pipeline { value, stages } => {
                let (mut current, mut current_ty) = self.lower_expr(cx, value)?;
                for stage in stages {
                    let ExprKind::Identifier(name) = &stage.kind else {
                        return Err(LowerError::unsupported(
                            "pipeline stages other than named functions",
                            stage.span,
                        ));
                    };

                    if name == "print" {
                        current = self.print_by_repr(cx, current, &current_ty);
                        current_ty = IrType::I32;
                        continue;
                    }
                    if matches!(name.as_str(), "len" | "range" | "str") {
                        return Err(LowerError::builtin_not_lowered(name, stage.span));
                    }

                    let sig = self
                        .functions
                        .get(name)
                        .cloned()
                        .ok_or_else(|| LowerError::unresolved_name(name, stage.span))?;
                    let Some(param_ty) = sig.params.first().cloned() else {
                        return Err(LowerError::unsupported(
                            "piping into a zero-argument function",
                            stage.span,
                        ));
                    };

                    let arg = self.coerce(cx, current, &current_ty, &param_ty);
                    let dest = match sig.ret {
                        IrType::Void => None,
                        _ => Some(cx.func.new_temp()),
                    };
                    cx.emit(Instr::Call {
                        dest: dest.clone(),
                        ret: sig.ret.clone(),
                        callee: name.clone(),
                        args: vec![(param_ty, arg)],
                        variadic_params: None,
                    });
                    current = dest.unwrap_or(Value::ConstInt(0));
                    current_ty = sig.ret;
                }
                Ok((current, current_ty))
            }

            // The core executes awaited expressions synchronously.
            ExprKind::Await(inner) => self.lower_expr(cx, inner),

            ExprKind::Member { .. } => Err(LowerError::unsupported("member access", expr.span)),
            ExprKind::Match { .. } => Err(LowerError::unsupported("match expressions", expr.span)),
            ExprKind::Lambda { .. } => {
                Err(LowerError::unsupported("lambda expressions", expr.span))
            }
            ExprKind::Object { .. } => Err(LowerError::unsupported("object literals", expr.span)),
        }
    }

    /// Converts a value between IR types where the language defines an
    /// implicit conversion (`int` widening to `float`).
    pub(super) fn coerce(
        &mut self,
        cx: &mut FuncCx,
        value: Value,
        from: &IrType,
        to: &IrType,
    ) -> Value {
        if matches!(from, IrType::I64) && matches!(to, IrType::F64) {
            let dest = cx.func.new_temp();
            cx.emit(Instr::Sitofp {
                dest: dest.clone(),
                value,
            });
            return dest;
        }
        value
    }

    /// Lowers a binary operation, dispatching to the int or float variant
    /// by operand type.
    fn lower_binary(
        &mut self,
        cx: &mut FuncCx,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<(Value, IrType), LowerError> {
        if op.is_logical() {
            return self.lower_short_circuit(cx, op, left, right);
        }

        if op == BinaryOp::Pow {
            let powi = self.ensure_powi();
            let (lhs, _) = self.lower_expr(cx, left)?;
            let (rhs, _) = self.lower_expr(cx, right)?;
            let dest = cx.func.new_temp();
            cx.emit(Instr::Call {
                dest: Some(dest.clone()),
                ret: IrType::I64,
                callee: powi,
                args: vec![(IrType::I64, lhs), (IrType::I64, rhs)],
                variadic_params: None,
            });
            return Ok((dest, IrType::I64));
        }

        let (lhs, lhs_ty) = self.lower_expr(cx, left)?;
        let (rhs, rhs_ty) = self.lower_expr(cx, right)?;
        let is_float = matches!(lhs_ty, IrType::F64) || matches!(rhs_ty, IrType::F64);

        if op.is_arithmetic() {
            let (lhs, rhs, ty) = if is_float {
                (
                    self.coerce(cx, lhs, &lhs_ty, &IrType::F64),
                    self.coerce(cx, rhs, &rhs_ty, &IrType::F64),
                    IrType::F64,
                )
            } else {
                (lhs, rhs, IrType::I64)
            };

            let bin_op = match (op, is_float) {
                (BinaryOp::Add, false) => BinOp::Add,
                (BinaryOp::Add, true) => BinOp::FAdd,
                (BinaryOp::Sub, false) => BinOp::Sub,
                (BinaryOp::Sub, true) => BinOp::FSub,
                (BinaryOp::Mul, false) => BinOp::Mul,
                (BinaryOp::Mul, true) => BinOp::FMul,
                (BinaryOp::Div, false) => BinOp::SDiv,
                (BinaryOp::Div, true) => BinOp::FDiv,
                (BinaryOp::Mod, false) => BinOp::SRem,
                (BinaryOp::Mod, true) => BinOp::FRem,
                _ => {
                    return Err(LowerError::internal(format!(
                        "operator '{}' reached arithmetic lowering",
                        op
                    )));
                }
            };

            let dest = cx.func.new_temp();
            cx.emit(Instr::Bin {
                dest: dest.clone(),
                op: bin_op,
                ty: ty.clone(),
                lhs,
                rhs,
            });
            return Ok((dest, ty));
        }

        // Comparisons: signed integer compares, or ordered float
        // compares, both producing i1.
        let dest = cx.func.new_temp();
        if is_float {
            let lhs = self.coerce(cx, lhs, &lhs_ty, &IrType::F64);
            let rhs = self.coerce(cx, rhs, &rhs_ty, &IrType::F64);
            let pred = match op {
                BinaryOp::Eq => FCmpPred::Oeq,
                BinaryOp::Ne => FCmpPred::One,
                BinaryOp::Lt => FCmpPred::Olt,
                BinaryOp::Gt => FCmpPred::Ogt,
                BinaryOp::Le => FCmpPred::Ole,
                BinaryOp::Ge => FCmpPred::Oge,
                _ => {
                    return Err(LowerError::internal(format!(
                        "operator '{}' reached comparison lowering",
                        op
                    )));
                }
            };
            cx.emit(Instr::FCmp {
                dest: dest.clone(),
                pred,
                lhs,
                rhs,
            });
        } else {
            let pred = match op {
                BinaryOp::Eq => ICmpPred::Eq,
                BinaryOp::Ne => ICmpPred::Ne,
                BinaryOp::Lt => ICmpPred::Slt,
                BinaryOp::Gt => ICmpPred::Sgt,
                BinaryOp::Le => ICmpPred::Sle,
                BinaryOp::Ge => ICmpPred::Sge,
                _ => {
                    return Err(LowerError::internal(format!(
                        "operator '{}' reached comparison lowering",
                        op
                    )));
                }
            };
            cx.emit(Instr::ICmp {
                dest: dest.clone(),
                pred,
                ty: lhs_ty,
                lhs,
                rhs,
            });
        }
        Ok((dest, IrType::I1))
    }

    /// Lowers `and`/`or` with short-circuit control flow.
    ///
    /// The left operand's value is stored into a dedicated `i1` slot; the
    /// right operand only evaluates in its own block when the left did
    /// not already decide the result.
    fn lower_short_circuit(
        &mut self,
        cx: &mut FuncCx,
        op: BinaryOp,
        left: &Expr,
        right: &Expr,
    ) -> Result<(Value, IrType), LowerError> {
        let base = if op == BinaryOp::And { "and" } else { "or" };
        let slot = cx.alloc_slot(base, IrType::I1);

        let (lhs, _) = self.lower_expr(cx, left)?;
        cx.emit(Instr::Store {
            ty: IrType::I1,
            value: lhs.clone(),
            ptr: slot.clone(),
        });

        let rhs_idx = cx.func.add_block(&format!("{}.rhs", base));
        let end_idx = cx.func.add_block(&format!("{}.end", base));

        // and: the right side only matters when the left is true.
        // or: the right side only matters when the left is false.
        let (then_label, else_label) = if op == BinaryOp::And {
            (cx.label_of(rhs_idx), cx.label_of(end_idx))
        } else {
            (cx.label_of(end_idx), cx.label_of(rhs_idx))
        };
        cx.terminate(Terminator::CondBr {
            cond: lhs,
            then_label,
            else_label,
        });

        cx.switch_to(rhs_idx);
        let (rhs, _) = self.lower_expr(cx, right)?;
        cx.emit(Instr::Store {
            ty: IrType::I1,
            value: rhs,
            ptr: slot.clone(),
        });
        cx.terminate(Terminator::Br(cx.label_of(end_idx)));

        cx.switch_to(end_idx);
        let dest = cx.func.new_temp();
        cx.emit(Instr::Load {
            dest: dest.clone(),
            ty: IrType::I1,
            ptr: slot,
        });
        Ok((dest, IrType::I1))
    }

    /// Lowers a call expression.
    ///
    /// `print` is privileged; `len`, `range`, and `str` have no runtime
    /// in the core and fail explicitly; everything else resolves against
    /// the lowered function signatures.
    fn lower_call(
        &mut self,
        cx: &mut FuncCx,
        callee: &Expr,
        args: &[Expr],
        call: &Expr,
    ) -> Result<(Value, IrType), LowerError> {
        let ExprKind::Identifier(name) = &callee.kind else {
            return Err(LowerError::unsupported(
                "calls through computed callees",
                call.span,
            ));
        };

        if name == "print" {
            return self.lower_print(cx, args, call);
        }
        if matches!(name.as_str(), "len" | "range" | "str") {
            return Err(LowerError::builtin_not_lowered(name, call.span));
        }

        let sig = self
            .functions
            .get(name)
            .cloned()
            .ok_or_else(|| LowerError::unresolved_name(name, call.span))?;

        let mut lowered = Vec::with_capacity(args.len());
        for (arg, param_ty) in args.iter().zip(sig.params.iter()) {
            let (value, value_ty) = self.lower_expr(cx, arg)?;
            let value = self.coerce(cx, value, &value_ty, param_ty);
            lowered.push((param_ty.clone(), value));
        }

        let dest = match sig.ret {
            IrType::Void => None,
            _ => Some(cx.func.new_temp()),
        };
        cx.emit(Instr::Call {
            dest: dest.clone(),
            ret: sig.ret.clone(),
            callee: name.clone(),
            args: lowered,
            variadic_params: None,
        });
        Ok((dest.unwrap_or(Value::ConstInt(0)), sig.ret))
    }

    /// Lowers the privileged `print` call.
    ///
    /// String literal arguments print through `"%s\n"`; other arguments
    /// select their format from the checked type: `"%ld\n"` for int and
    /// bool, `"%f\n"` for float, `"%p\n"` otherwise. Format globals are
    /// de-duplicated by content.
    fn lower_print(
        &mut self,
        cx: &mut FuncCx,
        args: &[Expr],
        call: &Expr,
    ) -> Result<(Value, IrType), LowerError> {
        let Some(arg) = args.first() else {
            return Err(LowerError::internal(format!(
                "print call without arguments at {}:{}",
                call.span.line, call.span.column
            )));
        };

        if matches!(arg.kind, ExprKind::Str(_)) {
            let (text_ptr, _) = self.lower_expr(cx, arg)?;
            let result = self.printf_call(cx, b"%s\n\0", (IrType::i8_ptr(), text_ptr));
            return Ok((result, IrType::I32));
        }

        let static_ty = self.expr_ty(arg)?;
        let (value, value_ty) = self.lower_expr(cx, arg)?;
        let result = match static_ty {
            Type::Int => self.printf_call(cx, b"%ld\n\0", (IrType::I64, value)),
            Type::Bool => {
                let extended = cx.func.new_temp();
                cx.emit(Instr::Zext {
                    dest: extended.clone(),
                    from: IrType::I1,
                    value,
                    to: IrType::I64,
                });
                self.printf_call(cx, b"%ld\n\0", (IrType::I64, extended))
            }
            Type::Float => self.printf_call(cx, b"%f\n\0", (IrType::F64, value)),
            _ => self.printf_call(cx, b"%p\n\0", (value_ty, value)),
        };
        Ok((result, IrType::I32))
    }

    /// Prints an already-lowered value, selecting the format from its IR
    /// representation. Used for `print` as a pipeline stage.
    fn print_by_repr(&mut self, cx: &mut FuncCx, value: Value, ty: &IrType) -> Value {
        match ty {
            IrType::I64 => self.printf_call(cx, b"%ld\n\0", (IrType::I64, value)),
            IrType::I1 => {
                let extended = cx.func.new_temp();
                cx.emit(Instr::Zext {
                    dest: extended.clone(),
                    from: IrType::I1,
                    value,
                    to: IrType::I64,
                });
                self.printf_call(cx, b"%ld\n\0", (IrType::I64, extended))
            }
            IrType::F64 => self.printf_call(cx, b"%f\n\0", (IrType::F64, value)),
            _ => self.printf_call(cx, b"%p\n\0", (ty.clone(), value)),
        }
    }

    /// Emits a `printf` call with the given format bytes and argument.
    fn printf_call(&mut self, cx: &mut FuncCx, fmt: &[u8], arg: (IrType, Value)) -> Value {
        let fmt_ptr = self.global_ptr(cx, fmt.to_vec(), true);
        let dest = cx.func.new_temp();
        cx.emit(Instr::Call {
            dest: Some(dest.clone()),
            ret: IrType::I32,
            callee: "printf".to_string(),
            args: vec![(IrType::i8_ptr(), fmt_ptr), arg],
            variadic_params: Some(vec![IrType::i8_ptr()]),
        });
        dest
    }

    /// Interns `bytes` as a global constant and emits the `bitcast` that
    /// yields its `i8*`.
    fn global_ptr(&mut self, cx: &mut FuncCx, bytes: Vec<u8>, is_format: bool) -> Value {
        let (name, len) = self.intern_global(bytes, is_format);
        let dest = cx.func.new_temp();
        cx.emit(Instr::Bitcast {
            dest: dest.clone(),
            from: IrType::ptr(IrType::Array(len, Box::new(IrType::I8))),
            value: Value::Global(name),
            to: IrType::i8_ptr(),
        });
        dest
    }

    /// Lowers an array literal through `malloc` plus per-element stores.
    fn lower_array(
        &mut self,
        cx: &mut FuncCx,
        expr: &Expr,
        elements: &[Expr],
    ) -> Result<(Value, IrType), LowerError> {
        let elem_ir = match self.expr_ty(expr)? {
            Type::Array(elem) => ir_type(&elem),
            _ => IrType::I64,
        };

        // Every element representation is one 8-byte word.
        let byte_size = (elements.len() * 8) as i64;
        let raw = cx.func.new_temp();
        cx.emit(Instr::Call {
            dest: Some(raw.clone()),
            ret: IrType::i8_ptr(),
            callee: "malloc".to_string(),
            args: vec![(IrType::I64, Value::ConstInt(byte_size))],
            variadic_params: None,
        });

        let array = cx.func.new_temp();
        cx.emit(Instr::Bitcast {
            dest: array.clone(),
            from: IrType::i8_ptr(),
            value: raw,
            to: IrType::ptr(elem_ir.clone()),
        });

        for (index, element) in elements.iter().enumerate() {
            let (value, value_ty) = self.lower_expr(cx, element)?;
            let value = self.coerce(cx, value, &value_ty, &elem_ir);
            let slot = cx.func.new_temp();
            cx.emit(Instr::Gep {
                dest: slot.clone(),
                elem_ty: elem_ir.clone(),
                ptr: array.clone(),
                index: Value::ConstInt(index as i64),
            });
            cx.emit(Instr::Store {
                ty: elem_ir.clone(),
                value,
                ptr: slot,
            });
        }

        Ok((array, IrType::ptr(elem_ir)))
    }
}
