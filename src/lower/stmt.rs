//! Statement lowering: slots, assignment, and control flow.

use super::{FuncCx, LoopLabels, Lowerer, ir_type};
use super::error::LowerError;
use crate::ast::{AssignOp, Expr, ExprKind, Stmt, StmtKind};
use crate::ir::{BinOp, Instr, IrType, Terminator};

impl<'a> Lowerer<'a> {
    /// Lowers one statement into the current block.
    pub(super) fn lower_stmt(&mut self, cx: &mut FuncCx, stmt: &Stmt) -> Result<(), LowerError> {
        match &stmt.kind {
            StmtKind::VarDecl { name, init, .. } => {
                let ty = self
                    .table
                    .decl_type(stmt.id)
                    .map(ir_type)
                    .ok_or_else(|| {
                        LowerError::internal(format!(
                            "missing binding type for '{}' at {}:{}",
                            name, stmt.span.line, stmt.span.column
                        ))
                    })?;

                let slot = cx.alloc_slot(name, ty.clone());
                if let Some(init) = init {
                    let (value, value_ty) = self.lower_expr(cx, init)?;
                    let value = self.coerce(cx, value, &value_ty, &ty);
                    cx.emit(Instr::Store {
                        ty,
                        value,
                        ptr: slot,
                    });
                }
                Ok(())
            }

            StmtKind::Assign { target, op, value } => self.lower_assign(cx, target, *op, value),

            StmtKind::Expr(expr) => {
                self.lower_expr(cx, expr)?;
                Ok(())
            }

            StmtKind::Return(value) => {
                let ret_ty = cx.func.ret.clone();
                match value {
                    Some(expr) if !matches!(ret_ty, IrType::Void) => {
                        let (value, value_ty) = self.lower_expr(cx, expr)?;
                        let value = self.coerce(cx, value, &value_ty, &ret_ty);
                        cx.terminate(Terminator::Ret(Some((ret_ty, value))));
                    }
                    Some(expr) => {
                        // A value returned from a void function still gets
                        // evaluated for its effects.
                        self.lower_expr(cx, expr)?;
                        cx.terminate(Terminator::Ret(None));
                    }
                    None => {
                        let terminator = match &ret_ty {
                            IrType::Void => Terminator::Ret(None),
                            ty => Terminator::Ret(Some((ty.clone(), super::zero_of(ty)))),
                        };
                        cx.terminate(terminator);
                    }
                }
                Ok(())
            }

            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            } => self.lower_if(cx, condition, then_branch, else_branch.as_deref()),

            StmtKind::While { condition, body } => self.lower_while(cx, condition, body),

            StmtKind::For { .. } => Err(LowerError::for_not_implemented(stmt.span)),

            StmtKind::Break => {
                let label = cx
                    .loops
                    .last()
                    .map(|labels| labels.break_label.clone())
                    .ok_or_else(|| LowerError::unsupported("break outside of a loop", stmt.span))?;
                cx.terminate(Terminator::Br(label));
                Ok(())
            }

            StmtKind::Continue => {
                let label = cx
                    .loops
                    .last()
                    .map(|labels| labels.continue_label.clone())
                    .ok_or_else(|| {
                        LowerError::unsupported("continue outside of a loop", stmt.span)
                    })?;
                cx.terminate(Terminator::Br(label));
                Ok(())
            }

            StmtKind::Block(stmts) => self.lower_block(cx, stmts),

            // The core executes parallel tasks sequentially in order.
            StmtKind::Parallel(tasks) => {
                for task in tasks {
                    self.lower_expr(cx, task)?;
                }
                Ok(())
            }

            // Imports are recognized syntactically; resolution is outside
            // the core.
            StmtKind::Import { .. } => Ok(()),

            StmtKind::Func(decl) => {
                // A nested function becomes an ordinary module function.
                let sig = self.signature_of(decl);
                self.functions.insert(decl.name.clone(), sig);
                self.lower_function(decl)
            }

            StmtKind::Class(_) | StmtKind::Trait(_) => Ok(()),
        }
    }

    /// Lowers an ordered statement list, stopping after a terminator.
    pub(super) fn lower_block(&mut self, cx: &mut FuncCx, stmts: &[Stmt]) -> Result<(), LowerError> {
        for stmt in stmts {
            if cx.is_terminated() {
                break;
            }
            self.lower_stmt(cx, stmt)?;
        }
        Ok(())
    }

    /// Lowers an assignment. Only identifier targets have slots in the
    /// core lowering.
    fn lower_assign(
        &mut self,
        cx: &mut FuncCx,
        target: &Expr,
        op: AssignOp,
        value: &Expr,
    ) -> Result<(), LowerError> {
        let ExprKind::Identifier(name) = &target.kind else {
            return Err(LowerError::unsupported(
                "assignment to a non-identifier target",
                target.span,
            ));
        };

        let Some((slot, slot_ty)) = cx.vars.get(name).cloned() else {
            if self.top_level_vars.contains(name) {
                return Err(LowerError::unsupported(
                    "access to a top-level variable from a function",
                    target.span,
                ));
            }
            return Err(LowerError::unresolved_name(name, target.span));
        };

        let (value, value_ty) = self.lower_expr(cx, value)?;

        let stored = match op {
            AssignOp::Assign => self.coerce(cx, value, &value_ty, &slot_ty),
            AssignOp::AddAssign | AssignOp::SubAssign => {
                let current = cx.func.new_temp();
                cx.emit(Instr::Load {
                    dest: current.clone(),
                    ty: slot_ty.clone(),
                    ptr: slot.clone(),
                });
                let value = self.coerce(cx, value, &value_ty, &slot_ty);
                let is_float = matches!(slot_ty, IrType::F64);
                let bin_op = match (op, is_float) {
                    (AssignOp::AddAssign, false) => BinOp::Add,
                    (AssignOp::AddAssign, true) => BinOp::FAdd,
                    (AssignOp::SubAssign, false) => BinOp::Sub,
                    (AssignOp::SubAssign, true) => BinOp::FSub,
                    (AssignOp::Assign, _) => unreachable!("plain assign handled above"),
                };
                let result = cx.func.new_temp();
                cx.emit(Instr::Bin {
                    dest: result.clone(),
                    op: bin_op,
                    ty: slot_ty.clone(),
                    lhs: current,
                    rhs: value,
                });
                result
            }
        };

        cx.emit(Instr::Store {
            ty: slot_ty,
            value: stored,
            ptr: slot,
        });
        Ok(())
    }

    /// Lowers an if statement into `if.then`/`if.else`/`if.end` blocks.
    ///
    /// Each arm branches to the merge block unless it already terminated
    /// (e.g. by returning).
    fn lower_if(
        &mut self,
        cx: &mut FuncCx,
        condition: &Expr,
        then_branch: &[Stmt],
        else_branch: Option<&[Stmt]>,
    ) -> Result<(), LowerError> {
        let (cond, _) = self.lower_expr(cx, condition)?;

        let then_idx = cx.func.add_block("if.then");
        let else_idx = else_branch.map(|_| cx.func.add_block("if.else"));
        let merge_idx = cx.func.add_block("if.end");

        let else_label = match else_idx {
            Some(idx) => cx.label_of(idx),
            None => cx.label_of(merge_idx),
        };
        cx.terminate(Terminator::CondBr {
            cond,
            then_label: cx.label_of(then_idx),
            else_label,
        });

        cx.switch_to(then_idx);
        self.lower_block(cx, then_branch)?;
        cx.terminate(Terminator::Br(cx.label_of(merge_idx)));

        if let (Some(else_idx), Some(else_branch)) = (else_idx, else_branch) {
            cx.switch_to(else_idx);
            self.lower_block(cx, else_branch)?;
            cx.terminate(Terminator::Br(cx.label_of(merge_idx)));
        }

        cx.switch_to(merge_idx);
        Ok(())
    }

    /// Lowers a while loop into `while.cond`/`while.body`/`while.end`
    /// blocks. The body branches back to the condition block.
    fn lower_while(
        &mut self,
        cx: &mut FuncCx,
        condition: &Expr,
        body: &[Stmt],
    ) -> Result<(), LowerError> {
        let cond_idx = cx.func.add_block("while.cond");
        let body_idx = cx.func.add_block("while.body");
        let end_idx = cx.func.add_block("while.end");

        cx.terminate(Terminator::Br(cx.label_of(cond_idx)));

        cx.switch_to(cond_idx);
        let (cond, _) = self.lower_expr(cx, condition)?;
        cx.terminate(Terminator::CondBr {
            cond,
            then_label: cx.label_of(body_idx),
            else_label: cx.label_of(end_idx),
        });

        cx.switch_to(body_idx);
        cx.loops.push(LoopLabels {
            continue_label: cx.label_of(cond_idx),
            break_label: cx.label_of(end_idx),
        });
        let result = self.lower_block(cx, body);
        cx.loops.pop();
        result?;
        cx.terminate(Terminator::Br(cx.label_of(cond_idx)));

        cx.switch_to(end_idx);
        Ok(())
    }
}
