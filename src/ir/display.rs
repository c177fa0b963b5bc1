//! The canonical textual form of the IR.
//!
//! `Display` on [`Module`] renders the LLVM-flavored text the back-end
//! collaborator consumes: a named module, extern declarations, internal
//! global constants, and defined functions with labeled basic blocks.

use std::fmt;

use super::{
    BinOp, Block, ExternDecl, FCmpPred, Function, Global, ICmpPred, Instr, IrType, Module,
    Terminator, Value,
};

/// Formats a double the way C's `%e` would: a six-decimal mantissa and a
/// signed two-digit exponent, e.g. `2.000000e+00`.
pub fn format_double(value: f64) -> String {
    let scientific = format!("{:e}", value);
    // `{:e}` always yields `<mantissa>e<exponent>`.
    let (mantissa, exponent) = scientific
        .split_once('e')
        .expect("scientific notation contains an exponent");
    let mantissa: f64 = mantissa.parse().expect("mantissa is a number");
    let exponent: i32 = exponent.parse().expect("exponent is a number");
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{:.6}e{}{:02}", mantissa, sign, exponent.abs())
}

impl fmt::Display for IrType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrType::Void => write!(f, "void"),
            IrType::I1 => write!(f, "i1"),
            IrType::I8 => write!(f, "i8"),
            IrType::I32 => write!(f, "i32"),
            IrType::I64 => write!(f, "i64"),
            IrType::F64 => write!(f, "double"),
            IrType::Ptr(inner) => write!(f, "{}*", inner),
            IrType::Array(len, elem) => write!(f, "[{} x {}]", len, elem),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Temp(n) => write!(f, "%{}", n),
            Value::Slot(name) => write!(f, "%{}", name),
            Value::Global(name) => write!(f, "@{}", name),
            Value::Arg(name) => write!(f, "%{}", name),
            Value::ConstInt(v) => write!(f, "{}", v),
            Value::ConstFloat(v) => write!(f, "{}", format_double(*v)),
            Value::ConstBool(b) => write!(f, "{}", b),
            Value::NullPtr => write!(f, "null"),
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
            BinOp::SRem => "srem",
            BinOp::FAdd => "fadd",
            BinOp::FSub => "fsub",
            BinOp::FMul => "fmul",
            BinOp::FDiv => "fdiv",
            BinOp::FRem => "frem",
            BinOp::Xor => "xor",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for ICmpPred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ICmpPred::Eq => "eq",
            ICmpPred::Ne => "ne",
            ICmpPred::Slt => "slt",
            ICmpPred::Sgt => "sgt",
            ICmpPred::Sle => "sle",
            ICmpPred::Sge => "sge",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for FCmpPred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FCmpPred::Oeq => "oeq",
            FCmpPred::One => "one",
            FCmpPred::Olt => "olt",
            FCmpPred::Ogt => "ogt",
            FCmpPred::Ole => "ole",
            FCmpPred::Oge => "oge",
        };
        write!(f, "{}", name)
    }
}

impl fmt::Display for Instr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instr::Alloca { dest, ty } => write!(f, "{} = alloca {}", dest, ty),
            Instr::Load { dest, ty, ptr } => {
                write!(f, "{} = load {}, {}* {}", dest, ty, ty, ptr)
            }
            Instr::Store { ty, value, ptr } => {
                write!(f, "store {} {}, {}* {}", ty, value, ty, ptr)
            }
            Instr::Bin {
                dest,
                op,
                ty,
                lhs,
                rhs,
            } => write!(f, "{} = {} {} {}, {}", dest, op, ty, lhs, rhs),
            Instr::ICmp {
                dest,
                pred,
                ty,
                lhs,
                rhs,
            } => write!(f, "{} = icmp {} {} {}, {}", dest, pred, ty, lhs, rhs),
            Instr::FCmp {
                dest,
                pred,
                lhs,
                rhs,
            } => write!(f, "{} = fcmp {} double {}, {}", dest, pred, lhs, rhs),
            Instr::Zext {
                dest,
                from,
                value,
                to,
            } => write!(f, "{} = zext {} {} to {}", dest, from, value, to),
            Instr::Sitofp { dest, value } => {
                write!(f, "{} = sitofp i64 {} to double", dest, value)
            }
            Instr::Bitcast {
                dest,
                from,
                value,
                to,
            } => write!(f, "{} = bitcast {} {} to {}", dest, from, value, to),
            Instr::Gep {
                dest,
                elem_ty,
                ptr,
                index,
            } => write!(
                f,
                "{} = getelementptr {}, {}* {}, i64 {}",
                dest, elem_ty, elem_ty, ptr, index
            ),
            Instr::Call {
                dest,
                ret,
                callee,
                args,
                variadic_params,
            } => {
                if let Some(dest) = dest {
                    write!(f, "{} = ", dest)?;
                }
                write!(f, "call {}", ret)?;
                if let Some(fixed) = variadic_params {
                    write!(f, " (")?;
                    for param in fixed {
                        write!(f, "{}, ", param)?;
                    }
                    write!(f, "...)")?;
                }
                write!(f, " @{}(", callee)?;
                for (i, (ty, value)) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", ty, value)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Br(label) => write!(f, "br label %{}", label),
            Terminator::CondBr {
                cond,
                then_label,
                else_label,
            } => write!(
                f,
                "br i1 {}, label %{}, label %{}",
                cond, then_label, else_label
            ),
            Terminator::Ret(None) => write!(f, "ret void"),
            Terminator::Ret(Some((ty, value))) => write!(f, "ret {} {}", ty, value),
        }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.label)?;
        for instr in &self.instrs {
            writeln!(f, "  {}", instr)?;
        }
        if let Some(terminator) = &self.terminator {
            writeln!(f, "  {}", terminator)?;
        }
        Ok(())
    }
}

impl fmt::Display for ExternDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "declare {} @{}(", self.ret, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        if self.variadic {
            write!(f, ", ...")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "@{} = internal constant [{} x i8] c\"",
            self.name,
            self.bytes.len()
        )?;
        for &byte in &self.bytes {
            // Printable ASCII passes through; everything else (and the
            // quote/backslash) is hex-escaped.
            if (0x20..0x7f).contains(&byte) && byte != b'"' && byte != b'\\' {
                write!(f, "{}", byte as char)?;
            } else {
                write!(f, "\\{:02X}", byte)?;
            }
        }
        write!(f, "\"")
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "define {} @{}(", self.ret, self.name)?;
        for (i, (name, ty)) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} %{}", ty, name)?;
        }
        writeln!(f, ") {{")?;
        for block in &self.blocks {
            write!(f, "{}", block)?;
        }
        write!(f, "}}")
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "; ModuleID = '{}'", self.name)?;
        writeln!(f)?;
        for decl in &self.externs {
            writeln!(f, "{}", decl)?;
        }
        if !self.globals.is_empty() {
            writeln!(f)?;
            for global in &self.globals {
                writeln!(f, "{}", global)?;
            }
        }
        for function in &self.functions {
            writeln!(f)?;
            writeln!(f, "{}", function)?;
        }
        Ok(())
    }
}
