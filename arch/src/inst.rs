use crate::{cond::Cond, operand::Operand};

use color_print::cformat;
use std::fmt;

/// The x86-64 instructions emitted by the compiler, operands in AT&T order
/// (source first, destination last).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inst {
    MOVQ(Operand, Operand),
    MOVL(Operand, Operand),
    LEAQ(Operand, Operand),

    ADDQ(Operand, Operand),
    ADDL(Operand, Operand),
    SUBQ(Operand, Operand),
    SUBL(Operand, Operand),
    IMULQ(Operand, Operand),
    IMULL(Operand, Operand),
    ANDQ(Operand, Operand),
    NEGL(Operand),

    CMPL(Operand, Operand),
    CLTQ(),
    CQTO(),
    IDIVL(Operand),

    PUSHQ(Operand),
    POPQ(Operand),

    JMP(String),
    J(Cond, String),
    CALL(String),
    RET(),
}

impl Inst {
    pub fn mnemonic(&self) -> String {
        match self {
            Inst::MOVQ(..) => "movq".into(),
            Inst::MOVL(..) => "movl".into(),
            Inst::LEAQ(..) => "leaq".into(),
            Inst::ADDQ(..) => "addq".into(),
            Inst::ADDL(..) => "addl".into(),
            Inst::SUBQ(..) => "subq".into(),
            Inst::SUBL(..) => "subl".into(),
            Inst::IMULQ(..) => "imulq".into(),
            Inst::IMULL(..) => "imull".into(),
            Inst::ANDQ(..) => "andq".into(),
            Inst::NEGL(..) => "negl".into(),
            Inst::CMPL(..) => "cmpl".into(),
            Inst::CLTQ() => "cltq".into(),
            Inst::CQTO() => "cqto".into(),
            Inst::IDIVL(..) => "idivl".into(),
            Inst::PUSHQ(..) => "pushq".into(),
            Inst::POPQ(..) => "popq".into(),
            Inst::JMP(..) => "jmp".into(),
            Inst::J(cond, _) => format!("j{}", cond),
            Inst::CALL(..) => "call".into(),
            Inst::RET() => "ret".into(),
        }
    }

    /// Operands rendered in AT&T order.
    pub fn operands(&self) -> Vec<String> {
        match self {
            Inst::MOVQ(src, dst)
            | Inst::MOVL(src, dst)
            | Inst::LEAQ(src, dst)
            | Inst::ADDQ(src, dst)
            | Inst::ADDL(src, dst)
            | Inst::SUBQ(src, dst)
            | Inst::SUBL(src, dst)
            | Inst::IMULQ(src, dst)
            | Inst::IMULL(src, dst)
            | Inst::ANDQ(src, dst)
            | Inst::CMPL(src, dst) => vec![src.to_string(), dst.to_string()],
            Inst::NEGL(op) | Inst::IDIVL(op) | Inst::PUSHQ(op) | Inst::POPQ(op) => {
                vec![op.to_string()]
            }
            Inst::JMP(label) | Inst::J(_, label) | Inst::CALL(label) => vec![label.clone()],
            Inst::CLTQ() | Inst::CQTO() | Inst::RET() => vec![],
        }
    }
}

impl fmt::Display for Inst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ops = self.operands();
        if ops.is_empty() {
            write!(f, "{}", self.mnemonic())
        } else {
            write!(f, "{} {}", self.mnemonic(), ops.join(", "))
        }
    }
}

impl Inst {
    pub fn cformat(&self) -> String {
        let ops = self.operands().join(", ");
        match self {
            Inst::JMP(_) | Inst::J(..) | Inst::CALL(_) | Inst::RET() => {
                cformat!("<r>{:<6}</><y>{}</>", self.mnemonic(), ops)
            }
            _ => cformat!("<r>{:<6}</><b>{}</>", self.mnemonic(), ops),
        }
    }
}
