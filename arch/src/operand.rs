use crate::reg::Reg;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An AT&T syntax operand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Reg(Reg),          // %rax
    Imm(i64),          // $5
    Mem(i64, Reg),     // -8(%rbx)
    Rip(String),       // label(%rip)
}

impl Operand {
    pub fn mem(disp: i64, base: Reg) -> Self {
        Operand::Mem(disp, base)
    }

    pub fn rip(label: impl Into<String>) -> Self {
        Operand::Rip(label.into())
    }
}

impl From<Reg> for Operand {
    fn from(reg: Reg) -> Self {
        Operand::Reg(reg)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Reg(reg) => write!(f, "%{}", reg),
            Operand::Imm(val) => write!(f, "${}", val),
            Operand::Mem(disp, base) => write!(f, "{}(%{})", disp, base),
            Operand::Rip(label) => write!(f, "{}(%rip)", label),
        }
    }
}
