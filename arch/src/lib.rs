//! x86-64 model used by the BPL back end: registers, operands,
//! condition codes, instructions and assembler lines, all rendering to
//! GNU `as` AT&T syntax.

pub mod asm;
pub mod cond;
pub mod inst;
pub mod operand;
pub mod reg;
