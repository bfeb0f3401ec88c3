use serde::{Deserialize, Serialize};
use strum::Display;

/// General purpose registers used by the code generator.
/// 64-bit names first, then the 32-bit views used by `int` arithmetic.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Reg {
    RAX,
    RBX,
    RCX,
    RSI,
    RDI,
    RSP,

    EAX,
    ECX,
    EDX,
    ESI,
}

#[test]
fn test() {
    assert_eq!(Reg::RAX.to_string(), "rax");
    assert_eq!(Reg::ECX.to_string(), "ecx");
}
