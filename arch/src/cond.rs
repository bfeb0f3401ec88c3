use serde::{Deserialize, Serialize};
use strum::Display;

/// Condition codes for `j<cc>` after a signed compare.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display,
)]
#[strum(serialize_all = "lowercase")]
pub enum Cond {
    E,
    NE,
    L,
    LE,
    G,
    GE,
}

impl Cond {
    /// The condition that holds exactly when `self` does not.
    pub fn inverse(self) -> Self {
        use Cond::*;
        match self {
            E => NE,
            NE => E,
            L => GE,
            LE => G,
            G => LE,
            GE => L,
        }
    }
}
