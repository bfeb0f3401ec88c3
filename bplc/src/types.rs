use serde::{Deserialize, Serialize};
use strum::Display;

/// Resolved type of an expression or declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display)]
pub enum Type {
    #[strum(serialize = "int")]
    Int,
    #[strum(serialize = "string")]
    String,
    #[strum(serialize = "void")]
    Void,
    #[strum(serialize = "int[]")]
    IntArray,
    #[strum(serialize = "string[]")]
    StringArray,
    #[strum(serialize = "int*")]
    IntPtr,
    #[strum(serialize = "string*")]
    StringPtr,
    #[strum(serialize = "&int")]
    IntAddress,
    #[strum(serialize = "&string")]
    StringAddress,
    #[default]
    #[strum(serialize = "none")]
    None,
}

impl Type {
    /// Element type of an array.
    pub fn element(self) -> Option<Type> {
        match self {
            Type::IntArray => Some(Type::Int),
            Type::StringArray => Some(Type::String),
            _ => None,
        }
    }

    /// Type pointed to by a pointer.
    pub fn pointee(self) -> Option<Type> {
        match self {
            Type::IntPtr => Some(Type::Int),
            Type::StringPtr => Some(Type::String),
            _ => None,
        }
    }

    /// Result of `&` applied to a value of this type.
    pub fn address_of(self) -> Option<Type> {
        match self {
            Type::Int => Some(Type::IntAddress),
            Type::String => Some(Type::StringAddress),
            _ => None,
        }
    }

    /// The only right-hand side type a pointer of this type accepts.
    pub fn assignable_address(self) -> Option<Type> {
        self.pointee().and_then(Type::address_of)
    }

    pub fn is_array(self) -> bool {
        self.element().is_some()
    }
}

/// Human readable list of acceptable types, e.g. `int or string`.
pub fn one_of(types: &[Type]) -> String {
    types
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mappings() {
        assert_eq!(Type::IntArray.element(), Some(Type::Int));
        assert_eq!(Type::StringPtr.pointee(), Some(Type::String));
        assert_eq!(Type::String.address_of(), Some(Type::StringAddress));
        assert_eq!(Type::IntPtr.assignable_address(), Some(Type::IntAddress));
        assert_eq!(Type::IntAddress.address_of(), None);
        assert_eq!(Type::Int.assignable_address(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Type::StringArray.to_string(), "string[]");
        assert_eq!(one_of(&[Type::Int, Type::String]), "int or string");
    }
}
