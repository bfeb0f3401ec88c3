use crate::types::{one_of, Type};
use color_print::ceprintln;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    // Resolution errors
    #[error("Undeclared identifier {name:?} at line {line}")]
    Undeclared { name: String, line: usize },

    #[error("Duplicate declaration {name:?} at line {line}")]
    Duplicate { name: String, line: usize },

    // Type errors
    #[error("Type mismatch at line {line}: expected {}, got {got}", one_of(.expected))]
    Mismatch {
        expected: Vec<Type>,
        got: Type,
        line: usize,
    },

    #[error("Incorrect number of arguments to {name:?} at line {line}: expected {expected}, got {got}")]
    Arity {
        name: String,
        expected: usize,
        got: usize,
        line: usize,
    },

    #[error("{name:?} is not a function at line {line}")]
    NotCallable { name: String, line: usize },

    #[error("{name:?} is a function, not a variable, at line {line}")]
    NotVariable { name: String, line: usize },

    #[error("Expression is not addressable at line {line}")]
    NotAddressable { line: usize },

    #[error("Array {name:?} cannot be assigned at line {line}")]
    NotAssignable { name: String, line: usize },

    #[error("Variable {name:?} declared void at line {line}")]
    VoidVariable { name: String, line: usize },

    // Generation errors
    #[error("No main function")]
    NoMain,

    #[error("Unresolved identifier: {0}")]
    Unresolved(String),

    // Driver errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Source line the error refers to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Undeclared { line, .. }
            | Error::Duplicate { line, .. }
            | Error::Mismatch { line, .. }
            | Error::Arity { line, .. }
            | Error::NotCallable { line, .. }
            | Error::NotVariable { line, .. }
            | Error::NotAddressable { line }
            | Error::NotAssignable { line, .. }
            | Error::VoidVariable { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub fn print_diag(&self, file: &str) {
        match self.line() {
            Some(line) => ceprintln!("<red><bold>error</bold></red>: {}\n  <blue>at</blue> {}:{}", self, file, line),
            None => ceprintln!("<red><bold>error</bold></red>: {}", self),
        }
    }
}
