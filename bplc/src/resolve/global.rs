use crate::{
    ast::{Decl, DeclId},
    error::Error,
};
use indexmap::IndexMap;

/// Flat namespace of top-level variables and functions.
#[derive(Debug, Default)]
pub struct Global {
    names: IndexMap<String, DeclId>,
}

impl Global {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, decl: &Decl, id: DeclId) -> Result<(), Error> {
        if self.names.contains_key(&decl.name) {
            return Err(Error::Duplicate {
                name: decl.name.clone(),
                line: decl.line,
            });
        }
        self.names.insert(decl.name.clone(), id);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<DeclId> {
        self.names.get(name).copied()
    }
}
