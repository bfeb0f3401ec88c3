use crate::{
    ast::{Decl, DeclId},
    resolve::global::Global,
};

/// Locals visible inside one function, most recent last.
///
/// Parameters seed the list. Lookup walks it from the most recent
/// declaration backwards and falls back to the globals.
pub struct Local<'a> {
    global: &'a Global,
    stack: Vec<DeclId>,
}

impl<'a> Local<'a> {
    pub fn fork(global: &'a Global, params: &[DeclId]) -> Self {
        Self {
            global,
            stack: params.to_vec(),
        }
    }

    pub fn push(&mut self, id: DeclId) {
        self.stack.push(id);
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Forget every local pushed after the list had `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.stack.truncate(len);
    }

    pub fn lookup(&self, decls: &[Decl], name: &str) -> Option<DeclId> {
        self.stack
            .iter()
            .rev()
            .find(|id| decls.get(id.0).is_some_and(|d| d.name == name))
            .copied()
            .or_else(|| self.global.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Base;

    #[test]
    fn later_declarations_shadow() {
        let decls = vec![
            Decl::var(1, Base::Int, "x"),
            Decl::param(2, Base::Int, "x"),
            Decl::var(3, Base::String, "x"),
        ];
        let mut global = Global::new();
        global.insert(&decls[0], DeclId(0)).unwrap();

        let mut local = Local::fork(&global, &[DeclId(1)]);
        assert_eq!(local.lookup(&decls, "x"), Some(DeclId(1)));

        let mark = local.len();
        local.push(DeclId(2));
        assert_eq!(local.lookup(&decls, "x"), Some(DeclId(2)));

        local.truncate(mark);
        local.truncate(0);
        assert_eq!(local.lookup(&decls, "x"), Some(DeclId(0)));
        assert_eq!(local.lookup(&decls, "y"), None);
    }
}
