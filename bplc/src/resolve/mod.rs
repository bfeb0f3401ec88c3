pub mod func;
pub mod global;
pub mod local;

use crate::{
    ast::{Ast, Decl, DeclId, Item},
    config::Config,
    error::Error,
    types::Type,
};
use func::FuncResolver;
use global::Global;

/// Bind every identifier to its declaration and type every expression.
/// Stops at the first error.
pub fn resolve(ast: &mut Ast, config: &Config) -> Result<(), Error> {
    let Ast { decls, items } = ast;
    let decls: &[Decl] = decls;

    let mut global = Global::new();
    for item in items.iter_mut() {
        match item {
            Item::Var(id) => {
                let decl = declared(decls, *id)?;
                check_variable(decl)?;
                global.insert(decl, *id)?;
            }
            Item::Func(func) => {
                let decl = declared(decls, func.decl)?;
                // Inserted before the body so that recursion resolves.
                global.insert(decl, func.decl)?;
                FuncResolver::new(decls, &global, decl, config.scope)?.block(&mut func.body)?;
            }
        }
    }
    Ok(())
}

pub(crate) fn declared(decls: &[Decl], id: DeclId) -> Result<&Decl, Error> {
    decls
        .get(id.0)
        .ok_or_else(|| Error::Unresolved(format!("declaration #{}", id.0)))
}

fn check_variable(decl: &Decl) -> Result<(), Error> {
    if !decl.is_func() && decl.ty() == Type::None {
        return Err(Error::VoidVariable {
            name: decl.name.clone(),
            line: decl.line,
        });
    }
    Ok(())
}
