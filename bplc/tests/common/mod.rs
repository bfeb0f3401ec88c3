#![allow(dead_code)]

use bplc::ast::{Ast, Base, Block, Decl, Stmt};

/// Declare `locals` and wrap them with `stmts` into a block.
pub fn block(ast: &mut Ast, locals: Vec<Decl>, stmts: Vec<Stmt>) -> Block {
    let locals = locals.into_iter().map(|d| ast.declare(d)).collect();
    Block::new(locals, stmts)
}

/// Append `void main() { locals stmts }`.
pub fn main_with(ast: &mut Ast, locals: Vec<Decl>, stmts: Vec<Stmt>) {
    let body = block(ast, locals, stmts).at(1);
    ast.function(1, Base::Void, "main", vec![], body);
}

/// A program made of `main` alone.
pub fn prog(locals: Vec<Decl>, stmts: Vec<Stmt>) -> Ast {
    let mut ast = Ast::new();
    main_with(&mut ast, locals, stmts);
    ast
}

pub fn int(name: &str) -> Decl {
    Decl::var(2, Base::Int, name)
}

pub fn string_var(name: &str) -> Decl {
    Decl::var(2, Base::String, name)
}

pub fn int_ptr(name: &str) -> Decl {
    Decl::pointer(2, Base::Int, name)
}

pub fn int_array(name: &str, len: usize) -> Decl {
    Decl::array(2, Base::Int, name, len)
}
