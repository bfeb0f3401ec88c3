use crate::{
    ast::{Ast, Block, Decl, DeclId, Item, Stmt, StmtKind},
    error::Error,
    frame,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Where every variable of a laid out program lives.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMap {
    /// Global name to storage size in bytes.
    pub globals: IndexMap<String, usize>,
    pub functions: IndexMap<String, FrameEntry>,
}

#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameEntry {
    pub frame_size: usize,
    pub params: Vec<SlotEntry>,
    pub locals: Vec<SlotEntry>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotEntry {
    pub name: String,
    pub depth: usize,
    pub position: usize,
    pub size: usize,
    /// Offset from `%rbx`
    pub offset: i64,
}

impl SlotEntry {
    fn new(decl: &Decl) -> Option<Self> {
        let slot = decl.slot?;
        Some(SlotEntry {
            name: decl.name.clone(),
            depth: slot.depth,
            position: slot.position,
            size: 8 * decl.width(),
            offset: frame::offset(decl)?,
        })
    }
}

impl FrameMap {
    pub fn generate(ast: &Ast) -> Self {
        let mut map = FrameMap::default();
        for item in &ast.items {
            match item {
                Item::Var(id) => {
                    if let Some(decl) = ast.decl(*id) {
                        map.globals.insert(decl.name.clone(), 8 * decl.width());
                    }
                }
                Item::Func(func) => {
                    let Some(decl) = ast.decl(func.decl) else {
                        continue;
                    };
                    let mut locals = Vec::new();
                    collect_block(&func.body, &mut locals);
                    let entries = |ids: &[DeclId]| -> Vec<SlotEntry> {
                        ids.iter()
                            .filter_map(|id| ast.decl(*id).and_then(SlotEntry::new))
                            .collect()
                    };
                    map.functions.insert(
                        decl.name.clone(),
                        FrameEntry {
                            frame_size: func.frame_size,
                            params: entries(decl.params()),
                            locals: entries(locals.as_slice()),
                        },
                    );
                }
            }
        }
        map
    }

    pub fn to_yaml(&self) -> Result<String, Error> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn collect_block(block: &Block, out: &mut Vec<DeclId>) {
    out.extend(&block.locals);
    for stmt in &block.stmts {
        collect_stmt(stmt, out);
    }
}

fn collect_stmt(stmt: &Stmt, out: &mut Vec<DeclId>) {
    match &stmt.kind {
        StmtKind::Block(block) => collect_block(block, out),
        StmtKind::If(_, then, els) => {
            collect_stmt(then, out);
            if let Some(els) = els {
                collect_stmt(els, out);
            }
        }
        StmtKind::While(_, body) => collect_stmt(body, out),
        StmtKind::Expr(_) | StmtKind::Return(_) | StmtKind::Write(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Base, Block};
    use crate::{layout, resolve, Config};

    #[test]
    fn lists_globals_and_slots() {
        let mut ast = Ast::new();
        ast.global(Decl::var(1, Base::Int, "g"));
        let x = ast.declare(Decl::var(2, Base::Int, "x"));
        let a = ast.declare(Decl::array(2, Base::Int, "a", 2));
        ast.function(1, Base::Void, "main", vec![], Block::new(vec![x, a], vec![]));
        resolve(&mut ast, &Config::default()).unwrap();
        layout(&mut ast);

        let map = FrameMap::generate(&ast);
        assert_eq!(map.globals.get("g"), Some(&8));
        let main = &map.functions["main"];
        assert_eq!(main.frame_size, 24);
        assert!(main.params.is_empty());
        let slots: Vec<_> = main
            .locals
            .iter()
            .map(|s| (s.name.as_str(), s.size, s.offset))
            .collect();
        assert_eq!(slots, vec![("x", 8, -8), ("a", 16, -24)]);
        assert!(map.to_yaml().unwrap().contains("frame_size: 24"));
    }
}
