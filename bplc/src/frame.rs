use crate::ast::{Ast, Block, Decl, DeclId, Item, Slot, Stmt, StmtKind};

/// Depth of a function body block. Globals are 0, parameters 1.
pub const BODY_DEPTH: usize = 2;

/// Assign a stack slot to every declaration and size every block.
///
/// Positions are numbered from 0 through the whole function and never
/// reused, so a local in one block never overlaps a local in a sibling.
pub fn layout(ast: &mut Ast) {
    let Ast { decls, items } = ast;
    for item in items.iter_mut() {
        match item {
            Item::Var(id) => place(decls, *id, 0, 0),
            Item::Func(func) => {
                place(decls, func.decl, 0, 0);
                let params = decls
                    .get(func.decl.0)
                    .map(|d| d.params().to_vec())
                    .unwrap_or_default();
                for (position, id) in params.into_iter().enumerate() {
                    place(decls, id, 1, position);
                }

                let mut frame = Frame {
                    decls: &mut decls[..],
                    next: 0,
                };
                frame.block(&mut func.body, BODY_DEPTH, 0);
                func.frame_size = 8 * frame.next;
            }
        }
    }
}

/// Offset from `%rbx` of the slot holding `decl`, or `None` for globals
/// and declarations without a slot. Parameters sit above the saved frame
/// register and return address; locals grow downwards. A local array is
/// addressed at its lowest element, so its elements ascend towards `%rbx`.
pub fn offset(decl: &Decl) -> Option<i64> {
    let slot = decl.slot?;
    match slot.depth {
        0 => None,
        1 => Some(16 + 8 * slot.position as i64),
        _ => {
            let last = slot.position + decl.width() - 1;
            Some(-8 - 8 * last as i64)
        }
    }
}

fn place(decls: &mut [Decl], id: DeclId, depth: usize, position: usize) {
    if let Some(decl) = decls.get_mut(id.0) {
        decl.slot = Some(Slot { depth, position });
    }
}

struct Frame<'a> {
    decls: &'a mut [Decl],
    next: usize,
}

impl Frame<'_> {
    /// `floor` is the first position not reserved by the enclosing blocks.
    fn block(&mut self, block: &mut Block, depth: usize, floor: usize) {
        let start = self.next;
        for &id in &block.locals {
            if let Some(decl) = self.decls.get_mut(id.0) {
                decl.slot = Some(Slot {
                    depth,
                    position: self.next,
                });
                self.next += decl.width();
            }
        }
        let end = self.next;
        block.size = 8 * (end - start);
        block.span = 8 * (end - floor);

        for stmt in &mut block.stmts {
            self.stmt(stmt, depth, end);
        }
    }

    fn stmt(&mut self, stmt: &mut Stmt, depth: usize, floor: usize) {
        match &mut stmt.kind {
            StmtKind::Block(block) => self.block(block, depth + 1, floor),
            StmtKind::If(_, then, els) => {
                self.stmt(then, depth, floor);
                if let Some(els) = els {
                    self.stmt(els, depth, floor);
                }
            }
            StmtKind::While(_, body) => self.stmt(body, depth, floor),
            StmtKind::Expr(_) | StmtKind::Return(_) | StmtKind::Write(_) => {}
        }
    }
}
