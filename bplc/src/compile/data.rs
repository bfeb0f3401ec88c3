use crate::{
    ast::*,
    compile::{Code, Labels},
    error::Error,
    resolve::declared,
};
use arch::asm::Line;
use indexmap::IndexMap;

pub const WRITE_INT: &str = ".WriteIntString";
pub const WRITELN: &str = ".WritelnString";
pub const WRITE_STRING: &str = ".WriteStringString";
pub const READ_INT: &str = ".ReadIntString";

/// Alignment of every `.comm` block.
const COMM_ALIGN: usize = 32;

/// Pool of distinct string literals, text to label, in first-seen order.
#[derive(Debug, Default)]
pub struct Strings(IndexMap<String, String>);

impl Strings {
    pub fn label(&self, text: &str) -> Result<&str, Error> {
        self.0
            .get(text)
            .map(String::as_str)
            .ok_or_else(|| Error::Unresolved(format!("string {:?}", text)))
    }

    fn intern(&mut self, text: &str, labels: &mut Labels) {
        if !self.0.contains_key(text) {
            self.0.insert(text.to_string(), labels.string());
        }
    }
}

/// The read-only data: format strings, global storage and string literals.
pub fn section(ast: &Ast, labels: &mut Labels) -> Result<(Code, Strings), Error> {
    let mut lines = vec![
        Line::Section(".rodata".into()),
        Line::Str(WRITE_INT.into(), "%d ".into()),
        Line::Str(WRITELN.into(), "\n".into()),
        Line::Str(WRITE_STRING.into(), "%s ".into()),
        Line::Str(READ_INT.into(), "%d".into()),
    ];

    for item in &ast.items {
        if let Item::Var(id) = item {
            let decl = declared(&ast.decls, *id)?;
            lines.push(Line::Comm(decl.name.clone(), 8 * decl.width(), COMM_ALIGN));
        }
    }

    let mut strings = Strings::default();
    let mut collector = Collector {
        strings: &mut strings,
        labels,
    };
    for func in ast.functions() {
        collector.block(&func.body);
    }
    for (text, label) in &strings.0 {
        lines.push(Line::Str(label.clone(), text.clone()));
    }

    Ok((Code(lines), strings))
}

/// Walks the tree left to right, interning every string literal.
struct Collector<'a> {
    strings: &'a mut Strings,
    labels: &'a mut Labels,
}

impl Collector<'_> {
    fn block(&mut self, block: &Block) {
        block.stmts.iter().for_each(|stmt| self.stmt(stmt));
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) | StmtKind::Return(expr) | StmtKind::Write(expr) => {
                if let Some(expr) = expr {
                    self.expr(expr);
                }
            }
            StmtKind::Block(block) => self.block(block),
            StmtKind::If(cond, then, els) => {
                self.expr(cond);
                self.stmt(then);
                if let Some(els) = els {
                    self.stmt(els);
                }
            }
            StmtKind::While(cond, body) => {
                self.expr(cond);
                self.stmt(body);
            }
        }
    }

    fn expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Assign(target, value) => {
                if let VarKind::Index(_, index) = &target.kind {
                    self.expr(index);
                }
                self.expr(value);
            }
            ExprKind::Comp(comp) => match &comp.kind {
                CompKind::Sum(sum) => self.sum(sum),
                CompKind::Rel(left, _, right) => {
                    self.sum(left);
                    self.sum(right);
                }
            },
        }
    }

    fn sum(&mut self, sum: &Sum) {
        match &sum.kind {
            SumKind::Term(term) => self.term(term),
            SumKind::Bin(left, _, right) => {
                self.sum(left);
                self.term(right);
            }
        }
    }

    fn term(&mut self, term: &Term) {
        match &term.kind {
            TermKind::Unary(unary) => self.unary(unary),
            TermKind::Bin(left, _, right) => {
                self.term(left);
                self.unary(right);
            }
        }
    }

    fn unary(&mut self, unary: &Unary) {
        match &unary.kind {
            UnaryKind::Neg(inner) => self.unary(inner),
            UnaryKind::AddrOf(f) | UnaryKind::Deref(f) | UnaryKind::Factor(f) => self.factor(f),
        }
    }

    fn factor(&mut self, factor: &Factor) {
        match &factor.kind {
            FactorKind::Paren(expr) | FactorKind::Index(_, expr) => self.expr(expr),
            FactorKind::Call(_, args) => args.iter().for_each(|arg| self.expr(arg)),
            FactorKind::Str(text) => self.strings.intern(text, self.labels),
            FactorKind::Id(_) | FactorKind::Num(_) | FactorKind::Read => {}
        }
    }
}
