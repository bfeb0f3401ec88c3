pub mod build;

use crate::types::Type;
use serde::{Deserialize, Serialize};

/// Index into [`Ast::decls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclId(pub usize);

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Ast {
    pub decls: Vec<Decl>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Item {
    Var(DeclId),
    Func(Function),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub decl: DeclId,
    pub body: Block,
    #[serde(default)]
    pub frame_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Base {
    Int,
    String,
    Void,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    Var,               // int x;
    Array(usize),      // int a[10];
    Pointer,           // int *p;
    Param,             // f(int x)
    ArrayParam,        // f(int a[])
    PointerParam,      // f(int *p)
    Func(Vec<DeclId>), // int f(...) { ... }
}

/// Stack slot assigned by frame layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub depth: usize,
    pub position: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decl {
    pub line: usize,
    pub name: String,
    pub base: Base,
    pub kind: DeclKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
}

impl Decl {
    fn new(line: usize, base: Base, name: impl Into<String>, kind: DeclKind) -> Self {
        Decl {
            line,
            name: name.into(),
            base,
            kind,
            slot: None,
        }
    }

    pub fn var(line: usize, base: Base, name: impl Into<String>) -> Self {
        Decl::new(line, base, name, DeclKind::Var)
    }

    pub fn array(line: usize, base: Base, name: impl Into<String>, len: usize) -> Self {
        Decl::new(line, base, name, DeclKind::Array(len))
    }

    pub fn pointer(line: usize, base: Base, name: impl Into<String>) -> Self {
        Decl::new(line, base, name, DeclKind::Pointer)
    }

    pub fn param(line: usize, base: Base, name: impl Into<String>) -> Self {
        Decl::new(line, base, name, DeclKind::Param)
    }

    pub fn array_param(line: usize, base: Base, name: impl Into<String>) -> Self {
        Decl::new(line, base, name, DeclKind::ArrayParam)
    }

    pub fn pointer_param(line: usize, base: Base, name: impl Into<String>) -> Self {
        Decl::new(line, base, name, DeclKind::PointerParam)
    }

    /// Declared type. For a function this is its return type.
    /// A `void` variable has no type and yields [`Type::None`].
    pub fn ty(&self) -> Type {
        match (&self.kind, self.base) {
            (DeclKind::Func(_), Base::Int) => Type::Int,
            (DeclKind::Func(_), Base::String) => Type::String,
            (DeclKind::Func(_), Base::Void) => Type::Void,
            (_, Base::Void) => Type::None,
            (DeclKind::Var | DeclKind::Param, Base::Int) => Type::Int,
            (DeclKind::Var | DeclKind::Param, Base::String) => Type::String,
            (DeclKind::Array(_) | DeclKind::ArrayParam, Base::Int) => Type::IntArray,
            (DeclKind::Array(_) | DeclKind::ArrayParam, Base::String) => Type::StringArray,
            (DeclKind::Pointer | DeclKind::PointerParam, Base::Int) => Type::IntPtr,
            (DeclKind::Pointer | DeclKind::PointerParam, Base::String) => Type::StringPtr,
        }
    }

    /// Number of 8-byte positions the declaration occupies.
    pub fn width(&self) -> usize {
        match self.kind {
            DeclKind::Array(len) => len,
            _ => 1,
        }
    }

    pub fn is_func(&self) -> bool {
        matches!(self.kind, DeclKind::Func(_))
    }

    pub fn params(&self) -> &[DeclId] {
        match &self.kind {
            DeclKind::Func(params) => params,
            _ => &[],
        }
    }
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration to the arena without placing it anywhere in the tree.
    pub fn declare(&mut self, decl: Decl) -> DeclId {
        self.decls.push(decl);
        DeclId(self.decls.len() - 1)
    }

    pub fn decl(&self, id: DeclId) -> Option<&Decl> {
        self.decls.get(id.0)
    }

    /// Declare a global variable.
    pub fn global(&mut self, decl: Decl) -> DeclId {
        let id = self.declare(decl);
        self.items.push(Item::Var(id));
        id
    }

    /// Declare a function with its parameters and body.
    pub fn function(
        &mut self,
        line: usize,
        ret: Base,
        name: impl Into<String>,
        params: Vec<Decl>,
        body: Block,
    ) -> DeclId {
        let params = params.into_iter().map(|p| self.declare(p)).collect();
        let decl = self.declare(Decl::new(line, ret, name, DeclKind::Func(params)));
        self.items.push(Item::Func(Function {
            decl,
            body,
            frame_size: 0,
        }));
        decl
    }

    pub fn functions(&self) -> impl Iterator<Item = &Function> {
        self.items.iter().filter_map(|item| match item {
            Item::Func(func) => Some(func),
            Item::Var(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub line: usize,
    pub locals: Vec<DeclId>,
    pub stmts: Vec<Stmt>,
    #[serde(default)]
    pub size: usize,
    #[serde(default)]
    pub span: usize,
}

impl Block {
    pub fn new(locals: Vec<DeclId>, stmts: Vec<Stmt>) -> Self {
        Block {
            line: 0,
            locals,
            stmts,
            size: 0,
            span: 0,
        }
    }

    pub fn at(mut self, line: usize) -> Self {
        self.line = line;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub line: usize,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StmtKind {
    Expr(Option<Expr>),
    Block(Block),
    If(Expr, Box<Stmt>, Option<Box<Stmt>>),
    While(Expr, Box<Stmt>),
    Return(Option<Expr>),
    Write(Option<Expr>),
}

/// Identifier use. `decl` is filled by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decl: Option<DeclId>,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Ident {
            name: name.into(),
            decl: None,
        }
    }
}

/// One expression layer. `ty` is filled by the resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node<K> {
    #[serde(default)]
    pub line: usize,
    #[serde(default)]
    pub ty: Type,
    pub kind: K,
}

pub type Expr = Node<ExprKind>;
pub type Var = Node<VarKind>;
pub type Comp = Node<CompKind>;
pub type Sum = Node<SumKind>;
pub type Term = Node<TermKind>;
pub type Unary = Node<UnaryKind>;
pub type Factor = Node<FactorKind>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Assign(Var, Box<Expr>),
    Comp(Comp),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VarKind {
    Id(Ident),
    Index(Ident, Box<Expr>),
    Deref(Ident),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CompKind {
    Sum(Sum),
    Rel(Sum, RelOp, Sum),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SumKind {
    Term(Term),
    Bin(Box<Sum>, AddOp, Term),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TermKind {
    Unary(Unary),
    Bin(Box<Term>, MulOp, Unary),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UnaryKind {
    Neg(Box<Unary>),
    AddrOf(Factor),
    Deref(Factor),
    Factor(Factor),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FactorKind {
    Paren(Box<Expr>),
    Id(Ident),
    Index(Ident, Box<Expr>),
    Call(Ident, Vec<Expr>),
    Num(i64),
    Str(String),
    Read,
}

impl Expr {
    /// The factor this expression merely wraps, if it is nothing more.
    pub fn as_factor(&self) -> Option<&Factor> {
        let ExprKind::Comp(comp) = &self.kind else {
            return None;
        };
        let CompKind::Sum(sum) = &comp.kind else {
            return None;
        };
        let SumKind::Term(term) = &sum.kind else {
            return None;
        };
        let TermKind::Unary(unary) = &term.kind else {
            return None;
        };
        match &unary.kind {
            UnaryKind::Factor(factor) => Some(factor),
            _ => None,
        }
    }
}

impl Factor {
    /// The variable or array element this factor names, looking through
    /// parentheses. Only such factors have an address.
    pub fn place(&self) -> Option<&Factor> {
        match &self.kind {
            FactorKind::Id(_) | FactorKind::Index(..) => Some(self),
            FactorKind::Paren(expr) => expr.as_factor()?.place(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelOp {
    Lt,
    Le,
    Eq,
    Ne,
    Gt,
    Ge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOp {
    Add,
    Sub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MulOp {
    Mul,
    Div,
    Mod,
}

/// Propagates a source line to every node that has none yet.
pub trait Stamp {
    fn stamp(&mut self, line: usize);
}

impl<K: Stamp> Stamp for Node<K> {
    fn stamp(&mut self, line: usize) {
        if self.line == 0 {
            self.line = line;
        }
        self.kind.stamp(line);
    }
}

impl<K: Stamp> Node<K> {
    pub fn new(kind: K) -> Self {
        Node {
            line: 0,
            ty: Type::None,
            kind,
        }
    }

    /// Set the line of this node and of every descendant without one.
    pub fn at(mut self, line: usize) -> Self {
        self.line = line;
        self.kind.stamp(line);
        self
    }
}

impl<T: Stamp> Stamp for Box<T> {
    fn stamp(&mut self, line: usize) {
        (**self).stamp(line)
    }
}

impl Stamp for ExprKind {
    fn stamp(&mut self, line: usize) {
        match self {
            ExprKind::Assign(var, value) => {
                var.stamp(line);
                value.stamp(line);
            }
            ExprKind::Comp(comp) => comp.stamp(line),
        }
    }
}

impl Stamp for VarKind {
    fn stamp(&mut self, line: usize) {
        if let VarKind::Index(_, index) = self {
            index.stamp(line);
        }
    }
}

impl Stamp for CompKind {
    fn stamp(&mut self, line: usize) {
        match self {
            CompKind::Sum(sum) => sum.stamp(line),
            CompKind::Rel(left, _, right) => {
                left.stamp(line);
                right.stamp(line);
            }
        }
    }
}

impl Stamp for SumKind {
    fn stamp(&mut self, line: usize) {
        match self {
            SumKind::Term(term) => term.stamp(line),
            SumKind::Bin(left, _, right) => {
                left.stamp(line);
                right.stamp(line);
            }
        }
    }
}

impl Stamp for TermKind {
    fn stamp(&mut self, line: usize) {
        match self {
            TermKind::Unary(unary) => unary.stamp(line),
            TermKind::Bin(left, _, right) => {
                left.stamp(line);
                right.stamp(line);
            }
        }
    }
}

impl Stamp for UnaryKind {
    fn stamp(&mut self, line: usize) {
        match self {
            UnaryKind::Neg(inner) => inner.stamp(line),
            UnaryKind::AddrOf(f) | UnaryKind::Deref(f) | UnaryKind::Factor(f) => f.stamp(line),
        }
    }
}

impl Stamp for FactorKind {
    fn stamp(&mut self, line: usize) {
        match self {
            FactorKind::Paren(expr) | FactorKind::Index(_, expr) => expr.stamp(line),
            FactorKind::Call(_, args) => args.iter_mut().for_each(|a| a.stamp(line)),
            FactorKind::Id(_) | FactorKind::Num(_) | FactorKind::Str(_) | FactorKind::Read => {}
        }
    }
}

impl Stamp for Stmt {
    fn stamp(&mut self, line: usize) {
        if self.line == 0 {
            self.line = line;
        }
        match &mut self.kind {
            StmtKind::Expr(expr) | StmtKind::Return(expr) | StmtKind::Write(expr) => {
                if let Some(expr) = expr {
                    expr.stamp(line);
                }
            }
            StmtKind::If(cond, then, els) => {
                cond.stamp(line);
                then.stamp(line);
                if let Some(els) = els {
                    els.stamp(line);
                }
            }
            StmtKind::While(cond, body) => {
                cond.stamp(line);
                body.stamp(line);
            }
            StmtKind::Block(block) => {
                if block.line == 0 {
                    block.line = line;
                }
            }
        }
    }
}
