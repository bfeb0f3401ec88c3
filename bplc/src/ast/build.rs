//! Constructors for building trees by hand, used by parsers and tests.
//!
//! ```ignore
//! // x = (a + 1) * 2
//! set("x", mul(paren(add(var("a"), num(1))), num(2)))
//! ```

use super::*;

pub fn num(n: i64) -> Factor {
    Factor::new(FactorKind::Num(n))
}

pub fn string(s: impl Into<String>) -> Factor {
    Factor::new(FactorKind::Str(s.into()))
}

pub fn read() -> Factor {
    Factor::new(FactorKind::Read)
}

pub fn var(name: impl Into<String>) -> Factor {
    Factor::new(FactorKind::Id(Ident::new(name)))
}

pub fn index(name: impl Into<String>, index: impl Into<Expr>) -> Factor {
    Factor::new(FactorKind::Index(Ident::new(name), Box::new(index.into())))
}

pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Factor {
    Factor::new(FactorKind::Call(Ident::new(name), args))
}

pub fn paren(expr: impl Into<Expr>) -> Factor {
    let expr = expr.into();
    Factor {
        line: expr.line,
        ty: Type::None,
        kind: FactorKind::Paren(Box::new(expr)),
    }
}

pub fn neg(operand: impl Into<Unary>) -> Unary {
    let operand = operand.into();
    Unary {
        line: operand.line,
        ty: Type::None,
        kind: UnaryKind::Neg(Box::new(operand)),
    }
}

pub fn addr(operand: Factor) -> Unary {
    Unary {
        line: operand.line,
        ty: Type::None,
        kind: UnaryKind::AddrOf(operand),
    }
}

pub fn deref(operand: Factor) -> Unary {
    Unary {
        line: operand.line,
        ty: Type::None,
        kind: UnaryKind::Deref(operand),
    }
}

fn sum(left: impl Into<Sum>, op: AddOp, right: impl Into<Term>) -> Sum {
    let left = left.into();
    Sum {
        line: left.line,
        ty: Type::None,
        kind: SumKind::Bin(Box::new(left), op, right.into()),
    }
}

pub fn add(left: impl Into<Sum>, right: impl Into<Term>) -> Sum {
    sum(left, AddOp::Add, right)
}

pub fn sub(left: impl Into<Sum>, right: impl Into<Term>) -> Sum {
    sum(left, AddOp::Sub, right)
}

fn term(left: impl Into<Term>, op: MulOp, right: impl Into<Unary>) -> Term {
    let left = left.into();
    Term {
        line: left.line,
        ty: Type::None,
        kind: TermKind::Bin(Box::new(left), op, right.into()),
    }
}

pub fn mul(left: impl Into<Term>, right: impl Into<Unary>) -> Term {
    term(left, MulOp::Mul, right)
}

pub fn div(left: impl Into<Term>, right: impl Into<Unary>) -> Term {
    term(left, MulOp::Div, right)
}

pub fn rem(left: impl Into<Term>, right: impl Into<Unary>) -> Term {
    term(left, MulOp::Mod, right)
}

pub fn cmp(left: impl Into<Sum>, op: RelOp, right: impl Into<Sum>) -> Comp {
    let left = left.into();
    Comp {
        line: left.line,
        ty: Type::None,
        kind: CompKind::Rel(left, op, right.into()),
    }
}

fn assign(target: VarKind, value: impl Into<Expr>) -> Expr {
    let value = value.into();
    let line = value.line;
    Expr {
        line,
        ty: Type::None,
        kind: ExprKind::Assign(
            Var {
                line,
                ty: Type::None,
                kind: target,
            },
            Box::new(value),
        ),
    }
}

/// `name = value`
pub fn set(name: impl Into<String>, value: impl Into<Expr>) -> Expr {
    assign(VarKind::Id(Ident::new(name)), value)
}

/// `name[index] = value`
pub fn set_index(name: impl Into<String>, index: impl Into<Expr>, value: impl Into<Expr>) -> Expr {
    assign(
        VarKind::Index(Ident::new(name), Box::new(index.into())),
        value,
    )
}

/// `*name = value`
pub fn set_deref(name: impl Into<String>, value: impl Into<Expr>) -> Expr {
    assign(VarKind::Deref(Ident::new(name)), value)
}

impl Stmt {
    fn new(kind: StmtKind) -> Self {
        Stmt { line: 0, kind }
    }

    pub fn at(mut self, line: usize) -> Self {
        self.line = line;
        self.stamp(line);
        self
    }

    pub fn expr(expr: impl Into<Expr>) -> Self {
        Stmt::new(StmtKind::Expr(Some(expr.into())))
    }

    /// The empty statement `;`.
    pub fn empty() -> Self {
        Stmt::new(StmtKind::Expr(None))
    }

    pub fn block(block: Block) -> Self {
        Stmt::new(StmtKind::Block(block))
    }

    pub fn if_(cond: impl Into<Expr>, then: Stmt, els: Option<Stmt>) -> Self {
        Stmt::new(StmtKind::If(
            cond.into(),
            Box::new(then),
            els.map(Box::new),
        ))
    }

    pub fn while_(cond: impl Into<Expr>, body: Stmt) -> Self {
        Stmt::new(StmtKind::While(cond.into(), Box::new(body)))
    }

    pub fn ret(value: Option<Expr>) -> Self {
        Stmt::new(StmtKind::Return(value))
    }

    pub fn write(value: impl Into<Expr>) -> Self {
        Stmt::new(StmtKind::Write(Some(value.into())))
    }

    pub fn writeln() -> Self {
        Stmt::new(StmtKind::Write(None))
    }
}

// Lifting a lower layer into a higher one wraps it in the pass-through
// variant of every layer in between.

impl From<Factor> for Unary {
    fn from(f: Factor) -> Self {
        Unary {
            line: f.line,
            ty: Type::None,
            kind: UnaryKind::Factor(f),
        }
    }
}

impl From<Unary> for Term {
    fn from(u: Unary) -> Self {
        Term {
            line: u.line,
            ty: Type::None,
            kind: TermKind::Unary(u),
        }
    }
}

impl From<Term> for Sum {
    fn from(t: Term) -> Self {
        Sum {
            line: t.line,
            ty: Type::None,
            kind: SumKind::Term(t),
        }
    }
}

impl From<Sum> for Comp {
    fn from(s: Sum) -> Self {
        Comp {
            line: s.line,
            ty: Type::None,
            kind: CompKind::Sum(s),
        }
    }
}

impl From<Comp> for Expr {
    fn from(c: Comp) -> Self {
        Expr {
            line: c.line,
            ty: Type::None,
            kind: ExprKind::Comp(c),
        }
    }
}

impl From<Expr> for Factor {
    fn from(e: Expr) -> Self {
        paren(e)
    }
}

macro_rules! lift {
    ($from:ty => $via:ty => $($to:ty),*) => {
        $(
            impl From<$from> for $to {
                fn from(x: $from) -> Self {
                    <$to>::from(<$via>::from(x))
                }
            }
        )*
    };
}

lift!(Factor => Unary => Term);
lift!(Factor => Term => Sum);
lift!(Factor => Sum => Comp);
lift!(Factor => Comp => Expr);
lift!(Unary => Term => Sum);
lift!(Unary => Sum => Comp);
lift!(Unary => Comp => Expr);
lift!(Term => Sum => Comp);
lift!(Term => Comp => Expr);
lift!(Sum => Comp => Expr);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifting_wraps_every_layer() {
        let expr: Expr = num(7).into();
        let ExprKind::Comp(comp) = &expr.kind else {
            panic!("expected comparison layer");
        };
        let CompKind::Sum(sum) = &comp.kind else {
            panic!("expected sum layer");
        };
        let SumKind::Term(term) = &sum.kind else {
            panic!("expected term layer");
        };
        let TermKind::Unary(unary) = &term.kind else {
            panic!("expected unary layer");
        };
        assert_eq!(unary.kind, UnaryKind::Factor(num(7)));
    }

    #[test]
    fn at_stamps_descendants() {
        let expr: Expr = add(var("a"), num(1).at(9)).into();
        let expr = expr.at(4);
        let ExprKind::Comp(comp) = &expr.kind else {
            panic!("expected comparison layer");
        };
        let CompKind::Sum(sum) = &comp.kind else {
            panic!("expected sum layer");
        };
        let SumKind::Bin(left, _, right) = &sum.kind else {
            panic!("expected binary sum");
        };
        assert_eq!(expr.line, 4);
        assert_eq!(left.line, 4);
        assert_eq!(right.line, 9);
    }

    #[test]
    fn function_params_precede_function_decl() {
        let mut ast = Ast::new();
        let id = ast.function(
            1,
            Base::Int,
            "f",
            vec![Decl::param(1, Base::Int, "x")],
            Block::new(vec![], vec![]),
        );
        assert_eq!(id, DeclId(1));
        assert_eq!(ast.decls[1].params(), &[DeclId(0)]);
        assert_eq!(ast.decls[1].ty(), Type::Int);
        assert_eq!(ast.functions().count(), 1);
    }
}
