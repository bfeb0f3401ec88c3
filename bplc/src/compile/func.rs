use crate::{
    ast::*,
    compile::{
        data::{Strings, READ_INT, WRITELN, WRITE_INT, WRITE_STRING},
        Labels,
    },
    error::Error,
    frame,
    resolve::declared,
    types::Type,
};
use arch::{asm::Line, cond::Cond, inst::Inst, operand::Operand, reg::Reg::*};
use itertools::chain;

macro_rules! lines {
    ($($line:expr),* $(,)?) => {
        vec![$(Line::from($line)),*]
    };
}

/// Lowers one function. Expressions leave their value in `%rax`, and
/// `%rbx` holds the stack pointer as it was on entry.
pub struct FuncCompiler<'a> {
    decls: &'a [Decl],
    strings: &'a Strings,
    labels: &'a mut Labels,
}

impl From<RelOp> for Cond {
    fn from(op: RelOp) -> Self {
        match op {
            RelOp::Lt => Cond::L,
            RelOp::Le => Cond::LE,
            RelOp::Eq => Cond::E,
            RelOp::Ne => Cond::NE,
            RelOp::Gt => Cond::G,
            RelOp::Ge => Cond::GE,
        }
    }
}

fn push_rax() -> Inst {
    Inst::PUSHQ(RAX.into())
}

/// Drop the operand pushed for a binary operator.
fn pop_operand() -> Inst {
    Inst::ADDQ(Operand::Imm(8), RSP.into())
}

fn top() -> Operand {
    Operand::mem(0, RSP)
}

fn epilogue() -> Vec<Line> {
    lines![Inst::MOVQ(RBX.into(), RSP.into()), Inst::RET()]
}

/// Call into libc with the stack aligned to 16 bytes, restoring `%rsp`
/// afterwards.
fn libc(name: &str) -> Vec<Line> {
    lines![
        Inst::PUSHQ(RSP.into()),
        Inst::PUSHQ(top()),
        Inst::ANDQ(Operand::Imm(-16), RSP.into()),
        Inst::CALL(name.into()),
        Inst::MOVQ(Operand::mem(8, RSP), RSP.into()),
    ]
}

impl<'a> FuncCompiler<'a> {
    pub fn new(decls: &'a [Decl], strings: &'a Strings, labels: &'a mut Labels) -> Self {
        Self {
            decls,
            strings,
            labels,
        }
    }

    pub fn function(&mut self, func: &Function) -> Result<Vec<Line>, Error> {
        let name = &declared(self.decls, func.decl)?.name;
        // Every local slot stays reserved until the epilogue, so a local
        // that outlives its block is never overwritten by later pushes.
        let reserve = match func.frame_size {
            0 => vec![],
            size => lines![Inst::SUBQ(Operand::Imm(size as i64), RSP.into())],
        };
        Ok(chain!(
            lines![Line::Label(name.clone()), Inst::MOVQ(RSP.into(), RBX.into())],
            reserve,
            self.block(&func.body)?,
            epilogue(),
        )
        .collect())
    }

    fn block(&mut self, block: &Block) -> Result<Vec<Line>, Error> {
        let span = Operand::Imm(block.span as i64);
        let mut lines = Vec::new();
        if block.span > 0 {
            lines.push(Inst::SUBQ(span.clone(), RSP.into()).into());
        }
        for stmt in &block.stmts {
            lines.extend(self.stmt(stmt)?);
        }
        if block.span > 0 {
            lines.push(Inst::ADDQ(span, RSP.into()).into());
        }
        Ok(lines)
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<Vec<Line>, Error> {
        match &stmt.kind {
            StmtKind::Expr(None) => Ok(vec![]),
            StmtKind::Expr(Some(expr)) => self.expr(expr),
            StmtKind::Block(block) => self.block(block),

            StmtKind::If(cond, then, els) => {
                let start = self.labels.label();
                let other = self.labels.label();
                let end = self.labels.label();
                let cond = self.expr(cond)?;
                let then = self.stmt(then)?;
                let els = match els {
                    Some(els) => self.stmt(els)?,
                    None => vec![],
                };
                Ok(chain!(
                    lines![Line::Label(start)],
                    cond,
                    lines![
                        Inst::CMPL(Operand::Imm(0), EAX.into()),
                        Inst::J(Cond::E, other.clone()),
                    ],
                    then,
                    lines![Inst::JMP(end.clone()), Line::Label(other)],
                    els,
                    lines![Line::Label(end)],
                )
                .collect())
            }

            StmtKind::While(cond, body) => {
                let start = self.labels.label();
                let end = self.labels.label();
                Ok(chain!(
                    lines![Line::Label(start.clone())],
                    self.expr(cond)?,
                    lines![
                        Inst::CMPL(Operand::Imm(0), EAX.into()),
                        Inst::J(Cond::E, end.clone()),
                    ],
                    self.stmt(body)?,
                    lines![Inst::JMP(start), Line::Label(end)],
                )
                .collect())
            }

            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.expr(expr)?,
                    None => vec![],
                };
                Ok(chain!(value, epilogue()).collect())
            }

            StmtKind::Write(Some(expr)) => {
                let (arg, format) = match expr.ty {
                    Type::Int => (Inst::MOVL(EAX.into(), ESI.into()), WRITE_INT),
                    Type::String => (Inst::MOVQ(RAX.into(), RSI.into()), WRITE_STRING),
                    ty => return Err(Error::Unresolved(format!("write of {}", ty))),
                };
                Ok(chain!(self.expr(expr)?, lines![arg], Self::printf(format)).collect())
            }
            StmtKind::Write(None) => Ok(Self::printf(WRITELN)),
        }
    }

    fn printf(format: &str) -> Vec<Line> {
        chain!(
            lines![
                Inst::LEAQ(Operand::rip(format), RDI.into()),
                Inst::MOVL(Operand::Imm(0), EAX.into()),
            ],
            libc("printf@PLT"),
        )
        .collect()
    }

    fn decl(&self, ident: &Ident) -> Result<&'a Decl, Error> {
        let id = ident
            .decl
            .ok_or_else(|| Error::Unresolved(ident.name.clone()))?;
        declared(self.decls, id)
    }

    /// Memory operand of the slot holding `decl`.
    fn slot(decl: &Decl) -> Result<Operand, Error> {
        match (decl.slot, frame::offset(decl)) {
            (Some(_), Some(offset)) => Ok(Operand::mem(offset, RBX)),
            (Some(_), None) => Ok(Operand::rip(decl.name.as_str())),
            (None, _) => Err(Error::Unresolved(decl.name.clone())),
        }
    }

    /// Address of the first element of an array into `%rax`.
    fn array_base(decl: &Decl) -> Result<Inst, Error> {
        let slot = Self::slot(decl)?;
        Ok(match decl.kind {
            DeclKind::ArrayParam => Inst::MOVQ(slot, RAX.into()),
            _ => Inst::LEAQ(slot, RAX.into()),
        })
    }

    /// Address of `ident[index]` into `%rsi`.
    fn element(&mut self, ident: &Ident, index: &Expr) -> Result<Vec<Line>, Error> {
        let decl = self.decl(ident)?;
        Ok(chain!(
            lines![Self::array_base(decl)?, push_rax()],
            self.expr(index)?,
            lines![
                Inst::CLTQ(),
                Inst::IMULQ(Operand::Imm(8), RAX.into()),
                Inst::POPQ(RSI.into()),
                Inst::ADDQ(RAX.into(), RSI.into()),
            ],
        )
        .collect())
    }

    pub fn expr(&mut self, expr: &Expr) -> Result<Vec<Line>, Error> {
        match &expr.kind {
            ExprKind::Comp(comp) => self.comp(comp),
            ExprKind::Assign(target, value) => {
                let value = self.expr(value)?;
                match &target.kind {
                    VarKind::Id(ident) => {
                        let slot = Self::slot(self.decl(ident)?)?;
                        Ok(chain!(value, lines![Inst::MOVQ(RAX.into(), slot)]).collect())
                    }
                    VarKind::Index(ident, index) => Ok(chain!(
                        value,
                        lines![push_rax()],
                        self.element(ident, index)?,
                        lines![
                            Inst::POPQ(RAX.into()),
                            Inst::MOVQ(RAX.into(), Operand::mem(0, RSI)),
                        ],
                    )
                    .collect()),
                    VarKind::Deref(ident) => {
                        let slot = Self::slot(self.decl(ident)?)?;
                        Ok(chain!(
                            value,
                            lines![
                                push_rax(),
                                Inst::MOVQ(slot, RSI.into()),
                                Inst::POPQ(RAX.into()),
                                Inst::MOVQ(RAX.into(), Operand::mem(0, RSI)),
                            ],
                        )
                        .collect())
                    }
                }
            }
        }
    }

    fn comp(&mut self, comp: &Comp) -> Result<Vec<Line>, Error> {
        match &comp.kind {
            CompKind::Sum(sum) => self.sum(sum),
            CompKind::Rel(left, op, right) => {
                let other = self.labels.label();
                let end = self.labels.label();
                Ok(chain!(
                    self.sum(right)?,
                    lines![push_rax()],
                    self.sum(left)?,
                    lines![
                        Inst::CMPL(top(), EAX.into()),
                        Inst::J(Cond::from(*op).inverse(), other.clone()),
                        Inst::MOVL(Operand::Imm(1), EAX.into()),
                        Inst::JMP(end.clone()),
                        Line::Label(other),
                        Inst::MOVL(Operand::Imm(0), EAX.into()),
                        Line::Label(end),
                        pop_operand(),
                    ],
                )
                .collect())
            }
        }
    }

    fn sum(&mut self, sum: &Sum) -> Result<Vec<Line>, Error> {
        match &sum.kind {
            SumKind::Term(term) => self.term(term),
            SumKind::Bin(left, op, right) => {
                let combine = match op {
                    AddOp::Add => Inst::ADDL(top(), EAX.into()),
                    AddOp::Sub => Inst::SUBL(top(), EAX.into()),
                };
                Ok(chain!(
                    self.term(right)?,
                    lines![push_rax()],
                    self.sum(left)?,
                    lines![combine, pop_operand()],
                )
                .collect())
            }
        }
    }

    fn term(&mut self, term: &Term) -> Result<Vec<Line>, Error> {
        match &term.kind {
            TermKind::Unary(unary) => self.unary(unary),
            TermKind::Bin(left, MulOp::Mul, right) => Ok(chain!(
                self.unary(right)?,
                lines![push_rax()],
                self.term(left)?,
                lines![Inst::IMULL(top(), EAX.into()), pop_operand()],
            )
            .collect()),
            TermKind::Bin(left, op, right) => {
                let remainder = match op {
                    MulOp::Mod => lines![Inst::MOVL(EDX.into(), EAX.into())],
                    _ => vec![],
                };
                Ok(chain!(
                    self.unary(right)?,
                    lines![push_rax()],
                    self.term(left)?,
                    lines![
                        Inst::POPQ(RCX.into()),
                        Inst::CLTQ(),
                        Inst::CQTO(),
                        Inst::IDIVL(ECX.into()),
                    ],
                    remainder,
                )
                .collect())
            }
        }
    }

    fn unary(&mut self, unary: &Unary) -> Result<Vec<Line>, Error> {
        match &unary.kind {
            UnaryKind::Neg(inner) => {
                Ok(chain!(self.unary(inner)?, lines![Inst::NEGL(EAX.into())]).collect())
            }
            UnaryKind::AddrOf(factor) => self.address(factor),
            UnaryKind::Deref(factor) => Ok(chain!(
                self.factor(factor)?,
                lines![Inst::MOVQ(Operand::mem(0, RAX), RAX.into())],
            )
            .collect()),
            UnaryKind::Factor(factor) => self.factor(factor),
        }
    }

    /// Address of a variable or array element into `%rax`.
    fn address(&mut self, factor: &Factor) -> Result<Vec<Line>, Error> {
        let place = factor
            .place()
            .ok_or_else(|| Error::Unresolved("address of a value".into()))?;
        match &place.kind {
            FactorKind::Index(ident, index) => Ok(chain!(
                self.element(ident, index)?,
                lines![Inst::MOVQ(RSI.into(), RAX.into())],
            )
            .collect()),
            FactorKind::Id(ident) => {
                let slot = Self::slot(self.decl(ident)?)?;
                Ok(lines![Inst::LEAQ(slot, RAX.into())])
            }
            _ => Err(Error::Unresolved("address of a value".into())),
        }
    }

    fn factor(&mut self, factor: &Factor) -> Result<Vec<Line>, Error> {
        match &factor.kind {
            FactorKind::Paren(expr) => self.expr(expr),
            FactorKind::Id(ident) => {
                let decl = self.decl(ident)?;
                match decl.kind {
                    // An array used as a value is the address of its elements.
                    DeclKind::Array(_) | DeclKind::ArrayParam => {
                        Ok(lines![Self::array_base(decl)?])
                    }
                    _ => Ok(lines![Inst::MOVQ(Self::slot(decl)?, RAX.into())]),
                }
            }
            FactorKind::Index(ident, index) => Ok(chain!(
                self.element(ident, index)?,
                lines![Inst::MOVQ(Operand::mem(0, RSI), RAX.into())],
            )
            .collect()),
            FactorKind::Call(ident, args) => {
                let name = &self.decl(ident)?.name;
                let mut lines = Vec::new();
                for arg in args.iter().rev() {
                    lines.extend(self.expr(arg)?);
                    lines.push(push_rax().into());
                }
                lines.extend(lines![
                    Inst::PUSHQ(RBX.into()),
                    Inst::CALL(name.clone()),
                    Inst::POPQ(RBX.into()),
                ]);
                if !args.is_empty() {
                    let size = 8 * args.len() as i64;
                    lines.push(Inst::ADDQ(Operand::Imm(size), RSP.into()).into());
                }
                Ok(lines)
            }
            FactorKind::Num(n) => Ok(lines![Inst::MOVQ(Operand::Imm(*n), RAX.into())]),
            FactorKind::Str(text) => {
                let label = self.strings.label(text)?;
                Ok(lines![Inst::LEAQ(Operand::rip(label), RAX.into())])
            }
            FactorKind::Read => Ok(chain!(
                lines![
                    Inst::SUBQ(Operand::Imm(8), RSP.into()),
                    Inst::MOVQ(RSP.into(), RSI.into()),
                    Inst::LEAQ(Operand::rip(READ_INT), RDI.into()),
                    Inst::MOVL(Operand::Imm(0), EAX.into()),
                ],
                libc("scanf@PLT"),
                lines![
                    Inst::MOVL(top(), EAX.into()),
                    Inst::ADDQ(Operand::Imm(8), RSP.into()),
                ],
            )
            .collect()),
        }
    }
}
