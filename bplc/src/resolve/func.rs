use crate::{
    ast::*,
    config::Scope,
    error::Error,
    resolve::{check_variable, declared, global::Global, local::Local},
    types::Type,
};

/// Resolves and type checks the body of one function.
pub struct FuncResolver<'a> {
    decls: &'a [Decl],
    local: Local<'a>,
    ret: Type,
    scope: Scope,
    /// Line of the innermost enclosing statement, block or function.
    line: usize,
}

fn expect(got: Type, expected: &[Type], line: usize) -> Result<Type, Error> {
    if expected.contains(&got) {
        Ok(got)
    } else {
        Err(Error::Mismatch {
            expected: expected.to_vec(),
            got,
            line,
        })
    }
}

impl<'a> FuncResolver<'a> {
    pub fn new(
        decls: &'a [Decl],
        global: &'a Global,
        func: &'a Decl,
        scope: Scope,
    ) -> Result<Self, Error> {
        for &param in func.params() {
            check_variable(declared(decls, param)?)?;
        }
        Ok(Self {
            decls,
            local: Local::fork(global, func.params()),
            ret: func.ty(),
            scope,
            line: func.line,
        })
    }

    /// `line`, or the enclosing one for nodes built without a line.
    fn line(&self, line: usize) -> usize {
        if line == 0 {
            self.line
        } else {
            line
        }
    }

    pub fn block(&mut self, block: &mut Block) -> Result<(), Error> {
        let outer = self.line;
        self.line = self.line(block.line);
        let mark = self.local.len();
        for &id in &block.locals {
            check_variable(declared(self.decls, id)?)?;
            self.local.push(id);
        }
        for stmt in &mut block.stmts {
            self.stmt(stmt)?;
        }
        if self.scope == Scope::Block {
            self.local.truncate(mark);
        }
        self.line = outer;
        Ok(())
    }

    fn stmt(&mut self, stmt: &mut Stmt) -> Result<(), Error> {
        let outer = self.line;
        let line = self.line(stmt.line);
        self.line = line;
        match &mut stmt.kind {
            StmtKind::Expr(None) | StmtKind::Write(None) => {}
            StmtKind::Expr(Some(expr)) => {
                self.expr(expr)?;
            }
            StmtKind::Block(block) => self.block(block)?,
            StmtKind::If(cond, then, els) => {
                expect(self.expr(cond)?, &[Type::Int], line)?;
                self.stmt(then)?;
                if let Some(els) = els {
                    self.stmt(els)?;
                }
            }
            StmtKind::While(cond, body) => {
                expect(self.expr(cond)?, &[Type::Int], line)?;
                self.stmt(body)?;
            }
            StmtKind::Return(value) => {
                let got = match value {
                    Some(expr) => self.expr(expr)?,
                    None => Type::Void,
                };
                expect(got, &[self.ret], line)?;
            }
            StmtKind::Write(Some(expr)) => {
                expect(self.expr(expr)?, &[Type::Int, Type::String], line)?;
            }
        }
        self.line = outer;
        Ok(())
    }

    /// Bind `ident` to its declaration.
    fn lookup(&self, ident: &mut Ident, line: usize) -> Result<&'a Decl, Error> {
        let id = self
            .local
            .lookup(self.decls, &ident.name)
            .ok_or_else(|| Error::Undeclared {
                name: ident.name.clone(),
                line,
            })?;
        ident.decl = Some(id);
        declared(self.decls, id)
    }

    /// Bind `ident`, which must name a variable rather than a function.
    fn variable(&self, ident: &mut Ident, line: usize) -> Result<Type, Error> {
        let decl = self.lookup(ident, line)?;
        if decl.is_func() {
            return Err(Error::NotVariable {
                name: ident.name.clone(),
                line,
            });
        }
        Ok(decl.ty())
    }

    /// Type of `ident[index]`.
    fn element(&mut self, ident: &mut Ident, index: &mut Expr, line: usize) -> Result<Type, Error> {
        let array = self.variable(ident, line)?;
        let element = array.element().ok_or(Error::Mismatch {
            expected: vec![Type::IntArray, Type::StringArray],
            got: array,
            line,
        })?;
        let got = self.expr(index)?;
        expect(got, &[Type::Int], self.line(index.line))?;
        Ok(element)
    }

    pub fn expr(&mut self, expr: &mut Expr) -> Result<Type, Error> {
        let line = self.line(expr.line);
        let ty = match &mut expr.kind {
            ExprKind::Assign(target, value) => {
                let target = self.var(target)?;
                let got = self.expr(value)?;
                match target.assignable_address() {
                    Some(address) => expect(got, &[address], line)?,
                    None => expect(got, &[target], line)?,
                }
            }
            ExprKind::Comp(comp) => self.comp(comp)?,
        };
        expr.ty = ty;
        Ok(ty)
    }

    fn var(&mut self, var: &mut Var) -> Result<Type, Error> {
        let line = self.line(var.line);
        let ty = match &mut var.kind {
            VarKind::Id(ident) => {
                let ty = self.variable(ident, line)?;
                if ty.is_array() {
                    return Err(Error::NotAssignable {
                        name: ident.name.clone(),
                        line,
                    });
                }
                ty
            }
            VarKind::Index(ident, index) => self.element(ident, index, line)?,
            VarKind::Deref(ident) => {
                let pointer = self.variable(ident, line)?;
                pointer.pointee().ok_or(Error::Mismatch {
                    expected: vec![Type::IntPtr, Type::StringPtr],
                    got: pointer,
                    line,
                })?
            }
        };
        var.ty = ty;
        Ok(ty)
    }

    fn comp(&mut self, comp: &mut Comp) -> Result<Type, Error> {
        let line = self.line(comp.line);
        let ty = match &mut comp.kind {
            CompKind::Sum(sum) => self.sum(sum)?,
            CompKind::Rel(left, _, right) => {
                expect(self.sum(left)?, &[Type::Int], line)?;
                expect(self.sum(right)?, &[Type::Int], line)?
            }
        };
        comp.ty = ty;
        Ok(ty)
    }

    fn sum(&mut self, sum: &mut Sum) -> Result<Type, Error> {
        let line = self.line(sum.line);
        let ty = match &mut sum.kind {
            SumKind::Term(term) => self.term(term)?,
            SumKind::Bin(left, _, right) => {
                expect(self.sum(left)?, &[Type::Int], line)?;
                expect(self.term(right)?, &[Type::Int], line)?
            }
        };
        sum.ty = ty;
        Ok(ty)
    }

    fn term(&mut self, term: &mut Term) -> Result<Type, Error> {
        let line = self.line(term.line);
        let ty = match &mut term.kind {
            TermKind::Unary(unary) => self.unary(unary)?,
            TermKind::Bin(left, _, right) => {
                expect(self.term(left)?, &[Type::Int], line)?;
                expect(self.unary(right)?, &[Type::Int], line)?
            }
        };
        term.ty = ty;
        Ok(ty)
    }

    fn unary(&mut self, unary: &mut Unary) -> Result<Type, Error> {
        let line = self.line(unary.line);
        let ty = match &mut unary.kind {
            UnaryKind::Neg(inner) => expect(self.unary(inner)?, &[Type::Int], line)?,
            UnaryKind::AddrOf(factor) => {
                let ty = expect(self.factor(factor)?, &[Type::Int, Type::String], line)?;
                if factor.place().is_none() {
                    return Err(Error::NotAddressable { line });
                }
                ty.address_of().unwrap_or(Type::None)
            }
            UnaryKind::Deref(factor) => {
                let pointer = self.factor(factor)?;
                pointer.pointee().ok_or(Error::Mismatch {
                    expected: vec![Type::IntPtr, Type::StringPtr],
                    got: pointer,
                    line,
                })?
            }
            UnaryKind::Factor(factor) => self.factor(factor)?,
        };
        unary.ty = ty;
        Ok(ty)
    }

    fn factor(&mut self, factor: &mut Factor) -> Result<Type, Error> {
        let line = self.line(factor.line);
        let ty = match &mut factor.kind {
            FactorKind::Paren(expr) => self.expr(expr)?,
            FactorKind::Id(ident) => self.variable(ident, line)?,
            FactorKind::Index(ident, index) => self.element(ident, index, line)?,
            FactorKind::Call(ident, args) => {
                let func = self.lookup(ident, line)?;
                if !func.is_func() {
                    return Err(Error::NotCallable {
                        name: ident.name.clone(),
                        line,
                    });
                }
                let params = func.params();
                if params.len() != args.len() {
                    return Err(Error::Arity {
                        name: ident.name.clone(),
                        expected: params.len(),
                        got: args.len(),
                        line,
                    });
                }
                for (&param, arg) in params.iter().zip(args.iter_mut()) {
                    let param = declared(self.decls, param)?.ty();
                    let got = self.expr(arg)?;
                    expect(got, &[param], self.line(arg.line))?;
                }
                func.ty()
            }
            FactorKind::Num(_) | FactorKind::Read => Type::Int,
            FactorKind::Str(_) => Type::String,
        };
        factor.ty = ty;
        Ok(ty)
    }
}
