pub mod data;
pub mod func;

use crate::{ast::Ast, config::Config, error::Error, frame::layout, resolve::resolve};
use arch::asm::Line;
use func::FuncCompiler;
use std::{fmt, io};

/// A run of assembly lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Code(pub Vec<Line>);

impl Code {
    pub fn write(&self, out: &mut impl io::Write) -> io::Result<()> {
        for line in &self.0 {
            writeln!(out, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.0 {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Source of fresh labels. One counter is shared by control-flow labels
/// (`.L<n>`) and string literal labels (`.S<n>`) across a whole program.
#[derive(Debug, Default)]
pub struct Labels {
    next: usize,
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(&mut self) -> usize {
        self.next += 1;
        self.next - 1
    }

    pub fn label(&mut self) -> String {
        format!(".L{}", self.bump())
    }

    pub fn string(&mut self) -> String {
        format!(".S{}", self.bump())
    }
}

/// Write the assembly for a resolved and laid out tree.
///
/// The data section is written even when the program has no `main`;
/// the code section is not.
pub fn generate(ast: &Ast, labels: &mut Labels, out: &mut impl io::Write) -> Result<(), Error> {
    let (data, strings) = data::section(ast, labels)?;
    data.write(out)?;
    text(ast, &strings, labels)?.write(out)?;
    Ok(())
}

/// The code section: every function in declaration order.
pub fn text(ast: &Ast, strings: &data::Strings, labels: &mut Labels) -> Result<Code, Error> {
    let has_main = ast.functions().any(|func| {
        ast.decl(func.decl)
            .is_some_and(|decl| decl.name == "main")
    });
    if !has_main {
        return Err(Error::NoMain);
    }

    let mut lines = vec![Line::Text, Line::Global("main".into())];
    for func in ast.functions() {
        let mut compiler = FuncCompiler::new(&ast.decls, strings, labels);
        lines.extend(compiler.function(func)?);
    }
    lines.push(Line::Section(".note.GNU-stack,\"\",@progbits".into()));
    Ok(Code(lines))
}

/// Run every pass over `ast` and return the assembly text.
pub fn compile(ast: &mut Ast, config: &Config) -> Result<String, Error> {
    resolve(ast, config)?;
    layout(ast);
    let mut out = Vec::new();
    generate(ast, &mut Labels::new(), &mut out)?;
    String::from_utf8(out).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}
