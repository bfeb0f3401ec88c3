use crate::inst::Inst;

use color_print::cformat;
use std::fmt;

/// One line of a GNU assembler listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Section(String),               // .section .rodata
    Text,                          // .text
    Global(String),                // .global main
    Comm(String, usize, usize),    // .comm name, size, align
    Str(String, String),           // label: .string "text"
    Label(String),                 // label:
    Inst(Inst),                    //     inst
}

impl Line {
    pub fn cformat(&self) -> String {
        match self {
            Line::Inst(inst) => format!("    {}", inst.cformat()),
            Line::Label(name) => cformat!("<g>{}</>:", name),
            Line::Str(name, text) => {
                cformat!("<g>{}</>: .string <y>\"{}\"</>", name, escape(text))
            }
            _ => cformat!("<m>{}</>", self),
        }
    }
}

/// Quote `text` for a `.string` directive.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out
}

impl From<Inst> for Line {
    fn from(inst: Inst) -> Self {
        Line::Inst(inst)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Section(name) => write!(f, ".section {}", name),
            Line::Text => write!(f, ".text"),
            Line::Global(name) => write!(f, ".global {}", name),
            Line::Comm(name, size, align) => write!(f, ".comm {}, {}, {}", name, size, align),
            Line::Str(name, text) => write!(f, "{}: .string \"{}\"", name, escape(text)),
            Line::Label(name) => write!(f, "{}:", name),
            Line::Inst(inst) => write!(f, "    {}", inst),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{operand::Operand, reg::Reg};

    #[test]
    fn directives() {
        assert_eq!(Line::Section(".rodata".into()).to_string(), ".section .rodata");
        assert_eq!(Line::Text.to_string(), ".text");
        assert_eq!(Line::Global("main".into()).to_string(), ".global main");
        assert_eq!(Line::Comm("a".into(), 80, 32).to_string(), ".comm a, 80, 32");
        assert_eq!(
            Line::Str(".S0".into(), "hi".into()).to_string(),
            ".S0: .string \"hi\""
        );
        assert_eq!(Line::Label("main".into()).to_string(), "main:");
    }

    #[test]
    fn string_is_escaped() {
        let line = Line::Str(".WritelnString".into(), "\n".into());
        assert_eq!(line.to_string(), ".WritelnString: .string \"\\n\"");
        assert_eq!(escape("say \"hi\"\t"), "say \\\"hi\\\"\\t");
    }

    #[test]
    fn instruction_is_indented() {
        let line: Line = Inst::PUSHQ(Operand::Reg(Reg::RAX)).into();
        assert_eq!(line.to_string(), "    pushq %rax");
    }
}
