//! Code emission using [Display]
//!
//! Implementations of [Display] for the assembly model in [codegen](crate::codegen),
//! so that every instruction and directive can be written with [write!] or
//! turned into text with [to_string].
//!
//! [Display]: https://doc.rust-lang.org/std/fmt/trait.Display.html
//! [to_string]: https://doc.rust-lang.org/std/string/trait.ToString.html#tymethod.to_string
//! [write!]: https://doc.rust-lang.org/std/macro.write.html

use crate::codegen::*;

use std::fmt;

/// Text section, the `printf` format string and the `printint` helper.
pub const PREAMBLE: &str = "\t.text
.LC0:
\t.string\t\"%d\\n\"
printint:
\tpushq\t%rbp
\tmovq\t%rsp, %rbp
\tsubq\t$16, %rsp
\tmovl\t%edi, -4(%rbp)
\tmovl\t-4(%rbp), %eax
\tmovl\t%eax, %esi
\tleaq\t.LC0(%rip), %rdi
\tmovl\t$0, %eax
\tcall\tprintf@PLT
\tnop
\tleave
\tret
";

pub const POSTAMBLE: &str = "\t.section\t.note.GNU-stack,\"\",@progbits\n";

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ".L{}", self.id())
    }
}

impl fmt::Display for AsmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Byte => write!(f, "b"),
            Self::Longword => write!(f, "l"),
            Self::Quadword => write!(f, "q"),
        }
    }
}

impl fmt::Display for AsmBinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Add => write!(f, "add"),
            Self::Sub => write!(f, "sub"),
            Self::Imul => write!(f, "imul"),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::E => write!(f, "e"),
            Self::NE => write!(f, "ne"),
            Self::L => write!(f, "l"),
            Self::LE => write!(f, "le"),
            Self::G => write!(f, "g"),
            Self::GE => write!(f, "ge"),
        }
    }
}

fn display_quadword_reg(r: Register) -> &'static str {
    match r {
        Register::R8 => "%r8",
        Register::R9 => "%r9",
        Register::R10 => "%r10",
        Register::R11 => "%r11",
        Register::AX => "%rax",
        Register::DI => "%rdi",
        Register::BP => "%rbp",
        Register::SP => "%rsp",
    }
}

fn display_longword_reg(r: Register) -> &'static str {
    match r {
        Register::R8 => "%r8d",
        Register::R9 => "%r9d",
        Register::R10 => "%r10d",
        Register::R11 => "%r11d",
        Register::AX => "%eax",
        Register::DI => "%edi",
        Register::BP => "%ebp",
        Register::SP => "%esp",
    }
}

fn display_byte_reg(r: Register) -> &'static str {
    match r {
        Register::R8 => "%r8b",
        Register::R9 => "%r9b",
        Register::R10 => "%r10b",
        Register::R11 => "%r11b",
        Register::AX => "%al",
        Register::DI => "%dil",
        Register::BP => "%bpl",
        Register::SP => "%spl",
    }
}

fn display_reg(r: Register, t: AsmType) -> &'static str {
    match t {
        AsmType::Byte => display_byte_reg(r),
        AsmType::Longword => display_longword_reg(r),
        AsmType::Quadword => display_quadword_reg(r),
    }
}

fn display_operand(op: &Operand, t: AsmType) -> String {
    match op {
        Operand::Imm(i) => format!("${i}"),
        Operand::Reg(r) => display_reg(*r, t).to_string(),
        Operand::Data(name) => format!("{name}(%rip)"),
        Operand::Indirect(r) => format!("({})", display_quadword_reg(*r)),
    }
}

impl fmt::Display for AsmInstruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use AsmType::{Byte, Quadword};
        match self {
            Self::Mov(t, src, dst) => {
                let src_str = display_operand(src, *t);
                let dst_str = display_operand(dst, *t);
                write!(f, "\tmov{t}\t{src_str}, {dst_str}")
            }
            Self::MovZX(t, src, dst) => {
                let src_str = display_operand(src, Byte);
                let dst_str = display_operand(dst, *t);
                write!(f, "\tmovzb{t}\t{src_str}, {dst_str}")
            }
            Self::Lea(src, dst) => {
                let src_str = display_operand(src, Quadword);
                let dst_str = display_operand(dst, Quadword);
                write!(f, "\tleaq\t{src_str}, {dst_str}")
            }
            Self::Binary(op, src, dst) => {
                let src_str = display_operand(src, Quadword);
                let dst_str = display_operand(dst, Quadword);
                write!(f, "\t{op}q\t{src_str}, {dst_str}")
            }
            Self::Cqo => write!(f, "\tcqo"),
            Self::Idiv(op) => write!(f, "\tidivq\t{}", display_operand(op, Quadword)),
            Self::Cmp(src, dst) => {
                let src_str = display_operand(src, Quadword);
                let dst_str = display_operand(dst, Quadword);
                write!(f, "\tcmpq\t{src_str}, {dst_str}")
            }
            Self::SetCC(condition, operand) => {
                write!(f, "\tset{condition}\t{}", display_operand(operand, Byte))
            }
            Self::JmpCC(condition, label) => write!(f, "\tj{condition}\t{label}"),
            Self::Jmp(label) => write!(f, "\tjmp\t{label}"),
            Self::Label(label) => write!(f, "{label}:"),
            Self::Call(name) => write!(f, "\tcall\t{name}"),
            Self::Push(op) => write!(f, "\tpushq\t{}", display_operand(op, Quadword)),
            Self::Pop(op) => write!(f, "\tpopq\t{}", display_operand(op, Quadword)),
            Self::Ret => write!(f, "\tret"),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Text => write!(f, "\t.text"),
            Self::Globl(name) => write!(f, "\t.globl\t{name}"),
            Self::FunctionType(name) => write!(f, "\t.type\t{name}, @function"),
            Self::Entry(name) => write!(f, "{name}:"),
            Self::Comm { name, size } => write!(f, "\t.comm\t{name},{size},{size}"),
        }
    }
}
