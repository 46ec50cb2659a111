use crate::ast::BinaryOp;
use crate::error::InternalError;
use crate::symbols::Identifier;
use crate::types::Type;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(usize);

impl Label {
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    pub fn id(self) -> usize {
        self.0
    }
}

/// Operand width. Scratch registers are always 64 bits wide; the width only
/// decides how much of one is read or written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsmType {
    Byte,
    Longword,
    Quadword,
}

impl TryFrom<Type> for AsmType {
    type Error = InternalError;
    fn try_from(t: Type) -> Result<Self, InternalError> {
        match t.size()? {
            1 => Ok(Self::Byte),
            4 => Ok(Self::Longword),
            _ => Ok(Self::Quadword),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    R8,
    R9,
    R10,
    R11,
    AX,
    DI,
    BP,
    SP,
}

/// Registers handed out by the [`RegisterPool`](super::RegisterPool), in
/// allocation order.
pub const SCRATCH_REGISTERS: [Register; 4] = [Register::R8, Register::R9, Register::R10, Register::R11];

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operand {
    Imm(i64),
    Reg(Register),
    /// Global variable, addressed relative to `%rip`.
    Data(Identifier),
    /// Memory pointed to by a register.
    Indirect(Register),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AsmBinaryOp {
    Add,
    Sub,
    Imul,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Condition {
    E,
    NE,
    L,
    LE,
    G,
    GE,
}

impl Condition {
    /// Condition under which the opposite comparison holds.
    #[must_use]
    pub fn invert(self) -> Self {
        match self {
            Self::E => Self::NE,
            Self::NE => Self::E,
            Self::L => Self::GE,
            Self::LE => Self::G,
            Self::G => Self::LE,
            Self::GE => Self::L,
        }
    }
}

impl TryFrom<BinaryOp> for Condition {
    type Error = InternalError;
    fn try_from(op: BinaryOp) -> Result<Self, InternalError> {
        match op {
            BinaryOp::IsEqual => Ok(Self::E),
            BinaryOp::IsNotEqual => Ok(Self::NE),
            BinaryOp::LessThan => Ok(Self::L),
            BinaryOp::LessOrEqual => Ok(Self::LE),
            BinaryOp::GreaterThan => Ok(Self::G),
            BinaryOp::GreaterOrEqual => Ok(Self::GE),
            _ => Err(InternalError::NotAComparison(op)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmInstruction {
    Mov(AsmType, Operand, Operand),
    /// Zero-extend a byte into a register of the given width.
    MovZX(AsmType, Operand, Operand),
    Lea(Operand, Operand),
    Binary(AsmBinaryOp, Operand, Operand),
    Cqo,
    Idiv(Operand),
    Cmp(Operand, Operand),
    SetCC(Condition, Operand),
    JmpCC(Condition, Label),
    Jmp(Label),
    Label(Label),
    Call(Identifier),
    Push(Operand),
    Pop(Operand),
    Ret,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Text,
    Globl(Identifier),
    FunctionType(Identifier),
    /// Start of a named function.
    Entry(Identifier),
    /// Uninitialised common storage.
    Comm { name: Identifier, size: u8 },
}
