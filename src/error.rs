//! Compiler diagnostics.
//!
//! Every failure is fatal, but components never terminate the process themselves:
//! they return a [`CompileError`] and the driver decides how to exit. Errors come in
//! two classes. [`SourceError`]s describe malformed input and always carry the line
//! they were detected on. [`InternalError`]s are broken invariants between the
//! parser and the code generator and should be unreachable from any source text.

use crate::lexer::Token;
use crate::types::Type;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{kind} on line {line}")]
    Source { line: u64, kind: SourceError },
    #[error("internal compiler error: {0}")]
    Internal(#[from] InternalError),
    #[error("failed to write assembly: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Source { .. })
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }

    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Source { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub fn source_kind(&self) -> Option<&SourceError> {
        match self {
            Self::Source { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("expected {expected}, but got {got:?}")]
    ExpectedButGot { expected: &'static str, got: Token },
    #[error("unrecognised character {0:?}")]
    UnrecognisedChar(char),
    #[error("identifier too long")]
    IdentifierTooLong,
    #[error("undeclared identifier {0}")]
    Undeclared(String),
    #[error("redeclaration of {0}")]
    Redeclaration(String),
    #[error("incompatible types {0:?} and {1:?}")]
    IncompatibleTypes(Type, Type),
    #[error("bad comparison operator")]
    BadComparison,
    #[error("no return for function {0} with non-void type")]
    NoReturn(String),
    #[error("can't return from void function {0}")]
    ReturnFromVoid(String),
    #[error("{0} is not a function")]
    NotAFunction(String),
    #[error("{0} is a function, not a variable")]
    NotAVariable(String),
    #[error("& operator must be followed by an identifier")]
    AddressOfNonIdentifier,
    #[error("* operator must be followed by an identifier or *")]
    DerefNonIdentifier,
    #[error("can't dereference value of type {0:?}")]
    DerefNonPointer(Type),
    #[error("variable {0} declared void")]
    VoidVariable(String),
    #[error("too many levels of indirection")]
    TooManyIndirections,
    #[error("syntax error, token {0:?}")]
    BadStatement(Token),
}

impl SourceError {
    pub fn at_line(self, line: u64) -> CompileError {
        CompileError::Source { line, kind: self }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("out of registers")]
    OutOfRegisters,
    #[error("trying to free register {0} twice")]
    RegisterDoubleFree(usize),
    #[error("can't reject token twice")]
    TokenRejectedTwice,
    #[error("can't put back two characters")]
    CharPutBackTwice,
    #[error("return outside of a function")]
    ReturnOutsideFunction,
    #[error("no symbol with id {0}")]
    UnknownSymbolId(usize),
    #[error("no symbol named {0}")]
    UnknownSymbolName(String),
    #[error("type {0:?} has no size")]
    Sizeless(Type),
    #[error("no pointer type for {0:?}")]
    NoPointerType(Type),
    #[error("{0:?} is not a pointer type")]
    NotAPointer(Type),
    #[error("{0:?} is not a comparison")]
    NotAComparison(crate::ast::BinaryOp),
    #[error("store to {0} without a source register")]
    StoreWithoutSource(String),
    #[error("expression produced no value")]
    MissingValue,
    #[error("function {0} has no end label")]
    NoEndLabel(String),
}
