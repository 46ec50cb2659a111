//! Tree-walking x86-64 code generator.
//!
//! Expressions are evaluated into a small pool of scratch registers. Every
//! generation step returns the register holding its value, or `None` for
//! statements. Comparisons have two shapes: a value-producing `set<cc>` when
//! used inside an expression, and a compare-and-jump when they are the
//! condition of an `if` or `while`. [`GenContext`] selects between them.

pub mod asm_ast;
mod registers;


use crate::ast::{BinaryOp, Node, NodeKind};
use crate::emission::{POSTAMBLE, PREAMBLE};
use crate::error::{InternalError, Result};
use crate::symbols::{Identifier, Symbol, SymbolId, SymbolTable, PRINTINT};
use crate::types::Type;

use std::io::Write;
use tracing::debug;

pub use asm_ast::*;
pub use registers::RegisterPool;

/// What the parent node expects from the node being generated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum GenContext {
    /// Leave the value in a register.
    Value,
    /// Jump to `false_label` when the comparison does not hold.
    Condition { false_label: Label },
    /// Store `source` into the lvalue being generated.
    Store { source: Register },
}

pub struct CodeGen<W> {
    out: W,
    registers: RegisterPool,
    next_label: usize,
}

impl<W: Write> CodeGen<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            registers: RegisterPool::new(),
            next_label: 1,
        }
    }

    /// Fresh label, never handed out before.
    pub fn label(&mut self) -> Label {
        let label = Label::new(self.next_label);
        self.next_label += 1;
        label
    }

    pub fn registers(&self) -> &RegisterPool {
        &self.registers
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn preamble(&mut self) -> Result<()> {
        self.registers.free_all();
        self.out.write_all(PREAMBLE.as_bytes())?;
        Ok(())
    }

    pub fn postamble(&mut self) -> Result<()> {
        self.out.write_all(POSTAMBLE.as_bytes())?;
        Ok(())
    }

    /// Reserve storage for a global variable.
    pub fn global_symbol(&mut self, symbol: &Symbol) -> Result<()> {
        let size = symbol.sym_type.size()?;
        debug!(name = %symbol.name, size, "global variable");
        self.directive(Directive::Comm {
            name: symbol.name.clone(),
            size,
        })
    }

    /// Generate a top-level tree (a function) and reset the register pool.
    pub fn generate_tree(&mut self, node: &Node, symbols: &SymbolTable) -> Result<()> {
        self.generate(node, GenContext::Value, symbols)?;
        self.registers.free_all();
        Ok(())
    }

    fn emit(&mut self, instruction: AsmInstruction) -> Result<()> {
        writeln!(self.out, "{instruction}")?;
        Ok(())
    }

    fn directive(&mut self, directive: Directive) -> Result<()> {
        writeln!(self.out, "{directive}")?;
        Ok(())
    }

    fn generate(
        &mut self,
        node: &Node,
        ctx: GenContext,
        symbols: &SymbolTable,
    ) -> Result<Option<Register>> {
        match &node.kind {
            NodeKind::Glue(left, right) => {
                self.generate(left, GenContext::Value, symbols)?;
                self.registers.free_all();
                self.generate(right, GenContext::Value, symbols)?;
                self.registers.free_all();
                Ok(None)
            }
            NodeKind::Function { id, body } => {
                self.gen_function(*id, body.as_deref(), symbols)?;
                Ok(None)
            }
            NodeKind::If {
                condition,
                then,
                els,
            } => {
                self.gen_if(condition, then.as_deref(), els.as_deref(), symbols)?;
                Ok(None)
            }
            NodeKind::While { condition, body } => {
                self.gen_while(condition, body.as_deref(), symbols)?;
                Ok(None)
            }
            NodeKind::Binary(op, left, right) => {
                let left = self.gen_value(left, symbols)?;
                let right = self.gen_value(right, symbols)?;
                self.gen_binary(*op, left, right, ctx)
            }
            NodeKind::IntLiteral(value) => {
                let reg = self.registers.allocate()?;
                let imm = Operand::Imm(*value);
                self.emit(AsmInstruction::Mov(AsmType::Quadword, imm, Operand::Reg(reg)))?;
                Ok(Some(reg))
            }
            NodeKind::Ident(id) => {
                let symbol = symbols.get_by_id(*id)?;
                let reg = self.registers.allocate()?;
                let src = Operand::Data(symbol.name.clone());
                self.gen_load(symbol.sym_type, src, reg)?;
                Ok(Some(reg))
            }
            NodeKind::LvalueIdent(id) => {
                let symbol = symbols.get_by_id(*id)?;
                let GenContext::Store { source } = ctx else {
                    return Err(InternalError::StoreWithoutSource(symbol.name.clone()).into());
                };
                let t = AsmType::try_from(symbol.sym_type)?;
                let dst = Operand::Data(symbol.name.clone());
                self.emit(AsmInstruction::Mov(t, Operand::Reg(source), dst))?;
                Ok(Some(source))
            }
            NodeKind::Assign(value, target) => {
                let source = self.gen_value(value, symbols)?;
                self.generate(target, GenContext::Store { source }, symbols)
            }
            NodeKind::Print(value) => {
                let reg = self.gen_value(value, symbols)?;
                self.emit(AsmInstruction::Mov(
                    AsmType::Quadword,
                    Operand::Reg(reg),
                    Operand::Reg(Register::DI),
                ))?;
                self.emit(AsmInstruction::Call(PRINTINT.into()))?;
                self.registers.free_all();
                Ok(None)
            }
            // Loads already zero-extend to the full register width.
            NodeKind::Widen(inner) => self.generate(inner, GenContext::Value, symbols),
            NodeKind::Return(function, value) => {
                let reg = self.gen_value(value, symbols)?;
                self.gen_return(reg, symbols.get_by_id(*function)?)?;
                Ok(None)
            }
            NodeKind::FunctionCall(id, argument) => {
                let arg = match argument {
                    Some(argument) => Some(self.gen_value(argument, symbols)?),
                    None => None,
                };
                let name = symbols.get_by_id(*id)?.name.clone();
                self.gen_call(name, arg).map(Some)
            }
            NodeKind::AddressOf(id) => {
                let symbol = symbols.get_by_id(*id)?;
                let reg = self.registers.allocate()?;
                let src = Operand::Data(symbol.name.clone());
                self.emit(AsmInstruction::Lea(src, Operand::Reg(reg)))?;
                Ok(Some(reg))
            }
            NodeKind::Deref(pointer) => {
                let reg = self.gen_value(pointer, symbols)?;
                let pointee = pointer.node_type.pointee()?;
                self.gen_load(pointee, Operand::Indirect(reg), reg)?;
                Ok(Some(reg))
            }
        }
    }

    fn gen_value(&mut self, node: &Node, symbols: &SymbolTable) -> Result<Register> {
        self.generate(node, GenContext::Value, symbols)?
            .ok_or_else(|| InternalError::MissingValue.into())
    }

    /// Load a `t`-sized value into `dst`, zero-extended to 64 bits.
    fn gen_load(&mut self, t: Type, src: Operand, dst: Register) -> Result<()> {
        let dst = Operand::Reg(dst);
        let instruction = match AsmType::try_from(t)? {
            AsmType::Byte => AsmInstruction::MovZX(AsmType::Quadword, src, dst),
            // writing the low 32 bits clears the upper half
            t => AsmInstruction::Mov(t, src, dst),
        };
        self.emit(instruction)
    }

    fn gen_binary(
        &mut self,
        op: BinaryOp,
        left: Register,
        right: Register,
        ctx: GenContext,
    ) -> Result<Option<Register>> {
        let (l, r) = (Operand::Reg(left), Operand::Reg(right));
        match op {
            BinaryOp::Add | BinaryOp::Multiply => {
                if let GenContext::Condition { .. } = ctx {
                    return Err(InternalError::NotAComparison(op).into());
                }
                let asm_op = if op == BinaryOp::Add {
                    AsmBinaryOp::Add
                } else {
                    AsmBinaryOp::Imul
                };
                self.emit(AsmInstruction::Binary(asm_op, l, r))?;
                self.registers.free(left)?;
                Ok(Some(right))
            }
            BinaryOp::Substract => {
                if let GenContext::Condition { .. } = ctx {
                    return Err(InternalError::NotAComparison(op).into());
                }
                self.emit(AsmInstruction::Binary(AsmBinaryOp::Sub, r, l))?;
                self.registers.free(right)?;
                Ok(Some(left))
            }
            BinaryOp::Divide => {
                if let GenContext::Condition { .. } = ctx {
                    return Err(InternalError::NotAComparison(op).into());
                }
                let ax = Operand::Reg(Register::AX);
                self.emit(AsmInstruction::Mov(AsmType::Quadword, l.clone(), ax.clone()))?;
                self.emit(AsmInstruction::Cqo)?;
                self.emit(AsmInstruction::Idiv(r))?;
                self.emit(AsmInstruction::Mov(AsmType::Quadword, ax, l))?;
                self.registers.free(right)?;
                Ok(Some(left))
            }
            BinaryOp::IsEqual
            | BinaryOp::IsNotEqual
            | BinaryOp::LessThan
            | BinaryOp::LessOrEqual
            | BinaryOp::GreaterThan
            | BinaryOp::GreaterOrEqual => self.gen_compare(op, left, right, ctx),
        }
    }

    fn gen_compare(
        &mut self,
        op: BinaryOp,
        left: Register,
        right: Register,
        ctx: GenContext,
    ) -> Result<Option<Register>> {
        let condition = Condition::try_from(op)?;
        let (l, r) = (Operand::Reg(left), Operand::Reg(right));
        self.emit(AsmInstruction::Cmp(r.clone(), l))?;

        if let GenContext::Condition { false_label } = ctx {
            self.emit(AsmInstruction::JmpCC(condition.invert(), false_label))?;
            self.registers.free_all();
            return Ok(None);
        }

        self.emit(AsmInstruction::SetCC(condition, r.clone()))?;
        self.emit(AsmInstruction::MovZX(AsmType::Quadword, r.clone(), r))?;
        self.registers.free(left)?;
        Ok(Some(right))
    }

    fn gen_if(
        &mut self,
        condition: &Node,
        then: Option<&Node>,
        els: Option<&Node>,
        symbols: &SymbolTable,
    ) -> Result<()> {
        let false_label = self.label();
        let end_label = els.map(|_| self.label());

        self.generate(condition, GenContext::Condition { false_label }, symbols)?;
        self.registers.free_all();

        if let Some(then) = then {
            self.generate(then, GenContext::Value, symbols)?;
            self.registers.free_all();
        }

        if let (Some(els), Some(end_label)) = (els, end_label) {
            self.emit(AsmInstruction::Jmp(end_label))?;
            self.emit(AsmInstruction::Label(false_label))?;
            self.generate(els, GenContext::Value, symbols)?;
            self.registers.free_all();
            self.emit(AsmInstruction::Label(end_label))
        } else {
            self.emit(AsmInstruction::Label(false_label))
        }
    }

    fn gen_while(
        &mut self,
        condition: &Node,
        body: Option<&Node>,
        symbols: &SymbolTable,
    ) -> Result<()> {
        let start_label = self.label();
        let end_label = self.label();

        self.emit(AsmInstruction::Label(start_label))?;
        let false_label = end_label;
        self.generate(condition, GenContext::Condition { false_label }, symbols)?;
        self.registers.free_all();

        if let Some(body) = body {
            self.generate(body, GenContext::Value, symbols)?;
            self.registers.free_all();
        }

        self.emit(AsmInstruction::Jmp(start_label))?;
        self.emit(AsmInstruction::Label(end_label))
    }

    fn gen_function(
        &mut self,
        id: SymbolId,
        body: Option<&Node>,
        symbols: &SymbolTable,
    ) -> Result<()> {
        let function = symbols.get_by_id(id)?;
        let name = function.name.clone();
        let end_label = function
            .end_label
            .ok_or_else(|| InternalError::NoEndLabel(name.clone()))?;
        debug!(%name, id = id.index(), end_label = end_label.id(), "generating function");

        self.directive(Directive::Text)?;
        self.directive(Directive::Globl(name.clone()))?;
        self.directive(Directive::FunctionType(name.clone()))?;
        self.directive(Directive::Entry(name))?;
        self.emit(AsmInstruction::Push(Operand::Reg(Register::BP)))?;
        self.emit(AsmInstruction::Mov(
            AsmType::Quadword,
            Operand::Reg(Register::SP),
            Operand::Reg(Register::BP),
        ))?;

        if let Some(body) = body {
            self.generate(body, GenContext::Value, symbols)?;
            self.registers.free_all();
        }

        if function.sym_type == Type::Void {
            let eax = Operand::Reg(Register::AX);
            self.emit(AsmInstruction::Mov(AsmType::Longword, Operand::Imm(0), eax))?;
        }
        self.emit(AsmInstruction::Label(end_label))?;
        self.emit(AsmInstruction::Pop(Operand::Reg(Register::BP)))?;
        self.emit(AsmInstruction::Ret)
    }

    /// Call `name`, preserving every other live scratch register across it.
    fn gen_call(&mut self, name: Identifier, arg: Option<Register>) -> Result<Register> {
        let saved: Vec<Register> = self
            .registers
            .live()
            .filter(|r| Some(*r) != arg)
            .collect();
        // %rsp is 16-byte aligned after the prologue
        let padding = saved.len() % 2 == 1;
        let rsp = Operand::Reg(Register::SP);

        for reg in &saved {
            self.emit(AsmInstruction::Push(Operand::Reg(*reg)))?;
        }
        if padding {
            self.emit(AsmInstruction::Binary(AsmBinaryOp::Sub, Operand::Imm(8), rsp.clone()))?;
        }
        if let Some(arg) = arg {
            self.emit(AsmInstruction::Mov(
                AsmType::Quadword,
                Operand::Reg(arg),
                Operand::Reg(Register::DI),
            ))?;
        }
        self.emit(AsmInstruction::Call(name))?;
        if padding {
            self.emit(AsmInstruction::Binary(AsmBinaryOp::Add, Operand::Imm(8), rsp))?;
        }
        for reg in saved.iter().rev() {
            self.emit(AsmInstruction::Pop(Operand::Reg(*reg)))?;
        }

        let result = self.registers.allocate()?;
        self.emit(AsmInstruction::Mov(
            AsmType::Quadword,
            Operand::Reg(Register::AX),
            Operand::Reg(result),
        ))?;
        if let Some(arg) = arg {
            self.registers.free(arg)?;
        }
        Ok(result)
    }

    fn gen_return(&mut self, reg: Register, function: &Symbol) -> Result<()> {
        let end_label = function
            .end_label
            .ok_or_else(|| InternalError::NoEndLabel(function.name.clone()))?;
        let (src, ax) = (Operand::Reg(reg), Operand::Reg(Register::AX));
        let instruction = match AsmType::try_from(function.sym_type)? {
            AsmType::Byte => AsmInstruction::MovZX(AsmType::Longword, src, ax),
            t => AsmInstruction::Mov(t, src, ax),
        };
        self.emit(instruction)?;
        self.emit(AsmInstruction::Jmp(end_label))
    }
}
