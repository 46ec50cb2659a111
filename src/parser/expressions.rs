use super::Parser;
use crate::ast::{BinaryOp, Node, NodeKind};
use crate::error::{Result, SourceError};
use crate::lexer::Token;
use crate::symbols::Identifier;
use crate::types::{compatible, wider, Coercion, Direction};

use std::io::Write;

/// Binding power of a binary operator; 0 ends an expression.
#[allow(clippy::match_same_arms)]
fn get_prec(token: &Token) -> u64 {
    match token {
        Token::Asterisk => 20,
        Token::FSlash => 20,
        Token::Plus => 10,
        Token::Hyphen => 10,
        Token::IsEqual => 30,
        Token::IsNotEqual => 30,
        Token::IsLessThan => 40,
        Token::IsLessThanOrEqual => 40,
        Token::IsGreaterThan => 40,
        Token::IsGreaterThanOrEqual => 40,
        _ => 0,
    }
}

impl TryFrom<&Token> for BinaryOp {
    type Error = ();
    fn try_from(value: &Token) -> std::result::Result<Self, ()> {
        match value {
            Token::Plus => Ok(BinaryOp::Add),
            Token::Hyphen => Ok(BinaryOp::Substract),
            Token::Asterisk => Ok(BinaryOp::Multiply),
            Token::FSlash => Ok(BinaryOp::Divide),
            Token::IsEqual => Ok(BinaryOp::IsEqual),
            Token::IsNotEqual => Ok(BinaryOp::IsNotEqual),
            Token::IsLessThan => Ok(BinaryOp::LessThan),
            Token::IsLessThanOrEqual => Ok(BinaryOp::LessOrEqual),
            Token::IsGreaterThan => Ok(BinaryOp::GreaterThan),
            Token::IsGreaterThanOrEqual => Ok(BinaryOp::GreaterOrEqual),
            _ => Err(()),
        }
    }
}

impl<W: Write> Parser<'_, W> {
    /// Precedence climbing over operators binding tighter than `min_prec`.
    pub(super) fn binexpr(&mut self, min_prec: u64) -> Result<Node> {
        let mut left = self.prefix()?;

        loop {
            let next = self.cursor.peek()?;
            let prec = get_prec(&next);
            let Ok(op) = BinaryOp::try_from(&next) else {
                return Ok(left);
            };
            if prec <= min_prec {
                return Ok(left);
            }
            self.cursor.next_token()?;
            let right = self.binexpr(prec)?;
            left = self.binary(op, left, right)?;
        }
    }

    /// Join two operands, widening whichever one is narrower.
    fn binary(&self, op: BinaryOp, mut left: Node, mut right: Node) -> Result<Node> {
        let (lt, rt) = (left.node_type, right.node_type);
        match compatible(lt, rt, Direction::Either) {
            None => return Err(self.error(SourceError::IncompatibleTypes(lt, rt))),
            Some(Coercion::WidenLeft) => left = left.widen(rt),
            Some(Coercion::WidenRight) => right = right.widen(lt),
            Some(Coercion::None) => {}
        }
        Ok(Node::binary(op, wider(lt, rt), left, right))
    }

    /// `*` and `&` in front of a primary expression.
    fn prefix(&mut self) -> Result<Node> {
        if self.cursor.bump_if(&Token::Ampersand)? {
            let operand = self.prefix()?;
            let NodeKind::Ident(id) = operand.kind else {
                return Err(self.error(SourceError::AddressOfNonIdentifier));
            };
            let pointer = operand
                .node_type
                .pointer_to()
                .map_err(|_| self.error(SourceError::TooManyIndirections))?;
            return Ok(Node::new(pointer, NodeKind::AddressOf(id)));
        }

        if self.cursor.bump_if(&Token::Asterisk)? {
            let operand = self.prefix()?;
            if !matches!(operand.kind, NodeKind::Ident(_) | NodeKind::Deref(_)) {
                return Err(self.error(SourceError::DerefNonIdentifier));
            }
            let pointee = operand
                .node_type
                .pointee()
                .ok()
                .filter(|t| t.size().is_ok())
                .ok_or_else(|| self.error(SourceError::DerefNonPointer(operand.node_type)))?;
            return Ok(Node::new(pointee, NodeKind::Deref(Box::new(operand))));
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Node> {
        match self.cursor.next_token()? {
            Token::Constant(value) => Ok(Node::int_literal(value)),
            Token::Identifier(name) => {
                if self.cursor.peek()? == Token::OpenParanth {
                    return self.function_call(name);
                }
                let symbol = self
                    .symbols
                    .find(&name)
                    .ok_or_else(|| self.error(SourceError::Undeclared(name.clone())))?;
                if symbol.is_function() {
                    return Err(self.error(SourceError::NotAVariable(name)));
                }
                Ok(Node::new(symbol.sym_type, NodeKind::Ident(symbol.id)))
            }
            Token::OpenParanth => {
                let inner = self.binexpr(0)?;
                self.cursor.expect(&Token::CloseParanth)?;
                Ok(inner)
            }
            other => Err(self.cursor.expected("expression", other)),
        }
    }

    /// `name(argument?)`, typed with the callee's return type.
    pub(super) fn function_call(&mut self, name: Identifier) -> Result<Node> {
        let symbol = self
            .symbols
            .find(&name)
            .ok_or_else(|| self.error(SourceError::Undeclared(name.clone())))?;
        if !symbol.is_function() {
            return Err(self.error(SourceError::NotAFunction(name)));
        }
        let (id, return_type) = (symbol.id, symbol.sym_type);

        self.cursor.expect(&Token::OpenParanth)?;
        let argument = if self.cursor.bump_if(&Token::CloseParanth)? {
            None
        } else {
            let argument = self.binexpr(0)?;
            self.cursor.expect(&Token::CloseParanth)?;
            Some(Box::new(argument))
        };

        Ok(Node::new(return_type, NodeKind::FunctionCall(id, argument)))
    }
}
