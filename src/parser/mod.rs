//! Recursive-descent parser that drives code generation.
//!
//! There is no separate tree for the whole program: every function is parsed
//! into an AST and handed to the [`CodeGen`] as soon as its closing brace is
//! seen, and global variables get their storage the moment they are declared.

mod cursor;
mod expressions;
mod statements;


use crate::ast::{Node, NodeKind};
use crate::codegen::CodeGen;
use crate::error::{CompileError, Result, SourceError};
use crate::lexer::Token;
use crate::symbols::{Identifier, SymbolId, SymbolKind, SymbolTable};
use crate::types::Type;
use cursor::Cursor;

use std::io::Write;
use tracing::debug;

/// Everything one compilation needs. Nothing outlives it.
pub struct Parser<'a, W> {
    cursor: Cursor<'a>,
    symbols: SymbolTable,
    /// Function whose body is being parsed.
    function: Option<SymbolId>,
    codegen: CodeGen<W>,
}

impl<'a, W: Write> Parser<'a, W> {
    pub fn new(source: &'a str, out: W) -> Self {
        Self {
            cursor: Cursor::new(source),
            symbols: SymbolTable::with_runtime(),
            function: None,
            codegen: CodeGen::new(out),
        }
    }

    /// Compile the whole translation unit and return the output sink.
    pub fn compile(mut self) -> Result<W> {
        self.codegen.preamble()?;
        self.global_declarations()?;
        self.codegen.postamble()?;
        debug!(symbols = self.symbols.len(), "compilation finished");
        Ok(self.codegen.into_inner())
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    fn error(&self, kind: SourceError) -> CompileError {
        kind.at_line(self.cursor.get_line())
    }

    fn global_declarations(&mut self) -> Result<()> {
        while !self.cursor.peek()?.is_eof() {
            let t = self.parse_type()?;
            let name = self.cursor.expect_identifier()?;
            if self.cursor.peek()? == Token::OpenParanth {
                let tree = self.function_declaration(t, name)?;
                self.codegen.generate_tree(&tree, &self.symbols)?;
            } else {
                self.var_declaration(t, name)?;
            }
        }
        Ok(())
    }

    /// Type keyword followed by any number of `*`.
    fn parse_type(&mut self) -> Result<Type> {
        let mut t = match self.cursor.next_token()? {
            Token::Void => Type::Void,
            Token::Char => Type::Char,
            Token::Int => Type::Int,
            Token::Long => Type::Long,
            other => return Err(self.cursor.expected("type", other)),
        };
        while self.cursor.bump_if(&Token::Asterisk)? {
            t = t
                .pointer_to()
                .map_err(|_| self.error(SourceError::TooManyIndirections))?;
        }
        Ok(t)
    }

    /// Comma-separated variables sharing one type, up to the `;`. The first
    /// name has already been consumed.
    fn var_declaration(&mut self, t: Type, first: Identifier) -> Result<()> {
        let mut name = first;
        loop {
            if t == Type::Void {
                return Err(self.error(SourceError::VoidVariable(name)));
            }
            let id = self
                .symbols
                .add(name, t, SymbolKind::Variable, None)
                .map_err(|e| self.error(e))?;
            self.codegen.global_symbol(self.symbols.get_by_id(id)?)?;

            if !self.cursor.bump_if(&Token::Comma)? {
                return self.cursor.expect(&Token::Semicolon);
            }
            name = self.cursor.expect_identifier()?;
        }
    }

    fn function_declaration(&mut self, t: Type, name: Identifier) -> Result<Node> {
        // registered before the body so that `return` and recursive calls resolve
        let end_label = self.codegen.label();
        let id = self
            .symbols
            .add(name.clone(), t, SymbolKind::Function, Some(end_label))
            .map_err(|e| self.error(e))?;
        debug!(%name, id = id.index(), "declared function");

        self.cursor.expect(&Token::OpenParanth)?;
        self.cursor.bump_if(&Token::Void)?;
        self.cursor.expect(&Token::CloseParanth)?;

        self.function = Some(id);
        let body = self.compound_statement()?;
        self.function = None;

        if t != Type::Void {
            let returns = body
                .as_ref()
                .is_some_and(|body| body.last_statement().is_return());
            if !returns {
                return Err(self.error(SourceError::NoReturn(name)));
            }
        }

        let body = body.map(Box::new);
        Ok(Node::new(t, NodeKind::Function { id, body }))
    }
}
