use super::Parser;
use crate::ast::{self, Node, NodeKind};
use crate::error::{InternalError, Result, SourceError};
use crate::lexer::Token;
use crate::types::{compatible, Coercion, Direction, Type};

use std::io::Write;

impl<W: Write> Parser<'_, W> {
    /// `{ statement* }`. An empty block has no tree.
    pub(super) fn compound_statement(&mut self) -> Result<Option<Node>> {
        self.cursor.expect(&Token::OpenCurly)?;
        let mut tree = None;

        while !self.cursor.bump_if(&Token::CloseCurly)? {
            let statement = self.single_statement()?;
            if statement.as_ref().is_some_and(Node::needs_semicolon) {
                self.cursor.expect(&Token::Semicolon)?;
            }
            tree = ast::glue(tree, statement);
        }
        Ok(tree)
    }

    fn single_statement(&mut self) -> Result<Option<Node>> {
        match self.cursor.peek()? {
            Token::Print => self.print_statement().map(Some),
            t if t.is_type_specifier() => {
                let t = self.parse_type()?;
                let name = self.cursor.expect_identifier()?;
                self.var_declaration(t, name)?;
                Ok(None)
            }
            Token::Identifier(_) => self.assignment_or_call().map(Some),
            Token::If => self.if_statement().map(Some),
            Token::While => self.while_statement().map(Some),
            Token::For => self.for_statement(),
            Token::Return => self.return_statement().map(Some),
            _ => {
                let token = self.cursor.next_token()?;
                Err(self.error(SourceError::BadStatement(token)))
            }
        }
    }

    pub(crate) fn print_statement(&mut self) -> Result<Node> {
        self.cursor.expect(&Token::Print)?;
        let mut value = self.binexpr(0)?;

        match compatible(Type::Int, value.node_type, Direction::Either) {
            None => {
                let kind = SourceError::IncompatibleTypes(Type::Int, value.node_type);
                return Err(self.error(kind));
            }
            Some(Coercion::WidenRight) => value = value.widen(Type::Int),
            Some(_) => {}
        }
        Ok(Node::new(Type::None, NodeKind::Print(Box::new(value))))
    }

    pub(crate) fn assignment_or_call(&mut self) -> Result<Node> {
        let name = self.cursor.expect_identifier()?;
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
        let (id, var_type) = (symbol.id, symbol.sym_type);
        let target = Node::new(var_type, NodeKind::LvalueIdent(id));

        self.cursor.expect(&Token::Assign)?;
        let mut value = self.binexpr(0)?;

        match compatible(value.node_type, var_type, Direction::LeftIntoRight) {
            None => {
                let kind = SourceError::IncompatibleTypes(value.node_type, var_type);
                return Err(self.error(kind));
            }
            Some(Coercion::WidenLeft) => value = value.widen(var_type),
            Some(_) => {}
        }

        let kind = NodeKind::Assign(Box::new(value), Box::new(target));
        Ok(Node::new(var_type, kind))
    }

    /// `( comparison )`
    fn condition(&mut self) -> Result<Node> {
        self.cursor.expect(&Token::OpenParanth)?;
        let condition = self.comparison()?;
        self.cursor.expect(&Token::CloseParanth)?;
        Ok(condition)
    }

    fn comparison(&mut self) -> Result<Node> {
        let condition = self.binexpr(0)?;
        if !condition.is_comparison() {
            return Err(self.error(SourceError::BadComparison));
        }
        Ok(condition)
    }

    fn if_statement(&mut self) -> Result<Node> {
        self.cursor.expect(&Token::If)?;
        let condition = self.condition()?;
        let then = self.compound_statement()?;
        let els = if self.cursor.bump_if(&Token::Else)? {
            self.compound_statement()?
        } else {
            None
        };

        let kind = NodeKind::If {
            condition: Box::new(condition),
            then: then.map(Box::new),
            els: els.map(Box::new),
        };
        Ok(Node::new(Type::None, kind))
    }

    fn while_statement(&mut self) -> Result<Node> {
        self.cursor.expect(&Token::While)?;
        let condition = self.condition()?;
        let body = self.compound_statement()?;
        Ok(Self::while_node(condition, body))
    }

    fn while_node(condition: Node, body: Option<Node>) -> Node {
        let kind = NodeKind::While {
            condition: Box::new(condition),
            body: body.map(Box::new),
        };
        Node::new(Type::None, kind)
    }

    /// `for (pre; condition; post) body` becomes
    /// `pre; while (condition) { body; post }`.
    pub(crate) fn for_statement(&mut self) -> Result<Option<Node>> {
        self.cursor.expect(&Token::For)?;
        self.cursor.expect(&Token::OpenParanth)?;
        let pre = self.single_statement()?;
        self.cursor.expect(&Token::Semicolon)?;
        let condition = self.comparison()?;
        self.cursor.expect(&Token::Semicolon)?;
        let post = self.single_statement()?;
        self.cursor.expect(&Token::CloseParanth)?;
        let body = self.compound_statement()?;

        let looped = Self::while_node(condition, ast::glue(body, post));
        Ok(ast::glue(pre, Some(looped)))
    }

    pub(super) fn return_statement(&mut self) -> Result<Node> {
        self.cursor.expect(&Token::Return)?;
        let function = self.function.ok_or(InternalError::ReturnOutsideFunction)?;
        let symbol = self.symbols.get_by_id(function)?;
        if symbol.sym_type == Type::Void {
            let name = symbol.name.clone();
            return Err(self.error(SourceError::ReturnFromVoid(name)));
        }
        let return_type = symbol.sym_type;

        // `return (x)` is just a parenthesised expression
        let mut value = self.binexpr(0)?;
        match compatible(value.node_type, return_type, Direction::LeftIntoRight) {
            None => {
                let kind = SourceError::IncompatibleTypes(value.node_type, return_type);
                return Err(self.error(kind));
            }
            Some(Coercion::WidenLeft) => value = value.widen(return_type),
            Some(_) => {}
        }

        let kind = NodeKind::Return(function, Box::new(value));
        Ok(Node::new(Type::None, kind))
    }
}
