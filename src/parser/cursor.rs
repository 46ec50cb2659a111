use crate::error::{Result, SourceError};
use crate::lexer::{Lexer, Token};
use crate::symbols::Identifier;

/// Token stream over a [`Lexer`]. Lookahead is one token, kept in the
/// lexer's pushback slot.
pub struct Cursor<'a> {
    lexer: Lexer<'a>,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: Lexer::new(source),
        }
    }

    pub fn get_line(&self) -> u64 {
        self.lexer.line()
    }

    pub fn peek(&mut self) -> Result<Token> {
        let token = self.lexer.scan()?;
        self.lexer.reject(token.clone())?;
        Ok(token)
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.lexer.scan()
    }

    pub fn bump_if(&mut self, t: &Token) -> Result<bool> {
        let next = self.lexer.scan()?;
        if &next == t {
            return Ok(true);
        }
        self.lexer.reject(next)?;
        Ok(false)
    }

    pub fn expect(&mut self, t: &Token) -> Result<()> {
        let next = self.lexer.scan()?;
        if &next == t {
            Ok(())
        } else {
            Err(self.expected(t.describe(), next))
        }
    }

    pub fn expect_identifier(&mut self) -> Result<Identifier> {
        match self.lexer.scan()? {
            Token::Identifier(name) => Ok(name),
            next => Err(self.expected("identifier", next)),
        }
    }

    pub fn expected(&self, expected: &'static str, got: Token) -> crate::error::CompileError {
        SourceError::ExpectedButGot { expected, got }.at_line(self.get_line())
    }
}
