mod cursor;
mod token;

#[cfg(test)]
mod lexer_tests;

use crate::error::{InternalError, Result, SourceError};
use cursor::Cursor;
use tracing::trace;

pub use token::{LinedToken, Token};

/// Longest accepted identifier, in characters.
pub const MAX_IDENT_LEN: usize = 511;

/// On-demand tokenizer. Tokens are pulled one at a time with [`Lexer::scan`];
/// one scanned token may be handed back with [`Lexer::reject`].
pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    rejected: Option<Token>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            rejected: None,
        }
    }

    pub fn line(&self) -> u64 {
        self.cursor.line()
    }

    /// Hand a token back so the next [`scan`](Self::scan) returns it.
    pub fn reject(&mut self, token: Token) -> Result<()> {
        if self.rejected.is_some() {
            return Err(InternalError::TokenRejectedTwice.into());
        }
        self.rejected = Some(token);
        Ok(())
    }

    pub fn scan(&mut self) -> Result<Token> {
        if let Some(token) = self.rejected.take() {
            return Ok(token);
        }

        let Some(c) = self.cursor.skip_whitespaces() else {
            return Ok(Token::Eof);
        };

        let token = match c {
            '=' => self.lex_mchar('=', Token::IsEqual, Token::Assign)?,
            '<' => self.lex_mchar('=', Token::IsLessThanOrEqual, Token::IsLessThan)?,
            '>' => self.lex_mchar('=', Token::IsGreaterThanOrEqual, Token::IsGreaterThan)?,
            '&' => self.lex_mchar('&', Token::LogicalAnd, Token::Ampersand)?,
            '!' => {
                if self.cursor.skip_if(|c| c == '=')? {
                    Token::IsNotEqual
                } else {
                    return Err(self.unrecognised('!'));
                }
            }
            '0'..='9' => self.lex_constant(c)?,
            c if c.is_ascii_alphabetic() || c == '_' => self.lex_identifier(c)?,
            c => Token::try_from(c).map_err(|c| self.unrecognised(c))?,
        };

        trace!(?token, line = self.line(), "scanned");
        Ok(token)
    }

    fn unrecognised(&self, c: char) -> crate::error::CompileError {
        SourceError::UnrecognisedChar(c).at_line(self.line())
    }

    fn lex_mchar(&mut self, second: char, double: Token, single: Token) -> Result<Token> {
        if self.cursor.skip_if(|c| c == second)? {
            Ok(double)
        } else {
            Ok(single)
        }
    }

    fn lex_constant(&mut self, first: char) -> Result<Token> {
        let mut value: i64 = 0;
        let mut next = Some(first);
        while let Some(digit) = next.and_then(|c| c.to_digit(10)) {
            value = value.wrapping_mul(10).wrapping_add(i64::from(digit));
            next = self.cursor.take();
        }
        if let Some(c) = next {
            self.cursor.put_back(c)?;
        }
        Ok(Token::Constant(value))
    }

    fn lex_identifier(&mut self, first: char) -> Result<Token> {
        let mut buf = String::new();
        let mut next = Some(first);
        while let Some(c) = next.filter(|c| c.is_ascii_alphanumeric() || *c == '_') {
            if buf.len() == MAX_IDENT_LEN {
                return Err(SourceError::IdentifierTooLong.at_line(self.line()));
            }
            buf.push(c);
            next = self.cursor.take();
        }
        if let Some(c) = next {
            self.cursor.put_back(c)?;
        }
        Ok(Token::from(buf))
    }
}

/// Scan the whole input, attaching line numbers. Used for token dumps.
pub fn lex(source: &str) -> Result<Vec<LinedToken>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.scan()?;
        if token.is_eof() {
            break;
        }
        tokens.push(LinedToken::new(token, lexer.line()));
    }
    Ok(tokens)
}
