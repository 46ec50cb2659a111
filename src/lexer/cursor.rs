use crate::error::InternalError;

use std::str::Chars;

/// Character source with a single put-back slot and a line counter.
#[derive(Clone)]
pub struct Cursor<'a> {
    chars: Chars<'a>,
    putback: Option<char>,
    line: u64,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        let chars = s.chars();
        Self {
            chars,
            putback: None,
            line: 1,
        }
    }

    pub fn line(&self) -> u64 {
        self.line
    }

    /// Next raw character. A put-back character is returned first and is not
    /// counted towards the line number again.
    pub fn take(&mut self) -> Option<char> {
        if let Some(c) = self.putback.take() {
            return Some(c);
        }
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    pub fn put_back(&mut self, c: char) -> Result<(), InternalError> {
        if self.putback.is_some() {
            return Err(InternalError::CharPutBackTwice);
        }
        self.putback = Some(c);
        Ok(())
    }

    #[inline]
    pub fn skip_if(&mut self, p: impl FnOnce(char) -> bool) -> Result<bool, InternalError> {
        match self.take() {
            Some(c) if p(c) => Ok(true),
            Some(c) => self.put_back(c).map(|()| false),
            None => Ok(false),
        }
    }

    /// First character that is not whitespace, if any.
    pub fn skip_whitespaces(&mut self) -> Option<char> {
        let mut c = self.take()?;
        while matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0c') {
            c = self.take()?;
        }
        Some(c)
    }
}
