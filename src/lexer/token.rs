use std::ops::Deref;

/// Token with the line it was scanned on.
///
/// Produced by [`lex`](super::lex) for token dumps; the parser itself pulls
/// bare [Token]s from the [`Lexer`](super::Lexer) one at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinedToken {
    pub(crate) inner: Token,
    ln: u64,
}

impl From<LinedToken> for Token {
    fn from(value: LinedToken) -> Self {
        value.inner
    }
}

impl LinedToken {
    pub fn new(t: Token, ln: u64) -> Self {
        Self { inner: t, ln }
    }

    pub fn get_line(&self) -> u64 {
        self.ln
    }

    pub fn get_inner(&self) -> &Token {
        &self.inner
    }
}

impl Deref for LinedToken {
    type Target = Token;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Basic token type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// end of input
    Eof,
    /// +
    Plus,
    /// -
    Hyphen,
    /// *
    Asterisk,
    /// /
    FSlash,
    /// ==
    IsEqual,
    /// !=
    IsNotEqual,
    /// <
    IsLessThan,
    /// <=
    IsLessThanOrEqual,
    /// >
    IsGreaterThan,
    /// >=
    IsGreaterThanOrEqual,
    /// =
    Assign,
    /// ;
    Semicolon,
    /// ,
    Comma,
    /// (
    OpenParanth,
    /// )
    CloseParanth,
    /// {
    OpenCurly,
    /// }
    CloseCurly,
    /// &
    Ampersand,
    /// &&
    LogicalAnd,
    /// if keyword
    If,
    /// else keyword
    Else,
    /// while keyword
    While,
    /// for keyword
    For,
    /// void keyword
    Void,
    /// char keyword
    Char,
    /// int keyword
    Int,
    /// long keyword
    Long,
    /// print keyword
    Print,
    /// return keyword
    Return,
    /// any non-keyword name (variables, functions)
    Identifier(String),
    /// decimal integer literal
    Constant(i64),
}

impl Token {
    #[inline]
    pub fn is_type_specifier(&self) -> bool {
        matches!(self, Self::Void | Self::Char | Self::Int | Self::Long)
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }

    /// How the token is named in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            Self::Eof => "end of input",
            Self::Plus => "'+'",
            Self::Hyphen => "'-'",
            Self::Asterisk => "'*'",
            Self::FSlash => "'/'",
            Self::IsEqual => "'=='",
            Self::IsNotEqual => "'!='",
            Self::IsLessThan => "'<'",
            Self::IsLessThanOrEqual => "'<='",
            Self::IsGreaterThan => "'>'",
            Self::IsGreaterThanOrEqual => "'>='",
            Self::Assign => "'='",
            Self::Semicolon => "';'",
            Self::Comma => "','",
            Self::OpenParanth => "'('",
            Self::CloseParanth => "')'",
            Self::OpenCurly => "'{'",
            Self::CloseCurly => "'}'",
            Self::Ampersand => "'&'",
            Self::LogicalAnd => "'&&'",
            Self::If => "'if'",
            Self::Else => "'else'",
            Self::While => "'while'",
            Self::For => "'for'",
            Self::Void => "'void'",
            Self::Char => "'char'",
            Self::Int => "'int'",
            Self::Long => "'long'",
            Self::Print => "'print'",
            Self::Return => "'return'",
            Self::Identifier(_) => "identifier",
            Self::Constant(_) => "integer literal",
        }
    }
}

impl TryFrom<char> for Token {
    type Error = char;
    fn try_from(c: char) -> std::result::Result<Self, char> {
        match c {
            '+' => Ok(Self::Plus),
            '-' => Ok(Self::Hyphen),
            '*' => Ok(Self::Asterisk),
            '/' => Ok(Self::FSlash),
            ';' => Ok(Self::Semicolon),
            ',' => Ok(Self::Comma),
            '(' => Ok(Self::OpenParanth),
            ')' => Ok(Self::CloseParanth),
            '{' => Ok(Self::OpenCurly),
            '}' => Ok(Self::CloseCurly),
            _ => Err(c),
        }
    }
}

impl From<String> for Token {
    fn from(s: String) -> Self {
        match s.as_str() {
            "if" => Self::If,
            "else" => Self::Else,
            "while" => Self::While,
            "for" => Self::For,
            "void" => Self::Void,
            "char" => Self::Char,
            "int" => Self::Int,
            "long" => Self::Long,
            "print" => Self::Print,
            "return" => Self::Return,
            _ => Self::Identifier(s),
        }
    }
}
