use super::*;
use crate::error::CompileError;

fn tokens(source: &str) -> Vec<Token> {
    lex(source)
        .unwrap()
        .into_iter()
        .map(Token::from)
        .collect()
}

#[test]
fn test_basic_function() {
    let lexed = tokens("int main() { print 1; }");
    let expected = vec![
        Token::Int,
        Token::Identifier(String::from("main")),
        Token::OpenParanth,
        Token::CloseParanth,
        Token::OpenCurly,
        Token::Print,
        Token::Constant(1),
        Token::Semicolon,
        Token::CloseCurly,
    ];
    assert_eq!(expected, lexed);
}

#[test]
fn test_two_char_operators() {
    let lexed = tokens("== != <= >= && = < > & ,");
    let expected = vec![
        Token::IsEqual,
        Token::IsNotEqual,
        Token::IsLessThanOrEqual,
        Token::IsGreaterThanOrEqual,
        Token::LogicalAnd,
        Token::Assign,
        Token::IsLessThan,
        Token::IsGreaterThan,
        Token::Ampersand,
        Token::Comma,
    ];
    assert_eq!(expected, lexed);
}

#[test]
fn test_lookahead_is_put_back() {
    let lexed = tokens("a=b<c>d&e");
    let expected = vec![
        Token::Identifier("a".into()),
        Token::Assign,
        Token::Identifier("b".into()),
        Token::IsLessThan,
        Token::Identifier("c".into()),
        Token::IsGreaterThan,
        Token::Identifier("d".into()),
        Token::Ampersand,
        Token::Identifier("e".into()),
    ];
    assert_eq!(expected, lexed);
}

#[test]
fn test_keywords() {
    let lexed = tokens("if else while for void char int long print return iff _x");
    let expected = vec![
        Token::If,
        Token::Else,
        Token::While,
        Token::For,
        Token::Void,
        Token::Char,
        Token::Int,
        Token::Long,
        Token::Print,
        Token::Return,
        Token::Identifier("iff".into()),
        Token::Identifier("_x".into()),
    ];
    assert_eq!(expected, lexed);
}

#[test]
fn test_constant_stops_at_non_digit() {
    let lexed = tokens("123;4567");
    let expected = vec![
        Token::Constant(123),
        Token::Semicolon,
        Token::Constant(4567),
    ];
    assert_eq!(expected, lexed);
}

#[test]
fn test_constant_overflow_wraps() {
    let lexed = tokens("99999999999999999999");
    assert_eq!(lexed.len(), 1);
    assert!(matches!(lexed[0], Token::Constant(_)));
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.scan().unwrap(), Token::Identifier("x".into()));
    assert_eq!(lexer.scan().unwrap(), Token::Eof);
    assert_eq!(lexer.scan().unwrap(), Token::Eof);
}

#[test]
fn test_bad_atsign() {
    let lexed = lex("int main() {\nprint 0@1;\n}");
    let Err(CompileError::Source { line, kind }) = lexed else {
        panic!("expected a source error");
    };
    assert_eq!(line, 2);
    assert_eq!(kind, SourceError::UnrecognisedChar('@'));
}

#[test]
fn test_lone_bang() {
    let lexed = lex("!x");
    let kind = lexed.unwrap_err().source_kind().cloned();
    assert_eq!(kind, Some(SourceError::UnrecognisedChar('!')));
}

#[test]
fn test_line_numbers() {
    let lexed = lex("int\n\nx\n;").unwrap();
    let lines: Vec<u64> = lexed.iter().map(LinedToken::get_line).collect();
    assert_eq!(lines, vec![2, 4, 4]);
}

#[test]
fn test_identifier_length_limit() {
    let longest = "a".repeat(MAX_IDENT_LEN);
    let lexed = tokens(&longest);
    assert_eq!(lexed, vec![Token::Identifier(longest)]);

    let too_long = "a".repeat(MAX_IDENT_LEN + 1);
    let err = lex(&too_long).unwrap_err();
    assert_eq!(err.source_kind(), Some(&SourceError::IdentifierTooLong));
}

#[test]
fn test_reject_returns_token_first() {
    let mut lexer = Lexer::new("a b");
    let a = lexer.scan().unwrap();
    lexer.reject(a.clone()).unwrap();
    assert_eq!(lexer.scan().unwrap(), a);
    assert_eq!(lexer.scan().unwrap(), Token::Identifier("b".into()));
}

#[test]
fn test_reject_twice_is_internal_error() {
    let mut lexer = Lexer::new("a b");
    let a = lexer.scan().unwrap();
    let b = lexer.scan().unwrap();
    lexer.reject(b).unwrap();
    let err = lexer.reject(a).unwrap_err();
    assert!(err.is_internal());
}
