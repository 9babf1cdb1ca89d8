//! Token definitions for the lexer

use std::fmt;
use std::ops::Index;

use super::capture::BracketCapture;
use crate::common::{Position, Span};

/// Width class of a numeric literal, chosen from the character after its digits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberSubtype {
    #[default]
    Normal,
    Long,
    Float,
    /// Part of the model, never produced by the scanner
    Double,
}

/// Numeric literal value. Character literals are numbers too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberLiteral {
    pub value: u64,
    pub subtype: NumberSubtype,
}

impl NumberLiteral {
    pub fn new(value: u64, subtype: NumberSubtype) -> Self {
        Self { value, subtype }
    }

    pub fn normal(value: u64) -> Self {
        Self::new(value, NumberSubtype::Normal)
    }
}

/// All token kinds with their payloads
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Identifier(String),
    Keyword(String),
    Operator(String),
    Symbol(char),
    Number(NumberLiteral),
    String(String),
    /// Comment body without the `//`, `/*` or `*/` delimiters
    Comment(String),
    Newline,
}

/// Token with source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Position of the token's first character
    pub position: Position,
    pub span: Span,
    /// Whitespace follows this token. Set after the fact when the lexer
    /// skips spaces or tabs.
    pub whitespace: bool,
    /// Raw text of the enclosing `( ... )` region, if any
    pub between_brackets: Option<BracketCapture>,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position, span: Span) -> Self {
        Self {
            kind,
            position,
            span,
            whitespace: false,
            between_brackets: None,
        }
    }

    /// Check if this token is the keyword `lexeme`
    pub fn is_keyword(&self, lexeme: &str) -> bool {
        matches!(&self.kind, TokenKind::Keyword(k) if k == lexeme)
    }

    /// Numeric value of a number token
    pub fn number(&self) -> Option<NumberLiteral> {
        match self.kind {
            TokenKind::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Identifier(s) => write!(f, "identifier '{s}'"),
            TokenKind::Keyword(s) => write!(f, "keyword '{s}'"),
            TokenKind::Operator(s) => write!(f, "operator '{s}'"),
            TokenKind::Symbol(c) => write!(f, "symbol '{c}'"),
            TokenKind::Number(n) => match n.subtype {
                NumberSubtype::Normal => write!(f, "number {}", n.value),
                subtype => write!(f, "number {} ({subtype:?})", n.value),
            },
            TokenKind::String(s) => write!(f, "string {s:?}"),
            TokenKind::Comment(s) => write!(f, "comment {s:?}"),
            TokenKind::Newline => write!(f, "newline"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.position, self.kind)?;
        if self.whitespace {
            write!(f, " +ws")?;
        }
        Ok(())
    }
}

/// Ordered, append-only token sequence produced by one lex pass.
///
/// Outside the lexer the sequence is read-only. The lexer itself may touch
/// only the tail: flagging the last token and retracting it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    pub fn as_slice(&self) -> &[Token] {
        &self.tokens
    }

    /// Kinds only, convenient for comparisons
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind.clone()).collect()
    }

    pub(crate) fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub(crate) fn last_mut(&mut self) -> Option<&mut Token> {
        self.tokens.last_mut()
    }

    pub(crate) fn pop_last(&mut self) -> Option<Token> {
        self.tokens.pop()
    }
}

impl Index<usize> for TokenStream {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl IntoIterator for TokenStream {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl<'a> IntoIterator for &'a TokenStream {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

impl From<TokenStream> for Vec<Token> {
    fn from(stream: TokenStream) -> Self {
        stream.tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(kind: TokenKind) -> Token {
        Token::new(kind, Position::start_of("t.c"), Span::new(0, 1))
    }

    #[test]
    fn test_predicates() {
        assert!(token(TokenKind::Keyword("include".into())).is_keyword("include"));
        assert!(!token(TokenKind::Identifier("include".into())).is_keyword("include"));
        assert_eq!(
            token(TokenKind::Number(NumberLiteral::normal(7))).number(),
            Some(NumberLiteral::normal(7))
        );
    }

    #[test]
    fn test_display() {
        let mut t = token(TokenKind::Number(NumberLiteral::new(5, NumberSubtype::Long)));
        t.whitespace = true;
        assert_eq!(t.to_string(), "t.c:1:1 number 5 (Long) +ws");
        assert_eq!(TokenKind::Symbol('{').to_string(), "symbol '{'");
    }

    #[test]
    fn test_stream_tail_access() {
        let mut stream = TokenStream::new();
        stream.push(token(TokenKind::Newline));
        stream.push(token(TokenKind::Symbol(';')));
        stream.last_mut().unwrap().whitespace = true;
        assert!(stream[1].whitespace);

        let popped = stream.pop_last().unwrap();
        assert_eq!(popped.kind, TokenKind::Symbol(';'));
        assert_eq!(stream.kinds(), vec![TokenKind::Newline]);
    }
}
