//! Single-pass lexer driven by one character of lookahead
//!
//! Each call to [`Lexer::scan_one`] peeks a character, picks a category and
//! hands over to the matching routine, which pulls characters until the token
//! is complete. Apart from the expression-nesting depth and its capture
//! buffer, the only state carried between calls is the token sequence itself:
//! the last token decides `#include<...>` strings, hex/binary prefixes and
//! the trailing-whitespace flag.

use std::sync::Arc;

use tracing::{debug, trace};

use super::capture::ExpressionCapture;
use super::keywords::is_keyword;
use super::source::{CharSource, StringSource};
use super::token::{NumberLiteral, NumberSubtype, Token, TokenKind, TokenStream};
use crate::common::{CompileError, CompileResult, Position, PositionTracker, Span};

/// Characters that start an operator. `/` is missing on purpose: it is
/// checked for comments first.
const OPERATOR_START: &[u8] = b"+-*><^%!=~|&([,.?";

/// Every legal operator lexeme
const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "!", "^", "+=", "-=", "*=", "/=", ">>", "<<", ">=", "<=", ">", "<",
    "||", "&&", "|", "&", "++", "--", "=", "!=", "==", "->", "(", "[", ",", ".", "...", "~",
    "?", "%",
];

const SYMBOLS: &[u8] = b"{};:#\\)]";

/// Operators that never take a second character
fn is_single_char_operator(c: u8) -> bool {
    matches!(c, b'(' | b'[' | b'.' | b'*' | b'?' | b',')
}

/// Characters that may extend an operator to two characters
fn is_operator_char(c: u8) -> bool {
    c == b'/' || OPERATOR_START.contains(&c)
}

fn is_valid_operator(op: &str) -> bool {
    OPERATORS.contains(&op)
}

fn char_escape(c: u8) -> u8 {
    match c {
        b'n' => b'\n',
        b'r' => b'\r',
        b't' => b'\t',
        b'\\' => b'\\',
        b'\'' => b'\'',
        _ => 0,
    }
}

fn describe(c: u8) -> String {
    if c.is_ascii_graphic() {
        format!("'{}'", char::from(c))
    } else {
        format!("0x{c:02x}")
    }
}

fn parse_number(digits: &str, radix: u32, position: &Position) -> CompileResult<u64> {
    u64::from_str_radix(digits, radix).map_err(|_| {
        CompileError::invalid(
            format!("number literal '{digits}' does not fit in 64 bits"),
            position.clone(),
        )
    })
}

/// Lexer state for one source
pub struct Lexer<S: CharSource> {
    source: S,
    tracker: PositionTracker,
    capture: ExpressionCapture,
    tokens: TokenStream,
}

impl Lexer<StringSource> {
    /// Lexer over an in-memory string
    pub fn for_text(text: &str, name: &str) -> Self {
        Self::new(StringSource::new(text), name)
    }
}

impl<S: CharSource> Lexer<S> {
    pub fn new(source: S, filename: impl Into<Arc<str>>) -> Self {
        Self {
            source,
            tracker: PositionTracker::new(filename),
            capture: ExpressionCapture::default(),
            tokens: TokenStream::new(),
        }
    }

    /// Tokens produced so far
    pub fn tokens(&self) -> &TokenStream {
        &self.tokens
    }

    /// Current expression-nesting depth
    pub fn depth(&self) -> usize {
        self.capture.depth()
    }

    /// Position of the next character to be consumed
    pub fn position(&self) -> Position {
        self.tracker.position()
    }

    /// Scan one token and append it to the sequence.
    ///
    /// Returns `None` at end of input.
    pub fn next_token(&mut self) -> CompileResult<Option<&Token>> {
        let scanned = self
            .scan_one()
            .inspect_err(|err| debug!(%err, "fatal lexical error"))?;

        match scanned {
            Some(token) => {
                trace!(%token, "token");
                self.tokens.push(token);
                Ok(self.tokens.last())
            }
            None => Ok(None),
        }
    }

    /// Lex until end of input and return the full token sequence
    pub fn tokenize_all(mut self) -> CompileResult<TokenStream> {
        while self.next_token()?.is_some() {}
        debug!(
            file = %self.tracker.filename(),
            tokens = self.tokens.len(),
            "lexing finished"
        );
        Ok(self.tokens)
    }

    /// Scan the next token without appending it.
    ///
    /// Skipped whitespace still flags the last appended token, and a pending
    /// `0` before `x`/`b` is retracted from the sequence.
    pub fn scan_one(&mut self) -> CompileResult<Option<Token>> {
        loop {
            let Some(c) = self.peek_char()? else {
                return Ok(None);
            };
            let start = self.tracker.position();

            let token = match c {
                b'/' => self.scan_slash(start)?,
                b'0'..=b'9' => self.scan_number(start)?,
                b'<' if self.after_include() => self.scan_string(b'>', start)?,
                c if OPERATOR_START.contains(&c) => self.scan_operator(start)?,
                c if SYMBOLS.contains(&c) => self.scan_symbol(start)?,
                b'"' => self.scan_string(b'"', start)?,
                b'\'' => self.scan_char_literal(start)?,
                b'x' | b'X' | b'b' | b'B' => match self.take_zero_prefix() {
                    Some(zero) => self.scan_radix_number(zero)?,
                    None => self.scan_identifier(start)?,
                },
                c if c.is_ascii_alphabetic() || c == b'_' => self.scan_identifier(start)?,
                b' ' | b'\t' => {
                    self.skip_whitespace()?;
                    continue;
                }
                b'\n' | b'\r' => {
                    self.next_char()?;
                    self.make_token(TokenKind::Newline, start)
                }
                other => {
                    return Err(CompileError::invalid(
                        format!("unknown character {}", describe(other)),
                        start,
                    ));
                }
            };

            return Ok(Some(token));
        }
    }

    // =========================================================================
    // Character primitives
    // =========================================================================

    fn next_char(&mut self) -> CompileResult<Option<u8>> {
        let c = self.source.next_char()?;
        if let Some(c) = c {
            self.tracker.advance(c);
            self.capture.record(c);
        }
        Ok(c)
    }

    /// Consume a character the caller has already peeked
    fn bump(&mut self) -> CompileResult<u8> {
        match self.next_char()? {
            Some(c) => Ok(c),
            None => Err(CompileError::unterminated(
                "unexpected end of input",
                self.tracker.position(),
            )),
        }
    }

    fn peek_char(&mut self) -> CompileResult<Option<u8>> {
        Ok(self.source.peek_char()?)
    }

    fn push_back(&mut self, c: u8) {
        self.source.push_back(c);
        self.tracker.retreat();
        self.capture.unrecord();
    }

    fn read_while(&mut self, accept: impl Fn(u8) -> bool) -> CompileResult<String> {
        let mut text = String::new();
        while let Some(c) = self.peek_char()? {
            if !accept(c) {
                break;
            }
            self.next_char()?;
            text.push(char::from(c));
        }
        Ok(text)
    }

    fn make_token(&self, kind: TokenKind, start: Position) -> Token {
        let span = Span::new(start.offset, self.tracker.offset());
        let mut token = Token::new(kind, start, span);
        token.between_brackets = self.capture.handle();
        token
    }

    // =========================================================================
    // Lookback on the token sequence
    // =========================================================================

    fn after_include(&self) -> bool {
        self.tokens.last().is_some_and(|t| t.is_keyword("include"))
    }

    /// Retract the last token if it is a lone `0` directly before the cursor
    fn take_zero_prefix(&mut self) -> Option<Token> {
        let offset = self.tracker.offset();
        let pending = self.tokens.last().is_some_and(|t| {
            t.number() == Some(NumberLiteral::normal(0))
                && t.span.len() == 1
                && t.span.end == offset
        });
        if pending { self.tokens.pop_last() } else { None }
    }

    fn skip_whitespace(&mut self) -> CompileResult<()> {
        self.next_char()?;
        if let Some(last) = self.tokens.last_mut() {
            last.whitespace = true;
        }
        Ok(())
    }

    // =========================================================================
    // Comments and operators
    // =========================================================================

    fn scan_slash(&mut self, start: Position) -> CompileResult<Token> {
        self.bump()?;
        match self.peek_char()? {
            Some(b'/') => {
                self.bump()?;
                self.scan_line_comment(start)
            }
            Some(b'*') => {
                self.bump()?;
                self.scan_block_comment(start)
            }
            _ => {
                self.push_back(b'/');
                self.scan_operator(start)
            }
        }
    }

    fn scan_line_comment(&mut self, start: Position) -> CompileResult<Token> {
        let mut body = Vec::new();
        while let Some(c) = self.peek_char()? {
            if c == b'\n' || c == b'\r' {
                break;
            }
            self.bump()?;
            body.push(c);
        }
        let text = String::from_utf8_lossy(&body).into_owned();
        Ok(self.make_token(TokenKind::Comment(text), start))
    }

    fn scan_block_comment(&mut self, start: Position) -> CompileResult<Token> {
        let mut body = Vec::new();
        loop {
            match self.next_char()? {
                None => return Err(CompileError::unterminated("unterminated comment", start)),
                Some(b'*') => {
                    if self.peek_char()? == Some(b'/') {
                        self.bump()?;
                        break;
                    }
                    body.push(b'*');
                }
                Some(c) => body.push(c),
            }
        }
        let text = String::from_utf8_lossy(&body).into_owned();
        Ok(self.make_token(TokenKind::Comment(text), start))
    }

    fn scan_operator(&mut self, start: Position) -> CompileResult<Token> {
        let first = self.bump()?;
        let mut op = String::from(char::from(first));

        let second = if is_single_char_operator(first) {
            None
        } else {
            self.peek_char()?.filter(|&c| is_operator_char(c))
        };
        if let Some(second) = second {
            self.bump()?;
            op.push(char::from(second));
            if !is_valid_operator(&op) {
                op.pop();
                self.push_back(second);
            }
        }

        if !is_valid_operator(&op) {
            return Err(CompileError::invalid(
                format!("the operator {op} is not valid"),
                start,
            ));
        }

        if first == b'(' {
            self.capture.open();
        }
        Ok(self.make_token(TokenKind::Operator(op), start))
    }

    fn scan_symbol(&mut self, start: Position) -> CompileResult<Token> {
        let c = self.bump()?;
        let token = self.make_token(TokenKind::Symbol(char::from(c)), start);
        if c == b')' {
            self.capture.close(token.position.clone())?;
        }
        Ok(token)
    }

    // =========================================================================
    // Literals
    // =========================================================================

    fn scan_number(&mut self, start: Position) -> CompileResult<Token> {
        let digits = self.read_while(|c| c.is_ascii_digit())?;
        let value = parse_number(&digits, 10, &start)?;

        // The suffix only selects the subtype; it stays in the stream.
        let subtype = match self.peek_char()? {
            Some(b'L' | b'l') => NumberSubtype::Long,
            Some(b'F' | b'f') => NumberSubtype::Float,
            _ => NumberSubtype::Normal,
        };

        Ok(self.make_token(TokenKind::Number(NumberLiteral::new(value, subtype)), start))
    }

    /// Hex or binary digits after a retracted `0`
    fn scan_radix_number(&mut self, zero: Token) -> CompileResult<Token> {
        let start = zero.position;
        let marker = self.bump()?;

        let (radix, digits) = if matches!(marker, b'x' | b'X') {
            (16, self.read_while(|c| c.is_ascii_hexdigit())?)
        } else {
            let digits = self.read_while(|c| c.is_ascii_digit())?;
            if let Some(bad) = digits.chars().find(|&d| d != '0' && d != '1') {
                return Err(CompileError::invalid(
                    format!("invalid binary digit '{bad}'"),
                    start,
                ));
            }
            (2, digits)
        };

        if digits.is_empty() {
            return Err(CompileError::invalid(
                format!("expected digits after '0{}'", char::from(marker)),
                start,
            ));
        }

        let value = parse_number(&digits, radix, &start)?;
        Ok(self.make_token(TokenKind::Number(NumberLiteral::normal(value)), start))
    }

    /// String literal up to `close`. Also used for `#include<...>` paths.
    fn scan_string(&mut self, close: u8, start: Position) -> CompileResult<Token> {
        self.bump()?;
        let mut body = Vec::new();
        loop {
            match self.next_char()? {
                None => {
                    return Err(CompileError::unterminated("unterminated string literal", start));
                }
                Some(c) if c == close => break,
                Some(b'\\') => {
                    if self.next_char()?.is_none() {
                        return Err(CompileError::unterminated(
                            "unterminated string literal",
                            start,
                        ));
                    }
                }
                Some(c) => body.push(c),
            }
        }
        let text = String::from_utf8_lossy(&body).into_owned();
        Ok(self.make_token(TokenKind::String(text), start))
    }

    fn scan_char_literal(&mut self, start: Position) -> CompileResult<Token> {
        const UNTERMINATED: &str = "unterminated or multi-character character literal";

        self.bump()?;
        let value = match self.next_char()? {
            Some(b'\\') => match self.next_char()? {
                Some(escaped) => char_escape(escaped),
                None => return Err(CompileError::unterminated(UNTERMINATED, start)),
            },
            Some(c) => c,
            None => return Err(CompileError::unterminated(UNTERMINATED, start)),
        };

        if self.next_char()? != Some(b'\'') {
            return Err(CompileError::unterminated(UNTERMINATED, start));
        }

        Ok(self.make_token(TokenKind::Number(NumberLiteral::normal(u64::from(value))), start))
    }

    fn scan_identifier(&mut self, start: Position) -> CompileResult<Token> {
        let word = self.read_while(|c| c.is_ascii_alphanumeric() || c == b'_')?;
        let kind = if is_keyword(&word) {
            TokenKind::Keyword(word)
        } else {
            TokenKind::Identifier(word)
        };
        Ok(self.make_token(kind, start))
    }
}
