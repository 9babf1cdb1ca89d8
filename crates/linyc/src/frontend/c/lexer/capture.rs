//! Raw text capture for parenthesized expressions
//!
//! While at least one `(` is open, every character the lexer consumes is
//! appended to a single buffer shared by all tokens produced in that region.
//! Nested parentheses deepen the same buffer; the buffer is finalized when the
//! outermost `)` closes it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::scanner::Lexer;
use super::token::TokenStream;
use crate::common::{CompileError, CompileResult, Position};

/// Shared handle to the text of one bracket region
#[derive(Clone, Default)]
pub struct BracketCapture(Rc<RefCell<Vec<u8>>>);

impl BracketCapture {
    /// Captured text as of now. Once the region is closed this is the whole
    /// `( ... )` text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// Check if both handles refer to the same region's buffer
    pub fn same_region(&self, other: &BracketCapture) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Lex the captured text again as an independent source
    pub fn relex(&self, name: &str) -> CompileResult<TokenStream> {
        Lexer::for_text(&self.text(), name).tokenize_all()
    }

    fn push(&self, c: u8) {
        self.0.borrow_mut().push(c);
    }

    fn pop(&self) {
        self.0.borrow_mut().pop();
    }
}

impl PartialEq for BracketCapture {
    fn eq(&self, other: &Self) -> bool {
        self.same_region(other) || *self.0.borrow() == *other.0.borrow()
    }
}

impl fmt::Debug for BracketCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BracketCapture({:?})", self.text())
    }
}

/// Expression-nesting depth plus the active capture buffer
#[derive(Debug, Default)]
pub(crate) struct ExpressionCapture {
    depth: usize,
    active: Option<BracketCapture>,
}

impl ExpressionCapture {
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Enter a `(` that has already been consumed
    pub fn open(&mut self) {
        self.depth += 1;
        if self.depth == 1 {
            let buffer = BracketCapture::default();
            buffer.push(b'(');
            self.active = Some(buffer);
        }
    }

    /// Leave the innermost region after its `)` has been consumed
    pub fn close(&mut self, position: Position) -> CompileResult<()> {
        if self.depth == 0 {
            return Err(CompileError::unbalanced(position));
        }
        self.depth -= 1;
        if self.depth == 0 {
            self.active = None;
        }
        Ok(())
    }

    /// Append a consumed character to the active buffer
    pub fn record(&self, c: u8) {
        if let Some(buffer) = &self.active {
            buffer.push(c);
        }
    }

    /// Drop the last recorded character (lookahead was pushed back)
    pub fn unrecord(&self) {
        if let Some(buffer) = &self.active {
            buffer.pop();
        }
    }

    /// Handle to attach to a token produced right now
    pub fn handle(&self) -> Option<BracketCapture> {
        self.active.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_regions_share_one_buffer() {
        let mut capture = ExpressionCapture::default();
        capture.open();
        let outer = capture.handle().unwrap();
        capture.record(b'a');
        capture.record(b'(');
        capture.open();
        assert_eq!(capture.depth(), 2);
        assert!(capture.handle().unwrap().same_region(&outer));
        assert_eq!(outer.text(), "(a(");
    }

    #[test]
    fn test_close_finalizes_buffer() {
        let mut capture = ExpressionCapture::default();
        capture.open();
        let handle = capture.handle().unwrap();
        capture.record(b')');
        capture.close(Position::start_of("t.c")).unwrap();
        assert_eq!(capture.depth(), 0);
        assert!(capture.handle().is_none());

        capture.record(b'x');
        assert_eq!(handle.text(), "()");
    }

    #[test]
    fn test_unrecord_drops_lookahead() {
        let mut capture = ExpressionCapture::default();
        capture.open();
        capture.record(b'%');
        capture.record(b'~');
        capture.unrecord();
        assert_eq!(capture.handle().unwrap().text(), "(%");
    }

    #[test]
    fn test_close_at_depth_zero_is_error() {
        let mut capture = ExpressionCapture::default();
        let err = capture.close(Position::start_of("t.c")).unwrap_err();
        assert!(matches!(err, CompileError::UnbalancedBracket { .. }));
    }

    #[test]
    fn test_relex_closed_region() {
        let mut capture = ExpressionCapture::default();
        capture.open();
        let handle = capture.handle().unwrap();
        for c in b"a + (b))" {
            capture.record(*c);
        }
        capture.close(Position::start_of("t.c")).unwrap();

        let tokens = handle.relex("<capture>").unwrap();
        assert_eq!(handle.text(), "(a + (b))");
        assert_eq!(tokens.len(), 7);
        assert!(tokens.iter().all(|t| t.between_brackets.is_some()));
    }

    #[test]
    fn test_fresh_region_after_close() {
        let mut capture = ExpressionCapture::default();
        capture.open();
        let first = capture.handle().unwrap();
        capture.close(Position::start_of("t.c")).unwrap();
        capture.open();
        assert!(!capture.handle().unwrap().same_region(&first));
    }
}
