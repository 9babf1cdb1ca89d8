//! Source positions and the tracker that maintains them while lexing

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// How many consumed characters can be undone by `PositionTracker::retreat`.
const HISTORY_DEPTH: usize = 8;

/// A location in a named source: 1-based line/column plus a 0-based byte offset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    pub offset: usize,
    pub filename: Arc<str>,
}

impl Position {
    /// Position of the first character of `filename`
    pub fn start_of(filename: impl Into<Arc<str>>) -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
            filename: filename.into(),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// Byte range of a lexeme in its source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Tracks line/column/offset as characters are consumed.
///
/// Every consumed byte advances the tracker exactly once. A small history of
/// prior line/column pairs lets the lexer undo its lookahead, including
/// lookahead across a newline.
#[derive(Debug)]
pub struct PositionTracker {
    current: Position,
    history: VecDeque<(u32, u32)>,
}

impl PositionTracker {
    pub fn new(filename: impl Into<Arc<str>>) -> Self {
        Self {
            current: Position::start_of(filename),
            history: VecDeque::with_capacity(HISTORY_DEPTH),
        }
    }

    /// Snapshot of the position of the next character to be consumed
    pub fn position(&self) -> Position {
        self.current.clone()
    }

    pub fn offset(&self) -> usize {
        self.current.offset
    }

    pub fn filename(&self) -> &Arc<str> {
        &self.current.filename
    }

    /// Record that `c` was consumed
    pub fn advance(&mut self, c: u8) {
        if self.history.len() == HISTORY_DEPTH {
            self.history.pop_front();
        }
        self.history.push_back((self.current.line, self.current.column));

        self.current.offset += 1;
        if c == b'\n' {
            self.current.line += 1;
            self.current.column = 1;
        } else {
            self.current.column += 1;
        }
    }

    /// Undo the most recent `advance`
    pub fn retreat(&mut self) {
        if let Some((line, column)) = self.history.pop_back() {
            self.current.line = line;
            self.current.column = column;
            self.current.offset -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_columns_and_lines() {
        let mut tracker = PositionTracker::new("a.c");
        for c in b"ab\nc" {
            tracker.advance(*c);
        }
        let pos = tracker.position();
        assert_eq!(pos.line, 2);
        assert_eq!(pos.column, 2);
        assert_eq!(pos.offset, 4);
        assert_eq!(pos.to_string(), "a.c:2:2");
    }

    #[test]
    fn test_retreat_across_newline() {
        let mut tracker = PositionTracker::new("a.c");
        tracker.advance(b'x');
        tracker.advance(b'\n');
        assert_eq!(tracker.position().line, 2);

        tracker.retreat();
        let pos = tracker.position();
        assert_eq!((pos.line, pos.column, pos.offset), (1, 2, 1));
    }

    #[test]
    fn test_retreat_without_history_is_noop() {
        let mut tracker = PositionTracker::new("a.c");
        tracker.retreat();
        assert_eq!(tracker.position(), Position::start_of("a.c"));
    }
}
