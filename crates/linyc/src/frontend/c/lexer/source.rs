//! Character sources the lexer pulls bytes from
//!
//! The lexer is written against [`CharSource`] only. Two adapters are
//! provided: [`ReaderSource`] over any `Read` (files in practice, see
//! [`FileSource`]) and [`StringSource`] over an in-memory buffer, used for
//! ad-hoc strings and for re-lexing captured bracket text.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// A pull-based byte stream with one-character lookahead and push-back.
///
/// `None` is the end-of-stream sentinel.
pub trait CharSource {
    /// Consume and return the next character
    fn next_char(&mut self) -> io::Result<Option<u8>>;

    /// Return what `next_char` would return, without consuming it
    fn peek_char(&mut self) -> io::Result<Option<u8>>;

    /// Return `c` to the front of the stream
    fn push_back(&mut self, c: u8);
}

/// Source backed by a buffered reader
pub struct ReaderSource<R: Read> {
    reader: BufReader<R>,
    /// Pushed-back characters, last element is the front of the stream
    pushed: Vec<u8>,
}

/// Source backed by an open file
pub type FileSource = ReaderSource<File>;

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            pushed: Vec::new(),
        }
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        loop {
            match self.reader.read(&mut byte) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(byte[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

impl ReaderSource<File> {
    /// Open `path` for reading
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> CharSource for ReaderSource<R> {
    fn next_char(&mut self) -> io::Result<Option<u8>> {
        match self.pushed.pop() {
            Some(c) => Ok(Some(c)),
            None => self.read_byte(),
        }
    }

    fn peek_char(&mut self) -> io::Result<Option<u8>> {
        if let Some(&c) = self.pushed.last() {
            return Ok(Some(c));
        }
        let c = self.read_byte()?;
        if let Some(c) = c {
            self.pushed.push(c);
        }
        Ok(c)
    }

    fn push_back(&mut self, c: u8) {
        self.pushed.push(c);
    }
}

/// Source backed by an in-memory text buffer
#[derive(Debug, Clone)]
pub struct StringSource {
    bytes: Vec<u8>,
    cursor: usize,
    pushed: Vec<u8>,
}

impl StringSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
            cursor: 0,
            pushed: Vec::new(),
        }
    }
}

impl CharSource for StringSource {
    fn next_char(&mut self) -> io::Result<Option<u8>> {
        if let Some(c) = self.pushed.pop() {
            return Ok(Some(c));
        }
        let c = self.bytes.get(self.cursor).copied();
        if c.is_some() {
            self.cursor += 1;
        }
        Ok(c)
    }

    fn peek_char(&mut self) -> io::Result<Option<u8>> {
        match self.pushed.last() {
            Some(&c) => Ok(Some(c)),
            None => Ok(self.bytes.get(self.cursor).copied()),
        }
    }

    fn push_back(&mut self, c: u8) {
        self.pushed.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Seek, SeekFrom, Write};

    fn drain(source: &mut impl CharSource) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some(c) = source.next_char().unwrap() {
            out.push(c);
        }
        out
    }

    #[test]
    fn test_string_source_peek_is_idempotent() {
        let mut source = StringSource::new("ab");
        assert_eq!(source.peek_char().unwrap(), Some(b'a'));
        assert_eq!(source.peek_char().unwrap(), Some(b'a'));
        assert_eq!(source.next_char().unwrap(), Some(b'a'));
        assert_eq!(source.next_char().unwrap(), Some(b'b'));
        assert_eq!(source.next_char().unwrap(), None);
        assert_eq!(source.peek_char().unwrap(), None);
    }

    #[test]
    fn test_string_source_push_back() {
        let mut source = StringSource::new("xy");
        let c = source.next_char().unwrap().unwrap();
        source.push_back(c);
        assert_eq!(source.peek_char().unwrap(), Some(b'x'));
        assert_eq!(drain(&mut source), b"xy");
    }

    #[test]
    fn test_reader_source_peek_then_push_back() {
        let mut source = ReaderSource::new(&b"+=;"[..]);
        assert_eq!(source.next_char().unwrap(), Some(b'+'));
        assert_eq!(source.peek_char().unwrap(), Some(b'='));
        let c = source.next_char().unwrap().unwrap();
        source.push_back(c);
        assert_eq!(drain(&mut source), b"=;");
    }

    #[test]
    fn test_file_source_reads_file() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"int x;\n").unwrap();
        file.seek(SeekFrom::Start(0)).unwrap();

        let mut source = FileSource::new(file);
        assert_eq!(drain(&mut source), b"int x;\n");
    }

    #[test]
    fn test_file_source_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FileSource::open(dir.path().join("missing.c")).is_err());
    }
}
