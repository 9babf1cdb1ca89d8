//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use super::Position;

/// Fatal lexical error with source location
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Unterminated construct at {position}: {message}")]
    UnterminatedConstruct { message: String, position: Position },

    #[error("Invalid lexeme at {position}: {message}")]
    InvalidLexeme { message: String, position: Position },

    #[error("Unbalanced bracket at {position}: unmatched closing paren")]
    UnbalancedBracket { position: Position },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn unterminated(message: impl Into<String>, position: Position) -> Self {
        Self::UnterminatedConstruct {
            message: message.into(),
            position,
        }
    }

    pub fn invalid(message: impl Into<String>, position: Position) -> Self {
        Self::InvalidLexeme {
            message: message.into(),
            position,
        }
    }

    pub fn unbalanced(position: Position) -> Self {
        Self::UnbalancedBracket { position }
    }

    /// Source location of the error, if it has one
    pub fn position(&self) -> Option<&Position> {
        match self {
            CompileError::UnterminatedConstruct { position, .. }
            | CompileError::InvalidLexeme { position, .. }
            | CompileError::UnbalancedBracket { position } => Some(position),
            CompileError::Io(_) => None,
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
    error_count: usize,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self::with_color(ColorChoice::Auto)
    }

    pub fn with_color(color: ColorChoice) -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(color),
            config: term::Config::default(),
            error_count: 0,
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Number of errors reported so far
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn report_error(&mut self, file_id: usize, error: &CompileError) {
        self.error_count += 1;

        let source_len = self.files.get(file_id).map_or(0, |file| file.source().len());
        let labelled = |title: &str, message: String, position: &Position| {
            let start = position.offset.min(source_len);
            let end = (start + 1).min(source_len);
            Diagnostic::error()
                .with_message(title.to_string())
                .with_labels(vec![
                    Label::primary(file_id, start..end).with_message(message),
                ])
        };

        let diagnostic = match error {
            CompileError::UnterminatedConstruct { message, position } => {
                labelled("Unterminated construct", message.clone(), position)
            }

            CompileError::InvalidLexeme { message, position } => {
                labelled("Invalid lexeme", message.clone(), position)
            }

            CompileError::UnbalancedBracket { position } => labelled(
                "Unbalanced bracket",
                "unmatched closing paren".to_string(),
                position,
            ),

            CompileError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {err}"))
            }
        };

        if term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic).is_err() {
            tracing::debug!("diagnostic rendering failed, printing plain message");
            eprintln!("error: {error}");
        }
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_accessor() {
        let pos = Position::start_of("t.c");
        let err = CompileError::unbalanced(pos.clone());
        assert_eq!(err.position(), Some(&pos));

        let io = CompileError::from(std::io::Error::other("boom"));
        assert!(io.position().is_none());
    }

    #[test]
    fn test_display_includes_location() {
        let err = CompileError::invalid("unknown character '@'", Position::start_of("t.c"));
        assert_eq!(err.to_string(), "Invalid lexeme at t.c:1:1: unknown character '@'");
    }

    #[test]
    fn test_reporter_counts_errors() {
        let mut reporter = DiagnosticReporter::with_color(ColorChoice::Never);
        let file_id = reporter.add_file("t.c", "@");
        reporter.report_error(file_id, &CompileError::invalid("bad", Position::start_of("t.c")));
        let mut end = Position::start_of("t.c");
        end.offset = 1;
        reporter.report_error(file_id, &CompileError::unterminated("eof", end));
        assert_eq!(reporter.error_count(), 2);
    }
}
