//! Compilation driver
//!
//! A compile process owns the opened input and output files for one source.
//! Every lex pass builds its own lexer over the input file; nothing is shared
//! between processes.

use std::fs::{self, File};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::common::{CompileError, CompileResult, DiagnosticReporter};
use crate::frontend::c::lexer::{ReaderSource, TokenStream};
use crate::frontend::{CFrontend, FrontendConfig};

/// Outcome of compiling one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileStatus {
    FileCompleteOk,
    FailedWithErrors,
}

/// One source file on its way through the compiler
pub struct CompileProcess {
    input_path: PathBuf,
    input: File,
    output: Option<File>,
    config: FrontendConfig,
}

impl CompileProcess {
    /// Open `input` for reading and, if given, create `output` for writing
    pub fn create(
        input: &Path,
        output: Option<&Path>,
        config: FrontendConfig,
    ) -> CompileResult<Self> {
        let input_file = File::open(input)?;
        let output = output.map(File::create).transpose()?;

        Ok(Self {
            input_path: input.to_path_buf(),
            input: input_file,
            output,
            config,
        })
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }

    /// Lex the whole input file from the start
    pub fn lex(&self) -> CompileResult<TokenStream> {
        let mut input = &self.input;
        input.seek(SeekFrom::Start(0))?;

        let filename = self.input_path.display().to_string();
        CFrontend::new().lex(ReaderSource::new(input), &filename, &self.config)
    }
}

/// Compile `input`, reporting any failure through `reporter`
pub fn compile_file(
    input: &Path,
    output: Option<&Path>,
    config: &FrontendConfig,
    reporter: &mut DiagnosticReporter,
) -> CompileStatus {
    let process = match CompileProcess::create(input, output, config.clone()) {
        Ok(process) => process,
        Err(e) => {
            report(reporter, input, &e);
            return CompileStatus::FailedWithErrors;
        }
    };

    match process.lex() {
        Ok(tokens) => {
            tracing::debug!(
                file = %process.input_path().display(),
                tokens = tokens.len(),
                "lexical analysis complete"
            );
            // Parsing and code generation do not exist yet.
            CompileStatus::FileCompleteOk
        }
        Err(e) => {
            report(reporter, input, &e);
            CompileStatus::FailedWithErrors
        }
    }
}

fn report(reporter: &mut DiagnosticReporter, input: &Path, error: &CompileError) {
    let source = fs::read(input)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();
    let file_id = reporter.add_file(input.display().to_string(), source);
    reporter.report_error(file_id, error);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::c::lexer::TokenKind;
    use codespan_reporting::term::termcolor::ColorChoice;
    use pretty_assertions::assert_eq;

    fn quiet_reporter() -> DiagnosticReporter {
        DiagnosticReporter::with_color(ColorChoice::Never)
    }

    #[test]
    fn test_compile_ok() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.c");
        fs::write(&input, "#include <stdio.h>\nint main() { return 0x0; }\n").unwrap();

        let mut reporter = quiet_reporter();
        let status = compile_file(&input, None, &FrontendConfig::default(), &mut reporter);
        assert_eq!(status, CompileStatus::FileCompleteOk);
        assert_eq!(reporter.error_count(), 0);
    }

    #[test]
    fn test_compile_creates_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.c");
        let output = dir.path().join("test");
        fs::write(&input, "x;").unwrap();

        let mut reporter = quiet_reporter();
        let status = compile_file(&input, Some(&output), &FrontendConfig::default(), &mut reporter);
        assert_eq!(status, CompileStatus::FileCompleteOk);
        assert!(output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut reporter = quiet_reporter();
        let status = compile_file(
            &dir.path().join("missing.c"),
            None,
            &FrontendConfig::default(),
            &mut reporter,
        );
        assert_eq!(status, CompileStatus::FailedWithErrors);
        assert_eq!(reporter.error_count(), 1);
    }

    #[test]
    fn test_lex_error_reported_once() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.c");
        fs::write(&input, "char *s = \"abc;\n").unwrap();

        let mut reporter = quiet_reporter();
        let status = compile_file(&input, None, &FrontendConfig::default(), &mut reporter);
        assert_eq!(status, CompileStatus::FailedWithErrors);
        assert_eq!(reporter.error_count(), 1);
    }

    #[test]
    fn test_process_lex_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("test.c");
        fs::write(&input, "a = (b);\n").unwrap();

        let process = CompileProcess::create(&input, None, FrontendConfig::default()).unwrap();
        assert!(!process.has_output());
        let first = process.lex().unwrap();
        let second = process.lex().unwrap();
        assert_eq!(first.kinds(), second.kinds());
        assert_eq!(first[0].kind, TokenKind::Identifier("a".to_string()));
        assert_eq!(&*first[0].position.filename, input.display().to_string());
    }
}
