//! C-like language frontend
//!
//! This frontend handles:
//! - Lexing source text into tokens
//! - Dumping the token stream for debugging

pub mod lexer;

use std::fmt::Write as _;

use crate::common::CompileResult;
use crate::frontend::FrontendConfig;

pub use lexer::{CharSource, Lexer, Token, TokenKind, TokenStream};

/// C-like language frontend
pub struct CFrontend;

impl CFrontend {
    pub fn new() -> Self {
        Self
    }

    /// Lex one source to completion with a fresh lexer
    pub fn lex<S: CharSource>(
        &self,
        source: S,
        filename: &str,
        config: &FrontendConfig,
    ) -> CompileResult<TokenStream> {
        tracing::debug!(file = filename, "lexing");
        let tokens = Lexer::new(source, filename).tokenize_all()?;

        if config.dump_tokens {
            eprintln!("=== Tokens ===");
            eprint!("{}", self.dump_tokens(&tokens, config.dump_captures));
            eprintln!("=== End Tokens ===\n");
        }

        Ok(tokens)
    }

    /// Render one token per line
    pub fn dump_tokens(&self, tokens: &TokenStream, with_captures: bool) -> String {
        let mut output = String::new();
        for token in tokens {
            let _ = write!(output, "{token}");
            if with_captures {
                if let Some(capture) = &token.between_brackets {
                    let _ = write!(output, " in {:?}", capture.text());
                }
            }
            output.push('\n');
        }
        output
    }
}

impl Default for CFrontend {
    fn default() -> Self {
        Self::new()
    }
}
