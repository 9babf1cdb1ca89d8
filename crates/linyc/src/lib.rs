//! Liny Compiler - front end for a small C-like language
//!
//! The compiler currently stops after lexical analysis. The lexer turns a
//! character stream into classified tokens for a parser that does not exist
//! yet.
//!
//! ## Architecture
//!
//! - **Frontend** (`frontend/`): the C-like frontend and its lexer
//! - **Driver** (`driver/`): per-file compile process and status
//! - **Common** (`common/`): positions, errors and diagnostics

pub mod common;
pub mod driver;
pub mod frontend;

// Re-exports for convenience
pub use common::{CompileError, CompileResult, DiagnosticReporter, Position, Span};
pub use driver::{compile_file, CompileProcess, CompileStatus};
pub use frontend::{CFrontend, FrontendConfig};
