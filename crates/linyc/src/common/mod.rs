//! Common infrastructure shared by the lexer and the driver

mod error;
mod position;

pub use error::{CompileError, CompileResult, DiagnosticReporter};
pub use position::{Position, PositionTracker, Span};
