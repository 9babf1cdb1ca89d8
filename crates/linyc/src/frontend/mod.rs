//! Language frontends
//!
//! Only the C-like frontend exists, and it stops after lexing: parsing and
//! semantic analysis are not part of this compiler yet.

pub mod c;

pub use c::CFrontend;

/// Configuration options passed to frontends
#[derive(Debug, Clone, Default)]
pub struct FrontendConfig {
    pub dump_tokens: bool,
    /// Print the bracket capture text next to each dumped token
    pub dump_captures: bool,
}
