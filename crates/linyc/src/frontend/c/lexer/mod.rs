//! Lexer module for tokenizing C-like source code

mod capture;
mod keywords;
mod scanner;
mod source;
mod token;

pub use capture::BracketCapture;
pub use keywords::{is_keyword, KEYWORDS};
pub use scanner::Lexer;
pub use source::{CharSource, FileSource, ReaderSource, StringSource};
pub use token::{NumberLiteral, NumberSubtype, Token, TokenKind, TokenStream};
