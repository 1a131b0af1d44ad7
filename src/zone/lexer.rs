//! Lexer for zone definition command files
//!
//! Tokenization is handled entirely by a logos-derived token kind; `tokenize`
//! pairs the kinds with their text and source spans. The token shapes are
//! chosen for the matcher engine downstream:
//! - scoped identifiers (`Some::Type::member`) are lexed as a single token
//! - every other visible character becomes an individual punctuation token,
//!   so multi-character operators such as `<<` arrive decomposed and literal
//!   alternatives can be tried character by character
//! - whitespace and `//` line comments are skipped

pub mod lexer_impl;
pub mod tokens;

pub use lexer_impl::{line_number, tokenize, LexError};
pub use tokens::{Token, TokenKind};
