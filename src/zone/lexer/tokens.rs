//! Token definitions for zone definition command files
//!
//! The token kinds are defined using the logos derive macro. Positions and
//! text are attached by the tokenizer in `lexer_impl`.

use logos::Logos;
use std::ops::Range;

/// All token kinds a command file can produce
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum TokenKind {
    /// Scoped identifier; `::`-separated paths are a single token
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*")]
    Identifier,

    /// Integer literal, decimal or `0x` hexadecimal
    #[regex(r"0[xX][0-9a-fA-F]+|[0-9]+")]
    Number,

    /// Any other visible character, one token per character
    #[regex(r"[^ \t\r\nA-Za-z0-9_]")]
    Punctuation,
}

/// An atomic lexical unit: kind, text and byte span into the source.
/// Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Range<usize>) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Check if this token is a scoped identifier
    pub fn is_identifier(&self) -> bool {
        self.kind == TokenKind::Identifier
    }

    /// Check if this token is an integer literal
    pub fn is_number(&self) -> bool {
        self.kind == TokenKind::Number
    }
}
