//! Core tokenization for zone definition command files
//!
//! The actual tokenization is handled entirely by logos; this module pairs
//! token kinds with their text and source spans and reports characters the
//! token definitions reject.

use crate::zone::lexer::tokens::{Token, TokenKind};
use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Errors that can occur during tokenization
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    UnexpectedCharacter { text: String, span: Range<usize> },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedCharacter { text, span } => {
                write!(
                    f,
                    "unexpected character '{}' at byte {}",
                    text, span.start
                )
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Tokenize command-file source into a flat token stream
///
/// Whitespace and `//` line comments are skipped. The returned tokens carry
/// their text and byte spans so later passes can report source locations.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = TokenKind::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(Token::new(kind, lexer.slice(), lexer.span())),
            Err(_) => {
                return Err(LexError::UnexpectedCharacter {
                    text: lexer.slice().to_string(),
                    span: lexer.span(),
                })
            }
        }
    }

    Ok(tokens)
}

/// 1-based line number of a byte offset, for error reporting
pub fn line_number(source: &str, offset: usize) -> usize {
    let clamped = offset.min(source.len());
    source[..clamped].bytes().filter(|b| *b == b'\n').count() + 1
}
