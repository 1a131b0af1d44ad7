//! Zone definition command-file parsing
//!
//! The modules mirror the processing pipeline:
//! - `lexer` turns raw command-file text into a flat token stream
//! - `matching` recognizes grammars over that stream and records match traces
//! - `commands` walks the traces and builds typed command outputs
//! - `domain` holds the evaluation tree model shared with the emission phase
//! - `repository` answers type and member lookups during processing

pub mod commands;
pub mod domain;
pub mod lexer;
pub mod matching;
pub mod repository;
