//! # zonegen
//!
//! A code generator front end for zone definition command files.
//!
//! Command files annotate serializable data structures (structs, unions and
//! enums) with generation directives. The crate is organized around two
//! decoupled passes:
//!
//! 1. Recognition: a tagged grammar-matching engine ([`zone::matching`])
//!    recognizes statement grammars over a pre-lexed token stream and records
//!    a flat trace of tagged captures, with no semantic actions.
//! 2. Processing: trace walkers ([`zone::commands`]) rebuild typed artifacts
//!    from the trace, most notably the recursive expression evaluator that
//!    produces [`zone::domain::Evaluation`] trees.

pub mod zone;
