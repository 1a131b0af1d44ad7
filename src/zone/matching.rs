//! Tagged grammar-matching engine
//!
//! Grammars are built once from combinator matchers and are immutable
//! afterwards. Matching consumes a token stream and produces an ordered trace
//! of tagged captures, trying alternatives in declaration order and
//! backtracking on failure, without executing any semantic logic. A separate
//! processing pass walks the trace through a cursor to build typed results.
//!
//! Recursive and mutually-recursive grammars are expressed through the tag
//! registry: a `TagRef` matcher resolves its target lazily at match time, so
//! a rule can reference itself or a rule registered later during
//! construction.
//!
//! Failing to match is not an error: recognition returns `Ok(None)` and the
//! enclosing alternative or loop carries on. `GrammarError` is reserved for
//! the fatal family: a referenced tag that was never registered, or a trace
//! consumed in a shape the grammar cannot have produced. Those are bugs in a
//! grammar/processor pairing, never user input errors, and they are kept as
//! a separate type so callers cannot catch them as recoverable parse
//! failures.

pub mod matcher;
pub mod registry;
pub mod trace;

pub use matcher::{Grammar, GrammarBuilder, LoopMode, MatchOutcome, Matcher, MatcherId, MatcherKind};
pub use registry::TagRegistry;
pub use trace::{MatchTrace, TraceCursor};

use std::fmt;

/// Fatal errors in a grammar definition or a grammar/processor pairing.
///
/// These must never occur for a correctly paired grammar and processor; they
/// abort the current parse outright and are displayed with an `internal
/// error:` prefix so they are distinguishable from user input errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A `TagRef` names a tag that was never registered
    UnregisteredTag(String),
    /// The processor consumed past the end of the trace
    TraceExhausted,
    /// The processor expected one tag and found another
    UnexpectedTag { expected: String, got: String },
    /// The processor asked for a capture name the trace does not supply
    MissingCapture(String),
    /// A structural invariant of the engine was violated
    Invariant(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UnregisteredTag(tag) => {
                write!(f, "internal error: tag '{}' referenced but never registered", tag)
            }
            GrammarError::TraceExhausted => {
                write!(f, "internal error: match trace exhausted")
            }
            GrammarError::UnexpectedTag { expected, got } => {
                write!(f, "internal error: expected tag '{}', got '{}'", expected, got)
            }
            GrammarError::MissingCapture(name) => {
                write!(f, "internal error: no capture left for '{}'", name)
            }
            GrammarError::Invariant(message) => {
                write!(f, "internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for GrammarError {}
