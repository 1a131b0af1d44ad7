//! Command-file parsing
//!
//! Each statement of a command file is described by its own compiled grammar
//! (a sequence of matchers ending in `;`) paired with a processor that walks
//! the match trace. The parser tries the statement grammars in declaration
//! order at the current token position; the first that matches commits, its
//! processor runs, and parsing continues after the consumed tokens.
//!
//! Error kinds are kept strictly apart:
//! - a statement grammar that does not match is not an error, the next one
//!   is tried; only when none matches is a syntax error reported with the
//!   offending line
//! - well-formed statements that reference unresolvable names fail with a
//!   user-facing error naming the path
//! - a trace the processor cannot consume is a `GrammarError`, a bug in the
//!   grammar/processor pairing, and aborts parsing

pub mod condition;
pub mod count;
pub mod expression;
pub mod parser;
pub mod state;
pub mod use_type;

pub use expression::parse_evaluation;
pub use parser::CommandFileParser;
pub use state::CommandParserState;

use crate::zone::domain::evaluation::Evaluation;
use crate::zone::domain::snapshot::snapshot;
use crate::zone::lexer::LexError;
use crate::zone::matching::GrammarError;
use crate::zone::repository::{CompositeDef, Member};
use serde_json::json;
use std::fmt;
use std::sync::Arc;

/// A parsed statement, ready for the emission phase
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutput {
    /// A type was activated as an implicit member lookup scope
    Use { type_name: String },
    /// A dynamic-length evaluation was bound to a member path
    Count {
        owner: Arc<CompositeDef>,
        member_chain: Vec<Member>,
        evaluation: Evaluation,
    },
    /// An inclusion condition was bound to a member path
    Condition {
        owner: Arc<CompositeDef>,
        member_chain: Vec<Member>,
        condition: Condition,
    },
}

/// The right-hand side of a `condition` statement
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Always,
    Never,
    Evaluation(Evaluation),
}

impl CommandOutput {
    /// Serializable snapshot for inspection output
    pub fn to_snapshot(&self) -> serde_json::Value {
        match self {
            CommandOutput::Use { type_name } => json!({
                "command": "use",
                "type": type_name,
            }),
            CommandOutput::Count {
                owner,
                member_chain,
                evaluation,
            } => json!({
                "command": "count",
                "path": path_string(owner, member_chain),
                "evaluation": snapshot(evaluation),
            }),
            CommandOutput::Condition {
                owner,
                member_chain,
                condition,
            } => json!({
                "command": "condition",
                "path": path_string(owner, member_chain),
                "condition": match condition {
                    Condition::Always => json!("always"),
                    Condition::Never => json!("never"),
                    Condition::Evaluation(evaluation) => json!(snapshot(evaluation)),
                },
            }),
        }
    }
}

fn path_string(owner: &CompositeDef, member_chain: &[Member]) -> String {
    let mut path = owner.name.clone();
    for member in member_chain {
        path.push_str("::");
        path.push_str(&member.name);
    }
    path
}

/// User-facing errors from command-file parsing.
///
/// The `Internal` variant wraps the fatal family; it is produced only
/// through `From<GrammarError>` and keeps its `internal error:` display so
/// it can never be mistaken for a problem with the command file.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    Lex(LexError),
    /// No statement grammar matched at this position
    Syntax { line: usize, got: String },
    UnknownType(String),
    NotAStructOrUnion(String),
    UnresolvedReference(String),
    MalformedNumber(String),
    Internal(GrammarError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Lex(error) => write!(f, "{}", error),
            CommandError::Syntax { line, got } => {
                write!(f, "syntax error at line {}: no command matches near '{}'", line, got)
            }
            CommandError::UnknownType(name) => {
                write!(f, "could not find data type '{}'", name)
            }
            CommandError::NotAStructOrUnion(name) => {
                write!(
                    f,
                    "to use data type '{}' it must either be a struct or a union",
                    name
                )
            }
            CommandError::UnresolvedReference(path) => {
                write!(f, "could not evaluate '{}'", path)
            }
            CommandError::MalformedNumber(text) => {
                write!(f, "number literal '{}' is out of range", text)
            }
            CommandError::Internal(error) => write!(f, "{}", error),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<LexError> for CommandError {
    fn from(error: LexError) -> Self {
        CommandError::Lex(error)
    }
}

impl From<GrammarError> for CommandError {
    fn from(error: GrammarError) -> Self {
        CommandError::Internal(error)
    }
}
