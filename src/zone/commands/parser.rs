//! The command-file driver
//!
//! Statement grammars are tried in declaration order at the current token
//! position; the first match commits and its processor runs against the
//! trace. When no grammar matches, the offending token's line is reported.

use crate::zone::commands::state::CommandParserState;
use crate::zone::commands::{condition, count, use_type, CommandError, CommandOutput};
use crate::zone::lexer::{line_number, tokenize};
use crate::zone::matching::{Grammar, TraceCursor};
use crate::zone::repository::TypeRepository;

type CommandProcessor =
    fn(&mut TraceCursor<'_>, &mut CommandParserState) -> Result<CommandOutput, CommandError>;

/// A statement: its compiled grammar and the processor for its trace
struct CommandDefinition {
    grammar: fn() -> &'static Grammar,
    process: CommandProcessor,
}

const COMMANDS: &[CommandDefinition] = &[
    CommandDefinition {
        grammar: use_type::grammar,
        process: use_type::process,
    },
    CommandDefinition {
        grammar: count::grammar,
        process: count::process,
    },
    CommandDefinition {
        grammar: condition::grammar,
        process: condition::process,
    },
];

/// Parser for whole command files
pub struct CommandFileParser {
    state: CommandParserState,
}

impl CommandFileParser {
    pub fn new(repository: TypeRepository) -> Self {
        CommandFileParser {
            state: CommandParserState::new(repository),
        }
    }

    pub fn state(&self) -> &CommandParserState {
        &self.state
    }

    /// Parse a command file into its statement outputs, in order
    pub fn parse(&mut self, source: &str) -> Result<Vec<CommandOutput>, CommandError> {
        let tokens = tokenize(source)?;
        let mut outputs = Vec::new();
        let mut position = 0;

        while position < tokens.len() {
            let mut matched = None;
            for command in COMMANDS {
                if let Some(outcome) = (command.grammar)().match_tokens(&tokens[position..])? {
                    matched = Some((outcome, command.process));
                    break;
                }
            }

            let (outcome, process) = match matched {
                Some(matched) => matched,
                None => {
                    let token = &tokens[position];
                    return Err(CommandError::Syntax {
                        line: line_number(source, token.span.start),
                        got: token.text.clone(),
                    });
                }
            };

            let mut cursor = outcome.trace.cursor();
            outputs.push(process(&mut cursor, &mut self.state)?);
            position += outcome.end;
        }

        Ok(outputs)
    }
}
