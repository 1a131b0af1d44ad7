//! The `use <TypeName>;` statement
//!
//! Activates a struct or union as the implicit member lookup scope for the
//! expressions of later statements.

use crate::zone::commands::state::CommandParserState;
use crate::zone::commands::{CommandError, CommandOutput};
use crate::zone::matching::{Grammar, GrammarBuilder, TraceCursor};
use crate::zone::repository::DataType;
use once_cell::sync::Lazy;
use std::sync::Arc;

const NAME_TYPE: &str = "use_type_token";

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    let mut b = GrammarBuilder::new();
    let keyword = b.literal(&["use"]);
    let type_name = b.typename();
    let type_name = b.with_name(type_name, NAME_TYPE);
    let semicolon = b.literal(&[";"]);
    let root = b.group_and(vec![keyword, type_name, semicolon]);
    b.build(root).expect("use grammar is closed")
});

pub(crate) fn grammar() -> &'static Grammar {
    &GRAMMAR
}

pub(crate) fn process(
    cursor: &mut TraceCursor<'_>,
    state: &mut CommandParserState,
) -> Result<CommandOutput, CommandError> {
    let type_name = cursor.next_match(NAME_TYPE)?;

    let composite = match state.repository().data_type_by_name(type_name) {
        None => return Err(CommandError::UnknownType(type_name.to_string())),
        Some(DataType::Composite(composite)) => Arc::clone(composite),
        Some(_) => return Err(CommandError::NotAStructOrUnion(type_name.to_string())),
    };

    let type_name = composite.name.clone();
    state.push_used_type(composite);
    Ok(CommandOutput::Use { type_name })
}
