//! The `count <member-path> <evaluation>;` statement
//!
//! Binds a dynamic length evaluation to an array member, so the emission
//! phase serializes only as many elements as the evaluation yields.

use crate::zone::commands::expression::{
    process_evaluation, register_evaluation_grammar, TAG_EVALUATION,
};
use crate::zone::commands::state::CommandParserState;
use crate::zone::commands::{CommandError, CommandOutput};
use crate::zone::matching::{Grammar, GrammarBuilder, TraceCursor};
use once_cell::sync::Lazy;

const NAME_PATH: &str = "count_path_token";

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    let mut b = GrammarBuilder::new();
    register_evaluation_grammar(&mut b);
    let keyword = b.literal(&["count"]);
    let path = b.typename();
    let path = b.with_name(path, NAME_PATH);
    let evaluation = b.tag_ref(TAG_EVALUATION);
    let semicolon = b.literal(&[";"]);
    let root = b.group_and(vec![keyword, path, evaluation, semicolon]);
    b.build(root).expect("count grammar is closed")
});

pub(crate) fn grammar() -> &'static Grammar {
    &GRAMMAR
}

pub(crate) fn process(
    cursor: &mut TraceCursor<'_>,
    state: &mut CommandParserState,
) -> Result<CommandOutput, CommandError> {
    let path = cursor.next_match(NAME_PATH)?.to_string();

    cursor.expect_tag(TAG_EVALUATION)?;
    let evaluation = process_evaluation(cursor, state)?;

    let parts: Vec<&str> = path.split("::").collect();
    let (owner, member_chain) = state
        .resolve_member_path(&parts)
        .ok_or_else(|| CommandError::UnresolvedReference(path.clone()))?;

    Ok(CommandOutput::Count {
        owner,
        member_chain,
        evaluation,
    })
}
