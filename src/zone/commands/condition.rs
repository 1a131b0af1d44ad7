//! The `condition <member-path> (always | never | <evaluation>);` statement
//!
//! Binds an inclusion condition to a member: the member is only serialized
//! when the condition holds. `always` and `never` are fixed forms; anything
//! else is a full evaluation over the used types.

use crate::zone::commands::expression::{
    process_evaluation, register_evaluation_grammar, TAG_EVALUATION,
};
use crate::zone::commands::state::CommandParserState;
use crate::zone::commands::{CommandError, CommandOutput, Condition};
use crate::zone::matching::{Grammar, GrammarBuilder, GrammarError, TraceCursor};
use once_cell::sync::Lazy;

const NAME_PATH: &str = "condition_path_token";
const TAG_ALWAYS: &str = "condition_always";
const TAG_NEVER: &str = "condition_never";

static GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    let mut b = GrammarBuilder::new();
    register_evaluation_grammar(&mut b);
    let keyword = b.literal(&["condition"]);
    let path = b.typename();
    let path = b.with_name(path, NAME_PATH);
    let always = b.literal(&["always"]);
    let always = b.with_tag(always, TAG_ALWAYS);
    let never = b.literal(&["never"]);
    let never = b.with_tag(never, TAG_NEVER);
    let evaluation = b.tag_ref(TAG_EVALUATION);
    let body = b.group_or(vec![always, never, evaluation]);
    let semicolon = b.literal(&[";"]);
    let root = b.group_and(vec![keyword, path, body, semicolon]);
    b.build(root).expect("condition grammar is closed")
});

pub(crate) fn grammar() -> &'static Grammar {
    &GRAMMAR
}

pub(crate) fn process(
    cursor: &mut TraceCursor<'_>,
    state: &mut CommandParserState,
) -> Result<CommandOutput, CommandError> {
    let path = cursor.next_match(NAME_PATH)?.to_string();

    let tag = cursor.next_tag()?;
    let condition = match tag {
        TAG_ALWAYS => Condition::Always,
        TAG_NEVER => Condition::Never,
        TAG_EVALUATION => Condition::Evaluation(process_evaluation(cursor, state)?),
        other => {
            return Err(GrammarError::UnexpectedTag {
                expected: TAG_EVALUATION.to_string(),
                got: other.to_string(),
            }
            .into())
        }
    };

    let parts: Vec<&str> = path.split("::").collect();
    let (owner, member_chain) = state
        .resolve_member_path(&parts)
        .ok_or_else(|| CommandError::UnresolvedReference(path.clone()))?;

    Ok(CommandOutput::Condition {
        owner,
        member_chain,
        condition,
    })
}
