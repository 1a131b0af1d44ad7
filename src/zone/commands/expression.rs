//! The expression grammar and its trace processor
//!
//! The grammar is right-recursive:
//!
//! ```text
//! evaluation  ::= ( "!"? "(" evaluation ")" | operand ) (operationType evaluation)?
//! operand     ::= typename arrayIndex* | number
//! arrayIndex  ::= "[" evaluation "]"
//! ```
//!
//! so a chain `a + b * c` decodes into flat, textual-order operand and
//! operator lists; precedence is not encoded structurally and is
//! reconstructed afterwards by repeatedly extracting the leftmost operator
//! with the lowest precedence rank. Ties resolve to the leftmost pair, which
//! yields left-associativity for equal-precedence chains.
//!
//! Negation is desugared while building: `!(e)` becomes `e == 0`. There is
//! no dedicated unary operator in the tree model.

use crate::zone::commands::state::CommandParserState;
use crate::zone::commands::CommandError;
use crate::zone::domain::evaluation::{Evaluation, OperandDynamic, Operation};
use crate::zone::domain::operation::OperationType;
use crate::zone::lexer::{line_number, tokenize};
use crate::zone::matching::{Grammar, GrammarBuilder, GrammarError, TraceCursor};
use once_cell::sync::Lazy;

pub(crate) const TAG_EVALUATION: &str = "evaluation";
const TAG_OPERAND: &str = "operand";
const TAG_OPERATION_TYPE: &str = "operation_type";
const TAG_EVALUATION_PARENTHESIS: &str = "evaluation_parenthesis";
const TAG_EVALUATION_PARENTHESIS_END: &str = "evaluation_parenthesis_end";
const TAG_EVALUATION_NOT: &str = "evaluation_not";
const TAG_EVALUATION_OPERATION: &str = "evaluation_operation";
const TAG_OPERAND_NUMBER: &str = "operand_number";
const TAG_OPERAND_TYPENAME: &str = "operand_typename";
const TAG_OPERAND_ARRAY: &str = "operand_array";
const TAG_OPERAND_ARRAY_END: &str = "operand_array_end";
const NAME_OPERAND_NUMBER: &str = "operand_number_token";
const NAME_OPERAND_TYPENAME: &str = "operand_typename_token";
const NAME_OPERATION_TYPE: &str = "operation_type_token";

/// Register the evaluation grammar and its sub-grammars into a builder.
///
/// Statement grammars that embed an evaluation call this once and reference
/// the rules through `tag_ref(TAG_EVALUATION)`.
pub(crate) fn register_evaluation_grammar(b: &mut GrammarBuilder) {
    // arrayIndex ::= "[" evaluation "]"
    let open_bracket = b.literal(&["["]);
    let index_evaluation = b.tag_ref(TAG_EVALUATION);
    let close_bracket = b.literal(&["]"]);
    let close_bracket = b.with_tag(close_bracket, TAG_OPERAND_ARRAY_END);
    let operand_array = b.group_and(vec![open_bracket, index_evaluation, close_bracket]);
    b.register(TAG_OPERAND_ARRAY, operand_array);

    // operand ::= typename arrayIndex* | number
    let typename = b.typename();
    let typename = b.with_name(typename, NAME_OPERAND_TYPENAME);
    let array_ref = b.tag_ref(TAG_OPERAND_ARRAY);
    let arrays = b.zero_or_more(array_ref);
    let typename_operand = b.group_and(vec![typename, arrays]);
    let typename_operand = b.with_tag(typename_operand, TAG_OPERAND_TYPENAME);
    let number = b.number();
    let number = b.with_name(number, NAME_OPERAND_NUMBER);
    let number = b.with_tag(number, TAG_OPERAND_NUMBER);
    let operand = b.group_or(vec![typename_operand, number]);
    b.register(TAG_OPERAND, operand);

    // operationType ::= the operator table, longest syntax first so "<<"
    // wins over "<" on decomposed operator tokens
    let mut operator_syntax: Vec<&str> = OperationType::ALL.iter().map(|op| op.syntax()).collect();
    operator_syntax.sort_by(|a, b| b.len().cmp(&a.len()));
    let operation_type = b.literal(&operator_syntax);
    let operation_type = b.with_name(operation_type, NAME_OPERATION_TYPE);
    b.register(TAG_OPERATION_TYPE, operation_type);

    // evaluation ::= ( "!"? "(" evaluation ")" | operand ) (operationType evaluation)?
    let not = b.literal(&["!"]);
    let not = b.with_tag(not, TAG_EVALUATION_NOT);
    let not_optional = b.optional(not);
    let open_paren = b.literal(&["("]);
    let inner_evaluation = b.tag_ref(TAG_EVALUATION);
    let close_paren = b.literal(&[")"]);
    let close_paren = b.with_tag(close_paren, TAG_EVALUATION_PARENTHESIS_END);
    let parenthesis = b.group_and(vec![not_optional, open_paren, inner_evaluation, close_paren]);
    let parenthesis = b.with_tag(parenthesis, TAG_EVALUATION_PARENTHESIS);
    let operand_ref = b.tag_ref(TAG_OPERAND);
    let head = b.group_or(vec![parenthesis, operand_ref]);
    let operation_ref = b.tag_ref(TAG_OPERATION_TYPE);
    let rest_evaluation = b.tag_ref(TAG_EVALUATION);
    let operation = b.group_and(vec![operation_ref, rest_evaluation]);
    let operation = b.with_tag(operation, TAG_EVALUATION_OPERATION);
    let operation_optional = b.optional(operation);
    let evaluation = b.group_and(vec![head, operation_optional]);
    b.register(TAG_EVALUATION, evaluation);
}

static EVALUATION_GRAMMAR: Lazy<Grammar> = Lazy::new(|| {
    let mut b = GrammarBuilder::new();
    register_evaluation_grammar(&mut b);
    let root = b.tag_ref(TAG_EVALUATION);
    b.build(root).expect("evaluation grammar is closed")
});

/// Parse a standalone expression source into an evaluation tree.
///
/// The whole source must be consumed; trailing tokens are a syntax error.
pub fn parse_evaluation(
    source: &str,
    state: &CommandParserState,
) -> Result<Evaluation, CommandError> {
    let tokens = tokenize(source)?;
    let outcome = EVALUATION_GRAMMAR.match_tokens(&tokens)?;
    let outcome = match outcome {
        Some(outcome) if outcome.end == tokens.len() => outcome,
        partial => {
            let unmatched = partial.map(|outcome| outcome.end).unwrap_or(0);
            let (line, got) = match tokens.get(unmatched) {
                Some(token) => (line_number(source, token.span.start), token.text.clone()),
                None => (line_number(source, source.len()), String::new()),
            };
            return Err(CommandError::Syntax { line, got });
        }
    };

    let mut cursor = outcome.trace.cursor();
    cursor.expect_tag(TAG_EVALUATION)?;
    process_evaluation(&mut cursor, state)
}

/// Build an evaluation tree from the trace of a matched evaluation.
///
/// The caller has already consumed the `evaluation` tag; this mirrors how
/// the grammar nests the rule into statement grammars and array indices.
pub fn process_evaluation(
    cursor: &mut TraceCursor<'_>,
    state: &CommandParserState,
) -> Result<Evaluation, CommandError> {
    let mut operands: Vec<Evaluation> = Vec::new();
    let mut operators: Vec<OperationType> = Vec::new();

    loop {
        let tag = cursor.next_tag()?;
        let operand = match tag {
            TAG_EVALUATION_PARENTHESIS => process_parenthesis(cursor, state)?,
            TAG_OPERAND => process_operand(cursor, state)?,
            other => {
                return Err(GrammarError::UnexpectedTag {
                    expected: TAG_OPERAND.to_string(),
                    got: other.to_string(),
                }
                .into())
            }
        };
        operands.push(operand);

        if cursor.peek_tag() == Some(TAG_EVALUATION_OPERATION) {
            cursor.next_tag()?;
            cursor.expect_tag(TAG_OPERATION_TYPE)?;
            operators.push(process_operation_type(cursor)?);
            cursor.expect_tag(TAG_EVALUATION)?;
        } else {
            break;
        }
    }

    reassemble_by_precedence(operands, operators).map_err(CommandError::from)
}

/// Convert the flat textual-order lists into a precedence-correct tree by
/// repeatedly combining at the leftmost lowest-rank operator
fn reassemble_by_precedence(
    mut operands: Vec<Evaluation>,
    mut operators: Vec<OperationType>,
) -> Result<Evaluation, GrammarError> {
    while !operators.is_empty() {
        let mut index = 0;
        for (i, op) in operators.iter().enumerate() {
            if op.precedence() < operators[index].precedence() {
                index = i;
            }
        }
        if index + 1 >= operands.len() {
            return Err(GrammarError::Invariant(
                "operand and operator lists out of step".to_string(),
            ));
        }
        let op = operators.remove(index);
        let right = operands.remove(index + 1);
        let left = operands.remove(index);
        operands.insert(
            index,
            Evaluation::Operation(Box::new(Operation { left, right, op })),
        );
    }

    match operands.pop() {
        Some(result) if operands.is_empty() => Ok(result),
        _ => Err(GrammarError::Invariant(
            "reassembly did not reduce to a single operand".to_string(),
        )),
    }
}

fn process_parenthesis(
    cursor: &mut TraceCursor<'_>,
    state: &CommandParserState,
) -> Result<Evaluation, CommandError> {
    let mut negated = false;
    let tag = cursor.next_tag()?;
    if tag == TAG_EVALUATION_NOT {
        cursor.expect_tag(TAG_EVALUATION)?;
        negated = true;
    } else if tag != TAG_EVALUATION {
        return Err(GrammarError::UnexpectedTag {
            expected: TAG_EVALUATION.to_string(),
            got: tag.to_string(),
        }
        .into());
    }

    let evaluation = process_evaluation(cursor, state)?;
    cursor.expect_tag(TAG_EVALUATION_PARENTHESIS_END)?;

    if negated {
        Ok(Evaluation::Operation(Box::new(Operation {
            left: evaluation,
            right: Evaluation::OperandStatic(0),
            op: OperationType::Equals,
        })))
    } else {
        Ok(evaluation)
    }
}

fn process_operand(
    cursor: &mut TraceCursor<'_>,
    state: &CommandParserState,
) -> Result<Evaluation, CommandError> {
    let tag = cursor.next_tag()?;
    match tag {
        TAG_OPERAND_NUMBER => process_operand_number(cursor),
        TAG_OPERAND_TYPENAME => process_operand_typename(cursor, state),
        other => Err(GrammarError::UnexpectedTag {
            expected: TAG_OPERAND_TYPENAME.to_string(),
            got: other.to_string(),
        }
        .into()),
    }
}

fn process_operand_number(cursor: &mut TraceCursor<'_>) -> Result<Evaluation, CommandError> {
    let text = cursor.next_match(NAME_OPERAND_NUMBER)?;
    let value = parse_integer(text).ok_or_else(|| CommandError::MalformedNumber(text.to_string()))?;
    Ok(Evaluation::OperandStatic(value))
}

fn process_operand_typename(
    cursor: &mut TraceCursor<'_>,
    state: &CommandParserState,
) -> Result<Evaluation, CommandError> {
    let typename = cursor.next_match(NAME_OPERAND_TYPENAME)?.to_string();

    let mut array_indices = Vec::new();
    while cursor.peek_tag() == Some(TAG_OPERAND_ARRAY) {
        cursor.next_tag()?;
        cursor.expect_tag(TAG_EVALUATION)?;
        array_indices.push(process_evaluation(cursor, state)?);
        cursor.expect_tag(TAG_OPERAND_ARRAY_END)?;
    }

    let parts: Vec<&str> = typename.split("::").collect();

    // A plain name without subscripts may be an enum constant; that lookup
    // short-circuits member-path resolution.
    if parts.len() == 1 && array_indices.is_empty() {
        if let Some(value) = state.repository().enum_member_value(parts[0]) {
            return Ok(Evaluation::OperandStatic(value));
        }
    }

    let (owner, member_chain) = state
        .resolve_member_path(&parts)
        .ok_or(CommandError::UnresolvedReference(typename))?;

    Ok(Evaluation::OperandDynamic(OperandDynamic {
        owner,
        member_chain,
        array_indices,
    }))
}

fn process_operation_type(cursor: &mut TraceCursor<'_>) -> Result<OperationType, CommandError> {
    let syntax = cursor.next_match(NAME_OPERATION_TYPE)?;
    OperationType::from_syntax(syntax).ok_or_else(|| {
        GrammarError::Invariant(format!("operator syntax '{}' missing from table", syntax)).into()
    })
}

fn parse_integer(text: &str) -> Option<i64> {
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}
