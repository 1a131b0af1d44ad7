//! Property-based tests for expression matching and processing
//!
//! These ensure the engine is deterministic and total over generated valid
//! expressions: matching never panics, re-parsing yields an identical tree,
//! and static folding succeeds for generated division-free expressions.

use proptest::prelude::*;
use zonegen::zone::commands::{parse_evaluation, CommandParserState};
use zonegen::zone::repository::TypeRepository;

fn empty_state() -> CommandParserState {
    CommandParserState::new(TypeRepository::new())
}

/// Operators that always fold to a value, whatever the operands
const TOTAL_OPERATORS: &[&str] = &[
    "+", "-", "*", "<<", ">>", ">", ">=", "<", "<=", "==", "!=", "&", "^", "|", "&&", "||",
];

fn operator_strategy() -> impl Strategy<Value = &'static str> {
    proptest::sample::select(TOTAL_OPERATORS)
}

/// Generate syntactically valid expression sources over number literals
fn expression_strategy() -> impl Strategy<Value = String> {
    let leaf = (0u32..1000).prop_map(|n| n.to_string());
    leaf.prop_recursive(4, 48, 3, |inner| {
        prop_oneof![
            (inner.clone(), operator_strategy(), inner.clone())
                .prop_map(|(left, op, right)| format!("{} {} {}", left, op, right)),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.prop_map(|e| format!("!({})", e)),
        ]
    })
}

/// Generate flat operator chains of the given length
fn chain_strategy(operators: usize) -> impl Strategy<Value = String> {
    (
        proptest::collection::vec(0u32..100, operators + 1),
        proptest::collection::vec(operator_strategy(), operators),
    )
        .prop_map(|(numbers, ops)| {
            let mut source = numbers[0].to_string();
            for (op, number) in ops.iter().zip(&numbers[1..]) {
                source.push_str(&format!(" {} {}", op, number));
            }
            source
        })
}

proptest! {
    #[test]
    fn prop_generated_expressions_parse_and_fold(source in expression_strategy()) {
        let state = empty_state();
        let tree = parse_evaluation(&source, &state).expect("generated source must parse");
        prop_assert!(tree.is_static());
        // Division is excluded from the generator, so folding is total
        prop_assert!(tree.evaluate_static().is_ok());
    }

    #[test]
    fn prop_reparsing_is_deterministic(source in expression_strategy()) {
        let state = empty_state();
        let first = parse_evaluation(&source, &state).expect("generated source must parse");
        let second = parse_evaluation(&source, &state).expect("generated source must parse");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_chains_reduce_to_one_tree(source in (1usize..6).prop_flat_map(chain_strategy)) {
        let state = empty_state();
        let tree = parse_evaluation(&source, &state).expect("chain must parse");
        prop_assert!(tree.evaluate_static().is_ok());
    }
}
