//! Serializable snapshots of evaluation trees
//!
//! Evaluation trees hold shared type definitions, so they do not serialize
//! directly; a snapshot flattens type references to their names for
//! inspection output and structural assertions in tests.

use crate::zone::domain::evaluation::Evaluation;
use serde::Serialize;

/// A serializable mirror of an [`Evaluation`] tree
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationSnapshot {
    Static {
        value: i64,
    },
    Dynamic {
        owner: String,
        member_chain: Vec<String>,
        array_indices: Vec<EvaluationSnapshot>,
    },
    Operation {
        op: String,
        left: Box<EvaluationSnapshot>,
        right: Box<EvaluationSnapshot>,
    },
}

/// Snapshot an evaluation tree
pub fn snapshot(evaluation: &Evaluation) -> EvaluationSnapshot {
    match evaluation {
        Evaluation::OperandStatic(value) => EvaluationSnapshot::Static { value: *value },
        Evaluation::OperandDynamic(operand) => EvaluationSnapshot::Dynamic {
            owner: operand.owner.name.clone(),
            member_chain: operand
                .member_chain
                .iter()
                .map(|member| member.name.clone())
                .collect(),
            array_indices: operand.array_indices.iter().map(snapshot).collect(),
        },
        Evaluation::Operation(operation) => EvaluationSnapshot::Operation {
            op: operation.op.syntax().to_string(),
            left: Box::new(snapshot(&operation.left)),
            right: Box::new(snapshot(&operation.right)),
        },
    }
}
