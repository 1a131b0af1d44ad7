//! Evaluation trees
//!
//! The output of the semantic pass: fully resolved, ready for direct
//! structural consumption by the emission phase. A tree is per-parse data,
//! owned by the parse that produced it.

use crate::zone::domain::operation::OperationType;
use crate::zone::repository::{CompositeDef, Member};
use std::fmt;
use std::sync::Arc;

/// A typed expression tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// A literal integer or a resolved enum constant
    OperandStatic(i64),
    /// A path into a struct/union instance
    OperandDynamic(OperandDynamic),
    /// A binary combination of two evaluations
    Operation(Box<Operation>),
}

/// A resolved member path: owning type, non-empty member chain, and the
/// array-index sub-evaluations attached to the path (position i belongs to
/// the i-th `[...]` suffix)
#[derive(Debug, Clone, PartialEq)]
pub struct OperandDynamic {
    pub owner: Arc<CompositeDef>,
    pub member_chain: Vec<Member>,
    pub array_indices: Vec<Evaluation>,
}

impl OperandDynamic {
    /// The path as written in source, for diagnostics
    pub fn path_string(&self) -> String {
        let mut path = self.owner.name.clone();
        for member in &self.member_chain {
            path.push_str("::");
            path.push_str(&member.name);
        }
        path
    }
}

/// Exactly two operands combined under one operator
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub left: Evaluation,
    pub right: Evaluation,
    pub op: OperationType,
}

/// Errors when folding a tree to a static value
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The tree references instance data and has no static value
    DynamicOperand(String),
    DivisionByZero,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DynamicOperand(path) => {
                write!(f, "'{}' references instance data and cannot be evaluated statically", path)
            }
            EvalError::DivisionByZero => write!(f, "division by zero"),
        }
    }
}

impl std::error::Error for EvalError {}

impl Evaluation {
    /// Whether the tree folds to a value without instance data
    pub fn is_static(&self) -> bool {
        match self {
            Evaluation::OperandStatic(_) => true,
            Evaluation::OperandDynamic(_) => false,
            Evaluation::Operation(operation) => {
                operation.left.is_static() && operation.right.is_static()
            }
        }
    }

    /// Fold the tree to its static value
    pub fn evaluate_static(&self) -> Result<i64, EvalError> {
        match self {
            Evaluation::OperandStatic(value) => Ok(*value),
            Evaluation::OperandDynamic(operand) => {
                Err(EvalError::DynamicOperand(operand.path_string()))
            }
            Evaluation::Operation(operation) => {
                let left = operation.left.evaluate_static()?;
                let right = operation.right.evaluate_static()?;
                operation
                    .op
                    .apply(left, right)
                    .ok_or(EvalError::DivisionByZero)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(left: Evaluation, op: OperationType, right: Evaluation) -> Evaluation {
        Evaluation::Operation(Box::new(Operation { left, right, op }))
    }

    #[test]
    fn test_static_folding() {
        // 2 + 3 * 4, already in precedence-correct shape
        let tree = operation(
            Evaluation::OperandStatic(2),
            OperationType::Add,
            operation(
                Evaluation::OperandStatic(3),
                OperationType::Multiply,
                Evaluation::OperandStatic(4),
            ),
        );
        assert!(tree.is_static());
        assert_eq!(tree.evaluate_static().unwrap(), 14);
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let tree = operation(
            Evaluation::OperandStatic(1),
            OperationType::Divide,
            Evaluation::OperandStatic(0),
        );
        assert_eq!(tree.evaluate_static().unwrap_err(), EvalError::DivisionByZero);
    }

    #[test]
    fn test_dynamic_operand_is_not_static() {
        use crate::zone::repository::{CompositeDef, CompositeKind, Member};

        let owner = Arc::new(CompositeDef {
            name: "S".to_string(),
            kind: CompositeKind::Struct,
            members: vec![Member {
                name: "x".to_string(),
                type_name: "int".to_string(),
                array_dims: vec![],
            }],
        });
        let operand = OperandDynamic {
            member_chain: owner.members.clone(),
            owner,
            array_indices: vec![],
        };
        let tree = Evaluation::OperandDynamic(operand);
        assert!(!tree.is_static());
        assert_eq!(
            tree.evaluate_static().unwrap_err(),
            EvalError::DynamicOperand("S::x".to_string())
        );
    }
}
