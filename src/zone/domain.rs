//! Evaluation domain model
//!
//! The typed expression trees produced by the semantic pass and consumed by
//! the emission phase: static operands, dynamic member-path operands with
//! array-index sub-expressions, and binary operations over the fixed
//! operator table.

pub mod evaluation;
pub mod operation;
pub mod snapshot;

pub use evaluation::{EvalError, Evaluation, OperandDynamic, Operation};
pub use operation::OperationType;
pub use snapshot::{snapshot, EvaluationSnapshot};
