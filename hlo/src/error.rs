use snafu::Snafu;

use rondo_dtype::ElementType;

use crate::graph::NodeId;
use crate::shape::Shape;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Operand count does not match the opcode's arity.
    #[snafu(display("operand count mismatch for {opcode}: expected {expected}, got {actual}"))]
    OperandCountMismatch { opcode: &'static str, expected: usize, actual: usize },

    /// Binary operation over differently shaped operands.
    #[snafu(display("shape mismatch for {opcode}: {lhs} vs {rhs}"))]
    ShapeMismatch { opcode: &'static str, lhs: Shape, rhs: Shape },

    /// Opcode requires a numeric (or floating) element type it did not get.
    #[snafu(display("{opcode} is not defined for element type {actual}"))]
    InvalidElementType { opcode: &'static str, actual: ElementType },

    /// Declared result shape disagrees with the opcode's typing rule.
    #[snafu(display("declared shape {declared} does not match inferred shape {inferred} for {opcode}"))]
    ResultShapeMismatch { opcode: &'static str, declared: Shape, inferred: Shape },

    /// An id does not resolve to a live node. Indicates graph corruption or a
    /// stale id held across a mutation; never silently ignored.
    #[snafu(display("node {id} does not resolve to a live node"))]
    UnknownNode { id: NodeId },

    /// The node set is not a DAG.
    #[snafu(display("cycle detected while ordering graph nodes"))]
    CycleDetected,

    /// Def-use bookkeeping out of sync: `users` is not the exact inverse of
    /// `operands`. Indicates a mutation bug.
    #[snafu(display("use list of {def} is inconsistent with the operands of {user}"))]
    InconsistentUseList { def: NodeId, user: NodeId },

    /// `replace_all_uses` with a differently shaped replacement would break
    /// every consumer's typing rule.
    #[snafu(display("cannot replace uses of {old} ({old_shape}) with {new} ({new_shape}): shapes differ"))]
    ReplacementShapeMismatch { old: NodeId, old_shape: Shape, new: NodeId, new_shape: Shape },

    /// Rounded value falls outside the representable integer range. Policy is
    /// to fail, not saturate.
    #[snafu(display("value {value} is outside the representable i64 range"))]
    RoundingDomain { value: f64 },

    /// Evaluation reached a parameter the caller did not supply.
    #[snafu(display("no argument supplied for parameter {index}"))]
    MissingArgument { index: usize },

    /// Evaluation argument element type disagrees with the parameter node.
    #[snafu(display("argument {index} has element type {actual}, parameter expects {expected}"))]
    ArgumentTypeMismatch { index: usize, expected: ElementType, actual: ElementType },

    /// The evaluator only interprets scalar-shaped graphs.
    #[snafu(display("cannot evaluate non-scalar shape {shape}"))]
    NonScalarEvaluation { shape: Shape },

    /// The graph has no designated root to evaluate or verify against.
    #[snafu(display("graph has no root node"))]
    MissingRoot,
}

/// Failure of a whole pass, carrying the pass name for diagnostics.
#[derive(Debug, Snafu)]
#[snafu(display("pass {name} failed: {source}"))]
#[snafu(visibility(pub))]
pub struct PassError {
    pub name: &'static str,
    pub source: Error,
}
