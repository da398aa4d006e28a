//! Scalar graph evaluator.
//!
//! Interprets a graph bottom-up over [`ScalarValue`]s, used by the acceptance
//! tests to compare rewritten graphs against reference arithmetic. Only the
//! nodes reachable from the root are evaluated, and only scalar shapes are
//! supported — this is test scaffolding, not an execution backend.
//!
//! Arithmetic is computed at `f64`/`i64` width and narrowed through the
//! node's element type after every operation, so `f32` graphs see `f32`
//! truncation at each step.

use std::collections::{BTreeSet, HashMap};

use snafu::ensure;

use rondo_dtype::ScalarValue;

use crate::error::{
    ArgumentTypeMismatchSnafu, InvalidElementTypeSnafu, MissingArgumentSnafu, MissingRootSnafu,
    NonScalarEvaluationSnafu, Result, UnknownNodeSnafu,
};
use crate::graph::{Graph, NodeId};
use crate::op::{HloOpcode, Literal};
use crate::rounding::round_half_away_from_zero;

/// Evaluate the graph's root given positional parameter values.
pub fn evaluate(graph: &Graph, args: &[Literal]) -> Result<Literal> {
    let root = graph.root().ok_or_else(|| MissingRootSnafu.build())?;

    let mut reachable = BTreeSet::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        if !reachable.insert(id) {
            continue;
        }
        stack.extend(graph.get(id)?.operands().iter().copied());
    }

    let mut values: HashMap<NodeId, ScalarValue> = HashMap::with_capacity(reachable.len());
    for id in graph.topological_order()? {
        if !reachable.contains(&id) {
            continue;
        }
        let value = evaluate_node(graph, id, args, &values)?;
        values.insert(id, value);
    }

    let root_node = graph.get(root)?;
    let value = values.get(&root).copied().ok_or_else(|| UnknownNodeSnafu { id: root }.build())?;
    Ok(Literal::new(root_node.shape().element_type(), value))
}

fn evaluate_node(
    graph: &Graph,
    id: NodeId,
    args: &[Literal],
    values: &HashMap<NodeId, ScalarValue>,
) -> Result<ScalarValue> {
    let node = graph.get(id)?;
    let shape = node.shape();
    ensure!(shape.is_scalar(), NonScalarEvaluationSnafu { shape: shape.clone() });
    let element = shape.element_type();

    let operand = |slot: usize| -> Result<ScalarValue> {
        let operand_id = node.operands()[slot];
        values.get(&operand_id).copied().ok_or_else(|| UnknownNodeSnafu { id: operand_id }.build())
    };

    let raw = match node.opcode() {
        HloOpcode::Parameter { index } => {
            let arg = args.get(*index).ok_or_else(|| MissingArgumentSnafu { index: *index }.build())?;
            ensure!(
                arg.element_type() == element,
                ArgumentTypeMismatchSnafu { index: *index, expected: element, actual: arg.element_type() }
            );
            arg.value()
        }
        HloOpcode::Constant(literal) => literal.value(),
        HloOpcode::Add => {
            binary(operand(0)?, operand(1)?, |x, y| x + y, i64::wrapping_add, u64::wrapping_add)
                .ok_or_else(|| InvalidElementTypeSnafu { opcode: "add", actual: element }.build())?
        }
        HloOpcode::Multiply => {
            binary(operand(0)?, operand(1)?, |x, y| x * y, i64::wrapping_mul, u64::wrapping_mul)
                .ok_or_else(|| InvalidElementTypeSnafu { opcode: "multiply", actual: element }.build())?
        }
        HloOpcode::Negate => match operand(0)? {
            ScalarValue::Float(x) => ScalarValue::Float(-x),
            ScalarValue::Int(x) => ScalarValue::Int(x.wrapping_neg()),
            ScalarValue::UInt(x) => ScalarValue::UInt(x.wrapping_neg()),
            ScalarValue::Pred(_) => {
                return InvalidElementTypeSnafu { opcode: "negate", actual: element }.fail();
            }
        },
        HloOpcode::RoundNearestInt => match operand(0)? {
            ScalarValue::Float(x) => ScalarValue::Float(round_half_away_from_zero(x)),
            other => {
                return InvalidElementTypeSnafu { opcode: "round-nearest-int", actual: other.storage_type() }
                    .fail();
            }
        },
        // The cast below narrows to the declared target type.
        HloOpcode::Convert => operand(0)?,
    };

    Ok(raw.cast(element))
}

fn binary(
    lhs: ScalarValue,
    rhs: ScalarValue,
    on_float: fn(f64, f64) -> f64,
    on_int: fn(i64, i64) -> i64,
    on_uint: fn(u64, u64) -> u64,
) -> Option<ScalarValue> {
    match (lhs, rhs) {
        (ScalarValue::Float(x), ScalarValue::Float(y)) => Some(ScalarValue::Float(on_float(x, y))),
        (ScalarValue::Int(x), ScalarValue::Int(y)) => Some(ScalarValue::Int(on_int(x, y))),
        (ScalarValue::UInt(x), ScalarValue::UInt(y)) => Some(ScalarValue::UInt(on_uint(x, y))),
        _ => None,
    }
}
