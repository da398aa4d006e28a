//! The closed opcode set and per-opcode typing rules.
//!
//! Every opcode is matched exhaustively (no default arms) so that adding a
//! variant statically forces every typing rule and matcher site to be
//! revisited.

use snafu::ensure;

use rondo_dtype::{ElementType, ScalarValue};

use crate::error::{
    InvalidElementTypeSnafu, OperandCountMismatchSnafu, ResultShapeMismatchSnafu, Result, ShapeMismatchSnafu,
};
use crate::shape::Shape;

/// A scalar constant payload carried by `Constant` nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Literal {
    element_type: ElementType,
    value: ScalarValue,
}

impl Literal {
    /// Build a literal, narrowing `value` through `element_type` so the stored
    /// payload is exactly what the type can represent.
    pub fn new(element_type: ElementType, value: ScalarValue) -> Self {
        Self { element_type, value: value.cast(element_type) }
    }

    pub fn f32(v: f32) -> Self {
        Self::new(ElementType::F32, ScalarValue::Float(v as f64))
    }

    pub fn f64(v: f64) -> Self {
        Self::new(ElementType::F64, ScalarValue::Float(v))
    }

    pub fn s32(v: i32) -> Self {
        Self::new(ElementType::S32, ScalarValue::Int(v as i64))
    }

    pub fn s64(v: i64) -> Self {
        Self::new(ElementType::S64, ScalarValue::Int(v))
    }

    pub fn pred(v: bool) -> Self {
        Self::new(ElementType::Pred, ScalarValue::Pred(v))
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn value(&self) -> ScalarValue {
        self.value
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Operation kind of a graph node.
#[derive(Debug, Clone, PartialEq)]
pub enum HloOpcode {
    /// Externally supplied input, identified by position.
    Parameter { index: usize },
    /// Embedded scalar constant.
    Constant(Literal),
    Add,
    Multiply,
    Negate,
    /// Round to the nearest integer, half away from zero. Result keeps the
    /// operand's floating element type.
    RoundNearestInt,
    /// Element-type conversion; target type is the node's declared shape.
    Convert,
}

/// Payload-free opcode tag, used for pattern dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpcodeKind {
    Parameter,
    Constant,
    Add,
    Multiply,
    Negate,
    RoundNearestInt,
    Convert,
}

impl HloOpcode {
    pub fn kind(&self) -> OpcodeKind {
        match self {
            Self::Parameter { .. } => OpcodeKind::Parameter,
            Self::Constant(_) => OpcodeKind::Constant,
            Self::Add => OpcodeKind::Add,
            Self::Multiply => OpcodeKind::Multiply,
            Self::Negate => OpcodeKind::Negate,
            Self::RoundNearestInt => OpcodeKind::RoundNearestInt,
            Self::Convert => OpcodeKind::Convert,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::Parameter { .. } => "parameter",
            Self::Constant(_) => "constant",
            Self::Add => "add",
            Self::Multiply => "multiply",
            Self::Negate => "negate",
            Self::RoundNearestInt => "round-nearest-int",
            Self::Convert => "convert",
        }
    }

    /// Number of operands the opcode takes.
    pub fn arity(&self) -> usize {
        match self {
            Self::Parameter { .. } | Self::Constant(_) => 0,
            Self::Negate | Self::RoundNearestInt | Self::Convert => 1,
            Self::Add | Self::Multiply => 2,
        }
    }

    /// Check the declared result shape against this opcode's typing rule
    /// given the operand shapes.
    pub fn validate(&self, operands: &[&Shape], declared: &Shape) -> Result<()> {
        ensure!(
            operands.len() == self.arity(),
            OperandCountMismatchSnafu { opcode: self.mnemonic(), expected: self.arity(), actual: operands.len() }
        );

        match self {
            // Parameters take their shape from the caller's signature.
            Self::Parameter { .. } => Ok(()),

            Self::Constant(literal) => {
                let inferred = Shape::scalar(literal.element_type());
                ensure!(
                    *declared == inferred,
                    ResultShapeMismatchSnafu { opcode: self.mnemonic(), declared: declared.clone(), inferred }
                );
                Ok(())
            }

            Self::Add | Self::Multiply => {
                let (lhs, rhs) = (operands[0], operands[1]);
                ensure!(
                    lhs == rhs,
                    ShapeMismatchSnafu { opcode: self.mnemonic(), lhs: lhs.clone(), rhs: rhs.clone() }
                );
                ensure!(
                    lhs.element_type().is_numeric(),
                    InvalidElementTypeSnafu { opcode: self.mnemonic(), actual: lhs.element_type() }
                );
                ensure!(
                    declared == lhs,
                    ResultShapeMismatchSnafu { opcode: self.mnemonic(), declared: declared.clone(), inferred: lhs.clone() }
                );
                Ok(())
            }

            Self::Negate => {
                let src = operands[0];
                ensure!(
                    src.element_type().is_numeric(),
                    InvalidElementTypeSnafu { opcode: self.mnemonic(), actual: src.element_type() }
                );
                ensure!(
                    declared == src,
                    ResultShapeMismatchSnafu { opcode: self.mnemonic(), declared: declared.clone(), inferred: src.clone() }
                );
                Ok(())
            }

            Self::RoundNearestInt => {
                let src = operands[0];
                ensure!(
                    src.element_type().is_float(),
                    InvalidElementTypeSnafu { opcode: self.mnemonic(), actual: src.element_type() }
                );
                ensure!(
                    declared == src,
                    ResultShapeMismatchSnafu { opcode: self.mnemonic(), declared: declared.clone(), inferred: src.clone() }
                );
                Ok(())
            }

            Self::Convert => {
                let src = operands[0];
                // Any element type pair, but dimensions are preserved.
                let inferred = src.with_element_type(declared.element_type());
                ensure!(
                    declared.same_dims(src),
                    ResultShapeMismatchSnafu { opcode: self.mnemonic(), declared: declared.clone(), inferred }
                );
                Ok(())
            }
        }
    }
}
