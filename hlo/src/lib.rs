//! HLO computation graph and the round-product rewrite pass.
//!
//! This crate implements a small HLO-style intermediate representation and a
//! compiler pass that rewrites every floating-point `Multiply` so that its
//! result is rounded to the nearest integer (half away from zero), without
//! changing the graph's external type signature.
//!
//! # Module Organization
//!
//! - [`shape`] - Shapes (element type + dimensions)
//! - [`op`] - The closed opcode set and per-opcode typing rules
//! - [`graph`] - Arena-owned node graph with def-use tracking and mutation
//!   primitives
//! - [`pattern`] - Declarative structural pattern matching over the graph
//! - [`pass`] - The pass contract and a fixpoint pipeline driver
//! - [`passes`] - Concrete passes (round-product rewrite, dead-code cleanup)
//! - [`rounding`] - The round-half-away-from-zero numeric kernel
//! - [`eval`] - Literal evaluator used by the acceptance tests
//! - [`error`] - Error types and result handling

pub mod debug;
pub mod error;
pub mod eval;
pub mod graph;
pub mod op;
pub mod pass;
pub mod passes;
pub mod pattern;
pub mod prelude;
pub mod rounding;
pub mod shape;


pub use error::{Error, PassError, Result};
pub use graph::{Graph, Node, NodeId};
pub use op::{HloOpcode, Literal, OpcodeKind};
pub use pass::{HloPass, PassPipeline};
pub use pattern::{Bindings, Pat};
pub use shape::Shape;

// Re-export element types for convenience.
pub use rondo_dtype::{ElementType, ScalarValue};
