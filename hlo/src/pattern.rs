//! Declarative structural pattern matching over the graph.
//!
//! A [`Pat`] is a predicate tree over opcode kind, element type, and operand
//! sub-patterns, with optional named captures:
//!
//! ```
//! use rondo_hlo::Pat;
//!
//! // Match a float multiply and capture both operands.
//! let pat = Pat::multiply(Pat::float_var("a"), Pat::float_var("b"));
//! ```
//!
//! Matching is purely structural and local: a single node plus its direct
//! operand chain to the pattern's depth. It never mutates the graph and never
//! searches beyond the pattern, keeping per-node match cost O(pattern size).

use std::collections::HashMap;

use rondo_dtype::ElementType;

use crate::graph::{Graph, NodeId};
use crate::op::OpcodeKind;

/// Captured bindings from a successful match: capture name to node id.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Bindings(HashMap<&'static str, NodeId>);

impl Bindings {
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.0.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bind `name` to `id`; a name bound twice must re-bind the same node.
    fn bind(&mut self, name: &'static str, id: NodeId) -> bool {
        match self.0.get(name) {
            Some(&existing) => existing == id,
            None => {
                self.0.insert(name, id);
                true
            }
        }
    }
}

/// A pattern node. Every constraint is optional; an unconstrained pattern is
/// a wildcard.
#[derive(Clone)]
pub struct Pat {
    opcode: Option<OpcodeKind>,
    element: Option<fn(ElementType) -> bool>,
    operands: Option<Vec<Pat>>,
    name: Option<&'static str>,
}

impl Pat {
    /// Wildcard: matches any node, captures nothing.
    pub fn any() -> Self {
        Self { opcode: None, element: None, operands: None, name: None }
    }

    /// Wildcard that captures the matched node under `name`.
    pub fn var(name: &'static str) -> Self {
        Self { name: Some(name), ..Self::any() }
    }

    /// Wildcard restricted to floating element types, captured under `name`.
    pub fn float_var(name: &'static str) -> Self {
        Self { name: Some(name), element: Some(|ty| ty.is_float()), ..Self::any() }
    }

    /// Match a specific opcode kind with the given operand sub-patterns.
    pub fn op(kind: OpcodeKind, operands: Vec<Pat>) -> Self {
        Self { opcode: Some(kind), element: None, operands: Some(operands), name: None }
    }

    pub fn add(lhs: Pat, rhs: Pat) -> Self {
        Self::op(OpcodeKind::Add, vec![lhs, rhs])
    }

    pub fn multiply(lhs: Pat, rhs: Pat) -> Self {
        Self::op(OpcodeKind::Multiply, vec![lhs, rhs])
    }

    pub fn round_nearest_int(src: Pat) -> Self {
        Self::op(OpcodeKind::RoundNearestInt, vec![src])
    }

    pub fn convert(src: Pat) -> Self {
        Self::op(OpcodeKind::Convert, vec![src])
    }

    /// Capture the matched node under `name`.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = Some(name);
        self
    }

    /// Constrain the matched node's element type.
    pub fn with_element(mut self, predicate: fn(ElementType) -> bool) -> Self {
        self.element = Some(predicate);
        self
    }

    /// Match `id` against this pattern. Returns the captured bindings on
    /// success. Pure: the graph is never mutated.
    pub fn matches(&self, graph: &Graph, id: NodeId) -> Option<Bindings> {
        let mut bindings = Bindings::default();
        self.matches_into(graph, id, &mut bindings).then_some(bindings)
    }

    fn matches_into(&self, graph: &Graph, id: NodeId, bindings: &mut Bindings) -> bool {
        let Ok(node) = graph.get(id) else {
            return false;
        };

        if let Some(kind) = self.opcode {
            if node.opcode().kind() != kind {
                return false;
            }
        }
        if let Some(predicate) = self.element {
            if !predicate(node.shape().element_type()) {
                return false;
            }
        }
        if let Some(operand_pats) = &self.operands {
            if operand_pats.len() != node.operands().len() {
                return false;
            }
            let operands: Vec<NodeId> = node.operands().to_vec();
            for (pat, operand) in operand_pats.iter().zip(operands) {
                if !pat.matches_into(graph, operand, bindings) {
                    return false;
                }
            }
        }
        if let Some(name) = self.name {
            if !bindings.bind(name, id) {
                return false;
            }
        }
        true
    }
}

impl std::fmt::Debug for Pat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pat")
            .field("opcode", &self.opcode)
            .field("element", &self.element.map(|_| "<predicate>"))
            .field("operands", &self.operands)
            .field("name", &self.name)
            .finish()
    }
}
