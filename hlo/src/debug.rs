//! Compact text rendering of graphs for logs and failure messages.
//!
//! One line per node in topological order, HLO-text flavored:
//!
//! ```text
//! HloGraph root=%4 {
//!   %0 = f32[] parameter(0)
//!   %1 = f32[] constant(1.5)
//!   %2 = f32[] multiply(%0, %1)
//! }
//! ```

use std::fmt::Write;

use crate::graph::{Graph, Node};
use crate::op::HloOpcode;

impl Graph {
    /// Render the whole graph as text. Falls back to ascending id order if
    /// the graph is (erroneously) cyclic, so diagnostics stay printable.
    pub fn to_text(&self) -> String {
        let order = match self.topological_order() {
            Ok(order) => order,
            Err(_) => self.ids().collect(),
        };

        let mut out = String::new();
        match self.root() {
            Some(root) => {
                let _ = writeln!(out, "HloGraph root={root} {{");
            }
            None => out.push_str("HloGraph {\n"),
        }
        for id in order {
            if let Ok(node) = self.get(id) {
                let _ = writeln!(out, "  {}", render_node(node));
            }
        }
        out.push('}');
        out
    }
}

fn render_node(node: &Node) -> String {
    let mut line = format!("{} = {} {}", node.id(), node.shape(), node.opcode().mnemonic());
    match node.opcode() {
        HloOpcode::Parameter { index } => {
            let _ = write!(line, "({index})");
        }
        HloOpcode::Constant(literal) => {
            let _ = write!(line, "({literal})");
        }
        HloOpcode::Add
        | HloOpcode::Multiply
        | HloOpcode::Negate
        | HloOpcode::RoundNearestInt
        | HloOpcode::Convert => {
            let operands: Vec<String> = node.operands().iter().map(|id| id.to_string()).collect();
            let _ = write!(line, "({})", operands.join(", "));
        }
    }
    line
}
