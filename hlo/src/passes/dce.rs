//! Dead-code elimination: remove nodes nothing uses.
//!
//! Cleanup pass meant to run after rewrites that orphan nodes. The root is
//! never removed, and removal cascades through operand chains in one run.

use crate::error::PassError;
use crate::graph::Graph;
use crate::pass::HloPass;

#[derive(Debug, Default, Clone, Copy)]
pub struct DeadCodeElimination;

impl HloPass for DeadCodeElimination {
    fn name(&self) -> &'static str {
        "dce"
    }

    fn run(&self, graph: &mut Graph) -> Result<bool, PassError> {
        let removed = graph.sweep_dead();
        if removed > 0 {
            tracing::debug!(removed, "removed dead nodes");
        }
        Ok(removed > 0)
    }
}
