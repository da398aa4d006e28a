//! The pass contract and a fixpoint pipeline driver.
//!
//! A pass is a plain value satisfying [`HloPass`]; there is no process-wide
//! registry. Callers compose passes explicitly into a [`PassPipeline`], which
//! runs them in order until a full sweep changes nothing or the iteration
//! budget is exhausted. Passes hold no state across invocations, so multiple
//! graphs can be processed by independent pipeline runs without
//! cross-contamination.

use snafu::ResultExt;

use crate::error::{PassError, PassSnafu};
use crate::graph::Graph;

/// A single graph-to-graph transformation.
///
/// `run` mutates the graph in place and reports whether anything changed.
/// Implementations must be idempotent (a second run on the output finds
/// nothing to do) and must terminate in O(node count) work.
pub trait HloPass {
    fn name(&self) -> &'static str;

    fn run(&self, graph: &mut Graph) -> Result<bool, PassError>;
}

/// Runs a fixed sequence of passes to fixpoint.
pub struct PassPipeline {
    name: &'static str,
    passes: Vec<Box<dyn HloPass>>,
    iteration_limit: usize,
}

impl PassPipeline {
    pub fn new(name: &'static str) -> Self {
        Self { name, passes: Vec::new(), iteration_limit: 25 }
    }

    pub fn add_pass(mut self, pass: impl HloPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Cap the number of full sweeps; the default is generous since every
    /// pass here is idempotent and converges in one or two sweeps.
    pub fn with_iteration_limit(mut self, limit: usize) -> Self {
        self.iteration_limit = limit;
        self
    }

    /// Run all passes in order, repeating the whole sequence until a sweep
    /// changes nothing. Returns whether any pass ever reported a change.
    pub fn run(&self, graph: &mut Graph) -> Result<bool, PassError> {
        let mut changed_ever = false;
        for iteration in 0..self.iteration_limit {
            let mut changed_this_sweep = false;
            for pass in &self.passes {
                let changed = pass.run(graph)?;
                tracing::debug!(pipeline = self.name, pass = pass.name(), iteration, changed, "pass finished");
                changed_this_sweep |= changed;
            }
            changed_ever |= changed_this_sweep;
            if !changed_this_sweep {
                return Ok(changed_ever);
            }
        }
        tracing::warn!(pipeline = self.name, limit = self.iteration_limit, "pipeline hit its iteration budget");
        Ok(changed_ever)
    }
}

/// Attach the pass name to a graph error. Helper for pass implementations.
pub(crate) fn in_pass<T>(name: &'static str, result: crate::error::Result<T>) -> Result<T, PassError> {
    result.context(PassSnafu { name })
}
