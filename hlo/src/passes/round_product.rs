//! Rewrite float multiplies so their result is rounded to the nearest
//! integer.
//!
//! For every `Multiply` over floating-point values, the pass redirects the
//! multiply's consumers to `Convert(RoundNearestInt(multiply))`. The multiply
//! node itself is reused as the raw product — its uses move, its definition
//! does not — so repeated runs never re-wrap a product that is already
//! rounded. The trailing `Convert` keeps the replacement's externally visible
//! shape and element type identical to the original multiply, so downstream
//! consumers and the graph's root signature are unaffected.

use crate::error::PassError;
use crate::graph::{Graph, NodeId};
use crate::op::{HloOpcode, OpcodeKind};
use crate::pass::{in_pass, HloPass};
use crate::pattern::Pat;

/// The round-product rewrite pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoundProduct;

impl RoundProduct {
    /// Idempotence guard: `multiply` is considered already rounded when its
    /// only user is a `RoundNearestInt` whose sole operand is the multiply.
    /// That is exactly the shape this pass leaves behind.
    fn already_rounded(graph: &Graph, multiply: NodeId) -> bool {
        let Ok(node) = graph.get(multiply) else {
            return false;
        };
        if node.user_count() != 1 {
            return false;
        }
        let Some(&user) = node.users().iter().next() else {
            return false;
        };
        let Ok(user_node) = graph.get(user) else {
            return false;
        };
        user_node.opcode().kind() == OpcodeKind::RoundNearestInt && user_node.operands() == [multiply]
    }
}

impl HloPass for RoundProduct {
    fn name(&self) -> &'static str {
        "round-product"
    }

    fn run(&self, graph: &mut Graph) -> Result<bool, PassError> {
        tracing::trace!(graph = %graph.to_text(), "before round-product");

        let pattern = Pat::multiply(Pat::float_var("a"), Pat::float_var("b"));
        let order = in_pass(self.name(), graph.topological_order())?;

        let mut changed = false;
        for id in order {
            if pattern.matches(graph, id).is_none() {
                continue;
            }
            if Self::already_rounded(graph, id) {
                continue;
            }

            // The multiply keeps its float shape S through both new nodes:
            // rounding stays in the float domain (XLA's kRoundNearestAfz
            // does the same) and the convert pins the external type.
            let shape = in_pass(self.name(), graph.get(id))?.shape().clone();
            let rounded = in_pass(self.name(), graph.insert(HloOpcode::RoundNearestInt, [id], shape.clone()))?;
            let converted = in_pass(self.name(), graph.insert(HloOpcode::Convert, [rounded], shape))?;
            in_pass(self.name(), graph.replace_all_uses(id, converted))?;
            if graph.root() == Some(id) {
                in_pass(self.name(), graph.set_root(converted))?;
            }

            tracing::debug!(multiply = %id, replacement = %converted, "rounded float product");
            changed = true;
        }

        tracing::trace!(graph = %graph.to_text(), changed, "after round-product");
        Ok(changed)
    }
}
