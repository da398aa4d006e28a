//! Arena-owned computation graph with def-use tracking.
//!
//! Nodes live in an arena indexed by [`NodeId`]; all cross-references are
//! plain ids, never owning pointers. The `users` set on every node is kept as
//! the exact inverse of `operands` across the whole graph by the mutation
//! primitives below, which are the only way to change edges.
//!
//! Slots of removed nodes are tombstoned, never reused, so ids stay stable
//! for a node's whole lifetime.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap};

use smallvec::SmallVec;
use snafu::ensure;

use crate::error::{
    CycleDetectedSnafu, InconsistentUseListSnafu, MissingRootSnafu, ReplacementShapeMismatchSnafu, Result,
    UnknownNodeSnafu,
};
use crate::op::HloOpcode;
use crate::shape::Shape;

/// Stable identity of a node within its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "%{}", self.0)
    }
}

/// An operation node: opcode, ordered operands, result shape, and the set of
/// consumers (maintained, not authoritative on its own).
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    opcode: HloOpcode,
    operands: SmallVec<[NodeId; 2]>,
    shape: Shape,
    users: BTreeSet<NodeId>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn opcode(&self) -> &HloOpcode {
        &self.opcode
    }

    pub fn operands(&self) -> &[NodeId] {
        &self.operands
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn users(&self) -> &BTreeSet<NodeId> {
        &self.users
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

/// The graph: exclusive owner of all nodes, with one designated root.
#[derive(Debug, Default, Clone)]
pub struct Graph {
    slots: Vec<Option<Node>>,
    root: Option<NodeId>,
    live: usize,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.get(id.index()).is_some_and(|slot| slot.is_some())
    }

    pub fn get(&self, id: NodeId) -> Result<&Node> {
        match self.slots.get(id.index()) {
            Some(Some(node)) => Ok(node),
            _ => UnknownNodeSnafu { id }.fail(),
        }
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        match self.slots.get_mut(id.index()) {
            Some(Some(node)) => Ok(node),
            _ => UnknownNodeSnafu { id }.fail(),
        }
    }

    /// Iterate over all live nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().filter_map(|slot| slot.as_ref())
    }

    /// Ids of all live nodes, ascending.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes().map(Node::id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) -> Result<()> {
        ensure!(self.contains(id), UnknownNodeSnafu { id });
        self.root = Some(id);
        Ok(())
    }

    /// Allocate a new node and register it as a user of each operand.
    ///
    /// Fails if an operand id is dead or the declared shape violates the
    /// opcode's typing rule; on failure the graph is unchanged.
    pub fn insert(
        &mut self,
        opcode: HloOpcode,
        operands: impl IntoIterator<Item = NodeId>,
        shape: Shape,
    ) -> Result<NodeId> {
        let operands: SmallVec<[NodeId; 2]> = operands.into_iter().collect();

        let mut operand_shapes = Vec::with_capacity(operands.len());
        for &operand in &operands {
            operand_shapes.push(self.get(operand)?.shape());
        }
        opcode.validate(&operand_shapes, &shape)?;

        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(Node { id, opcode, operands: operands.clone(), shape, users: BTreeSet::new() }));
        self.live += 1;

        for operand in operands {
            // Validated live above; a duplicate operand inserts once.
            self.get_mut(operand)?.users.insert(id);
        }
        Ok(id)
    }

    /// Rewrite every use of `old` to `new`, keeping both user sets exact.
    ///
    /// Uses inside `new`'s own operand chain are left alone: rewriting those
    /// would close a cycle, and they are precisely the replacement subgraph
    /// the caller just built on top of `old`. The root pointer is never
    /// touched; callers update it via [`Graph::set_root`].
    ///
    /// No-op when `old == new`.
    pub fn replace_all_uses(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let old_shape = self.get(old)?.shape().clone();
        let new_shape = self.get(new)?.shape().clone();
        ensure!(
            old_shape == new_shape,
            ReplacementShapeMismatchSnafu { old, old_shape, new, new_shape }
        );

        let protected = self.operand_closure(new)?;
        let users: Vec<NodeId> = self.get(old)?.users.iter().copied().collect();
        for user in users {
            if protected.contains(&user) {
                continue;
            }
            let node = self.get_mut(user)?;
            for slot in node.operands.iter_mut() {
                if *slot == old {
                    *slot = new;
                }
            }
            self.get_mut(old)?.users.remove(&user);
            self.get_mut(new)?.users.insert(user);
        }
        Ok(())
    }

    /// All nodes reachable from `id` through operand edges, including `id`.
    fn operand_closure(&self, id: NodeId) -> Result<BTreeSet<NodeId>> {
        let mut seen = BTreeSet::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            for &operand in self.get(current)?.operands() {
                stack.push(operand);
            }
        }
        Ok(seen)
    }

    /// Remove `id` if it is live, has no users, and is not the root.
    /// Returns whether a node was removed.
    pub fn remove_if_dead(&mut self, id: NodeId) -> bool {
        let Some(Some(node)) = self.slots.get(id.index()) else {
            return false;
        };
        if !node.users.is_empty() || self.root == Some(id) {
            return false;
        }

        // Tombstone the slot; ids are never reused.
        let node = self.slots[id.index()].take();
        let Some(node) = node else { return false };
        self.live -= 1;
        for operand in node.operands {
            if let Some(Some(def)) = self.slots.get_mut(operand.index()) {
                def.users.remove(&id);
            }
        }
        true
    }

    /// Run [`Graph::remove_if_dead`] to fixpoint; returns how many nodes were
    /// removed. Transitively dead operand chains disappear in one call.
    pub fn sweep_dead(&mut self) -> usize {
        let mut worklist: Vec<NodeId> = self.ids().collect();
        let mut removed = 0;
        while let Some(id) = worklist.pop() {
            let operands: Vec<NodeId> = match self.slots.get(id.index()) {
                Some(Some(node)) => node.operands.to_vec(),
                _ => continue,
            };
            if self.remove_if_dead(id) {
                removed += 1;
                worklist.extend(operands);
            }
        }
        removed
    }

    /// All live nodes, every node after all of its operands. Ties are broken
    /// by ascending id so pass output is deterministic across runs.
    pub fn topological_order(&self) -> Result<Vec<NodeId>> {
        let mut remaining: HashMap<NodeId, usize> = HashMap::with_capacity(self.live);
        let mut ready: BinaryHeap<Reverse<NodeId>> = BinaryHeap::new();

        for node in self.nodes() {
            let distinct: BTreeSet<NodeId> = node.operands().iter().copied().collect();
            if distinct.is_empty() {
                ready.push(Reverse(node.id()));
            } else {
                remaining.insert(node.id(), distinct.len());
            }
        }

        let mut order = Vec::with_capacity(self.live);
        while let Some(Reverse(id)) = ready.pop() {
            order.push(id);
            for &user in self.get(id)?.users() {
                if let Some(count) = remaining.get_mut(&user) {
                    *count -= 1;
                    if *count == 0 {
                        remaining.remove(&user);
                        ready.push(Reverse(user));
                    }
                }
            }
        }

        ensure!(order.len() == self.live, CycleDetectedSnafu);
        Ok(order)
    }

    /// Check structural invariants: live operand references, users exactly
    /// inverse to operands, acyclicity, and a live root.
    pub fn verify(&self) -> Result<()> {
        let root = self.root.ok_or_else(|| MissingRootSnafu.build())?;
        ensure!(self.contains(root), UnknownNodeSnafu { id: root });

        for node in self.nodes() {
            for &operand in node.operands() {
                let def = self.get(operand)?;
                ensure!(
                    def.users.contains(&node.id()),
                    InconsistentUseListSnafu { def: operand, user: node.id() }
                );
            }
            for &user in node.users() {
                let consumer = self.get(user)?;
                ensure!(
                    consumer.operands().contains(&node.id()),
                    InconsistentUseListSnafu { def: node.id(), user }
                );
            }
        }

        self.topological_order()?;
        Ok(())
    }
}
