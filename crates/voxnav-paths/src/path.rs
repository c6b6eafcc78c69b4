//! The result of a search: waypoints plus a traversal cursor.

use voxnav_core::{BlockPos, Vec3};

use crate::distance;
use crate::node::Node;

/// An ordered list of waypoints leading towards a goal.
///
/// A path is a snapshot: its nodes are copies taken when the search ended,
/// and it stays valid after the evaluator that produced it is reused. The
/// only mutable state is the cursor (`next_node_index`) and the waypoint
/// list itself, for callers that re-plan.
///
/// Two paths are equal when they visit the same positions in the same order.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Path {
    nodes: Vec<Node>,
    next_node_index: usize,
    target: BlockPos,
    dist_to_target: f64,
    reached: bool,
}

impl Path {
    pub fn new(nodes: Vec<Node>, target: BlockPos, reached: bool) -> Self {
        let dist_to_target = match nodes.last() {
            Some(end) => distance::euclidean(end.pos, target),
            None => f64::INFINITY,
        };
        Self {
            nodes,
            next_node_index: 0,
            target,
            dist_to_target,
            reached,
        }
    }

    /// Move the cursor to the next waypoint.
    pub fn advance(&mut self) {
        self.next_node_index += 1;
    }

    /// Whether the cursor has not moved yet.
    #[inline]
    pub fn not_started(&self) -> bool {
        self.next_node_index == 0
    }

    /// Whether the cursor has passed the last waypoint.
    #[inline]
    pub fn is_done(&self) -> bool {
        self.next_node_index >= self.nodes.len()
    }

    #[inline]
    pub fn end_node(&self) -> Option<&Node> {
        self.nodes.last()
    }

    #[inline]
    pub fn node(&self, i: usize) -> Option<&Node> {
        self.nodes.get(i)
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Drop every waypoint from `len` on.
    pub fn truncate_nodes(&mut self, len: usize) {
        self.nodes.truncate(len);
    }

    /// Replace the waypoint at `i`. Returns `false` when `i` is out of range.
    pub fn replace_node(&mut self, i: usize, node: Node) -> bool {
        match self.nodes.get_mut(i) {
            Some(slot) => {
                *slot = node;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn next_node_index(&self) -> usize {
        self.next_node_index
    }

    pub fn set_next_node_index(&mut self, i: usize) {
        self.next_node_index = i;
    }

    pub fn next_node(&self) -> Option<&Node> {
        self.nodes.get(self.next_node_index)
    }

    pub fn previous_node(&self) -> Option<&Node> {
        self.next_node_index
            .checked_sub(1)
            .and_then(|i| self.nodes.get(i))
    }

    pub fn node_pos(&self, i: usize) -> Option<BlockPos> {
        self.nodes.get(i).map(|n| n.pos)
    }

    pub fn next_node_pos(&self) -> Option<BlockPos> {
        self.node_pos(self.next_node_index)
    }

    /// Where an agent of the given width should stand to occupy waypoint
    /// `i`: the voxel corner offset by half the agent's voxel footprint on
    /// x and z.
    pub fn agent_pos_at_node(&self, i: usize, width: f64) -> Option<Vec3> {
        let pos = self.node_pos(i)?;
        let half = (width + 1.0).floor() * 0.5;
        Some(Vec3::new(pos.x as f64 + half, pos.y as f64, pos.z as f64 + half))
    }

    pub fn next_agent_pos(&self, width: f64) -> Option<Vec3> {
        self.agent_pos_at_node(self.next_node_index, width)
    }

    /// The goal the search was asked for, reached or not.
    #[inline]
    pub fn target(&self) -> BlockPos {
        self.target
    }

    /// Straight-line distance from the last waypoint to the goal, infinite
    /// for an empty path.
    #[inline]
    pub fn distance_to_target(&self) -> f64 {
        self.dist_to_target
    }

    /// Whether the search reached the goal within its reach range.
    #[inline]
    pub fn reached(&self) -> bool {
        self.reached
    }

    /// Waypoint positions in order.
    pub fn positions(&self) -> impl Iterator<Item = BlockPos> + '_ {
        self.nodes.iter().map(|n| n.pos)
    }
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.nodes.len() == other.nodes.len() && self.positions().eq(other.positions())
    }
}
