use rustc_hash::FxHashMap;
use voxnav_core::{BlockPos, PathType};

use crate::distance;

/// Handle to a [`Node`] in a [`NodeArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A search node at one voxel.
///
/// Position equality defines node identity: an arena holds at most one node
/// per position.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    pub pos: BlockPos,
    /// Slot in the open-set heap; `None` when the node is not open.
    pub(crate) heap_idx: Option<usize>,
    pub(crate) g: f64,
    pub(crate) h: f64,
    pub(crate) f: f64,
    pub(crate) parent: Option<NodeId>,
    /// Finalised by the search, or synthesized as visible but not
    /// expandable.
    pub closed: bool,
    pub(crate) walked_distance: f64,
    pub cost_malus: f64,
    pub path_type: PathType,
}

impl Node {
    /// A fresh, unvisited node.
    pub fn new(pos: BlockPos) -> Self {
        Self {
            pos,
            heap_idx: None,
            g: 0.0,
            h: 0.0,
            f: 0.0,
            parent: None,
            closed: false,
            walked_distance: 0.0,
            cost_malus: 0.0,
            path_type: PathType::Blocked,
        }
    }

    /// Whether the node is currently in the open set.
    #[inline]
    pub fn in_open_set(&self) -> bool {
        self.heap_idx.is_some()
    }

    #[inline]
    pub fn heap_idx(&self) -> Option<usize> {
        self.heap_idx
    }

    /// Accumulated path cost from the start.
    #[inline]
    pub fn g(&self) -> f64 {
        self.g
    }

    /// Heuristic estimate to the goal.
    #[inline]
    pub fn h(&self) -> f64 {
        self.h
    }

    /// Total cost `g + h`, the open-set key.
    #[inline]
    pub fn f(&self) -> f64 {
        self.f
    }

    #[inline]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Euclidean length of the path walked to reach this node.
    #[inline]
    pub fn walked_distance(&self) -> f64 {
        self.walked_distance
    }

    #[inline]
    pub fn manhattan_to(&self, target: BlockPos) -> i32 {
        distance::manhattan(self.pos, target)
    }

    #[inline]
    pub fn distance_to(&self, other: &Node) -> f64 {
        distance::euclidean(self.pos, other.pos)
    }

    #[inline]
    pub fn distance_squared_to(&self, other: &Node) -> f64 {
        distance::euclidean_squared(self.pos, other.pos)
    }
}

// ---------------------------------------------------------------------------
// NodeArena
// ---------------------------------------------------------------------------

/// Per-search node storage, one node per position.
///
/// Nodes are addressed by [`NodeId`] and never move, so parent links stay
/// valid until the arena is cleared.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    by_pos: FxHashMap<BlockPos, NodeId>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// The node at `pos`, created on first use.
    pub fn node_at(&mut self, pos: BlockPos) -> NodeId {
        if let Some(&id) = self.by_pos.get(&pos) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(pos));
        self.by_pos.insert(pos, id);
        id
    }

    /// The node at `pos`, if one was created this search.
    pub fn find(&self, pos: BlockPos) -> Option<NodeId> {
        self.by_pos.get(&pos).copied()
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Forget every node, keeping the allocations.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.by_pos.clear();
    }

    /// Forget every node and release the allocations.
    pub fn release(&mut self) {
        *self = Self::default();
    }
}

impl std::ops::Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        self.get(id)
    }
}

impl std::ops::IndexMut<NodeId> for NodeArena {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.get_mut(id)
    }
}
