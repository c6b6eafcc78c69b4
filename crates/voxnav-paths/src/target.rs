use voxnav_core::BlockPos;

use crate::node::NodeId;

/// A search goal that remembers the closest node the search has looked at.
///
/// Every heuristic evaluation against the target feeds
/// [`update_best`](Target::update_best), whether or not the node is ever
/// expanded. When the goal itself is out of reach, the best node is where
/// the returned path ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    node: NodeId,
    pos: BlockPos,
    best_heuristic: f64,
    best_node: Option<NodeId>,
    reached: bool,
}

impl Target {
    pub fn new(node: NodeId, pos: BlockPos) -> Self {
        Self {
            node,
            pos,
            best_heuristic: f64::INFINITY,
            best_node: None,
            reached: false,
        }
    }

    /// Node standing for the goal position.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    #[inline]
    pub fn pos(&self) -> BlockPos {
        self.pos
    }

    /// Record a heuristic value for `node`, keeping it if it is the smallest
    /// seen so far.
    pub fn update_best(&mut self, heuristic: f64, node: NodeId) {
        if heuristic < self.best_heuristic {
            self.best_heuristic = heuristic;
            self.best_node = Some(node);
        }
    }

    /// Closest node seen so far, `None` before the first heuristic
    /// evaluation.
    #[inline]
    pub fn best_node(&self) -> Option<NodeId> {
        self.best_node
    }

    #[inline]
    pub fn best_heuristic(&self) -> f64 {
        self.best_heuristic
    }

    #[inline]
    pub fn set_reached(&mut self) {
        self.reached = true;
    }

    #[inline]
    pub fn reached(&self) -> bool {
        self.reached
    }
}
