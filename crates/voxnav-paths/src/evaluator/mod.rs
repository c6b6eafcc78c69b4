//! Node evaluators: how an agent archetype sees and moves through the world.

mod classify;
mod config;
mod walk;

pub use classify::column_path_type;
pub use config::{DEFAULT_MAX_FALL_DISTANCE, DEFAULT_MAX_UP_STEP, EntitySize, WalkConfig};
pub use walk::{DEFAULT_JUMP_HEIGHT, WalkNodeEvaluator};

use voxnav_core::{BlockPos, BlockSource};

use crate::node::{NodeArena, NodeId};
use crate::target::Target;

/// Produces the nodes of one search.
///
/// An evaluator owns the node arena and any terrain caches of the search in
/// progress. Caches are reset by [`prepare`](Self::prepare) and dropped by
/// [`done`](Self::done); one evaluator serves one search at a time. The world
/// is passed to every call that reads it and is never stored.
pub trait NodeEvaluator {
    /// Reset per-search state for a search starting at `start`.
    fn prepare(&mut self, start: BlockPos);

    /// Release per-search state.
    fn done(&mut self);

    /// The concrete node the agent starts from.
    fn start_node<W: BlockSource + ?Sized>(&mut self, world: &W) -> NodeId;

    /// Wrap a goal position as a [`Target`].
    fn goal(&mut self, pos: BlockPos) -> Target;

    /// Append the traversable neighbors of `node` to `out`.
    fn neighbors<W: BlockSource + ?Sized>(
        &mut self,
        world: &W,
        node: NodeId,
        out: &mut Vec<NodeId>,
    );

    /// Nodes of the current search.
    fn nodes(&self) -> &NodeArena;

    fn nodes_mut(&mut self) -> &mut NodeArena;
}
