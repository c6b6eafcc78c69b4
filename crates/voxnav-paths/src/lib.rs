//! Terrain-aware pathfinding over voxel worlds.
//!
//! This crate finds walking routes for agents of arbitrary size through any
//! world implementing [`BlockSource`](voxnav_core::BlockSource):
//!
//! - **Weighted A\*** with a best-effort fallback ([`PathFinder::find_path`])
//! - **Walk evaluation** of steps, drops, doors, fences and liquids
//!   ([`WalkNodeEvaluator`])
//! - **Indexed open set** with O(log n) removal and key changes ([`NodeHeap`])
//!
//! A search always returns a [`Path`]. When the goal cannot be reached within
//! the configured limits, the path leads to the closest node the search
//! looked at and [`Path::reached`] is false.
//!
//! # Seams
//!
//! | Trait | Implemented by |
//! |---|---|
//! | [`NodeEvaluator`] | [`WalkNodeEvaluator`], or your own agent archetype |
//! | [`BlockSource`](voxnav_core::BlockSource) | [`VoxelGrid`](voxnav_core::VoxelGrid), or your world |
//!
//! Per-agent traversal costs are configured through [`CostMap`] on
//! [`WalkConfig`]; a negative malus makes a terrain type impassable.

mod cost;
pub mod distance;
mod error;
mod evaluator;
mod finder;
mod heap;
mod node;
mod path;
mod target;

pub use cost::CostMap;
pub use error::{ConfigError, HeapError};
pub use evaluator::{
    DEFAULT_JUMP_HEIGHT, DEFAULT_MAX_FALL_DISTANCE, DEFAULT_MAX_UP_STEP, EntitySize,
    NodeEvaluator, WalkConfig, WalkNodeEvaluator, column_path_type,
};
pub use finder::{FUDGING, PathFinder, SearchLimits, find_path};
pub use heap::NodeHeap;
pub use node::{Node, NodeArena, NodeId};
pub use path::Path;
pub use target::Target;
