//! **voxnav-core**: voxel geometry, terrain classification and world access.
//!
//! This crate provides the foundational types shared by the *voxnav*
//! pathfinding crates: integer voxel positions and continuous vectors,
//! axis-aligned boxes, the [`PathType`] terrain classification with its
//! default traversal costs, the read-only [`BlockSource`] world interface and
//! [`VoxelGrid`], an in-memory world implementing it.

pub mod aabb;
pub mod geom;
pub mod grid;
pub mod path_type;
pub mod world;

pub use aabb::Aabb;
pub use geom::{BlockPos, Face, Vec3};
pub use grid::{Block, GridError, VoxelGrid};
pub use path_type::{BLOCKED_MALUS, OPEN_MALUS, PathType};
pub use world::{
    BlockSource, DEFAULT_MIN_Y, LiquidId, LiquidState, PathComputationType, floor_level_at,
    is_full_cube,
};
