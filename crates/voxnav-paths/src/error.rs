use std::fmt;

use voxnav_core::BlockPos;

/// Errors reported by the open-set heap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `insert` on a node that is already open.
    AlreadyOpen(BlockPos),
    /// `remove` or `change_cost` on a node that is not open.
    NotOpen(BlockPos),
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyOpen(pos) => write!(f, "node at {pos} is already in the open set"),
            Self::NotOpen(pos) => write!(f, "node at {pos} is not in the open set"),
        }
    }
}

impl std::error::Error for HeapError {}

/// Errors reported when validating a [`WalkConfig`](crate::WalkConfig).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Width or height is not a positive finite number.
    InvalidBoundingBox { width: f64, height: f64 },
    /// `max_up_step` is negative or not finite.
    InvalidMaxUpStep(f64),
    /// `max_fall_distance` is negative.
    InvalidMaxFallDistance(i32),
    /// A cost override is NaN or infinite.
    InvalidCost { path_type: voxnav_core::PathType, malus: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBoundingBox { width, height } => {
                write!(f, "invalid bounding box {width} x {height}")
            }
            Self::InvalidMaxUpStep(v) => write!(f, "invalid max up step {v}"),
            Self::InvalidMaxFallDistance(v) => write!(f, "invalid max fall distance {v}"),
            Self::InvalidCost { path_type, malus } => {
                write!(f, "invalid malus {malus} for {path_type}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
