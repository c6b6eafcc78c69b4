//! Read-only world access used by path evaluators.
//!
//! A host implements [`BlockSource`] over its own block storage. The
//! pathfinder only ever reads through it, and only for the duration of one
//! search.

use crate::aabb::Aabb;
use crate::geom::{BlockPos, Vec3};
use crate::path_type::PathType;

/// Lowest buildable Y level unless a world says otherwise.
pub const DEFAULT_MIN_Y: i32 = -64;

// ---------------------------------------------------------------------------
// Liquids
// ---------------------------------------------------------------------------

/// Identity of a liquid kind. Hosts may define their own ids beyond the two
/// built-in ones.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiquidId(pub u16);

impl LiquidId {
    pub const WATER: LiquidId = LiquidId(0);
    pub const LAVA: LiquidId = LiquidId(1);
}

/// A liquid occupying a voxel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LiquidState {
    pub id: LiquidId,
    /// Spread distance from a source; 0 is a source block.
    pub depth: u8,
    /// Whether the liquid is flowing downwards.
    pub falling: bool,
}

impl LiquidState {
    /// A still source block of `id`.
    #[inline]
    pub const fn source(id: LiquidId) -> Self {
        Self {
            id,
            depth: 0,
            falling: false,
        }
    }

    #[inline]
    pub fn is_water(self) -> bool {
        self.id == LiquidId::WATER
    }

    #[inline]
    pub fn is_source(self) -> bool {
        !self.falling && self.depth == 0
    }

    /// Fraction of the voxel left unfilled at the top, in ninths. Falling
    /// liquid fills the whole voxel.
    #[inline]
    pub fn depth_percent(self) -> f64 {
        if self.falling {
            0.0
        } else {
            (self.depth as f64 + 1.0) / 9.0
        }
    }
}

// ---------------------------------------------------------------------------
// PathComputationType
// ---------------------------------------------------------------------------

/// The medium a pathfindability query is made for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathComputationType {
    #[default]
    Land,
    Water,
    Air,
}

/// Whether a block's collision shape is a single full unit cube.
pub fn is_full_cube(boxes: &[Aabb]) -> bool {
    match boxes {
        [b] => b.average_edge_length() >= 1.0 && b.is_cube(),
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// BlockSource
// ---------------------------------------------------------------------------

/// Read-only access to the voxels of a world.
pub trait BlockSource {
    /// Raw terrain type of the block at `pos`, from its static identity
    /// alone. No column or neighborhood context is applied.
    fn raw_path_type(&self, pos: BlockPos) -> PathType;

    /// Whether the voxel is empty air.
    fn is_air(&self, pos: BlockPos) -> bool;

    /// Liquid occupying the voxel, if any.
    fn liquid(&self, pos: BlockPos) -> Option<LiquidState>;

    /// Append the solid collision boxes of the block at `pos`, in
    /// block-local coordinates.
    fn collision_boxes(&self, pos: BlockPos, out: &mut Vec<Aabb>);

    /// World floor limit. Columns are never scanned below it.
    fn min_y(&self) -> i32 {
        DEFAULT_MIN_Y
    }

    /// Whether an agent moving through `kind` may occupy the voxel. Used for
    /// blocks a raw classification table does not recognise.
    fn is_pathfindable(&self, pos: BlockPos, kind: PathComputationType) -> bool {
        match kind {
            PathComputationType::Land | PathComputationType::Air => {
                let mut boxes = Vec::new();
                self.collision_boxes(pos, &mut boxes);
                !is_full_cube(&boxes)
            }
            PathComputationType::Water => self.liquid(pos).is_some_and(LiquidState::is_water),
        }
    }

    /// Height of the floor under `pos`: the highest top of the collision
    /// boxes of the voxel below that a vertical line through `pos` crosses.
    ///
    /// Returns `None` when nothing is hit; callers then use `pos.y - 1`.
    fn floor_intercept(&self, pos: Vec3) -> Option<f64> {
        let below = BlockPos::containing(pos - Vec3::new(0.0, 1.0, 0.0));
        let mut boxes = Vec::new();
        self.collision_boxes(below, &mut boxes);
        let (lx, lz) = (pos.x - below.x as f64, pos.z - below.z as f64);
        boxes
            .iter()
            .filter(|b| b.contains_xz(lx, lz))
            .map(|b| below.y as f64 + b.max.y)
            .reduce(f64::max)
    }
}

/// Floor height under `pos`, falling back to one voxel down when the world
/// reports no intercept.
pub fn floor_level_at<W: BlockSource + ?Sized>(world: &W, pos: Vec3) -> f64 {
    world.floor_intercept(pos).unwrap_or(pos.y - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Column {
        boxes: Vec<Aabb>,
    }

    impl BlockSource for Column {
        fn raw_path_type(&self, _pos: BlockPos) -> PathType {
            PathType::Blocked
        }

        fn is_air(&self, _pos: BlockPos) -> bool {
            false
        }

        fn liquid(&self, _pos: BlockPos) -> Option<LiquidState> {
            None
        }

        fn collision_boxes(&self, pos: BlockPos, out: &mut Vec<Aabb>) {
            if pos.y == 0 {
                out.extend_from_slice(&self.boxes);
            }
        }
    }

    #[test]
    fn full_cube_detection() {
        assert!(is_full_cube(&[Aabb::unit()]));
        assert!(!is_full_cube(&[]));
        assert!(!is_full_cube(&[Aabb::new(0.0, 0.0, 0.0, 1.0, 0.5, 1.0)]));
        assert!(!is_full_cube(&[Aabb::unit(), Aabb::unit()]));
    }

    #[test]
    fn floor_intercept_hits_top_of_box() {
        let slab = Column {
            boxes: vec![Aabb::new(0.0, 0.0, 0.0, 1.0, 0.5, 1.0)],
        };
        let floor = floor_level_at(&slab, Vec3::new(0.5, 1.0, 0.5));
        assert!((floor - 0.5).abs() < 1e-9);
        assert!(slab.is_pathfindable(BlockPos::ZERO, PathComputationType::Land));
    }

    #[test]
    fn floor_intercept_fails_soft() {
        let empty = Column { boxes: Vec::new() };
        assert_eq!(floor_level_at(&empty, Vec3::new(0.5, 1.0, 0.5)), 0.0);
        assert_eq!(floor_level_at(&empty, Vec3::new(0.5, 7.0, 0.5)), 6.0);
    }

    #[test]
    fn liquid_depth() {
        let source = LiquidState::source(LiquidId::WATER);
        assert!(source.is_source());
        assert!(source.is_water());
        assert!((source.depth_percent() - 1.0 / 9.0).abs() < 1e-9);
        let falling = LiquidState {
            falling: true,
            ..source
        };
        assert!(!falling.is_source());
        assert_eq!(falling.depth_percent(), 0.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn liquid_state_serde() {
        let flowing = LiquidState {
            id: LiquidId::LAVA,
            depth: 3,
            falling: true,
        };
        let json = serde_json::to_string(&flowing).unwrap();
        assert_eq!(serde_json::from_str::<LiquidState>(&json).unwrap(), flowing);
    }
}
