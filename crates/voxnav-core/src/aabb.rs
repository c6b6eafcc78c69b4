//! Axis-aligned bounding boxes.

use std::fmt;
use std::ops::{Add, Sub};

use crate::geom::{BlockPos, Vec3};

const EPSILON: f64 = 1e-6;

/// An axis-aligned box \[min, max\].
///
/// Collision boxes reported by a world are in block-local coordinates
/// (inside `[0, 1]³`); use [`translate`](Aabb::translate) or
/// [`at_block`](Aabb::at_block) to place them in the world.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Create a box from two corners, canonicalised so that `min <= max` on
    /// each axis.
    #[inline]
    pub fn new(x0: f64, y0: f64, z0: f64, x1: f64, y1: f64, z1: f64) -> Self {
        Self {
            min: Vec3::new(x0.min(x1), y0.min(y1), z0.min(z1)),
            max: Vec3::new(x0.max(x1), y0.max(y1), z0.max(z1)),
        }
    }

    /// The full unit cube `[0, 1]³`.
    #[inline]
    pub fn unit() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)
    }

    /// A box of the given width (x and z) and height whose bottom face is
    /// centred on `feet`.
    #[inline]
    pub fn around_feet(feet: Vec3, width: f64, height: f64) -> Self {
        let half = width / 2.0;
        Self::new(
            feet.x - half,
            feet.y,
            feet.z - half,
            feet.x + half,
            feet.y + height,
            feet.z + half,
        )
    }

    /// Extent along X.
    #[inline]
    pub fn width(self) -> f64 {
        self.max.x - self.min.x
    }

    /// Extent along Y.
    #[inline]
    pub fn height(self) -> f64 {
        self.max.y - self.min.y
    }

    /// Extent along Z.
    #[inline]
    pub fn length(self) -> f64 {
        self.max.z - self.min.z
    }

    /// Mean of the three edge lengths.
    #[inline]
    pub fn average_edge_length(self) -> f64 {
        (self.width() + self.height() + self.length()) / 3.0
    }

    /// Whether all three edges have the same length.
    #[inline]
    pub fn is_cube(self) -> bool {
        (self.width() - self.height()).abs() < EPSILON
            && (self.height() - self.length()).abs() < EPSILON
    }

    /// Whether the box has zero or negative volume.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.min.x >= self.max.x || self.min.y >= self.max.y || self.min.z >= self.max.z
    }

    /// Return the box moved by `offset`.
    #[inline]
    pub fn translate(self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Place a block-local box at the voxel `pos`.
    #[inline]
    pub fn at_block(self, pos: BlockPos) -> Self {
        self.translate(pos.to_vec3())
    }

    /// Whether the interiors of the two boxes overlap. Boxes that only touch
    /// along a face do not intersect.
    #[inline]
    pub fn intersects(self, other: Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Whether the vertical line through (`x`, `z`) passes through the box,
    /// edges included.
    #[inline]
    pub fn contains_xz(self, x: f64, z: f64) -> bool {
        x >= self.min.x && x <= self.max.x && z >= self.min.z && z <= self.max.z
    }

    /// Voxel containing the minimum corner.
    #[inline]
    pub fn min_block(self) -> BlockPos {
        BlockPos::containing(self.min)
    }

    /// Voxel containing the maximum corner.
    #[inline]
    pub fn max_block(self) -> BlockPos {
        BlockPos::containing(self.max)
    }
}

impl Add<Vec3> for Aabb {
    type Output = Aabb;

    #[inline]
    fn add(self, v: Vec3) -> Aabb {
        self.translate(v)
    }
}

impl Sub<Vec3> for Aabb {
    type Output = Aabb;

    #[inline]
    fn sub(self, v: Vec3) -> Aabb {
        self.translate(-v)
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.min, self.max)
    }
}
