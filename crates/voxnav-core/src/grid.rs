//! [`VoxelGrid`]: a dense, bounded in-memory voxel world.
//!
//! The grid stores one [`Block`] per voxel and implements [`BlockSource`]
//! with its own raw classification table, which makes it a convenient world
//! for tests, demos and tools. Voxels outside the bounds read as air, and the
//! bottom of the grid is the world floor limit.
//!
//! Grids can be built from text, one string per horizontal layer (bottom
//! layer first). Within a layer, lines run along +Z and characters along +X:
//!
//! | Char | Block | Char | Block |
//! |---|---|---|---|
//! | `.` | air | `d` / `D` | wooden door, closed / open |
//! | `#` | stone | `i` / `I` | iron door, closed / open |
//! | `_` | bottom slab | `g` / `G` | fence gate, closed / open |
//! | `-` | carpet | `t` | trapdoor |
//! | `~` | still water | `^` | fire |
//! | `%` | lava | `c` | cactus |
//! | `\|` | fence | `h` | honey |
//! | `*` | powder snow | `L` | leaves |
//! | `=` | rail | `o` | cocoa |

use std::fmt;

use crate::aabb::Aabb;
use crate::geom::BlockPos;
use crate::path_type::PathType;
use crate::world::{BlockSource, LiquidId, LiquidState, PathComputationType};

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// The block kinds a [`VoxelGrid`] knows about.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Block {
    #[default]
    Air,
    Stone,
    Slab,
    Carpet,
    Water {
        depth: u8,
        falling: bool,
    },
    Lava,
    Fence,
    WoodDoor {
        open: bool,
    },
    IronDoor {
        open: bool,
    },
    FenceGate {
        open: bool,
    },
    Trapdoor,
    Fire,
    Cactus,
    Honey,
    PowderSnow,
    Leaves,
    Rail,
    Cocoa,
}

impl Block {
    /// Still source water.
    pub const WATER: Block = Block::Water {
        depth: 0,
        falling: false,
    };

    /// Parse a block from its layer character.
    pub fn from_char(ch: char) -> Option<Block> {
        let b = match ch {
            '.' => Block::Air,
            '#' => Block::Stone,
            '_' => Block::Slab,
            '-' => Block::Carpet,
            '~' => Block::WATER,
            '%' => Block::Lava,
            '|' => Block::Fence,
            'd' => Block::WoodDoor { open: false },
            'D' => Block::WoodDoor { open: true },
            'i' => Block::IronDoor { open: false },
            'I' => Block::IronDoor { open: true },
            'g' => Block::FenceGate { open: false },
            'G' => Block::FenceGate { open: true },
            't' => Block::Trapdoor,
            '^' => Block::Fire,
            'c' => Block::Cactus,
            'h' => Block::Honey,
            '*' => Block::PowderSnow,
            'L' => Block::Leaves,
            '=' => Block::Rail,
            'o' => Block::Cocoa,
            _ => return None,
        };
        Some(b)
    }

    /// The layer character of this block.
    pub fn to_char(self) -> char {
        match self {
            Block::Air => '.',
            Block::Stone => '#',
            Block::Slab => '_',
            Block::Carpet => '-',
            Block::Water { .. } => '~',
            Block::Lava => '%',
            Block::Fence => '|',
            Block::WoodDoor { open: false } => 'd',
            Block::WoodDoor { open: true } => 'D',
            Block::IronDoor { open: false } => 'i',
            Block::IronDoor { open: true } => 'I',
            Block::FenceGate { open: false } => 'g',
            Block::FenceGate { open: true } => 'G',
            Block::Trapdoor => 't',
            Block::Fire => '^',
            Block::Cactus => 'c',
            Block::Honey => 'h',
            Block::PowderSnow => '*',
            Block::Leaves => 'L',
            Block::Rail => '=',
            Block::Cocoa => 'o',
        }
    }

    /// Append the block-local collision boxes of this block.
    pub fn collision_boxes(self, out: &mut Vec<Aabb>) {
        let b = match self {
            Block::Stone | Block::Leaves => Aabb::unit(),
            Block::Slab => Aabb::new(0.0, 0.0, 0.0, 1.0, 0.5, 1.0),
            Block::Carpet => Aabb::new(0.0, 0.0, 0.0, 1.0, 0.0625, 1.0),
            Block::Fence => Aabb::new(0.375, 0.0, 0.375, 0.625, 1.5, 0.625),
            Block::WoodDoor { open: false } | Block::IronDoor { open: false } => {
                Aabb::new(0.0, 0.0, 0.0, 1.0, 1.0, 0.1875)
            }
            Block::WoodDoor { open: true } | Block::IronDoor { open: true } => {
                Aabb::new(0.0, 0.0, 0.0, 0.1875, 1.0, 1.0)
            }
            Block::FenceGate { open: false } => Aabb::new(0.0, 0.0, 0.375, 1.0, 1.5, 0.625),
            Block::Trapdoor => Aabb::new(0.0, 0.0, 0.0, 1.0, 0.1875, 1.0),
            Block::Cactus => Aabb::new(0.0625, 0.0, 0.0625, 0.9375, 1.0, 0.9375),
            Block::Honey => Aabb::new(0.0625, 0.0, 0.0625, 0.9375, 0.9375, 0.9375),
            Block::Air
            | Block::Water { .. }
            | Block::Lava
            | Block::FenceGate { open: true }
            | Block::Fire
            | Block::PowderSnow
            | Block::Rail
            | Block::Cocoa => return,
        };
        out.push(b);
    }
}

// ---------------------------------------------------------------------------
// VoxelGrid
// ---------------------------------------------------------------------------

/// A box-shaped volume of blocks anchored at `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    blocks: Vec<Block>,
    origin: BlockPos,
    width: usize,
    height: usize,
    depth: usize,
}

impl VoxelGrid {
    /// Create a grid of `width × height × depth` air voxels whose minimum
    /// corner is `origin`.
    pub fn new(origin: BlockPos, width: i32, height: i32, depth: i32) -> Self {
        let (w, h, d) = (
            width.max(0) as usize,
            height.max(0) as usize,
            depth.max(0) as usize,
        );
        Self {
            blocks: vec![Block::Air; w * h * d],
            origin,
            width: w,
            height: h,
            depth: d,
        }
    }

    /// Build a grid from text layers, bottom layer first. See the module
    /// documentation for the character set.
    ///
    /// All lines of all layers must have the same width, and all layers the
    /// same number of lines. Leading/trailing whitespace is trimmed from each
    /// layer and from each line.
    pub fn from_layers(origin: BlockPos, layers: &[&str]) -> Result<Self, GridError> {
        let parsed: Vec<Vec<&str>> = layers
            .iter()
            .map(|layer| layer.trim().lines().map(str::trim).collect())
            .collect();
        let depth = parsed.first().map_or(0, Vec::len);
        let width = parsed
            .first()
            .and_then(|rows| rows.first())
            .map_or(0, |row| row.chars().count());

        let mut grid = Self::new(origin, width as i32, parsed.len() as i32, depth as i32);
        for (y, rows) in parsed.iter().enumerate() {
            if rows.len() != depth {
                return Err(GridError::InconsistentSize { layer: y });
            }
            for (z, row) in rows.iter().enumerate() {
                if row.chars().count() != width {
                    return Err(GridError::InconsistentSize { layer: y });
                }
                for (x, ch) in row.chars().enumerate() {
                    let pos = BlockPos::new(x as i32, y as i32, z as i32);
                    let block = Block::from_char(ch).ok_or(GridError::InvalidRune { ch, pos })?;
                    grid.set(origin + pos, block);
                }
            }
        }
        Ok(grid)
    }

    /// Minimum corner (inclusive).
    #[inline]
    pub fn min(&self) -> BlockPos {
        self.origin
    }

    /// Maximum corner (exclusive).
    #[inline]
    pub fn max(&self) -> BlockPos {
        self.origin.shift(self.width as i32, self.height as i32, self.depth as i32)
    }

    /// Whether `p` is inside the grid.
    #[inline]
    pub fn contains(&self, p: BlockPos) -> bool {
        self.index(p).is_some()
    }

    #[inline]
    fn index(&self, p: BlockPos) -> Option<usize> {
        let rel = p - self.origin;
        if rel.x < 0 || rel.y < 0 || rel.z < 0 {
            return None;
        }
        let (x, y, z) = (rel.x as usize, rel.y as usize, rel.z as usize);
        if x >= self.width || y >= self.height || z >= self.depth {
            return None;
        }
        Some((y * self.depth + z) * self.width + x)
    }

    /// Read the block at `p`. Returns air outside the bounds.
    pub fn at(&self, p: BlockPos) -> Block {
        self.index(p).map(|i| self.blocks[i]).unwrap_or_default()
    }

    /// Set the block at `p`. No-op outside the bounds.
    pub fn set(&mut self, p: BlockPos, block: Block) {
        if let Some(i) = self.index(p) {
            self.blocks[i] = block;
        }
    }

    /// Set every voxel in the inclusive box `a..=b` (clipped to the grid).
    pub fn fill(&mut self, a: BlockPos, b: BlockPos, block: Block) {
        for y in a.y.min(b.y)..=a.y.max(b.y) {
            for z in a.z.min(b.z)..=a.z.max(b.z) {
                for x in a.x.min(b.x)..=a.x.max(b.x) {
                    self.set(BlockPos::new(x, y, z), block);
                }
            }
        }
    }

    /// Render one horizontal layer as text, in the `from_layers` format.
    pub fn layer_string(&self, y: i32) -> String {
        let mut s = String::with_capacity((self.width + 1) * self.depth);
        for z in 0..self.depth as i32 {
            if z > 0 {
                s.push('\n');
            }
            for x in 0..self.width as i32 {
                s.push(self.at(self.origin + BlockPos::new(x, y - self.origin.y, z)).to_char());
            }
        }
        s
    }
}

impl BlockSource for VoxelGrid {
    fn raw_path_type(&self, pos: BlockPos) -> PathType {
        match self.at(pos) {
            Block::Air => PathType::Open,
            Block::Trapdoor => PathType::Trapdoor,
            Block::Cactus => PathType::DamageOther,
            Block::Cocoa => PathType::Cocoa,
            Block::Water { .. } => PathType::Water,
            Block::Lava => PathType::Lava,
            Block::Fire => PathType::DamageFire,
            Block::WoodDoor { open: false } => PathType::DoorWoodClosed,
            Block::IronDoor { open: false } => PathType::DoorIronClosed,
            Block::WoodDoor { open: true } | Block::IronDoor { open: true } => PathType::DoorOpen,
            Block::Leaves => PathType::Leaves,
            Block::Fence | Block::FenceGate { open: false } => PathType::Fence,
            Block::Honey => PathType::StickyHoney,
            Block::PowderSnow => PathType::PowderSnow,
            Block::Rail => PathType::Rail,
            Block::Slab => PathType::Blocked,
            Block::Stone | Block::Carpet | Block::FenceGate { open: true } => {
                if self.is_pathfindable(pos, PathComputationType::Land) {
                    PathType::Open
                } else {
                    PathType::Blocked
                }
            }
        }
    }

    fn is_air(&self, pos: BlockPos) -> bool {
        self.at(pos) == Block::Air
    }

    fn liquid(&self, pos: BlockPos) -> Option<LiquidState> {
        match self.at(pos) {
            Block::Water { depth, falling } => Some(LiquidState {
                id: LiquidId::WATER,
                depth,
                falling,
            }),
            Block::Lava => Some(LiquidState::source(LiquidId::LAVA)),
            _ => None,
        }
    }

    fn collision_boxes(&self, pos: BlockPos, out: &mut Vec<Aabb>) {
        self.at(pos).collision_boxes(out);
    }

    fn min_y(&self) -> i32 {
        self.origin.y
    }
}

// ---------------------------------------------------------------------------
// GridError
// ---------------------------------------------------------------------------

/// Errors that can occur when building a grid from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A layer's lines, or the layers themselves, have inconsistent sizes.
    InconsistentSize { layer: usize },
    /// A character outside the block alphabet was found.
    InvalidRune { ch: char, pos: BlockPos },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentSize { layer } => {
                write!(f, "voxel grid: inconsistent size in layer {layer}")
            }
            Self::InvalidRune { ch, pos } => {
                write!(f, "voxel grid: invalid rune \u{201c}{ch}\u{201d} at {pos}")
            }
        }
    }
}

impl std::error::Error for GridError {}
