//! Terrain classification for walking agents.
//!
//! Classification happens in three layers. The world's raw type is first
//! adjusted for the column it sits in ([`column_path_type`]), then for the
//! agent's door handling, and finally merged over the agent's whole
//! footprint ([`footprint_path_type`]).

use voxnav_core::{BlockPos, BlockSource, PathType};

use super::config::{EntitySize, WalkConfig};

/// Number of voxels an agent covers along each axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Footprint {
    pub width: i32,
    pub height: i32,
    pub depth: i32,
}

impl Footprint {
    pub fn of(size: EntitySize) -> Self {
        let width = size.width.floor() as i32 + 1;
        Self {
            width,
            height: size.height.floor() as i32 + 1,
            depth: width,
        }
    }
}

/// Type of the voxel at `pos` in the context of its column.
///
/// Air over something an agent can stand on becomes walkable; air over a
/// hazard takes the hazard's type. Walkable cells next to cactus, fire, lava
/// or water are tagged as such.
pub fn column_path_type<W: BlockSource + ?Sized>(world: &W, pos: BlockPos) -> PathType {
    let mut t = world.raw_path_type(pos);
    if t == PathType::Open && pos.y > world.min_y() {
        t = match world.raw_path_type(pos.down()) {
            PathType::Walkable | PathType::Open | PathType::Water | PathType::Lava => {
                PathType::Open
            }
            PathType::DamageFire => PathType::DamageFire,
            PathType::DamageOther => PathType::DamageOther,
            PathType::StickyHoney => PathType::StickyHoney,
            PathType::PowderSnow => PathType::DangerPowderSnow,
            _ => PathType::Walkable,
        };
    }
    if t == PathType::Walkable {
        t = nearby_hazard(world, pos).unwrap_or(t);
    }
    t
}

/// First hazard among the 26 voxels around `pos`, scanned x, then y, then z.
fn nearby_hazard<W: BlockSource + ?Sized>(world: &W, pos: BlockPos) -> Option<PathType> {
    for dx in -1..=1 {
        for dy in -1..=1 {
            for dz in -1..=1 {
                if dx == 0 && dy == 0 && dz == 0 {
                    continue;
                }
                match world.raw_path_type(pos.shift(dx, dy, dz)) {
                    PathType::DamageOther => return Some(PathType::DangerOther),
                    PathType::Lava | PathType::DamageFire => return Some(PathType::DangerFire),
                    PathType::Water => return Some(PathType::WaterBorder),
                    _ => {}
                }
            }
        }
    }
    None
}

/// Apply the agent's door handling to a classified voxel.
pub(crate) fn with_doors(t: PathType, config: &WalkConfig) -> PathType {
    match t {
        PathType::DoorWoodClosed if config.can_open_doors && config.can_pass_doors => {
            PathType::WalkableDoor
        }
        PathType::DoorOpen if !config.can_pass_doors => PathType::Blocked,
        t => t,
    }
}

/// Type of the cell at `pos` for an agent whose footprint's minimum corner
/// sits there.
///
/// Fences and unpassable rails anywhere in the footprint win outright.
/// Otherwise the first impassable type (in declaration order) wins, else the
/// costliest one. A thin agent whose own voxel is open air with nothing
/// costly around stays open, so that it falls.
pub(crate) fn footprint_path_type<W: BlockSource + ?Sized>(
    world: &W,
    config: &WalkConfig,
    footprint: Footprint,
    pos: BlockPos,
) -> PathType {
    let mut seen = [false; PathType::COUNT];
    let mut origin = PathType::Blocked;
    for x in 0..footprint.width {
        for y in 0..footprint.height {
            for z in 0..footprint.depth {
                let t = with_doors(column_path_type(world, pos.shift(x, y, z)), config);
                if x == 0 && y == 0 && z == 0 {
                    origin = t;
                }
                seen[t.index()] = true;
            }
        }
    }

    for hard in [PathType::Fence, PathType::UnpassableRail] {
        if seen[hard.index()] {
            return hard;
        }
    }

    let mut best = PathType::Blocked;
    for t in PathType::ALL.into_iter().filter(|t| seen[t.index()]) {
        let malus = config.malus(t);
        if malus < 0.0 {
            return t;
        }
        if malus >= config.malus(best) {
            best = t;
        }
    }

    if origin == PathType::Open && config.malus(best) == 0.0 && footprint.width <= 1 {
        return PathType::Open;
    }
    best
}
