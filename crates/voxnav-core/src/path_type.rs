//! Terrain classification of a voxel for walking agents.

use std::fmt;

/// Malus of a freely traversable cell.
pub const OPEN_MALUS: f64 = 0.0;
/// Malus of an impassable cell.
pub const BLOCKED_MALUS: f64 = -1.0;

/// How a voxel looks to a pathing agent.
///
/// The declaration order is significant: footprint classification scans the
/// distinct types of a footprint in this order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum PathType {
    Blocked,
    Open,
    Walkable,
    WalkableDoor,
    Trapdoor,
    PowderSnow,
    DangerPowderSnow,
    Fence,
    Lava,
    Water,
    WaterBorder,
    Rail,
    UnpassableRail,
    DangerFire,
    DamageFire,
    DangerOther,
    DamageOther,
    DoorOpen,
    DoorWoodClosed,
    DoorIronClosed,
    Breach,
    Leaves,
    StickyHoney,
    Cocoa,
}

impl PathType {
    /// Number of variants.
    pub const COUNT: usize = 24;

    /// Every variant, in declaration order.
    pub const ALL: [PathType; Self::COUNT] = [
        PathType::Blocked,
        PathType::Open,
        PathType::Walkable,
        PathType::WalkableDoor,
        PathType::Trapdoor,
        PathType::PowderSnow,
        PathType::DangerPowderSnow,
        PathType::Fence,
        PathType::Lava,
        PathType::Water,
        PathType::WaterBorder,
        PathType::Rail,
        PathType::UnpassableRail,
        PathType::DangerFire,
        PathType::DamageFire,
        PathType::DangerOther,
        PathType::DamageOther,
        PathType::DoorOpen,
        PathType::DoorWoodClosed,
        PathType::DoorIronClosed,
        PathType::Breach,
        PathType::Leaves,
        PathType::StickyHoney,
        PathType::Cocoa,
    ];

    /// Position of the variant in [`PathType::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Default traversal malus. Negative means impassable.
    pub const fn default_malus(self) -> f64 {
        match self {
            PathType::Blocked
            | PathType::PowderSnow
            | PathType::Fence
            | PathType::Lava
            | PathType::DamageOther
            | PathType::DoorWoodClosed
            | PathType::DoorIronClosed
            | PathType::Leaves => BLOCKED_MALUS,
            PathType::Water
            | PathType::WaterBorder
            | PathType::DangerFire
            | PathType::DangerOther
            | PathType::StickyHoney => 8.0,
            PathType::DamageFire => 16.0,
            PathType::Breach => 4.0,
            PathType::Open
            | PathType::Walkable
            | PathType::WalkableDoor
            | PathType::Trapdoor
            | PathType::DangerPowderSnow
            | PathType::Rail
            | PathType::UnpassableRail
            | PathType::DoorOpen
            | PathType::Cocoa => OPEN_MALUS,
        }
    }

    /// Cells an agent can partly overlap but not walk through: fences and
    /// closed doors.
    #[inline]
    pub const fn has_partial_collision(self) -> bool {
        matches!(
            self,
            PathType::Fence | PathType::DoorWoodClosed | PathType::DoorIronClosed
        )
    }
}

impl fmt::Display for PathType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PathType::Blocked => "BLOCKED",
            PathType::Open => "OPEN",
            PathType::Walkable => "WALKABLE",
            PathType::WalkableDoor => "WALKABLE_DOOR",
            PathType::Trapdoor => "TRAPDOOR",
            PathType::PowderSnow => "POWDER_SNOW",
            PathType::DangerPowderSnow => "DANGER_POWDER_SNOW",
            PathType::Fence => "FENCE",
            PathType::Lava => "LAVA",
            PathType::Water => "WATER",
            PathType::WaterBorder => "WATER_BORDER",
            PathType::Rail => "RAIL",
            PathType::UnpassableRail => "UNPASSABLE_RAIL",
            PathType::DangerFire => "DANGER_FIRE",
            PathType::DamageFire => "DAMAGE_FIRE",
            PathType::DangerOther => "DANGER_OTHER",
            PathType::DamageOther => "DAMAGE_OTHER",
            PathType::DoorOpen => "DOOR_OPEN",
            PathType::DoorWoodClosed => "DOOR_WOOD_CLOSED",
            PathType::DoorIronClosed => "DOOR_IRON_CLOSED",
            PathType::Breach => "BREACH",
            PathType::Leaves => "LEAVES",
            PathType::StickyHoney => "STICKY_HONEY",
            PathType::Cocoa => "COCOA",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_declaration_order() {
        for (i, t) in PathType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
        assert!(PathType::Blocked < PathType::Cocoa);
    }

    #[test]
    fn default_malus_table() {
        assert_eq!(PathType::Blocked.default_malus(), -1.0);
        assert_eq!(PathType::Open.default_malus(), 0.0);
        assert_eq!(PathType::Water.default_malus(), 8.0);
        assert_eq!(PathType::DamageFire.default_malus(), 16.0);
        assert_eq!(PathType::Breach.default_malus(), 4.0);
        assert!(PathType::Lava.default_malus() < 0.0);
        assert!(PathType::Fence.default_malus() < 0.0);
    }

    #[test]
    fn partial_collision_types() {
        assert!(PathType::Fence.has_partial_collision());
        assert!(PathType::DoorIronClosed.has_partial_collision());
        assert!(!PathType::DoorOpen.has_partial_collision());
        assert!(!PathType::Walkable.has_partial_collision());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_screaming_snake_case() {
        let json = serde_json::to_string(&PathType::DangerPowderSnow).unwrap();
        assert_eq!(json, r#""DANGER_POWDER_SNOW""#);
        let back: PathType = serde_json::from_str(r#""WATER_BORDER""#).unwrap();
        assert_eq!(back, PathType::WaterBorder);
        assert!(serde_json::from_str::<PathType>(r#""WaterBorder""#).is_err());
    }
}
