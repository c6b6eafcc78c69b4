use voxnav_core::{LiquidId, PathType};

use crate::cost::CostMap;
use crate::error::ConfigError;

/// Default `max_up_step`.
pub const DEFAULT_MAX_UP_STEP: f64 = 1.0;
/// Default `max_fall_distance`.
pub const DEFAULT_MAX_FALL_DISTANCE: i32 = 3;

/// Agent bounding box: `width` on both x and z, `height` on y.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntitySize {
    pub width: f64,
    pub height: f64,
}

impl EntitySize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for EntitySize {
    fn default() -> Self {
        Self::new(0.6, 1.8)
    }
}

/// Capabilities and costs of a walking agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WalkConfig {
    pub cost_overrides: CostMap,
    pub bounding_box: EntitySize,
    /// Liquids the agent can stand on top of.
    pub liquids_can_stand_on: Vec<LiquidId>,
    pub can_open_doors: bool,
    pub can_pass_doors: bool,
    pub can_float: bool,
    pub can_walk_over_fences: bool,
    /// Whether the agent is currently supported by the ground.
    pub on_ground: bool,
    /// Highest step the agent takes without jumping. Zero means default.
    pub max_up_step: f64,
    /// Deepest drop the agent accepts. Zero means default.
    pub max_fall_distance: i32,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            cost_overrides: CostMap::default(),
            bounding_box: EntitySize::default(),
            liquids_can_stand_on: Vec::new(),
            can_open_doors: false,
            can_pass_doors: true,
            can_float: false,
            can_walk_over_fences: false,
            on_ground: false,
            max_up_step: DEFAULT_MAX_UP_STEP,
            max_fall_distance: DEFAULT_MAX_FALL_DISTANCE,
        }
    }
}

impl WalkConfig {
    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let EntitySize { width, height } = self.bounding_box;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidBoundingBox { width, height });
        }
        if !self.max_up_step.is_finite() || self.max_up_step < 0.0 {
            return Err(ConfigError::InvalidMaxUpStep(self.max_up_step));
        }
        if self.max_fall_distance < 0 {
            return Err(ConfigError::InvalidMaxFallDistance(self.max_fall_distance));
        }
        if let Some((path_type, malus)) = self
            .cost_overrides
            .overrides()
            .find(|(_, m)| !m.is_finite())
        {
            return Err(ConfigError::InvalidCost { path_type, malus });
        }
        Ok(())
    }

    /// The config with zero limits replaced by their defaults.
    pub(crate) fn normalized(mut self) -> Self {
        if self.max_up_step == 0.0 {
            self.max_up_step = DEFAULT_MAX_UP_STEP;
        }
        if self.max_fall_distance == 0 {
            self.max_fall_distance = DEFAULT_MAX_FALL_DISTANCE;
        }
        self
    }

    #[inline]
    pub fn malus(&self, t: PathType) -> f64 {
        self.cost_overrides.malus(t)
    }

    #[inline]
    pub fn can_stand_on(&self, liquid: LiquidId) -> bool {
        self.liquids_can_stand_on.contains(&liquid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = WalkConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.can_pass_doors);
        assert!(!cfg.can_open_doors);
        assert_eq!(cfg.bounding_box, EntitySize::new(0.6, 1.8));
        assert_eq!(cfg.malus(PathType::Water), 8.0);
    }

    #[test]
    fn rejects_bad_values() {
        let mut cfg = WalkConfig::default();
        cfg.bounding_box.width = 0.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidBoundingBox { .. })));

        let cfg = WalkConfig {
            max_up_step: f64::NAN,
            ..WalkConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidMaxUpStep(_))));

        let cfg = WalkConfig {
            max_fall_distance: -2,
            ..WalkConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidMaxFallDistance(-2)));

        let mut cfg = WalkConfig::default();
        cfg.cost_overrides.set_malus(PathType::Rail, f64::INFINITY);
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::InvalidCost {
                path_type: PathType::Rail,
                malus: f64::INFINITY
            })
        );
    }

    #[test]
    fn zero_limits_normalize_to_defaults() {
        let cfg = WalkConfig {
            max_up_step: 0.0,
            max_fall_distance: 0,
            ..WalkConfig::default()
        }
        .normalized();
        assert_eq!(cfg.max_up_step, DEFAULT_MAX_UP_STEP);
        assert_eq!(cfg.max_fall_distance, DEFAULT_MAX_FALL_DISTANCE);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn missing_fields_take_defaults() {
        let cfg: WalkConfig = serde_json::from_str(r#"{"can_float": true}"#).unwrap();
        assert!(cfg.can_float);
        assert_eq!(cfg.max_fall_distance, DEFAULT_MAX_FALL_DISTANCE);
    }
}
