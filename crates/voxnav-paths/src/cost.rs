use rustc_hash::FxHashMap;
use voxnav_core::PathType;

/// Per-agent traversal costs.
///
/// Types without an override use [`PathType::default_malus`]. A negative
/// malus makes the type impassable.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CostMap {
    overrides: FxHashMap<PathType, f64>,
}

impl CostMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective malus of `t`.
    #[inline]
    pub fn malus(&self, t: PathType) -> f64 {
        self.overrides
            .get(&t)
            .copied()
            .unwrap_or_else(|| t.default_malus())
    }

    pub fn set_malus(&mut self, t: PathType, malus: f64) {
        self.overrides.insert(t, malus);
    }

    /// Drop the override for `t`, returning to its default.
    pub fn reset_malus(&mut self, t: PathType) {
        self.overrides.remove(&t);
    }

    /// Overrides in declaration order of [`PathType`].
    pub fn overrides(&self) -> impl Iterator<Item = (PathType, f64)> + '_ {
        PathType::ALL
            .into_iter()
            .filter_map(|t| self.overrides.get(&t).map(|&m| (t, m)))
    }
}

impl FromIterator<(PathType, f64)> for CostMap {
    fn from_iter<I: IntoIterator<Item = (PathType, f64)>>(iter: I) -> Self {
        Self {
            overrides: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_defaults() {
        let mut costs = CostMap::new();
        assert_eq!(costs.malus(PathType::Water), 8.0);
        assert_eq!(costs.malus(PathType::Blocked), -1.0);

        costs.set_malus(PathType::Water, 0.0);
        costs.set_malus(PathType::Leaves, 2.0);
        assert_eq!(costs.malus(PathType::Water), 0.0);
        assert_eq!(costs.malus(PathType::Leaves), 2.0);
        assert_eq!(
            costs.overrides().collect::<Vec<_>>(),
            vec![(PathType::Water, 0.0), (PathType::Leaves, 2.0)]
        );

        costs.reset_malus(PathType::Water);
        assert_eq!(costs.malus(PathType::Water), 8.0);
    }

    #[test]
    fn collect_from_pairs() {
        let costs: CostMap = [(PathType::DangerFire, -1.0)].into_iter().collect();
        assert_eq!(costs.malus(PathType::DangerFire), -1.0);
        assert_eq!(costs.malus(PathType::DamageFire), 16.0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_uses_type_names() {
        let costs: CostMap = [(PathType::WaterBorder, 1.5)].into_iter().collect();
        let json = serde_json::to_string(&costs).unwrap();
        assert_eq!(json, r#"{"WATER_BORDER":1.5}"#);
        let back: CostMap = serde_json::from_str(&json).unwrap();
        assert_eq!(back, costs);
    }
}
