//! Node evaluator for agents that walk, jump, fall and swim.

use rustc_hash::FxHashMap;
use voxnav_core::{
    Aabb, BlockPos, BlockSource, Face, LiquidState, PathComputationType, PathType, Vec3,
    floor_level_at, is_full_cube,
};

use super::NodeEvaluator;
use super::classify::{Footprint, footprint_path_type};
use super::config::WalkConfig;
use crate::error::ConfigError;
use crate::node::{Node, NodeArena, NodeId};
use crate::target::Target;

/// Lowest jump height of a walking agent.
pub const DEFAULT_JUMP_HEIGHT: f64 = 1.125;

/// Diagonal moves, as (z face, x face). The z face is the facing.
const DIAGONALS: [(Face, Face); 4] = [
    (Face::North, Face::East),
    (Face::North, Face::West),
    (Face::South, Face::East),
    (Face::South, Face::West),
];

/// [`NodeEvaluator`] for walking agents.
///
/// Cells are classified over the agent's whole footprint and cached per
/// search. Movement follows the agent's capabilities: it steps up to
/// `max_up_step` voxels, drops at most `max_fall_distance`, and handles
/// doors, fences and water according to its [`WalkConfig`].
#[derive(Debug)]
pub struct WalkNodeEvaluator {
    config: WalkConfig,
    footprint: Footprint,
    start: BlockPos,
    agent_pos: Option<Vec3>,
    bounding_box: Aabb,
    nodes: NodeArena,
    path_types: FxHashMap<BlockPos, PathType>,
    boxes: Vec<Aabb>,
}

impl WalkNodeEvaluator {
    /// Build an evaluator, replacing zero limits with their defaults.
    pub fn new(config: WalkConfig) -> Self {
        let config = config.normalized();
        Self {
            footprint: Footprint::of(config.bounding_box),
            config,
            start: BlockPos::ZERO,
            agent_pos: None,
            bounding_box: Aabb::default(),
            nodes: NodeArena::new(),
            path_types: FxHashMap::default(),
            boxes: Vec::new(),
        }
    }

    /// Like [`new`](Self::new), but reject unusable configurations.
    pub fn try_new(config: WalkConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    #[inline]
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Set the agent's exact position, used for the collision box and for
    /// on-ground starts. Without it the bottom centre of the start voxel is
    /// used.
    pub fn set_position(&mut self, pos: Vec3) {
        self.agent_pos = Some(pos);
    }

    pub fn set_can_open_doors(&mut self, v: bool) {
        self.config.can_open_doors = v;
    }

    pub fn set_can_pass_doors(&mut self, v: bool) {
        self.config.can_pass_doors = v;
    }

    pub fn set_can_float(&mut self, v: bool) {
        self.config.can_float = v;
    }

    pub fn set_can_walk_over_fences(&mut self, v: bool) {
        self.config.can_walk_over_fences = v;
    }

    pub fn set_on_ground(&mut self, v: bool) {
        self.config.on_ground = v;
    }

    /// Terrain type of the cell at `pos` for this agent, cached for the
    /// current search.
    pub fn path_type<W: BlockSource + ?Sized>(&mut self, world: &W, pos: BlockPos) -> PathType {
        if let Some(&t) = self.path_types.get(&pos) {
            return t;
        }
        let t = footprint_path_type(world, &self.config, self.footprint, pos);
        self.path_types.insert(pos, t);
        t
    }

    fn agent_pos(&self) -> Vec3 {
        self.agent_pos.unwrap_or_else(|| self.start.bottom_center())
    }

    fn jump_height(&self) -> f64 {
        DEFAULT_JUMP_HEIGHT.max(self.config.max_up_step)
    }

    /// Floor height at `pos`. Floating agents rest half a voxel into water.
    fn floor_level<W: BlockSource + ?Sized>(&self, world: &W, pos: Vec3) -> f64 {
        if self.config.can_float
            && world
                .liquid(BlockPos::containing(pos))
                .is_some_and(LiquidState::is_water)
        {
            return pos.y + 0.5;
        }
        floor_level_at(world, pos)
    }

    fn can_stand_on<W: BlockSource + ?Sized>(&self, world: &W, pos: BlockPos) -> bool {
        world
            .liquid(pos)
            .is_some_and(|l| self.config.can_stand_on(l.id))
    }

    /// Whether water at the agent's head column rises above the top of the
    /// agent.
    fn is_submerged<W: BlockSource + ?Sized>(&self, world: &W) -> bool {
        let height = self.config.bounding_box.height;
        let head = self.start.with_y(self.start.y + height.floor() as i32);
        let Some(water) = world.liquid(head).filter(|l| l.is_water()) else {
            return false;
        };
        let surface = (head.y + 1) as f64 - (water.depth_percent() - 0.1111111);
        self.start.y as f64 + height < surface
    }

    // -----------------------------------------------------------------------
    // Node construction
    // -----------------------------------------------------------------------

    fn node_and_update_cost_to_max(&mut self, pos: BlockPos, t: PathType, malus: f64) -> NodeId {
        let id = self.nodes.node_at(pos);
        let node = &mut self.nodes[id];
        node.path_type = t;
        node.cost_malus = node.cost_malus.max(malus);
        id
    }

    fn blocked_node(&mut self, pos: BlockPos) -> NodeId {
        log::trace!("blocked node at {pos}");
        let id = self.nodes.node_at(pos);
        let node = &mut self.nodes[id];
        node.path_type = PathType::Blocked;
        node.cost_malus = PathType::Blocked.default_malus();
        id
    }

    /// Visible but not expandable node for a cell the agent can partly
    /// overlap.
    fn closed_node(&mut self, pos: BlockPos, t: PathType) -> NodeId {
        let id = self.nodes.node_at(pos);
        let node = &mut self.nodes[id];
        node.closed = true;
        node.path_type = t;
        node.cost_malus = t.default_malus();
        id
    }

    // -----------------------------------------------------------------------
    // Neighbor validity
    // -----------------------------------------------------------------------

    fn is_neighbor_valid(&self, neighbor: NodeId, origin_malus: f64) -> bool {
        let n = &self.nodes[neighbor];
        !n.closed && (n.cost_malus >= 0.0 || origin_malus < 0.0)
    }

    fn is_diagonal_valid(
        &self,
        node: NodeId,
        flank_x: Option<NodeId>,
        flank_z: Option<NodeId>,
        diagonal: NodeId,
    ) -> bool {
        let (Some(a), Some(b)) = (flank_x, flank_z) else {
            return false;
        };
        let (node, a, b, diagonal) = (
            &self.nodes[node],
            &self.nodes[a],
            &self.nodes[b],
            &self.nodes[diagonal],
        );
        if diagonal.closed || a.pos.y > node.pos.y || b.pos.y > node.pos.y {
            return false;
        }
        if [a, b, diagonal]
            .iter()
            .any(|n| n.path_type == PathType::WalkableDoor)
        {
            return false;
        }
        let narrow = self.config.bounding_box.width < 0.5;
        let flank_ok = |f: &Node| {
            f.pos.y < node.pos.y
                || f.cost_malus >= 0.0
                || (narrow && f.path_type == PathType::Fence)
        };
        diagonal.cost_malus >= 0.0 && flank_ok(a) && flank_ok(b)
    }

    // -----------------------------------------------------------------------
    // Accepted nodes
    // -----------------------------------------------------------------------

    /// The node an agent ends up at when moving into `pos`, after stepping
    /// up, sinking or falling. `None` when the move is impossible.
    fn accepted_node<W: BlockSource + ?Sized>(
        &mut self,
        world: &W,
        pos: BlockPos,
        remaining_jump: i32,
        origin_floor: f64,
        facing: Face,
        origin_type: PathType,
    ) -> Option<NodeId> {
        if self.floor_level(world, pos.bottom_center()) - origin_floor > self.jump_height() {
            return None;
        }

        let t = self.path_type(world, pos);
        let malus = self.config.malus(t);
        let mut result = None;
        if malus >= 0.0 {
            result = Some(self.node_and_update_cost_to_max(pos, t, malus));
        }

        if origin_type.has_partial_collision() {
            if let Some(id) = result {
                let target = self.nodes[id].pos;
                if self.nodes[id].cost_malus >= 0.0
                    && !self.can_reach_without_collision(world, target)
                {
                    log::trace!("{target} unreachable from {origin_type} without collision");
                    result = None;
                }
            }
        }

        if t == PathType::Walkable || t == PathType::Water {
            return result;
        }

        if result.is_none_or(|id| self.nodes[id].cost_malus < 0.0)
            && remaining_jump > 0
            && (t != PathType::Fence || self.config.can_walk_over_fences)
            && !matches!(
                t,
                PathType::UnpassableRail | PathType::Trapdoor | PathType::PowderSnow
            )
        {
            result = self.accepted_node(
                world,
                pos.up(),
                remaining_jump - 1,
                origin_floor,
                facing,
                origin_type,
            );
            if let Some(id) = result {
                let (stepped_type, stepped_pos) = (self.nodes[id].path_type, self.nodes[id].pos);
                if matches!(stepped_type, PathType::Open | PathType::Walkable)
                    && self.config.bounding_box.width < 1.0
                    && !self.has_step_clearance(world, pos, facing, stepped_pos)
                {
                    result = None;
                }
            }
        }

        if t == PathType::Open {
            if !self.config.can_float && self.path_type(world, pos.down()) == PathType::Water {
                return self.sink(world, pos.down());
            }
            return self.fall(world, pos);
        }

        if t.has_partial_collision() && result.is_none() {
            result = Some(self.closed_node(pos, t));
        }
        result
    }

    /// Room to step up from the column behind `pos` onto `stepped`.
    fn has_step_clearance<W: BlockSource + ?Sized>(
        &mut self,
        world: &W,
        pos: BlockPos,
        facing: Face,
        stepped: BlockPos,
    ) -> bool {
        let half = self.config.bounding_box.width / 2.0;
        let side = (pos - facing.offset()).bottom_center();
        let y1 = self.floor_level(world, side + Vec3::new(0.0, 1.0, 0.0));
        let y2 = self.floor_level(world, stepped.bottom_center());
        let bb = Aabb::new(
            side.x - half,
            y1.min(y2) + 0.001,
            side.z - half,
            side.x + half,
            self.config.bounding_box.height + y1.max(y2) - 0.002,
            side.z + half,
        );
        !has_collisions(world, bb, &mut self.boxes)
    }

    /// Sink a non-floating agent from the water at `pos` to the lowest
    /// water voxel of the column.
    fn sink<W: BlockSource + ?Sized>(&mut self, world: &W, mut pos: BlockPos) -> Option<NodeId> {
        let min_y = world.min_y();
        let mut result = None;
        while pos.y >= min_y {
            let t = self.path_type(world, pos);
            if t != PathType::Water {
                break;
            }
            let malus = self.config.malus(t);
            result = Some(self.node_and_update_cost_to_max(pos, t, malus));
            pos = pos.down();
        }
        result
    }

    /// Drop from the open cell at `start` to the first cell with a floor.
    /// Reaching `max_fall_distance` voxels down is blocked.
    fn fall<W: BlockSource + ?Sized>(&mut self, world: &W, start: BlockPos) -> Option<NodeId> {
        let min_y = world.min_y();
        let mut pos = start;
        let mut fall_distance = 0;
        loop {
            pos = pos.down();
            if pos.y < min_y {
                return Some(self.blocked_node(start));
            }
            fall_distance += 1;
            if fall_distance >= self.config.max_fall_distance {
                log::trace!("fall from {start} exceeds {}", self.config.max_fall_distance);
                return Some(self.blocked_node(pos));
            }
            let t = self.path_type(world, pos);
            let malus = self.config.malus(t);
            if malus < 0.0 {
                return Some(self.blocked_node(pos));
            }
            if t != PathType::Open {
                return Some(self.node_and_update_cost_to_max(pos, t, malus));
            }
        }
    }

    /// Sweep the agent's box from its position towards `target` and check
    /// that it hits no solid block on the way.
    fn can_reach_without_collision<W: BlockSource + ?Sized>(
        &mut self,
        world: &W,
        target: BlockPos,
    ) -> bool {
        let mut bb = self.bounding_box;
        let rel = (target - self.start).to_vec3()
            + Vec3::new(bb.width() / 2.0, bb.height() / 2.0, bb.length() / 2.0);
        let steps = (rel.len() / bb.average_edge_length()).ceil() as i32;
        if steps <= 0 {
            return true;
        }
        let step = rel * (1.0 / steps as f64);
        for _ in 0..steps {
            bb = bb.translate(step);
            if has_collisions(world, bb, &mut self.boxes) {
                return false;
            }
        }
        true
    }
}

/// Whether `bb` overlaps the collision box of any solid block.
fn has_collisions<W: BlockSource + ?Sized>(world: &W, bb: Aabb, scratch: &mut Vec<Aabb>) -> bool {
    let min = bb.min_block().shift(-1, -1, -1);
    let max = bb.max_block().shift(1, 1, 1);
    for z in min.z..=max.z {
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                let pos = BlockPos::new(x, y, z);
                scratch.clear();
                world.collision_boxes(pos, scratch);
                if is_full_cube(scratch) && scratch[0].at_block(pos).intersects(bb) {
                    return true;
                }
            }
        }
    }
    false
}

impl NodeEvaluator for WalkNodeEvaluator {
    fn prepare(&mut self, start: BlockPos) {
        self.start = start;
        self.nodes.clear();
        self.path_types.clear();
        self.footprint = Footprint::of(self.config.bounding_box);
        let size = self.config.bounding_box;
        self.bounding_box = Aabb::around_feet(self.agent_pos(), size.width, size.height);
    }

    fn done(&mut self) {
        self.nodes.release();
        self.path_types = FxHashMap::default();
        self.boxes = Vec::new();
    }

    fn start_node<W: BlockSource + ?Sized>(&mut self, world: &W) -> NodeId {
        let start = self.start;
        let y = if self.can_stand_on(world, start) {
            let mut pos = start;
            while self.can_stand_on(world, pos) {
                pos = pos.up();
            }
            pos.y - 1
        } else if self.config.can_float
            && world.liquid(start).is_some_and(LiquidState::is_water)
            && self.is_submerged(world)
        {
            let mut pos = start;
            while world
                .liquid(pos)
                .is_some_and(|l| l.is_water() && l.is_source())
            {
                pos = pos.up();
            }
            pos.y - 1
        } else if self.config.on_ground {
            (self.agent_pos().y + 0.5).floor() as i32
        } else {
            let min_y = world.min_y();
            let mut pos = start;
            while (world.is_air(pos) || world.is_pathfindable(pos, PathComputationType::Land))
                && pos.y > min_y
            {
                pos = pos.down();
            }
            pos.y + 1
        };

        let pos = start.with_y(y);
        let t = self.path_type(world, pos);
        let malus = self.config.malus(t);
        let id = self.nodes.node_at(pos);
        let node = &mut self.nodes[id];
        node.path_type = t;
        node.cost_malus = malus;
        id
    }

    fn goal(&mut self, pos: BlockPos) -> Target {
        Target::new(self.nodes.node_at(pos), pos)
    }

    fn neighbors<W: BlockSource + ?Sized>(
        &mut self,
        world: &W,
        node: NodeId,
        out: &mut Vec<NodeId>,
    ) {
        let pos = self.nodes[node].pos;
        let origin_malus = self.nodes[node].cost_malus;
        let t = self.path_type(world, pos);
        let above = self.path_type(world, pos.up());
        let max_up_step = if self.config.malus(above) >= 0.0 && t != PathType::StickyHoney {
            self.config.max_up_step.max(1.0).floor() as i32
        } else {
            0
        };
        let floor = self.floor_level(world, pos.bottom_center());

        let mut horizontal = [None; 4];
        for (slot, face) in Face::HORIZONTAL.into_iter().enumerate() {
            let n = self.accepted_node(world, pos.side(face), max_up_step, floor, face, t);
            horizontal[slot] = n;
            if let Some(n) = n {
                if self.is_neighbor_valid(n, origin_malus) {
                    out.push(n);
                }
            }
        }

        for (z_face, x_face) in DIAGONALS {
            let diagonal_pos = pos.side(z_face).side(x_face);
            let Some(d) = self.accepted_node(world, diagonal_pos, max_up_step, floor, z_face, t)
            else {
                continue;
            };
            let flank = |face: Face| {
                Face::HORIZONTAL
                    .iter()
                    .position(|&f| f == face)
                    .and_then(|slot| horizontal[slot])
            };
            if self.is_diagonal_valid(node, flank(x_face), flank(z_face), d) {
                out.push(d);
            }
        }
    }

    fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    fn nodes_mut(&mut self) -> &mut NodeArena {
        &mut self.nodes
    }
}

impl Default for WalkNodeEvaluator {
    fn default() -> Self {
        Self::new(WalkConfig::default())
    }
}
