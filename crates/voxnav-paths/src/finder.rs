//! Weighted A* search with a best-effort fallback.

use voxnav_core::{BlockPos, BlockSource};

use crate::evaluator::NodeEvaluator;
use crate::heap::NodeHeap;
use crate::node::{Node, NodeArena, NodeId};
use crate::path::Path;
use crate::target::Target;

/// Weight applied to the heuristic of relaxed nodes. Values above one trade
/// optimality for fewer expansions.
pub const FUDGING: f64 = 1.5;

/// Bounds of one search.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchLimits {
    /// Most nodes popped from the open set.
    pub max_visited_nodes: usize,
    /// Radius around the start beyond which nodes are not expanded, and
    /// longest walk a path may take.
    pub max_distance_from_start: f64,
    /// Manhattan distance at which the goal counts as reached.
    pub reach_range: i32,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_visited_nodes: 256,
            max_distance_from_start: 16.0,
            reach_range: 1,
        }
    }
}

/// Runs searches, reusing its open set and scratch buffers between them.
#[derive(Debug, Default)]
pub struct PathFinder {
    limits: SearchLimits,
    open: NodeHeap,
    nbuf: Vec<NodeId>,
}

impl PathFinder {
    pub fn new(limits: SearchLimits) -> Self {
        Self {
            limits,
            open: NodeHeap::new(),
            nbuf: Vec::new(),
        }
    }

    #[inline]
    pub fn limits(&self) -> SearchLimits {
        self.limits
    }

    pub fn set_limits(&mut self, limits: SearchLimits) {
        self.limits = limits;
    }

    /// Search from `start` towards `goal`.
    ///
    /// A path is always returned. When the goal is not reached within the
    /// limits, the path leads to the node closest to the goal that the search
    /// looked at, and [`Path::reached`] is false. The start node itself is
    /// not part of the path.
    pub fn find_path<W, E>(
        &mut self,
        evaluator: &mut E,
        world: &W,
        start: BlockPos,
        goal: BlockPos,
    ) -> Path
    where
        W: BlockSource + ?Sized,
        E: NodeEvaluator,
    {
        let search = Search::new(evaluator, start);
        let ev = &mut *search.evaluator;
        let limits = self.limits;

        let start_id = ev.start_node(world);
        let mut target = ev.goal(goal);
        self.open.reset();
        let mut nbuf = std::mem::take(&mut self.nbuf);

        {
            let nodes = ev.nodes_mut();
            let h = heuristic(nodes, start_id, &mut target);
            let n = &mut nodes[start_id];
            n.g = 0.0;
            n.h = h;
            n.f = h;
            if let Err(err) = self.open.insert(nodes, start_id) {
                log::warn!("seeding open set: {err}");
            }
        }

        let max_dist_sqr = limits.max_distance_from_start * limits.max_distance_from_start;
        let mut visited = 0;
        while visited < limits.max_visited_nodes {
            let Some(current) = self.open.pop(ev.nodes_mut()) else {
                break;
            };
            visited += 1;

            let nodes = ev.nodes_mut();
            nodes[current].closed = true;
            if nodes[current].manhattan_to(target.pos()) <= limits.reach_range {
                target.set_reached();
                break;
            }
            if nodes[current].distance_squared_to(&nodes[start_id]) >= max_dist_sqr {
                continue;
            }

            nbuf.clear();
            ev.neighbors(world, current, &mut nbuf);
            let nodes = ev.nodes_mut();
            for &neighbor in &nbuf {
                if nodes[neighbor].closed {
                    continue;
                }
                let dist = nodes[current].distance_to(&nodes[neighbor]);
                let walked = nodes[current].walked_distance + dist;
                let g = nodes[current].g + dist + nodes[neighbor].cost_malus;
                let open = nodes[neighbor].in_open_set();
                if walked >= limits.max_distance_from_start || (open && g >= nodes[neighbor].g) {
                    continue;
                }

                let h = heuristic(nodes, neighbor, &mut target) * FUDGING;
                let n = &mut nodes[neighbor];
                n.parent = Some(current);
                n.g = g;
                n.h = h;
                n.walked_distance = walked;
                let res = if open {
                    self.open.change_cost(nodes, neighbor, g + h)
                } else {
                    nodes[neighbor].f = g + h;
                    self.open.insert(nodes, neighbor)
                };
                if let Err(err) = res {
                    log::warn!("relaxing {}: {err}", nodes[neighbor].pos);
                }
            }
        }

        let nodes = ev.nodes();
        let waypoints = target
            .best_node()
            .map(|best| reconstruct(nodes, best))
            .unwrap_or_default();
        let path = Path::new(waypoints, goal, target.reached());
        log::debug!(
            "path {start} -> {goal}: visited {visited}, reached {}, {} waypoints, {} still open",
            path.reached(),
            path.len(),
            self.open.len(),
        );

        self.open.reset();
        self.nbuf = nbuf;
        path
    }
}

/// Search from `start` towards `goal` with the given limits.
///
/// See [`PathFinder::find_path`].
pub fn find_path<W, E>(
    evaluator: &mut E,
    world: &W,
    start: BlockPos,
    goal: BlockPos,
    max_visited_nodes: usize,
    max_distance_from_start: f64,
    reach_range: i32,
) -> Path
where
    W: BlockSource + ?Sized,
    E: NodeEvaluator,
{
    PathFinder::new(SearchLimits {
        max_visited_nodes,
        max_distance_from_start,
        reach_range,
    })
    .find_path(evaluator, world, start, goal)
}

/// A prepared evaluator, released again when dropped.
struct Search<'a, E: NodeEvaluator> {
    evaluator: &'a mut E,
}

impl<'a, E: NodeEvaluator> Search<'a, E> {
    fn new(evaluator: &'a mut E, start: BlockPos) -> Self {
        evaluator.prepare(start);
        Self { evaluator }
    }
}

impl<E: NodeEvaluator> Drop for Search<'_, E> {
    fn drop(&mut self) {
        self.evaluator.done();
    }
}

/// Euclidean distance from `id` to the target, recorded on the target.
fn heuristic(nodes: &NodeArena, id: NodeId, target: &mut Target) -> f64 {
    let h = crate::distance::euclidean(nodes[id].pos, target.pos());
    target.update_best(h, id);
    h
}

/// Nodes from just after the root up to `end`.
fn reconstruct(nodes: &NodeArena, end: NodeId) -> Vec<Node> {
    let mut out = Vec::new();
    let mut cur = end;
    while let Some(parent) = nodes[cur].parent {
        out.push(nodes[cur].clone());
        cur = parent;
    }
    out.reverse();
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{WalkConfig, WalkNodeEvaluator};
    use voxnav_core::{Block, VoxelGrid};

    /// Stone floor at y = -1 under x in -2..=2, z in -1..=len.
    fn corridor(len: i32) -> VoxelGrid {
        let mut g = VoxelGrid::new(BlockPos::new(-2, -1, -1), 5, 4, len + 2);
        g.fill(BlockPos::new(-2, -1, -1), BlockPos::new(2, -1, len), Block::Stone);
        g
    }

    /// A field with the goal at (0, 0, 6) standing on stone, ringed by lava.
    fn lava_island() -> VoxelGrid {
        let mut g = VoxelGrid::new(BlockPos::new(-4, -1, -4), 9, 4, 13);
        g.fill(BlockPos::new(-4, -1, -4), BlockPos::new(4, -1, 8), Block::Stone);
        for dx in -1..=1 {
            for dz in -1..=1 {
                if dx != 0 || dz != 0 {
                    g.set(BlockPos::new(dx, -1, 6 + dz), Block::Lava);
                }
            }
        }
        g
    }

    #[test]
    fn straight_corridor_is_reached() {
        let g = corridor(6);
        let mut ev = WalkNodeEvaluator::default();
        let goal = BlockPos::new(0, 0, 5);
        let path = find_path(&mut ev, &g, BlockPos::ZERO, goal, 256, 16.0, 0);
        assert!(path.reached());
        assert_eq!(path.len(), 5);
        let want: Vec<_> = (1..=5).map(|z| BlockPos::new(0, 0, z)).collect();
        assert_eq!(path.positions().collect::<Vec<_>>(), want);
        assert_eq!(path.distance_to_target(), 0.0);
        assert_eq!(path.target(), goal);
    }

    #[test]
    fn single_visit_budget() {
        let g = corridor(6);
        let mut ev = WalkNodeEvaluator::default();
        let path = find_path(&mut ev, &g, BlockPos::ZERO, BlockPos::new(0, 0, 5), 1, 16.0, 0);
        assert!(!path.reached());
        assert!(path.len() <= 1);
    }

    #[test]
    fn start_at_goal() {
        let g = corridor(2);
        let mut ev = WalkNodeEvaluator::default();
        let path = find_path(&mut ev, &g, BlockPos::ZERO, BlockPos::ZERO, 16, 16.0, 0);
        assert!(path.reached());
        assert!(path.is_empty());
    }

    #[test]
    fn walk_distance_limits_the_path() {
        let g = corridor(12);
        let mut ev = WalkNodeEvaluator::default();
        let path = find_path(&mut ev, &g, BlockPos::ZERO, BlockPos::new(0, 0, 10), 256, 3.0, 0);
        assert!(!path.reached());
        assert_eq!(path.end_node().map(|n| n.pos), Some(BlockPos::new(0, 0, 2)));
    }

    #[test]
    fn reach_range_stops_early() {
        let g = corridor(6);
        let mut ev = WalkNodeEvaluator::default();
        let goal = BlockPos::new(0, 0, 5);
        let path = find_path(&mut ev, &g, BlockPos::ZERO, goal, 256, 16.0, 2);
        assert!(path.reached());
        let end = path.end_node().unwrap();
        assert!(end.manhattan_to(goal) <= 2);
    }

    #[test]
    fn goal_ringed_by_lava_is_approached() {
        let g = lava_island();
        let mut ev = WalkNodeEvaluator::default();
        let goal = BlockPos::new(0, 0, 6);
        let path = find_path(&mut ev, &g, BlockPos::ZERO, goal, 512, 16.0, 0);
        assert!(!path.reached());
        assert_eq!(path.distance_to_target(), 2.0);
        let end = path.end_node().unwrap();
        assert_eq!(end.pos.y, 0);
        assert!(end.cost_malus >= 0.0);
    }

    #[test]
    fn searches_are_deterministic() {
        let mut g = lava_island();
        g.fill(BlockPos::new(-3, 0, 2), BlockPos::new(1, 1, 2), Block::Stone);
        let goal = BlockPos::new(3, 0, 7);
        let mut finder = PathFinder::new(SearchLimits {
            reach_range: 0,
            ..SearchLimits::default()
        });
        let mut ev = WalkNodeEvaluator::default();
        let first = finder.find_path(&mut ev, &g, BlockPos::ZERO, goal);
        let again = finder.find_path(&mut ev, &g, BlockPos::ZERO, goal);
        let fresh = find_path(
            &mut WalkNodeEvaluator::default(),
            &g,
            BlockPos::ZERO,
            goal,
            256,
            16.0,
            0,
        );
        assert!(!first.is_empty());
        assert_eq!(first, again);
        assert_eq!(first, fresh);
    }

    #[test]
    fn evaluator_is_released_after_search() {
        let g = corridor(6);
        let mut ev = WalkNodeEvaluator::default();
        find_path(&mut ev, &g, BlockPos::ZERO, BlockPos::new(0, 0, 5), 256, 16.0, 0);
        assert!(ev.nodes().is_empty());
    }

    /// Wraps an evaluator and checks, when the search ends, that no node's
    /// `g` changed after it was expanded.
    struct ClosedCostCheck {
        inner: WalkNodeEvaluator,
        expanded: Vec<(NodeId, f64)>,
        checked: usize,
        violations: usize,
    }

    impl NodeEvaluator for ClosedCostCheck {
        fn prepare(&mut self, start: BlockPos) {
            self.expanded.clear();
            self.inner.prepare(start);
        }

        fn done(&mut self) {
            for &(id, g) in &self.expanded {
                self.checked += 1;
                if self.inner.nodes()[id].g() < g {
                    self.violations += 1;
                }
            }
            self.inner.done();
        }

        fn start_node<W: BlockSource + ?Sized>(&mut self, world: &W) -> NodeId {
            self.inner.start_node(world)
        }

        fn goal(&mut self, pos: BlockPos) -> Target {
            self.inner.goal(pos)
        }

        fn neighbors<W: BlockSource + ?Sized>(
            &mut self,
            world: &W,
            node: NodeId,
            out: &mut Vec<NodeId>,
        ) {
            self.expanded.push((node, self.inner.nodes()[node].g()));
            self.inner.neighbors(world, node, out);
        }

        fn nodes(&self) -> &NodeArena {
            self.inner.nodes()
        }

        fn nodes_mut(&mut self) -> &mut NodeArena {
            self.inner.nodes_mut()
        }
    }

    #[test]
    fn closed_nodes_keep_their_cost() {
        let mut g = lava_island();
        g.fill(BlockPos::new(-2, 0, 3), BlockPos::new(2, 0, 3), Block::Honey);
        let mut ev = ClosedCostCheck {
            inner: WalkNodeEvaluator::new(WalkConfig::default()),
            expanded: Vec::new(),
            checked: 0,
            violations: 0,
        };
        find_path(&mut ev, &g, BlockPos::ZERO, BlockPos::new(0, 0, 8), 512, 16.0, 0);
        assert!(ev.checked > 10);
        assert_eq!(ev.violations, 0);
    }
}
