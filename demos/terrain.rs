//! Walk across seeded random terrain and print the route.
//!
//! Run: cargo run --bin terrain [seed]
//!
//! Set `RUST_LOG=debug` to see the search summary.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voxnav_core::{Block, BlockPos, VoxelGrid};
use voxnav_paths::{PathFinder, SearchLimits, WalkConfig, WalkNodeEvaluator};

const SIZE: i32 = 32;
const HEIGHT: i32 = 8;
const TILE: i32 = 4;

/// Rolling stone hills with water pools, lava pits and a few fence runs.
fn generate(rng: &mut impl Rng) -> VoxelGrid {
    let mut grid = VoxelGrid::new(BlockPos::ZERO, SIZE, HEIGHT, SIZE);
    let tiles = SIZE / TILE;
    let heights: Vec<i32> = (0..tiles * tiles).map(|_| rng.random_range(1..=3)).collect();
    for x in 0..SIZE {
        for z in 0..SIZE {
            let top = heights[((x / TILE) * tiles + z / TILE) as usize];
            grid.fill(BlockPos::new(x, 0, z), BlockPos::new(x, top - 1, z), Block::Stone);
        }
    }

    for _ in 0..6 {
        let (x, z) = (rng.random_range(2..SIZE - 4), rng.random_range(2..SIZE - 4));
        let liquid = if rng.random_bool(0.3) {
            Block::Lava
        } else {
            Block::WATER
        };
        for (dx, dz) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
            let p = surface(&grid, x + dx, z + dz).down();
            grid.set(p, liquid);
        }
    }

    for _ in 0..4 {
        let (x, z) = (rng.random_range(4..SIZE - 8), rng.random_range(4..SIZE - 4));
        for dx in 0..rng.random_range(3..8) {
            let p = surface(&grid, x + dx, z);
            grid.set(p, Block::Fence);
        }
    }
    grid
}

/// First non-solid voxel of the column, scanning down from the top.
fn surface(grid: &VoxelGrid, x: i32, z: i32) -> BlockPos {
    let mut y = HEIGHT - 1;
    while y > 0 && grid.at(BlockPos::new(x, y - 1, z)) == Block::Air {
        y -= 1;
    }
    BlockPos::new(x, y, z)
}

/// Top-down view: the highest block of each column, path cells as `o`.
fn render(grid: &VoxelGrid, route: &[BlockPos], start: BlockPos, goal: BlockPos) -> String {
    let mut s = String::new();
    for z in 0..SIZE {
        for x in 0..SIZE {
            let ch = if (x, z) == (start.x, start.z) {
                '@'
            } else if (x, z) == (goal.x, goal.z) {
                'X'
            } else if route.iter().any(|p| (p.x, p.z) == (x, z)) {
                'o'
            } else {
                let top = surface(grid, x, z);
                let below = grid.at(top.down());
                match grid.at(top) {
                    Block::Air => below.to_char(),
                    b => b.to_char(),
                }
            };
            s.push(ch);
        }
        s.push('\n');
    }
    s
}

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(7);
    let mut rng = StdRng::seed_from_u64(seed);
    let grid = generate(&mut rng);

    let start = surface(&grid, 1, 1);
    let goal = surface(&grid, SIZE - 2, SIZE - 2);
    let config = WalkConfig {
        can_open_doors: true,
        ..WalkConfig::default()
    };
    let mut evaluator = match WalkNodeEvaluator::try_new(config) {
        Ok(ev) => ev,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    evaluator.set_position(start.bottom_center());

    let mut finder = PathFinder::new(SearchLimits {
        max_visited_nodes: 4096,
        max_distance_from_start: 64.0,
        reach_range: 0,
    });
    let path = finder.find_path(&mut evaluator, &grid, start, goal);
    log::info!("seed {seed}: {} waypoints", path.len());

    let route: Vec<BlockPos> = path.positions().collect();
    print!("{}", render(&grid, &route, start, goal));
    if path.reached() {
        println!("reached {goal} in {} steps", path.len());
    } else {
        println!(
            "gave up {:.1} blocks short of {goal}",
            path.distance_to_target()
        );
    }
}
