use rand::{Rng, SeedableRng, rngs::StdRng};

mod braid;
mod prim;

pub use braid::{braid, reskin, sample_terrain};
pub use prim::randomized_prim;

use crate::{
    config::GeneratorConfig,
    maze::{Maze, Terrain},
};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Build a fresh terrain maze of the given size.
///
/// Carves a spanning tree, braids loops into it, re-skins every passage with
/// random terrain and finally forces the start and exit to grass, since the
/// carve alone does not promise the exit was reached.
pub fn generate_maze<R: Rng + ?Sized>(
    rows: u16,
    cols: u16,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Maze {
    let mut maze = Maze::new(rows, cols);
    randomized_prim(&mut maze, rng);
    let opened = braid(&mut maze, config.braid_probability, rng);
    reskin(&mut maze, &config.terrain_weights, rng);

    let (start, goal) = (maze.start(), maze.goal());
    maze[start] = Terrain::Grass;
    maze[goal] = Terrain::Grass;

    tracing::debug!(rows, cols, loops = opened, "generated maze");
    maze
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::{Coord, get_neighbors};
    use std::collections::{HashSet, VecDeque};

    /// Plain flood fill over passable cells, independent of any solver.
    fn reachable(maze: &Maze, from: Coord) -> HashSet<Coord> {
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(cell) = queue.pop_front() {
            for next in get_neighbors(cell, maze) {
                if maze[next].is_passable() && seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    #[test]
    fn test_exit_reachable_for_many_seeds() {
        let config = GeneratorConfig::default();
        for seed in 0..50 {
            let mut rng = get_rng(Some(seed));
            let maze = generate_maze(21, 21, &config, &mut rng);
            assert!(
                reachable(&maze, maze.start()).contains(&maze.goal()),
                "exit unreachable for seed {}:\n{}",
                seed, maze
            );
        }
    }

    #[test]
    fn test_border_sealed_for_many_seeds() {
        let config = GeneratorConfig::default();
        for seed in 0..50 {
            let mut rng = get_rng(Some(seed));
            let maze = generate_maze(21, 21, &config, &mut rng);
            for coord in maze.coords().filter(|&c| maze.is_boundary(c)) {
                assert_eq!(
                    maze[coord],
                    Terrain::Wall,
                    "seed {} leaks at {:?}",
                    seed, coord
                );
            }
        }
    }

    #[test]
    fn test_start_and_exit_are_grass() {
        let mut config = GeneratorConfig::default();
        // Everything water except the forced cells
        config.terrain_weights.grass = 0.0;
        config.terrain_weights.mud = 0.0;
        config.terrain_weights.water = 1.0;
        let mut rng = get_rng(Some(1));
        let maze = generate_maze(21, 21, &config, &mut rng);
        assert_eq!(maze[maze.start()], Terrain::Grass);
        assert_eq!(maze[maze.goal()], Terrain::Grass);
        assert!(
            maze.coords()
                .filter(|&c| c != maze.start() && c != maze.goal() && maze.is_passable(c))
                .all(|c| maze[c] == Terrain::Water)
        );
    }

    #[test]
    fn test_same_seed_same_maze() {
        let config = GeneratorConfig::default();
        let a = generate_maze(21, 21, &config, &mut get_rng(Some(42)));
        let b = generate_maze(21, 21, &config, &mut get_rng(Some(42)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_braiding_adds_loops() {
        let config = GeneratorConfig {
            braid_probability: 1.0,
            ..GeneratorConfig::default()
        };
        let perfect = GeneratorConfig {
            braid_probability: 0.0,
            ..GeneratorConfig::default()
        };
        let braided = generate_maze(21, 21, &config, &mut get_rng(Some(8)));
        let tree = generate_maze(21, 21, &perfect, &mut get_rng(Some(8)));
        let count = |m: &Maze| m.coords().filter(|&c| m.is_passable(c)).count();
        assert_eq!(count(&tree), 199);
        assert!(count(&braided) > count(&tree));
    }
}
