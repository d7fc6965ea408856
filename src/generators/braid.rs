use rand::Rng;

use crate::{
    config::TerrainWeights,
    maze::{Maze, Terrain},
};

/// Knock through walls that separate two passages, turning the perfect maze
/// into one with loops.
///
/// Walks the interior in row-major order and sees earlier knock-throughs, so a
/// wall opened on one row can qualify a wall below it. A random draw is only
/// taken for walls that qualify.
/// Returns the number of walls opened.
pub fn braid<R: Rng + ?Sized>(maze: &mut Maze, probability: f64, rng: &mut R) -> usize {
    let mut opened = 0;
    for row in 1..maze.rows() - 1 {
        for col in 1..maze.cols() - 1 {
            if maze[(row, col)] != Terrain::Wall {
                continue;
            }
            let vertical =
                maze[(row - 1, col)].is_passable() && maze[(row + 1, col)].is_passable();
            let horizontal =
                maze[(row, col - 1)].is_passable() && maze[(row, col + 1)].is_passable();
            if (vertical || horizontal) && rng.random::<f64>() < probability {
                maze[(row, col)] = Terrain::Grass;
                opened += 1;
            }
        }
    }
    opened
}

/// Pick a passable terrain from a uniform draw in `[0, 1)`.
pub fn sample_terrain(weights: &TerrainWeights, draw: f64) -> Terrain {
    let total = weights.total();
    let grass = weights.grass / total;
    let mud = grass + weights.mud / total;
    if draw < grass {
        Terrain::Grass
    } else if draw < mud {
        Terrain::Mud
    } else {
        Terrain::Water
    }
}

/// Replace every passable cell with an independently sampled terrain.
pub fn reskin<R: Rng + ?Sized>(maze: &mut Maze, weights: &TerrainWeights, rng: &mut R) {
    for coord in maze.coords() {
        if maze[coord].is_passable() {
            maze[coord] = sample_terrain(weights, rng.random::<f64>());
        }
    }
}
