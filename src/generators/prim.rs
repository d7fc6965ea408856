use rand::Rng;

use crate::maze::{Coord, Maze, Terrain};

/// Direction of approach as a (row, col) step.
type Step = (i32, i32);

const STEPS: [Step; 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A wall that may be knocked through, remembered with the direction it was
/// reached from so the cell behind it can be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    wall: Coord,
    step: Step,
}

fn offset(coord: Coord, step: Step) -> Option<Coord> {
    let row = u16::try_from(coord.0 as i32 + step.0).ok()?;
    let col = u16::try_from(coord.1 as i32 + step.1).ok()?;
    Some((row, col))
}

/// Push the wall neighbors of a freshly carved cell onto the frontier.
fn add_candidates(cell: Coord, maze: &Maze, frontiers: &mut Vec<Candidate>) {
    for step in STEPS {
        let Some(wall) = offset(cell, step) else {
            continue;
        };
        if maze.is_in_bounds(wall) && maze[wall] == Terrain::Wall {
            frontiers.push(Candidate { wall, step });
        }
    }
}

/// Carve a spanning tree of passages over the odd coordinates, starting from
/// the maze start.
///
/// The whole maze is reset to walls first. Only cells strictly inside the
/// border are ever carved, so the outer ring stays sealed.
pub fn randomized_prim<R: Rng + ?Sized>(maze: &mut Maze, rng: &mut R) {
    // Initialize the maze with walls
    for coord in maze.coords() {
        maze[coord] = Terrain::Wall;
    }

    let start = maze.start();
    maze[start] = Terrain::Grass;

    let mut frontiers = Vec::new();
    add_candidates(start, maze, &mut frontiers);

    while !frontiers.is_empty() {
        // Uniform pick, not FIFO or LIFO
        let idx = rng.random_range(0..frontiers.len());
        let Candidate { wall, step } = frontiers.swap_remove(idx);

        let Some(beyond) = offset(wall, step) else {
            continue;
        };
        if maze.is_interior(beyond) && maze[beyond] == Terrain::Wall {
            maze[wall] = Terrain::Grass;
            maze[beyond] = Terrain::Grass;
            add_candidates(beyond, maze, &mut frontiers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_offset_underflow() {
        assert_eq!(offset((0, 3), (-1, 0)), None);
        assert_eq!(offset((2, 3), (0, 1)), Some((2, 4)));
    }

    #[test]
    fn test_carves_every_odd_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut maze = Maze::new(11, 15);
        randomized_prim(&mut maze, &mut rng);
        for row in (1..11).step_by(2) {
            for col in (1..15).step_by(2) {
                assert_eq!(
                    maze[(row, col)],
                    Terrain::Grass,
                    "({}, {}) not carved",
                    row, col
                );
            }
        }
        // Even/even cells are pillars and never carved
        for row in (2..10).step_by(2) {
            for col in (2..14).step_by(2) {
                assert_eq!(maze[(row, col)], Terrain::Wall);
            }
        }
    }

    #[test]
    fn test_spanning_tree_has_no_cycles() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut maze = Maze::new(21, 21);
        randomized_prim(&mut maze, &mut rng);
        // A tree over n odd cells has n - 1 connecting passages
        let rooms = 10 * 10;
        let passable = maze.cells().iter().filter(|c| c.is_passable()).count();
        assert_eq!(passable, rooms + rooms - 1);
    }

    #[test]
    fn test_border_stays_sealed() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut maze = Maze::new(9, 9);
        randomized_prim(&mut maze, &mut rng);
        assert!(
            maze.coords()
                .filter(|&c| maze.is_boundary(c))
                .all(|c| maze[c] == Terrain::Wall)
        );
    }
}
