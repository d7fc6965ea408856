use std::collections::{HashMap, HashSet};

use rand::{Rng, seq::SliceRandom};

use super::{SearchResult, Tracer, reconstruct_path};
use crate::maze::{Coord, Maze};

/// Depth-first search with the unvisited neighbors of every cell pushed in a
/// random order, so repeated runs wander differently.
pub(super) fn solve_dfs<R: Rng + ?Sized>(
    maze: &Maze,
    start: Coord,
    goal: Coord,
    rng: &mut R,
    mut tracer: Tracer,
) -> SearchResult {
    let mut stack = vec![start];
    let mut visited = HashSet::from([start]);
    let mut parents = HashMap::new();
    tracer.discovered(start);

    while let Some(current) = stack.pop() {
        tracer.expanded(current);
        if current == goal {
            let path = reconstruct_path(maze, &parents, start, goal);
            return tracer.finish(Some(path));
        }

        let mut neighbors = maze
            .passable_neighbors(current)
            .filter(|c| !visited.contains(c))
            .collect::<Vec<_>>();
        neighbors.shuffle(rng);

        for neighbor in neighbors {
            visited.insert(neighbor);
            tracer.discovered(neighbor);
            parents.insert(neighbor, current);
            stack.push(neighbor);
        }
    }

    tracer.finish(None)
}
