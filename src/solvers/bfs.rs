use std::collections::{HashMap, HashSet, VecDeque};

use super::{SearchResult, Tracer, reconstruct_path};
use crate::maze::{Coord, Maze};

/// Fewest-steps search. Terrain cost is ignored while exploring and only used
/// to price the path that was found.
pub(super) fn solve_bfs(
    maze: &Maze,
    start: Coord,
    goal: Coord,
    mut tracer: Tracer,
) -> SearchResult {
    let mut queue = VecDeque::from([start]);
    // Cells are marked the moment they are queued so none is queued twice
    let mut visited = HashSet::from([start]);
    let mut parents = HashMap::new();
    tracer.discovered(start);

    while let Some(current) = queue.pop_front() {
        tracer.expanded(current);
        if current == goal {
            let path = reconstruct_path(maze, &parents, start, goal);
            return tracer.finish(Some(path));
        }

        for neighbor in maze.passable_neighbors(current) {
            if visited.insert(neighbor) {
                tracer.discovered(neighbor);
                parents.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    tracer.finish(None)
}
