use super::{SearchResult, Tracer, dijkstra::weighted_search};
use crate::maze::{Coord, Maze, manhattan};

/// A* guided by the Manhattan distance to the goal.
///
/// Every step costs at least 1 and moves are axis-aligned, so the distance
/// never overestimates and the path found is as cheap as Dijkstra's.
pub(super) fn solve_astar(maze: &Maze, start: Coord, goal: Coord, tracer: Tracer) -> SearchResult {
    weighted_search(maze, start, goal, |coord| manhattan(coord, goal), tracer)
}
