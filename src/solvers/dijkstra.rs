use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashMap},
};

use super::{SearchResult, TrackedCell, Tracer, reconstruct_path};
use crate::maze::{Coord, Maze};

/// Cheapest-path search over terrain costs.
pub(super) fn solve_dijkstra(
    maze: &Maze,
    start: Coord,
    goal: Coord,
    tracer: Tracer,
) -> SearchResult {
    weighted_search(maze, start, goal, |_| 0, tracer)
}

/// Best-first search shared by Dijkstra and A*.
///
/// The frontier is ordered by cost-to-reach plus `heuristic`, while relaxation
/// compares cost-to-reach alone. There is no decrease-key: improved cells are
/// pushed again and outdated entries are skipped when popped.
pub(super) fn weighted_search(
    maze: &Maze,
    start: Coord,
    goal: Coord,
    heuristic: impl Fn(Coord) -> u32,
    mut tracer: Tracer,
) -> SearchResult {
    // Best known cost-to-reach per cell
    let mut dist = vec![u32::MAX; maze.len()];
    let mut parents = HashMap::new();

    // Using Reverse to turn the max-heap into a min-heap
    let mut pq: BinaryHeap<Reverse<TrackedCell>> = BinaryHeap::new();
    dist[maze.index_of(start)] = 0;
    pq.push(Reverse(TrackedCell {
        coord: start,
        traveling_cost: 0,
        heuristic_cost: heuristic(start),
    }));

    while let Some(Reverse(current)) = pq.pop() {
        if current.traveling_cost > dist[maze.index_of(current.coord)] {
            continue;
        }
        tracer.expanded(current.coord);
        if current.coord == goal {
            let path = reconstruct_path(maze, &parents, start, goal);
            return tracer.finish(Some(path));
        }

        for neighbor in maze.passable_neighbors(current.coord) {
            let new_cost = current.traveling_cost + maze.cost(neighbor);
            let best = &mut dist[maze.index_of(neighbor)];
            if new_cost < *best {
                *best = new_cost;
                parents.insert(neighbor, current.coord);
                pq.push(Reverse(TrackedCell {
                    coord: neighbor,
                    traveling_cost: new_cost,
                    heuristic_cost: heuristic(neighbor),
                }));
            }
        }
    }

    tracer.finish(None)
}
