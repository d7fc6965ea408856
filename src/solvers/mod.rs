use std::collections::HashMap;

use rand::Rng;

mod astar;
mod bfs;
mod dfs;
mod dijkstra;

use astar::solve_astar;
use bfs::solve_bfs;
use dfs::solve_dfs;
use dijkstra::solve_dijkstra;

use crate::maze::{Coord, Maze};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Solver {
    Bfs,
    Dfs,
    Dijkstra,
    AStar,
}

impl Solver {
    pub const ALL: [Solver; 4] = [Solver::Bfs, Solver::Dfs, Solver::Dijkstra, Solver::AStar];

    /// Short name used in status lines and logs.
    pub fn name(self) -> &'static str {
        match self {
            Solver::Bfs => "BFS",
            Solver::Dfs => "DFS",
            Solver::Dijkstra => "Dijkstra",
            Solver::AStar => "A*",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Solver::Bfs => "Breadth-First Search (BFS)",
            Solver::Dfs => "Depth-First Search (DFS)",
            Solver::Dijkstra => "Dijkstra's Algorithm",
            Solver::AStar => "A* Search",
        }
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Progress of a running search, pushed as it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEvent {
    /// The cell joined the visited set without being expanded yet
    Discovered(Coord),
    /// The cell is the search's current head
    Expanded(Coord),
}

/// A path from start to exit with its terrain cost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundPath {
    /// Cells from start to exit, both included
    pub cells: Vec<Coord>,
    /// Sum of the cost of every cell stepped onto, the start excluded
    pub cost: u32,
}

impl FoundPath {
    pub fn steps(&self) -> usize {
        self.cells.len() - 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the exit was never reached
    pub path: Option<FoundPath>,
    /// Cells in the order they were expanded
    pub trace: Vec<Coord>,
}

impl SearchResult {
    pub fn found(&self) -> bool {
        self.path.is_some()
    }
}

/// Records the expansion order and forwards every event to the caller.
struct Tracer<'a> {
    trace: Vec<Coord>,
    on_event: &'a mut dyn FnMut(SearchEvent),
}

impl<'a> Tracer<'a> {
    fn new(on_event: &'a mut dyn FnMut(SearchEvent)) -> Self {
        Tracer {
            trace: Vec::new(),
            on_event,
        }
    }

    fn discovered(&mut self, coord: Coord) {
        (self.on_event)(SearchEvent::Discovered(coord));
    }

    fn expanded(&mut self, coord: Coord) {
        self.trace.push(coord);
        (self.on_event)(SearchEvent::Expanded(coord));
    }

    fn finish(self, path: Option<FoundPath>) -> SearchResult {
        SearchResult {
            path,
            trace: self.trace,
        }
    }
}

/// Frontier entry of the weighted searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TrackedCell {
    /// Coordinates of the cell in the maze
    coord: Coord,
    /// Cost to reach this cell from the start
    traveling_cost: u32,
    /// Estimated cost to reach the goal from this cell (zero for Dijkstra)
    heuristic_cost: u32,
}

impl TrackedCell {
    fn priority(&self) -> u32 {
        self.traveling_cost + self.heuristic_cost
    }
}

impl Ord for TrackedCell {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Ties prefer cells estimated closer to the goal, then a fixed coordinate order
        self.priority()
            .cmp(&other.priority())
            .then_with(|| self.heuristic_cost.cmp(&other.heuristic_cost))
            .then_with(|| self.coord.cmp(&other.coord))
    }
}

impl PartialOrd for TrackedCell {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Walk the predecessor links back from `goal` to `start` and price the path.
///
/// Panics if the links do not lead back to `start` or the path crosses a wall:
/// either means the search that built them is broken.
fn reconstruct_path(
    maze: &Maze,
    parents: &HashMap<Coord, Coord>,
    start: Coord,
    goal: Coord,
) -> FoundPath {
    let mut cells = vec![goal];
    let mut current = goal;
    while current != start {
        current = match parents.get(&current) {
            Some(&parent) => parent,
            None => panic!(
                "predecessor chain broke at {:?} before reaching start {:?}",
                current, start
            ),
        };
        cells.push(current);
        assert!(
            cells.len() <= maze.len(),
            "predecessor chain contains a cycle"
        );
    }
    cells.reverse();

    let cost = cells
        .iter()
        .skip(1)
        .map(|&cell| {
            assert!(
                maze[cell].is_passable(),
                "path steps onto a wall at {:?}",
                cell
            );
            maze.cost(cell)
        })
        .sum();
    FoundPath { cells, cost }
}

/// Run `solver` from the maze start to the maze exit.
///
/// `on_event` sees every discovery and expansion as it happens. `rng` is only
/// drawn from by DFS, which shuffles the order it pushes neighbors.
pub fn solve_maze<R: Rng + ?Sized>(
    maze: &Maze,
    solver: Solver,
    rng: &mut R,
    on_event: &mut dyn FnMut(SearchEvent),
) -> SearchResult {
    let (start, goal) = (maze.start(), maze.goal());
    let tracer = Tracer::new(on_event);
    match solver {
        Solver::Bfs => solve_bfs(maze, start, goal, tracer),
        Solver::Dfs => solve_dfs(maze, start, goal, rng, tracer),
        Solver::Dijkstra => solve_dijkstra(maze, start, goal, tracer),
        Solver::AStar => solve_astar(maze, start, goal, tracer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::GeneratorConfig, generators::{generate_maze, get_rng}, maze::Terrain};
    use std::collections::VecDeque;

    fn solve(maze: &Maze, solver: Solver, seed: u64) -> SearchResult {
        let mut rng = get_rng(Some(seed));
        solve_maze(maze, solver, &mut rng, &mut |_| {})
    }

    /// Fewest moves from start to exit, by a plain BFS over distances.
    fn brute_force_steps(maze: &Maze) -> Option<usize> {
        let mut distance = HashMap::from([(maze.start(), 0usize)]);
        let mut queue = VecDeque::from([maze.start()]);
        while let Some(cell) = queue.pop_front() {
            let d = distance[&cell];
            for next in maze.passable_neighbors(cell) {
                if !distance.contains_key(&next) {
                    distance.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        distance.get(&maze.goal()).copied()
    }

    fn assert_valid_path(maze: &Maze, path: &FoundPath) {
        assert_eq!(path.cells.first(), Some(&maze.start()));
        assert_eq!(path.cells.last(), Some(&maze.goal()));
        for pair in path.cells.windows(2) {
            assert_eq!(
                crate::maze::manhattan(pair[0], pair[1]),
                1,
                "diagonal or jump in path"
            );
            assert!(maze.is_passable(pair[1]));
        }
        let expected: u32 = path.cells[1..].iter().map(|&c| maze.cost(c)).sum();
        assert_eq!(path.cost, expected);
    }

    #[test]
    fn test_open_grid_all_solvers_take_four_steps() {
        let maze: Maze = "
            #####
            #.~.#
            #w.~#
            #..w#
            #####
        "
        .parse()
        .unwrap();
        let mut weighted_costs = Vec::new();
        for solver in Solver::ALL {
            let result = solve(&maze, solver, 1);
            let path = result
                .path
                .as_ref()
                .unwrap_or_else(|| panic!("{} found nothing", solver));
            assert_eq!(path.steps(), 4, "{} took a detour", solver);
            assert_valid_path(&maze, path);
            if matches!(solver, Solver::Dijkstra | Solver::AStar) {
                weighted_costs.push(path.cost);
            }
        }
        assert_eq!(weighted_costs[0], weighted_costs[1]);
        // right, down, down, right: 5 + 1 + 1 + 10
        assert_eq!(weighted_costs[0], 17);
    }

    #[test]
    fn test_generated_mazes_properties() {
        let config = GeneratorConfig::default();
        for seed in 0..30 {
            let maze = generate_maze(21, 21, &config, &mut get_rng(Some(seed)));
            let shortest = brute_force_steps(&maze).expect("generated maze has a path");

            let bfs = solve(&maze, Solver::Bfs, seed);
            let bfs_path = bfs.path.as_ref().unwrap();
            assert_eq!(bfs_path.steps(), shortest, "seed {}", seed);
            assert_valid_path(&maze, bfs_path);

            let dfs = solve(&maze, Solver::Dfs, seed);
            let dfs_path = dfs.path.as_ref().unwrap();
            assert!(dfs_path.steps() >= shortest);
            assert_valid_path(&maze, dfs_path);

            let dijkstra = solve(&maze, Solver::Dijkstra, seed);
            let astar = solve(&maze, Solver::AStar, seed);
            let (d, a) = (dijkstra.path.unwrap(), astar.path.unwrap());
            assert_valid_path(&maze, &d);
            assert_valid_path(&maze, &a);
            assert_eq!(d.cost, a.cost, "seed {}", seed);
            assert!(d.cost <= bfs_path.cost && d.cost <= dfs_path.cost);
            // The heuristic only ever narrows the search
            assert!(astar.trace.len() <= dijkstra.trace.len());
        }
    }

    #[test]
    fn test_unreachable_exit_reports_not_found() {
        let maze: Maze = "
            #####
            #..##
            ###.#
            #####
        "
        .parse()
        .unwrap();
        assert_eq!(maze.goal(), (2, 3));
        for solver in Solver::ALL {
            let result = solve(&maze, solver, 0);
            assert!(!result.found(), "{} walked through a wall", solver);
            assert!(!result.trace.is_empty());
            assert!(!result.trace.contains(&(2, 3)));
        }
    }

    #[test]
    fn test_bfs_prefers_steps_dijkstra_prefers_cost() {
        // Two six-step routes, the top one through water
        let maze: Maze = "
            #######
            #.www.#
            #.###.#
            #.....#
            #######
        "
        .parse()
        .unwrap();
        let bfs = solve(&maze, Solver::Bfs, 0).path.unwrap();
        let dijkstra = solve(&maze, Solver::Dijkstra, 0).path.unwrap();
        assert_eq!(bfs.steps(), 6);
        assert_eq!(dijkstra.cost, 6);
        assert!(dijkstra.cells.contains(&(3, 1)));
        assert!(bfs.cost >= dijkstra.cost);
    }

    #[test]
    fn test_events_are_chronological() {
        let maze = Maze::open(7, 7);
        for solver in Solver::ALL {
            let mut events = Vec::new();
            let mut rng = get_rng(Some(2));
            let result = solve_maze(&maze, solver, &mut rng, &mut |e| events.push(e));
            let expanded = events
                .iter()
                .filter_map(|e| match e {
                    SearchEvent::Expanded(c) => Some(*c),
                    SearchEvent::Discovered(_) => None,
                })
                .collect::<Vec<_>>();
            assert_eq!(expanded, result.trace);
            assert_eq!(result.trace.first(), Some(&maze.start()));
            assert_eq!(result.trace.last(), Some(&maze.goal()));
            // BFS and DFS discover a cell before expanding it
            if matches!(solver, Solver::Bfs | Solver::Dfs) {
                for (i, event) in events.iter().enumerate() {
                    if let SearchEvent::Expanded(c) = event {
                        assert!(events[..i].contains(&SearchEvent::Discovered(*c)));
                    }
                }
            }
        }
    }

    #[test]
    fn test_start_equal_to_exit() {
        let mut maze = Maze::new(3, 3);
        maze[(1, 1)] = Terrain::Grass;
        for solver in Solver::ALL {
            let path = solve(&maze, solver, 0).path.unwrap();
            assert_eq!(path.cells, vec![(1, 1)]);
            assert_eq!((path.steps(), path.cost), (0, 0));
        }
    }

    #[test]
    #[should_panic(expected = "predecessor chain broke")]
    fn test_broken_chain_panics() {
        let maze = Maze::open(5, 5);
        let parents = HashMap::from([((3, 3), (3, 2))]);
        reconstruct_path(&maze, &parents, (1, 1), (3, 3));
    }

    #[test]
    fn test_tracked_cell_ordering() {
        let a = TrackedCell {
            coord: (1, 1),
            traveling_cost: 3,
            heuristic_cost: 2,
        };
        let b = TrackedCell {
            coord: (1, 2),
            traveling_cost: 4,
            heuristic_cost: 1,
        };
        // Equal priority, smaller heuristic wins
        assert!(b < a);
    }
}
