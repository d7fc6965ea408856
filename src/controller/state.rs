use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::{Arc, mpsc::Sender},
};

use rand::{SeedableRng, rngs::StdRng};

use super::event::{Broadcaster, ProgressEvent};
use crate::{
    maze::{Coord, Maze},
    solvers::{SearchEvent, Solver},
};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Running(Solver),
}

impl RunState {
    pub fn is_running(&self) -> bool {
        matches!(self, RunState::Running(_))
    }
}

/// Outcome of the last run of one algorithm.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmStats {
    #[default]
    NotRun,
    Failed,
    Solved {
        steps: usize,
        cost: u32,
    },
}

impl fmt::Display for AlgorithmStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmStats::NotRun => write!(f, "-"),
            AlgorithmStats::Failed => write!(f, "failed"),
            AlgorithmStats::Solved { steps, cost } => write!(f, "{} steps, cost {}", steps, cost),
        }
    }
}

/// A consistent copy of the session, taken under a single lock.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub maze: Arc<Maze>,
    pub run_state: RunState,
    pub visited: HashSet<Coord>,
    pub head: Option<Coord>,
    pub active_paths: HashMap<Solver, Vec<Coord>>,
    pub stats: HashMap<Solver, AlgorithmStats>,
    pub status: String,
}

impl SessionSnapshot {
    pub fn stats(&self, solver: Solver) -> AlgorithmStats {
        self.stats.get(&solver).copied().unwrap_or_default()
    }
}

/// All mutable state of one maze session.
///
/// Every mutation publishes its event while the caller still holds the lock,
/// so subscribers see events in the same order the state changed.
pub(super) struct Session {
    pub maze: Arc<Maze>,
    pub run_state: RunState,
    pub visited: HashSet<Coord>,
    pub head: Option<Coord>,
    pub active_paths: HashMap<Solver, Vec<Coord>>,
    pub stats: HashMap<Solver, AlgorithmStats>,
    pub status: String,
    pub rng: StdRng,
    broadcaster: Broadcaster,
}

impl Session {
    pub fn new(maze: Maze, rng: StdRng) -> Self {
        Session {
            maze: Arc::new(maze),
            run_state: RunState::Idle,
            visited: HashSet::new(),
            head: None,
            active_paths: HashMap::new(),
            stats: HashMap::new(),
            status: "Map generated. Ready.".to_string(),
            rng,
            broadcaster: Broadcaster::default(),
        }
    }

    pub fn subscribe(&mut self, sender: Sender<ProgressEvent>) {
        self.broadcaster.add(sender);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            maze: Arc::clone(&self.maze),
            run_state: self.run_state,
            visited: self.visited.clone(),
            head: self.head,
            active_paths: self.active_paths.clone(),
            stats: self.stats.clone(),
            status: self.status.clone(),
        }
    }

    fn reset_progress(&mut self) {
        self.visited.clear();
        self.head = None;
        self.active_paths.clear();
        self.stats.clear();
    }

    /// Swap in a freshly generated maze. Callers check the session is idle.
    pub fn replace_maze(&mut self, maze: Maze) {
        debug_assert!(!self.run_state.is_running());
        self.maze = Arc::new(maze);
        self.reset_progress();
        self.status = "Map generated. Ready.".to_string();
        self.broadcaster.send(ProgressEvent::Generated);
    }

    /// Wipe paths, visited cells and statistics but keep the maze.
    pub fn clear(&mut self) {
        debug_assert!(!self.run_state.is_running());
        self.reset_progress();
        self.status = "Cleared.".to_string();
        self.broadcaster.send(ProgressEvent::Cleared);
    }

    /// The single admission point of a run. Returns the maze to search and an
    /// RNG for the run, or `None` if another run is in flight.
    pub fn try_admit(&mut self, solver: Solver) -> Option<(Arc<Maze>, StdRng)> {
        if self.run_state.is_running() {
            return None;
        }
        self.run_state = RunState::Running(solver);
        self.visited.clear();
        self.head = None;
        // Only this algorithm's old path goes, the others stay overlaid
        self.active_paths.remove(&solver);
        self.status = format!("Running {}...", solver);
        self.broadcaster.send(ProgressEvent::RunStarted(solver));
        let rng = StdRng::from_rng(&mut self.rng);
        Some((Arc::clone(&self.maze), rng))
    }

    pub fn record_search_event(&mut self, solver: Solver, event: SearchEvent) {
        match event {
            SearchEvent::Discovered(coord) => {
                self.visited.insert(coord);
            }
            SearchEvent::Expanded(coord) => {
                self.visited.insert(coord);
                self.head = Some(coord);
            }
        }
        self.broadcaster.send(ProgressEvent::Search { solver, event });
    }

    pub fn search_finished(&mut self, solver: Solver, found: bool) {
        self.head = None;
        if found {
            self.active_paths.insert(solver, Vec::new());
            self.status = format!("{} finished.", solver);
        }
        self.broadcaster.send(ProgressEvent::SearchFinished { solver, found });
    }

    pub fn reveal(&mut self, solver: Solver, coord: Coord) {
        self.active_paths.entry(solver).or_default().push(coord);
        self.broadcaster.send(ProgressEvent::PathRevealed { solver, coord });
    }

    /// Record the outcome and return to idle.
    pub fn finish_run(&mut self, solver: Solver, stats: AlgorithmStats) {
        self.stats.insert(solver, stats);
        self.run_state = RunState::Idle;
        if stats == AlgorithmStats::Failed {
            self.status = format!("{} failed!", solver);
        }
        self.broadcaster.send(ProgressEvent::RunFinished { solver, stats });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;

    fn session() -> (Session, std::sync::mpsc::Receiver<ProgressEvent>) {
        let mut session = Session::new(Maze::open(5, 5), get_rng(Some(0)));
        let (tx, rx) = std::sync::mpsc::channel();
        session.subscribe(tx);
        (session, rx)
    }

    #[test]
    fn test_admission_is_single_flight() {
        let (mut session, rx) = session();
        assert!(session.try_admit(Solver::Bfs).is_some());
        assert!(session.try_admit(Solver::Dfs).is_none());
        assert_eq!(session.run_state, RunState::Running(Solver::Bfs));
        assert_eq!(
            rx.try_iter().collect::<Vec<_>>(),
            vec![ProgressEvent::RunStarted(Solver::Bfs)]
        );
    }

    #[test]
    fn test_admission_replaces_only_own_path() {
        let (mut session, _rx) = session();
        session.active_paths.insert(Solver::Bfs, vec![(1, 1)]);
        session.active_paths.insert(Solver::Dfs, vec![(1, 1)]);
        session.visited.insert((2, 2));
        session.try_admit(Solver::Bfs);
        assert!(!session.active_paths.contains_key(&Solver::Bfs));
        assert!(session.active_paths.contains_key(&Solver::Dfs));
        assert!(session.visited.is_empty());
    }

    #[test]
    fn test_finish_returns_to_idle() {
        let (mut session, _rx) = session();
        session.try_admit(Solver::Dijkstra);
        session.search_finished(Solver::Dijkstra, false);
        session.finish_run(Solver::Dijkstra, AlgorithmStats::Failed);
        assert_eq!(session.run_state, RunState::Idle);
        assert_eq!(session.status, "Dijkstra failed!");
        assert!(!session.active_paths.contains_key(&Solver::Dijkstra));
        let snapshot = session.snapshot();
        assert_eq!(snapshot.stats(Solver::Dijkstra), AlgorithmStats::Failed);
        assert_eq!(snapshot.stats(Solver::Bfs), AlgorithmStats::NotRun);
    }

    #[test]
    fn test_stats_display() {
        assert_eq!(AlgorithmStats::NotRun.to_string(), "-");
        assert_eq!(
            AlgorithmStats::Solved { steps: 4, cost: 7 }.to_string(),
            "4 steps, cost 7"
        );
    }
}
