//! Run lifecycle of a maze session.
//!
//! A [`RunController`] owns the current maze and lets exactly one search run
//! at a time. Each admitted run happens on its own thread and reports its
//! progress both by updating the session state, readable through the
//! accessors, and by sending [`ProgressEvent`]s to every subscriber.

mod event;
mod state;

use std::{
    collections::{HashMap, HashSet},
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        mpsc::{Receiver, channel},
    },
    thread::JoinHandle,
    time::Duration,
};

use rand::rngs::StdRng;

pub use event::ProgressEvent;
use state::Session;
pub use state::{AlgorithmStats, RunState, SessionSnapshot};

use crate::{
    config::{ConfigError, MazeConfig, Pacing},
    generators::{generate_maze, get_rng},
    maze::{Coord, Maze},
    solvers::{SearchEvent, Solver, solve_maze},
};

type SharedSession = Arc<Mutex<Session>>;

/// Lock the session, recovering the state if a run thread panicked with the
/// lock held. Every mutation leaves the session consistent, so the data is
/// still usable.
fn lock(session: &Mutex<Session>) -> MutexGuard<'_, Session> {
    session.lock().unwrap_or_else(PoisonError::into_inner)
}

fn pause(delay: Duration) {
    if !delay.is_zero() {
        std::thread::sleep(delay);
    }
}

pub struct RunController {
    config: MazeConfig,
    session: SharedSession,
    /// Handle of the most recently spawned run
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl RunController {
    /// Validate the configuration and generate the first maze.
    pub fn new(config: MazeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = get_rng(config.seed);
        let maze = generate_maze(config.rows, config.cols, &config.generator, &mut rng);
        tracing::info!(
            rows = config.rows,
            cols = config.cols,
            seed = ?config.seed,
            "session created"
        );
        Ok(Self {
            session: Arc::new(Mutex::new(Session::new(maze, rng))),
            config,
            worker: Mutex::new(None),
        })
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// Register a new observer. Events sent before this call are not replayed.
    pub fn subscribe(&self) -> Receiver<ProgressEvent> {
        let (tx, rx) = channel();
        lock(&self.session).subscribe(tx);
        rx
    }

    /// Replace the maze with a freshly generated one and reset every run
    /// artifact. Ignored while a run is in flight; returns whether it happened.
    pub fn generate(&self) -> bool {
        let mut session = lock(&self.session);
        if let RunState::Running(solver) = session.run_state {
            tracing::debug!(%solver, "generate ignored, run in flight");
            return false;
        }
        let maze = generate_maze(
            self.config.rows,
            self.config.cols,
            &self.config.generator,
            &mut session.rng,
        );
        session.replace_maze(maze);
        tracing::info!("maze regenerated");
        true
    }

    /// Wipe active paths, visited cells and statistics, keeping the maze.
    /// Ignored while a run is in flight; returns whether it happened.
    pub fn clear(&self) -> bool {
        let mut session = lock(&self.session);
        if let RunState::Running(solver) = session.run_state {
            tracing::debug!(%solver, "clear ignored, run in flight");
            return false;
        }
        session.clear();
        tracing::info!("session cleared");
        true
    }

    /// Start `solver` on a background thread.
    ///
    /// Ignored if a run is already in flight: the request is dropped, not
    /// queued. Returns whether the run was admitted.
    pub fn start(&self, solver: Solver) -> bool {
        // Held across admission and spawn so handles are stored in admission order
        let mut worker = self.worker.lock().unwrap_or_else(PoisonError::into_inner);
        let admitted = lock(&self.session).try_admit(solver);
        let Some((maze, rng)) = admitted else {
            tracing::debug!(%solver, "start ignored, run in flight");
            return false;
        };
        tracing::info!(%solver, "run started");

        let session = Arc::clone(&self.session);
        let pacing = self.config.pacing;
        let handle = std::thread::spawn(move || run(session, maze, solver, pacing, rng));
        // A previous handle belongs to a run that already returned to idle
        *worker = Some(handle);
        true
    }

    /// Block until the most recently started run has finished.
    pub fn join(&self) {
        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                tracing::error!("run thread panicked");
            }
        }
    }

    pub fn run_state(&self) -> RunState {
        lock(&self.session).run_state
    }

    pub fn maze(&self) -> Arc<Maze> {
        Arc::clone(&lock(&self.session).maze)
    }

    pub fn visited(&self) -> HashSet<Coord> {
        lock(&self.session).visited.clone()
    }

    pub fn head(&self) -> Option<Coord> {
        lock(&self.session).head
    }

    pub fn active_paths(&self) -> HashMap<Solver, Vec<Coord>> {
        lock(&self.session).active_paths.clone()
    }

    pub fn stats(&self, solver: Solver) -> AlgorithmStats {
        lock(&self.session)
            .stats
            .get(&solver)
            .copied()
            .unwrap_or_default()
    }

    pub fn status(&self) -> String {
        lock(&self.session).status.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        lock(&self.session).snapshot()
    }

    #[cfg(test)]
    fn install_maze(&self, maze: Maze) {
        lock(&self.session).replace_maze(maze);
    }
}

/// Puts the session back to idle if a run thread unwinds, so one broken run
/// does not lock out every later command.
struct RunGuard {
    session: SharedSession,
    solver: Solver,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            tracing::error!(solver = %self.solver, "run panicked, marking it failed");
            lock(&self.session).finish_run(self.solver, AlgorithmStats::Failed);
        }
    }
}

/// Body of a run thread: search, then reveal the path point by point.
fn run(session: SharedSession, maze: Arc<Maze>, solver: Solver, pacing: Pacing, mut rng: StdRng) {
    let _guard = RunGuard {
        session: Arc::clone(&session),
        solver,
    };

    let result = solve_maze(&maze, solver, &mut rng, &mut |event| {
        lock(&session).record_search_event(solver, event);
        if let SearchEvent::Expanded(_) = event {
            pause(pacing.scan);
        }
    });
    tracing::debug!(%solver, expanded = result.trace.len(), found = result.found(), "search done");

    let Some(path) = result.path else {
        let mut session = lock(&session);
        session.search_finished(solver, false);
        session.finish_run(solver, AlgorithmStats::Failed);
        tracing::info!(%solver, "run failed, exit unreachable");
        return;
    };

    lock(&session).search_finished(solver, true);
    for &coord in &path.cells {
        lock(&session).reveal(solver, coord);
        pause(pacing.reveal);
    }

    let stats = AlgorithmStats::Solved {
        steps: path.steps(),
        cost: path.cost,
    };
    lock(&session).finish_run(solver, stats);
    tracing::info!(%solver, steps = path.steps(), cost = path.cost, "run finished");
}
