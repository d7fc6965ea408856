use std::sync::mpsc::Sender;

use super::state::AlgorithmStats;
use crate::{
    maze::Coord,
    solvers::{SearchEvent, Solver},
};

/// Everything an observer needs to follow the session as it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A new maze replaced the old one and all run state was reset
    Generated,
    /// Paths, visited cells and statistics were wiped
    Cleared,
    /// A run was admitted
    RunStarted(Solver),
    /// The running search discovered or expanded a cell
    Search {
        solver: Solver,
        event: SearchEvent,
    },
    /// The search is over; a reveal phase follows only if `found`
    SearchFinished {
        solver: Solver,
        found: bool,
    },
    /// The next point of the found path was appended to the active path
    PathRevealed {
        solver: Solver,
        coord: Coord,
    },
    /// The run is over and the session is idle again
    RunFinished {
        solver: Solver,
        stats: AlgorithmStats,
    },
}

/// Fans events out to every live subscriber.
#[derive(Debug, Default)]
pub(super) struct Broadcaster {
    senders: Vec<Sender<ProgressEvent>>,
}

impl Broadcaster {
    pub fn add(&mut self, sender: Sender<ProgressEvent>) {
        self.senders.push(sender);
    }

    /// Send to every subscriber, forgetting the ones whose receiver is gone.
    pub fn send(&mut self, event: ProgressEvent) {
        self.senders.retain(|sender| sender.send(event).is_ok());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.senders.len()
    }
}
