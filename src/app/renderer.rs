use std::{
    collections::HashMap,
    io::{Stdout, Write},
};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Attribute, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    config::MazeConfig,
    controller::{AlgorithmStats, RunState, SessionSnapshot},
    maze::{Coord, Terrain},
    solvers::Solver,
};

/// Overlay color of each algorithm's path.
pub fn solver_color(solver: Solver) -> Color {
    match solver {
        Solver::Bfs => Color::Rgb {
            r: 0,
            g: 255,
            b: 255,
        },
        Solver::Dfs => Color::Rgb {
            r: 255,
            g: 200,
            b: 0,
        },
        Solver::Dijkstra => Color::Rgb {
            r: 255,
            g: 255,
            b: 255,
        },
        Solver::AStar => Color::Rgb {
            r: 255,
            g: 50,
            b: 80,
        },
    }
}

/// Size and seed of the session, shown in front of the key help.
pub fn session_label(config: &MazeConfig) -> String {
    match config.seed {
        Some(seed) => format!("{}x{} seed {}", config.rows, config.cols, seed),
        None => format!("{}x{}", config.rows, config.cols),
    }
}

pub struct Renderer {
    /// Standard output handle to write to the terminal
    stdout: Stdout,
    /// Session description printed on the help row
    label: String,
}

impl Renderer {
    /// Rows printed under the maze: status, one per algorithm, controls
    pub const NUM_INFO_ROWS: u16 = 2 + Solver::ALL.len() as u16;

    pub fn new(label: String) -> Self {
        Self {
            stdout: std::io::stdout(),
            label,
        }
    }

    /// Pick the glyph of a single cell, most specific layer first.
    fn cell_glyph(
        coord: Coord,
        terrain: Terrain,
        snapshot: &SessionSnapshot,
        path_owner: &HashMap<Coord, Solver>,
    ) -> StyledContent<&'static str> {
        let maze = &snapshot.maze;
        if snapshot.head == Some(coord) {
            return "@@"
                .with(Color::Magenta)
                .on(terrain.color())
                .attribute(Attribute::Bold);
        }
        if coord == maze.start() {
            return "S ".with(Color::Black).on(Color::Green);
        }
        if coord == maze.goal() {
            return "E ".with(Color::Black).on(Color::Red);
        }
        if let Some(&solver) = path_owner.get(&coord) {
            return "██".with(solver_color(solver));
        }
        if snapshot.visited.contains(&coord) {
            return "··".with(Color::White).on(terrain.color());
        }
        terrain.glyph()
    }

    /// Returns false and prints a notice if the terminal cannot fit the maze.
    fn check_size(&mut self, rows: u16, cols: u16) -> std::io::Result<bool> {
        let (term_width, term_height) = terminal::size()?;
        let min_width = cols.saturating_mul(Terrain::CELL_WIDTH);
        let min_height = rows.saturating_add(Renderer::NUM_INFO_ROWS);
        if term_width < min_width || term_height < min_height {
            let msg = format!(
                "Terminal too small ({}x{}) for a {}x{} maze. Please resize.",
                term_width, term_height, rows, cols
            );
            queue!(
                self.stdout,
                terminal::Clear(ClearType::All),
                cursor::MoveTo(0, 0),
                style::PrintStyledContent(msg.with(Color::Yellow).attribute(Attribute::Bold))
            )?;
            self.stdout.flush()?;
            return Ok(false);
        }
        Ok(true)
    }

    pub fn clear(&mut self) -> std::io::Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All))?;
        self.stdout.flush()
    }

    /// Redraw the whole maze and the info rows from a snapshot.
    pub fn draw(&mut self, snapshot: &SessionSnapshot) -> std::io::Result<()> {
        let maze = &snapshot.maze;
        if !self.check_size(maze.rows(), maze.cols())? {
            return Ok(());
        }

        // Later algorithms in the list are drawn on top of earlier ones
        let mut path_owner = HashMap::new();
        for solver in Solver::ALL {
            if let Some(path) = snapshot.active_paths.get(&solver) {
                path_owner.extend(path.iter().map(|&coord| (coord, solver)));
            }
        }

        self.stdout.queue(cursor::MoveTo(0, 0))?;
        for row in 0..maze.rows() {
            for col in 0..maze.cols() {
                let coord = (row, col);
                let glyph = Renderer::cell_glyph(coord, maze[coord], snapshot, &path_owner);
                self.stdout.queue(style::PrintStyledContent(glyph))?;
            }
            self.stdout.queue(style::Print("\r\n"))?;
        }

        let width = terminal::size().map(|(w, _)| w as usize).unwrap_or(80);
        let status_color = match snapshot.run_state {
            RunState::Idle => Color::Green,
            RunState::Running(_) => Color::Yellow,
        };
        let (status, _) = snapshot.status.unicode_truncate(width);
        queue!(
            self.stdout,
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(status.with(status_color).attribute(Attribute::Bold)),
            style::Print("\r\n")
        )?;

        for solver in Solver::ALL {
            let stats = snapshot.stats(solver);
            let stats_color = match stats {
                AlgorithmStats::NotRun => Color::DarkGrey,
                AlgorithmStats::Failed => Color::Red,
                AlgorithmStats::Solved { .. } => Color::Reset,
            };
            let line = format!("{:<9} {}", solver.name(), stats);
            let (line, _) = line.unicode_truncate(width.saturating_sub(3));
            queue!(
                self.stdout,
                terminal::Clear(ClearType::CurrentLine),
                style::PrintStyledContent("██ ".with(solver_color(solver))),
                style::PrintStyledContent(line.with(stats_color)),
                style::Print("\r\n")
            )?;
        }

        let help = format!(
            "{}  |  1 BFS  2 DFS  3 Dijkstra  4 A*  g generate  c clear  Esc quit",
            self.label
        );
        let (help, _) = help.unicode_truncate(width);
        queue!(
            self.stdout,
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(help.with(Color::Cyan))
        )?;
        self.stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_label() {
        let mut config = MazeConfig::default();
        assert_eq!(session_label(&config), "21x21");
        config.rows = 31;
        config.seed = Some(7);
        assert_eq!(session_label(&config), "31x21 seed 7");
    }

    #[test]
    fn test_every_solver_has_its_own_color() {
        for (i, a) in Solver::ALL.iter().enumerate() {
            for b in &Solver::ALL[i + 1..] {
                assert_ne!(solver_color(*a), solver_color(*b));
            }
        }
    }
}
