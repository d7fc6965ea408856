pub mod cell;
pub mod grid;

use std::{fmt, str::FromStr};

use thiserror::Error;

pub use cell::Terrain;
use grid::Grid;

/// A cell coordinate as `(row, col)`.
pub type Coord = (u16, u16);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMazeError {
    #[error("maze text has no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown cell {ch:?} at row {row}, column {col}")]
    UnknownCell {
        row: usize,
        col: usize,
        ch: char,
    },
    #[error("maze must be at least 3x3, got {rows}x{cols}")]
    TooSmall {
        rows: usize,
        cols: usize,
    },
}

/// A terrain maze with a fixed start in the top left and a fixed exit in the
/// bottom right, both one cell inside the sealed border.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    grid: Grid,
}

impl Maze {
    /// Creates a maze of the given size filled entirely with walls.
    ///
    /// Panics if either dimension is smaller than 3, since the start and exit
    /// must sit strictly inside the border.
    pub fn new(rows: u16, cols: u16) -> Self {
        assert!(
            rows >= 3 && cols >= 3,
            "maze must be at least 3x3, got {}x{}",
            rows, cols
        );
        Maze {
            grid: Grid::new(rows, cols, Terrain::Wall),
        }
    }

    /// Creates a maze with a wall border and an all-grass interior.
    pub fn open(rows: u16, cols: u16) -> Self {
        let mut maze = Maze::new(rows, cols);
        for row in 1..rows - 1 {
            for col in 1..cols - 1 {
                maze[(row, col)] = Terrain::Grass;
            }
        }
        maze
    }

    #[cfg(test)]
    /// Returns a reference to the internal grid data for testing purposes.
    pub fn cells(&self) -> &[Terrain] {
        &self.grid.data
    }

    pub fn rows(&self) -> u16 {
        self.grid.rows()
    }

    pub fn cols(&self) -> u16 {
        self.grid.cols()
    }

    pub fn start(&self) -> Coord {
        (1, 1)
    }

    pub fn goal(&self) -> Coord {
        (self.rows() - 2, self.cols() - 2)
    }

    /// Flat index of a coordinate, for per-cell bookkeeping arrays.
    pub fn index_of(&self, coord: Coord) -> usize {
        self.grid.ravel_index(coord.0, coord.1)
    }

    /// Number of cells in the maze.
    pub fn len(&self) -> usize {
        self.grid.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grid.data.is_empty()
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.rows() && coord.1 < self.cols()
    }

    /// Whether the coordinate lies strictly inside the outer ring of walls.
    pub fn is_interior(&self, coord: Coord) -> bool {
        self.is_in_bounds(coord) && !self.grid.is_boundary(coord.0, coord.1)
    }

    pub fn is_boundary(&self, coord: Coord) -> bool {
        self.is_in_bounds(coord) && self.grid.is_boundary(coord.0, coord.1)
    }

    pub fn is_passable(&self, coord: Coord) -> bool {
        self.is_in_bounds(coord) && self[coord].is_passable()
    }

    /// Cost of stepping onto `coord`.
    pub fn cost(&self, coord: Coord) -> u32 {
        self[coord].cost()
    }

    /// Neighbors a search may step onto: in bounds and not a wall.
    /// Order is up, down, left, right.
    pub fn passable_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        get_neighbors(coord, self).filter(|&c| self[c].is_passable())
    }

    /// Iterates over every coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let (rows, cols) = (self.rows(), self.cols());
        (0..rows).flat_map(move |row| (0..cols).map(move |col| (row, col)))
    }
}

impl std::ops::Index<Coord> for Maze {
    type Output = Terrain;

    fn index(&self, index: Coord) -> &Self::Output {
        &self.grid[index]
    }
}

impl std::ops::IndexMut<Coord> for Maze {
    fn index_mut(&mut self, index: Coord) -> &mut Self::Output {
        &mut self.grid[index]
    }
}

/// Plain text form, one line per row.
impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows() {
            for col in 0..self.cols() {
                write!(f, "{}", self[(row, col)].to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FromStr for Maze {
    type Err = ParseMazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>();
        let expected = lines.first().ok_or(ParseMazeError::Empty)?.chars().count();
        let fits = |n: usize| (3..=u16::MAX as usize).contains(&n);
        if !fits(lines.len()) || !fits(expected) {
            return Err(ParseMazeError::TooSmall {
                rows: lines.len(),
                cols: expected,
            });
        }

        let mut maze = Maze::new(lines.len() as u16, expected as u16);
        for (row, line) in lines.iter().enumerate() {
            let found = line.chars().count();
            if found != expected {
                return Err(ParseMazeError::Ragged {
                    row,
                    expected,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                let terrain = Terrain::from_char(ch)
                    .ok_or(ParseMazeError::UnknownCell { row, col, ch })?;
                maze[(row as u16, col as u16)] = terrain;
            }
        }
        Ok(maze)
    }
}

/// Get neighbors of a cell.
/// A neighbor is a cell one step away in a cardinal direction (up, down, left, right).
pub fn get_neighbors(coord: Coord, maze: &Maze) -> impl Iterator<Item = Coord> + '_ {
    let neighbors: Vec<Coord> = if maze.is_in_bounds(coord) {
        let (row, col) = coord;
        vec![
            // NOTE: wrapping_sub maps row 0 / col 0 to u16::MAX and saturating_add caps at
            // u16::MAX, both of which the bounds filter below rejects.
            (row.wrapping_sub(1), col),
            (row.saturating_add(1), col),
            (row, col.wrapping_sub(1)),
            (row, col.saturating_add(1)),
        ]
    } else {
        // No neighbors if the coordinate is out of bounds
        vec![]
    };

    neighbors.into_iter().filter(move |&c| maze.is_in_bounds(c))
}

/// Manhattan distance between two coordinates.
pub fn manhattan(a: Coord, b: Coord) -> u32 {
    a.0.abs_diff(b.0) as u32 + a.1.abs_diff(b.1) as u32
}
