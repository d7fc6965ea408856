use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("maze dimensions must be odd, got {rows}x{cols}")]
    EvenDimensions {
        rows: u16,
        cols: u16,
    },
    #[error("maze must be at least {min}x{min}, got {rows}x{cols}")]
    TooSmall {
        rows: u16,
        cols: u16,
        min: u16,
    },
    #[error("braid probability must be within [0, 1], got {0}")]
    BraidProbability(f64),
    #[error("terrain weights must be non-negative with a positive sum, got {0:?}")]
    TerrainWeights(TerrainWeights),
}

/// Relative likelihood of each passable terrain when a maze is re-skinned.
/// Weights are normalized, so they do not need to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerrainWeights {
    pub grass: f64,
    pub mud: f64,
    pub water: f64,
}

impl Default for TerrainWeights {
    fn default() -> Self {
        Self {
            grass: 0.5,
            mud: 0.3,
            water: 0.2,
        }
    }
}

impl TerrainWeights {
    pub fn total(&self) -> f64 {
        self.grass + self.mud + self.water
    }

    fn is_valid(&self) -> bool {
        let all_finite_non_negative = [self.grass, self.mud, self.water]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0);
        all_finite_non_negative && self.total() > 0.0
    }
}

/// Tunable parameters of the maze generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Chance that a wall separating two passages is knocked through, creating a loop
    pub braid_probability: f64,
    pub terrain_weights: TerrainWeights,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            braid_probability: 0.15,
            terrain_weights: TerrainWeights::default(),
        }
    }
}

/// Animation delays of a run. Zero delays change no outcome, only speed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after each cell a search expands
    pub scan: Duration,
    /// Pause after each path point revealed once the search succeeded
    pub reveal: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            scan: Duration::from_millis(10),
            reveal: Duration::from_millis(30),
        }
    }
}

impl Pacing {
    /// No pauses at all, for tests and profiling.
    pub const INSTANT: Pacing = Pacing {
        scan: Duration::ZERO,
        reveal: Duration::ZERO,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct MazeConfig {
    pub rows: u16,
    pub cols: u16,
    /// Seed for reproducible mazes and DFS shuffles. `None` draws from the OS.
    pub seed: Option<u64>,
    pub generator: GeneratorConfig,
    pub pacing: Pacing,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            rows: 21,
            cols: 21,
            seed: None,
            generator: GeneratorConfig::default(),
            pacing: Pacing::default(),
        }
    }
}

impl MazeConfig {
    /// Smallest maze that still has an interior between start and exit.
    pub const MIN_SIZE: u16 = 5;

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows < Self::MIN_SIZE || self.cols < Self::MIN_SIZE {
            return Err(ConfigError::TooSmall {
                rows: self.rows,
                cols: self.cols,
                min: Self::MIN_SIZE,
            });
        }
        // Carving only lands on odd coordinates, so even sizes leave a dead ring
        if self.rows % 2 == 0 || self.cols % 2 == 0 {
            return Err(ConfigError::EvenDimensions {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let braid = self.generator.braid_probability;
        if !(0.0..=1.0).contains(&braid) {
            return Err(ConfigError::BraidProbability(braid));
        }
        if !self.generator.terrain_weights.is_valid() {
            return Err(ConfigError::TerrainWeights(self.generator.terrain_weights));
        }
        Ok(())
    }
}
