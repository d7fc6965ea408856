use std::{path::PathBuf, time::Duration};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mazerace::{
    app::App,
    config::{GeneratorConfig, MazeConfig, Pacing},
    controller::RunController,
    error::Result,
};

/// Watch BFS, DFS, Dijkstra and A* find their way through a weighted maze.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Maze height in cells, odd and at least 5
    #[arg(long, default_value_t = 21)]
    rows: u16,

    /// Maze width in cells, odd and at least 5
    #[arg(long, default_value_t = 21)]
    cols: u16,

    /// Seed for reproducible mazes
    #[arg(long)]
    seed: Option<u64>,

    /// Pause after each expanded cell, in milliseconds
    #[arg(long, default_value_t = 10)]
    scan_ms: u64,

    /// Pause after each revealed path cell, in milliseconds
    #[arg(long, default_value_t = 30)]
    reveal_ms: u64,

    /// Chance of knocking out a wall between two corridors
    #[arg(long, default_value_t = 0.15)]
    braid: f64,

    /// Where to write logs, the terminal itself is taken by the maze
    #[arg(long, default_value = "mazerace.log")]
    log_file: PathBuf,
}

impl Cli {
    fn maze_config(&self) -> MazeConfig {
        MazeConfig {
            rows: self.rows,
            cols: self.cols,
            seed: self.seed,
            generator: GeneratorConfig {
                braid_probability: self.braid,
                ..GeneratorConfig::default()
            },
            pacing: Pacing {
                scan: Duration::from_millis(self.scan_ms),
                reveal: Duration::from_millis(self.reveal_ms),
            },
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let directory = match cli.log_file.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = cli
        .log_file
        .file_name()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("mazerace.log"));
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, _guard) = tracing_appender::non_blocking(appender);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("mazerace=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    // Validate before touching the terminal so errors print normally
    let controller = RunController::new(cli.maze_config())?;
    tracing::info!(rows = cli.rows, cols = cli.cols, seed = ?cli.seed, "starting");

    let mut stdout = std::io::stdout();
    App::setup_terminal(&mut stdout)?;
    let result = App::new(controller).run();
    App::restore_terminal(&mut stdout)?;
    result?;

    tracing::info!("bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_match_config_defaults() {
        let cli = Cli::parse_from(["mazerace"]);
        assert_eq!(cli.maze_config(), MazeConfig::default());
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::parse_from([
            "mazerace",
            "--rows",
            "31",
            "--seed",
            "7",
            "--scan-ms",
            "0",
            "--braid",
            "0.5",
        ]);
        let config = cli.maze_config();
        assert_eq!(config.rows, 31);
        assert_eq!(config.cols, 21);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.pacing.scan, Duration::ZERO);
        assert_eq!(config.generator.braid_probability, 0.5);
        assert!(config.validate().is_ok());
    }
}
