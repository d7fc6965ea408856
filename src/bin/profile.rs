//! Headless run of every algorithm over freshly generated mazes, for timing.

use std::time::{Duration, Instant};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use mazerace::{
    config::{MazeConfig, Pacing},
    controller::{AlgorithmStats, RunController},
    error::Result,
    solvers::Solver,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of mazes to generate and solve
    #[arg(long, default_value_t = 100)]
    iterations: usize,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 101)]
    rows: u16,

    #[arg(long, default_value_t = 101)]
    cols: u16,
}

fn main() -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("profile=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let controller = RunController::new(MazeConfig {
        rows: args.rows,
        cols: args.cols,
        seed: args.seed,
        pacing: Pacing::INSTANT,
        ..MazeConfig::default()
    })?;

    let mut totals = [Duration::ZERO; Solver::ALL.len()];
    let mut failures = [0usize; Solver::ALL.len()];
    for iteration in 0..args.iterations {
        if iteration > 0 {
            controller.generate();
        }
        for (i, solver) in Solver::ALL.into_iter().enumerate() {
            let started = Instant::now();
            controller.start(solver);
            controller.join();
            totals[i] += started.elapsed();

            let stats = controller.stats(solver);
            if !matches!(stats, AlgorithmStats::Solved { .. }) {
                failures[i] += 1;
            }
            tracing::debug!(iteration, %solver, %stats, "run done");
        }
    }

    let runs = args.iterations.max(1) as u32;
    for (i, solver) in Solver::ALL.into_iter().enumerate() {
        let mean = totals[i] / runs;
        tracing::info!(
            algorithm = solver.description(),
            ?mean,
            failures = failures[i],
            "profile"
        );
    }
    Ok(())
}
