use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

/// Search for the longest-lived random Game of Life soup.
#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Config {
    /// Simulation rounds.
    #[arg(
        short = 'r',
        long = "rounds",
        default_value_t = Config::DEFAULT_ROUNDS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub rounds: u64,

    /// Generation limit; zero or negative means unbounded.
    #[arg(
        short = 'l',
        long = "limit",
        default_value_t = Config::DEFAULT_LIMIT,
        allow_negative_numbers = true
    )]
    pub limit: i64,

    /// Side length of the square world.
    #[arg(
        long = "size",
        default_value_t = Config::DEFAULT_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub size: u32,

    /// Number of workers running simulations concurrently.
    #[arg(
        short = 'w',
        long = "workers",
        default_value_t = Config::DEFAULT_WORKERS,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub workers: u32,

    /// Write every generated initial grid to the grids directory.
    #[arg(long = "write-all", visible_alias = "wa")]
    pub write_all: bool,

    /// Seed for the soup generator (random if omitted).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Directory receiving per-round grids when `--write-all` is set.
    #[arg(long, default_value = "grids")]
    pub grids_dir: PathBuf,

    /// File receiving the initial grid of the best simulation.
    #[arg(long, default_value = "best.txt")]
    pub best_path: PathBuf,

    /// Run the grid saved at PATH once and report its score instead of searching.
    #[arg(long, value_name = "PATH")]
    pub replay: Option<PathBuf>,
}

impl Config {
    pub const DEFAULT_ROUNDS: u64 = 10;
    pub const DEFAULT_LIMIT: i64 = 2000;
    pub const DEFAULT_SIZE: u32 = 20;
    pub const DEFAULT_WORKERS: u32 = 4;

    /// Capacity of both the task queue and the results queue.
    pub const QUEUE_CAPACITY: usize = 10;

    /// Rejects values the command line parser would have refused.
    ///
    /// Needed for configs built in code rather than parsed.
    pub fn validate(&self) -> Result<()> {
        if self.rounds == 0 {
            bail!("Round count must be positive");
        }
        if self.size == 0 {
            bail!("World size must be positive");
        }
        if self.workers == 0 {
            bail!("Worker count must be positive");
        }
        Ok(())
    }

    /// Generation limit as understood by the engine, `0` meaning unbounded.
    pub fn generation_limit(&self) -> u64 {
        self.limit.max(0) as u64
    }

    pub fn world_size(&self) -> usize {
        self.size as usize
    }

    pub fn worker_count(&self) -> usize {
        self.workers as usize
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rounds: Self::DEFAULT_ROUNDS,
            limit: Self::DEFAULT_LIMIT,
            size: Self::DEFAULT_SIZE,
            workers: Self::DEFAULT_WORKERS,
            write_all: false,
            seed: None,
            grids_dir: PathBuf::from("grids"),
            best_path: PathBuf::from("best.txt"),
            replay: None,
        }
    }
}
