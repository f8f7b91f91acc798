#![warn(clippy::all)]

mod aggregator;
mod config;
mod persist;
mod pipeline;

pub use aggregator::{Aggregator, Best, Summary};
pub use config::Config;
pub use persist::{
    prepare_grids_dir, read_grid, round_file_name, write_or_warn, GridSink, JsonFileSink,
    MemorySink,
};
pub use pipeline::{run_pipeline, spawn_generator, spawn_workers, Round, RoundResult, Snapshots};

use anyhow::Result;
use gol_engines::Simulation;
use std::{path::Path, sync::Arc};
use tracing::{info, warn};

/// Run the search, report the summary and save the best initial grid.
///
/// Failing to save grids only produces warnings.
pub async fn search(config: &Config, sink: Arc<dyn GridSink>) -> Result<Summary> {
    config.validate()?;
    let snapshots = if config.write_all {
        if let Err(e) = prepare_grids_dir(&config.grids_dir) {
            warn!("{e:#}");
        }
        Some(Snapshots {
            sink: sink.clone(),
            dir: config.grids_dir.clone(),
        })
    } else {
        None
    };

    let summary = run_pipeline(config, snapshots).await?;
    info!("Simulation finished in {:?}", summary.elapsed);
    info!(score = summary.best_score(), "Best score");

    match summary.best.as_ref().and_then(|b| b.simulation.start_grid()) {
        Some(grid) => {
            write_or_warn(sink.as_ref(), &config.best_path, grid);
        }
        None => warn!("No simulation stalled before the limit, nothing to save"),
    }
    Ok(summary)
}

/// Run the grid stored at `path` once and return its score.
pub fn replay(path: &Path, limit: u64) -> Result<u64> {
    let mut simulation = Simulation::from_grid(read_grid(path)?)?;
    let score = simulation.run(limit);
    info!(path = %path.display(), score, "Replay finished");
    Ok(score)
}
