//! Saving and loading grids as JSON matrices of zeros and ones.

use anyhow::{Context, Result};
use gol_engines::Grid;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::warn;

/// Destination for grid snapshots.
pub trait GridSink: Send + Sync {
    fn write_grid(&self, path: &Path, grid: &Grid) -> Result<()>;
}

/// Writes grids to the filesystem as `[[0,1,...],...]`.
#[derive(Default)]
pub struct JsonFileSink;

impl GridSink for JsonFileSink {
    fn write_grid(&self, path: &Path, grid: &Grid) -> Result<()> {
        let data = serde_json::to_vec(&grid.to_rows())?;
        fs::write(path, data).with_context(|| format!("Failed to write {}", path.display()))
    }
}

/// Keeps written grids in memory.
#[derive(Default)]
pub struct MemorySink {
    grids: Mutex<HashMap<PathBuf, Grid>>,
}

impl MemorySink {
    pub fn get(&self, path: impl AsRef<Path>) -> Option<Grid> {
        self.grids.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn len(&self) -> usize {
        self.grids.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl GridSink for MemorySink {
    fn write_grid(&self, path: &Path, grid: &Grid) -> Result<()> {
        self.grids
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), grid.clone());
        Ok(())
    }
}

/// Write `grid`, logging a warning instead of failing.
///
/// Returns whether the write succeeded.
pub fn write_or_warn(sink: &dyn GridSink, path: &Path, grid: &Grid) -> bool {
    match sink.write_grid(path, grid) {
        Ok(()) => true,
        Err(e) => {
            warn!("Grid was not saved: {e:#}");
            false
        }
    }
}

/// Read a grid written by [`JsonFileSink`].
pub fn read_grid(path: &Path) -> Result<Grid> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let rows: Vec<Vec<u8>> = serde_json::from_slice(&data)
        .with_context(|| format!("{} is not a grid", path.display()))?;
    Grid::from_rows(&rows).with_context(|| format!("{} is not a grid", path.display()))
}

/// Replace `dir` with an empty directory.
pub fn prepare_grids_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        fs::remove_dir_all(dir).with_context(|| format!("Failed to clear {}", dir.display()))?;
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))
}

/// File name of the initial grid of round `index`.
pub fn round_file_name(index: u64) -> String {
    format!("simulation-{index}.txt")
}
