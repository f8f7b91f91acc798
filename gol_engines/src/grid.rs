use anyhow::{anyhow, bail, Result};
use rand::Rng;

/// Probability of a cell being alive after [`Grid::randomize`].
pub const FILL_RATE: f64 = 0.2;

/// Rectangular field of cells with hard edges.
///
/// Cells are stored row-major; `(row, column)` addresses a cell with
/// `row < height` and `column < width`. Dimensions never change after creation.
/// `Clone` produces a fully independent copy.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: Vec<bool>,
    width: usize,
    height: usize,
}

impl Grid {
    /// Create a field of dead cells.
    ///
    /// Fails on zero dimensions or when the cells can't be allocated.
    pub fn blank(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("Grid dimensions must be positive, got {width}x{height}");
        }
        let size = width
            .checked_mul(height)
            .ok_or_else(|| anyhow!("Grid {width}x{height} is too large"))?;
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(size)
            .map_err(|e| anyhow!("Failed to allocate grid {width}x{height}: {e}"))?;
        cells.resize(size, false);
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    /// Create a randomly filled field.
    ///
    /// `seed` - random seed (if `None`, then random seed is generated)
    pub fn random(width: usize, height: usize, seed: Option<u64>) -> Result<Self> {
        use rand::SeedableRng;
        let mut rng = if let Some(x) = seed {
            rand_chacha::ChaCha8Rng::seed_from_u64(x)
        } else {
            rand_chacha::ChaCha8Rng::from_entropy()
        };
        let mut grid = Self::blank(width, height)?;
        grid.randomize(&mut rng);
        Ok(grid)
    }

    /// Build a field from rows of zeros and ones.
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        let mut grid = Self::blank(width, height)?;
        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                bail!(
                    "Row {row} has length {}, expected {width}",
                    values.len()
                );
            }
            for (column, &value) in values.iter().enumerate() {
                match value {
                    0 => {}
                    1 => grid.set(row, column, true),
                    _ => bail!("Invalid cell value {value} at ({row}, {column})"),
                }
            }
        }
        Ok(grid)
    }

    /// Rows of zeros and ones, the inverse of [`Grid::from_rows`].
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks_exact(self.width)
            .map(|row| row.iter().map(|&c| c as u8).collect())
            .collect()
    }

    /// Set every cell alive with probability [`FILL_RATE`].
    ///
    /// Cells are only ever switched on, so a blank grid ends up with
    /// the expected density.
    pub fn randomize<R: Rng>(&mut self, rng: &mut R) {
        for cell in self.cells.iter_mut() {
            if rng.gen_bool(FILL_RATE) {
                *cell = true;
            }
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, column: usize) -> bool {
        self.cells[column + row * self.width]
    }

    pub fn set(&mut self, row: usize, column: usize, alive: bool) {
        self.cells[column + row * self.width] = alive;
    }

    /// Total number of alive cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Number of alive cells in the Moore neighbourhood of `(row, column)`.
    ///
    /// Positions outside the field count as dead.
    pub fn count_neighbors(&self, row: usize, column: usize) -> u8 {
        let rows = row.saturating_sub(1)..=(row + 1).min(self.height - 1);
        let mut count = 0;
        for y in rows {
            let columns = column.saturating_sub(1)..=(column + 1).min(self.width - 1);
            for x in columns {
                if (y, x) != (row, column) && self.get(y, x) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Write the generation following `self` into `dst`.
    ///
    /// Returns `true` if `dst` ends up identical to `last`.
    /// All three grids must have the same dimensions.
    pub fn next_generation_into(&self, dst: &mut Grid, last: &Grid) -> bool {
        assert_eq!((self.width, self.height), (dst.width, dst.height));
        assert_eq!((self.width, self.height), (last.width, last.height));

        let mut stalled = true;
        for row in 0..self.height {
            for column in 0..self.width {
                let idx = column + row * self.width;
                let next = next_state(self.cells[idx], self.count_neighbors(row, column));
                dst.cells[idx] = next;
                if next != last.cells[idx] {
                    stalled = false;
                }
            }
        }
        stalled
    }
}

/// Conway's rule B3/S23.
#[inline]
pub fn next_state(alive: bool, neighbors: u8) -> bool {
    if alive {
        neighbors == 2 || neighbors == 3
    } else {
        neighbors == 3
    }
}
