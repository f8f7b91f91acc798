use crate::Grid;
use anyhow::Result;
use rand::Rng;

/// A single Game of Life run on a bounded field.
///
/// Keeps three buffers that rotate every generation: `current` is the
/// live state, `next` is scratch space for the following generation and
/// `last` holds the state from two generations back. A run is considered
/// stalled when a freshly computed generation equals `last`, which catches
/// still lifes as well as period-2 oscillators.
pub struct Simulation {
    start_grid: Option<Grid>,
    current: Grid,
    next: Grid,
    last: Grid,
    generation: u64,
}

impl Simulation {
    /// Create a simulation of dead cells.
    pub fn blank(width: usize, height: usize) -> Result<Self> {
        Self::from_grid(Grid::blank(width, height)?)
    }

    /// Create a simulation whose initial state is randomized with `rng`.
    pub fn random<R: Rng>(width: usize, height: usize, rng: &mut R) -> Result<Self> {
        let mut grid = Grid::blank(width, height)?;
        grid.randomize(rng);
        Self::from_grid(grid)
    }

    /// Create a simulation starting from `grid`.
    pub fn from_grid(grid: Grid) -> Result<Self> {
        let (width, height) = (grid.width(), grid.height());
        Ok(Self {
            start_grid: None,
            current: grid,
            next: Grid::blank(width, height)?,
            last: Grid::blank(width, height)?,
            generation: 0,
        })
    }

    /// Initial state of the last [`Simulation::run`], `None` before the first run.
    pub fn start_grid(&self) -> Option<&Grid> {
        self.start_grid.as_ref()
    }

    pub fn current_state(&self) -> &Grid {
        &self.current
    }

    /// Generation counter reached by the last run.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run until the field stalls or `limit` generations are reached.
    ///
    /// `limit == 0` means no limit. Returns the score: the generation
    /// counter (starting from 1) at which the run stopped.
    pub fn run(&mut self, limit: u64) -> u64 {
        self.start_grid = Some(self.current.clone());
        self.generation = 1;

        loop {
            if limit > 0 && self.generation == limit {
                break;
            }
            let stalled = self.step();
            self.generation += 1;
            if stalled {
                break;
            }
        }
        self.generation
    }

    /// Compute the next generation and rotate buffers.
    ///
    /// Returns `true` if the new state repeats the one from two generations back.
    pub fn step(&mut self) -> bool {
        let stalled = self.current.next_generation_into(&mut self.next, &self.last);
        self.rotate();
        stalled
    }

    // last <- current, current <- next, next <- old last
    fn rotate(&mut self) {
        std::mem::swap(&mut self.last, &mut self.current);
        std::mem::swap(&mut self.current, &mut self.next);
    }
}
