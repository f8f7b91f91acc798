#![warn(clippy::all, clippy::cargo)]

mod grid;
mod simulation;

pub use grid::{next_state, Grid, FILL_RATE};
pub use simulation::Simulation;
