//! Lights-Out Grover Solver
//!
//! Solves the 3x3 Lights-Out puzzle by amplitude amplification and replays
//! the answer as a sequence of board frames.
//!
//! - [`Grid`] holds a board and implements the toggle rule.
//! - [`ConstraintCircuitBuilder`] encodes a board into the search circuit.
//! - [`Solver`] runs that circuit on a [`lightsout_hal::Backend`] and picks
//!   the dominant outcome.
//! - [`SolutionApplier`] replays the presses frame by frame.
//!
//! # Example
//!
//! ```ignore
//! use lightsout_adapter_sim::SimulatorBackend;
//! use lightsout_core::{Grid, Solver};
//!
//! # async fn run() -> lightsout_core::LightsOutResult<()> {
//! let mut grid = Grid::from_bits([0, 1, 1, 1, 0, 0, 1, 1, 1])?;
//! let solver = Solver::new(SimulatorBackend::new());
//!
//! let press = solver.solve(&grid).await?;
//! grid.apply(&press);
//! assert!(grid.is_solved());
//! # Ok(())
//! # }
//! ```

pub mod applier;
pub mod catalog;
pub mod circuit;
pub mod error;
pub mod grid;
pub mod press;
pub mod solver;

pub use applier::{Frame, SolutionApplier, apply};
pub use circuit::{
    CARRY_TARGETS, ConstraintCircuitBuilder, GROVER_ITERATIONS, PRESS_TARGETS, PropagationStage,
    Registers,
};
pub use error::{LightsOutError, LightsOutResult};
pub use grid::{Cell, GRID_SIZE, GRID_WIDTH, Grid, NEIGHBORHOOD, neighborhood};
pub use press::PressVector;
pub use solver::{
    CircuitStats, DEFAULT_SHOTS, MeasurementSample, SampleSet, Solution, Solver, SolverConfig,
    SolverPhase,
};
