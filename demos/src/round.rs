//! One solve-and-animate round.
//!
//! A round has two steps: [`Solver::solve_detailed`] on the chosen board,
//! then [`replay`] of the presses. The binary runs them separately so its
//! spinner only covers the solve; [`play_round`] runs both.

use std::time::Duration;

use lightsout_core::{Grid, LightsOutError, Solution, SolutionApplier, Solver};
use lightsout_hal::Backend;
use tracing::{debug, info, warn};

use crate::display::{Display, DisplayError};

/// Errors that abandon a round.
#[derive(Debug, thiserror::Error)]
pub enum RoundError {
    #[error("solve failed: {0}")]
    Solve(#[from] LightsOutError),

    #[error("display failed: {0}")]
    Display(#[from] DisplayError),
}

/// What happened in a round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// The board as chosen.
    pub initial: Grid,
    /// The board after replaying the solution.
    pub finished: Grid,
    pub solution: Solution,
    pub frames: usize,
}

impl RoundReport {
    pub fn solved(&self) -> bool {
        self.finished.is_solved()
    }
}

/// Replay `solution` on `grid`, rendering every frame on every display with
/// `delay` after each.
pub async fn replay(
    grid: Grid,
    solution: Solution,
    displays: &mut [Box<dyn Display>],
    delay: Duration,
) -> Result<RoundReport, DisplayError> {
    info!(press = %solution.press, "replaying solution");

    let mut board = grid;
    let mut frames = 0;
    for frame in SolutionApplier::new(&mut board, solution.press, delay) {
        for display in displays.iter_mut() {
            display.render(&frame)?;
        }
        frames += 1;
        debug!(frame = frames, highlight = ?frame.highlight, "rendered frame");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    let report = RoundReport {
        initial: grid,
        finished: board,
        solution,
        frames,
    };
    if !report.solved() {
        warn!(
            press = %report.solution.press,
            lit = report.finished.lit_count(),
            "solution did not clear the board"
        );
    }
    Ok(report)
}

/// Solve `grid`, then replay the presses.
pub async fn play_round<B: Backend>(
    solver: &Solver<B>,
    grid: Grid,
    displays: &mut [Box<dyn Display>],
    delay: Duration,
) -> Result<RoundReport, RoundError> {
    let solution = solver.solve_detailed(&grid).await?;
    Ok(replay(grid, solution, displays, delay).await?)
}
