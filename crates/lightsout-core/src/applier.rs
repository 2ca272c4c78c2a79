//! Replaying a press vector as a sequence of frames.

use std::iter::FusedIterator;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::grid::{GRID_SIZE, Grid};
use crate::press::PressVector;

/// A board snapshot, optionally with the cell about to be pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub grid: Grid,
    pub highlight: Option<usize>,
}

/// Lazily presses cells of a board, yielding a frame around every press.
///
/// Yields the starting board, then for each pressed index a highlighted
/// frame of the board before the press and a plain frame after it: `1 + 2k`
/// frames for `k` presses. The board is mutated as the iterator advances.
///
/// The applier only carries `delay` for its consumer; it never sleeps or
/// renders.
#[derive(Debug)]
pub struct SolutionApplier<'g> {
    grid: &'g mut Grid,
    press: PressVector,
    delay: Duration,
    started: bool,
    cursor: usize,
    pending: Option<usize>,
}

impl<'g> SolutionApplier<'g> {
    pub fn new(grid: &'g mut Grid, press: PressVector, delay: Duration) -> Self {
        Self {
            grid,
            press,
            delay,
            started: false,
            cursor: 0,
            pending: None,
        }
    }

    /// Pause a consumer should hold between frames.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Total frames this applier yields from the start.
    pub fn frame_count(&self) -> usize {
        1 + 2 * self.press.count()
    }

    fn snapshot(&self, highlight: Option<usize>) -> Frame {
        Frame {
            grid: *self.grid,
            highlight,
        }
    }
}

impl Iterator for SolutionApplier<'_> {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        if !self.started {
            self.started = true;
            return Some(self.snapshot(None));
        }

        if let Some(index) = self.pending.take() {
            self.grid.press(index);
            return Some(self.snapshot(None));
        }

        let index = (self.cursor..GRID_SIZE).find(|&i| self.press.is_pressed(i))?;
        self.cursor = index + 1;
        self.pending = Some(index);
        Some(self.snapshot(Some(index)))
    }
}

impl FusedIterator for SolutionApplier<'_> {}

/// Replay `press` on `grid`.
pub fn apply(grid: &mut Grid, press: PressVector, delay: Duration) -> SolutionApplier<'_> {
    SolutionApplier::new(grid, press, delay)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_sequence() {
        let mut grid = Grid::from_bits([0, 1, 1, 1, 0, 0, 1, 1, 1]).unwrap();
        let start = grid;
        let press: PressVector = "110010101".parse().unwrap();

        let frames: Vec<Frame> = apply(&mut grid, press, Duration::ZERO).collect();

        assert_eq!(frames.len(), 11);
        assert_eq!(
            frames[0],
            Frame {
                grid: start,
                highlight: None
            }
        );
        assert_eq!(frames[1].highlight, Some(0));
        assert_eq!(frames[1].grid, start);

        let mut after_first = start;
        after_first.toggle(0).unwrap();
        assert_eq!(
            frames[2],
            Frame {
                grid: after_first,
                highlight: None
            }
        );

        let highlights: Vec<usize> = frames.iter().filter_map(|f| f.highlight).collect();
        assert_eq!(highlights, vec![0, 1, 4, 6, 8]);

        assert!(frames[10].grid.is_solved());
        assert!(grid.is_solved());
    }

    #[test]
    fn test_no_presses_single_frame() {
        let mut grid = Grid::from_bits([1, 0, 0, 0, 0, 0, 0, 0, 0]).unwrap();
        let mut applier = apply(&mut grid, PressVector::default(), Duration::from_secs(1));
        assert_eq!(applier.frame_count(), 1);
        assert_eq!(applier.delay(), Duration::from_secs(1));
        assert!(applier.next().is_some());
        assert!(applier.next().is_none());
        assert!(applier.next().is_none());
    }
}
