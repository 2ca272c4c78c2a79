//! Board state and the toggle rule.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LightsOutError, LightsOutResult};
use crate::press::PressVector;

/// Cells per row.
pub const GRID_WIDTH: usize = 3;

/// Cells per board.
pub const GRID_SIZE: usize = GRID_WIDTH * GRID_WIDTH;

/// Cells changed by pressing each index: itself plus its orthogonal
/// neighbours, without wraparound.
///
/// Row-major, so index `i` sits at row `i / 3`, column `i % 3`.
pub const NEIGHBORHOOD: [&[usize]; GRID_SIZE] = [
    &[0, 1, 3],
    &[0, 1, 2, 4],
    &[1, 2, 5],
    &[0, 3, 4, 6],
    &[1, 3, 4, 5, 7],
    &[2, 4, 5, 8],
    &[3, 6, 7],
    &[4, 6, 7, 8],
    &[5, 7, 8],
];

/// Cells changed by pressing `index`, or `None` off the board.
pub fn neighborhood(index: usize) -> Option<&'static [usize]> {
    NEIGHBORHOOD.get(index).copied()
}

/// A single light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Off,
    On,
}

impl Cell {
    pub fn is_on(self) -> bool {
        self == Cell::On
    }

    /// The opposite state.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Cell::Off => Cell::On,
            Cell::On => Cell::Off,
        }
    }

    /// `1` for on, `0` for off.
    pub fn bit(self) -> u8 {
        u8::from(self.is_on())
    }
}

impl From<bool> for Cell {
    fn from(on: bool) -> Self {
        if on { Cell::On } else { Cell::Off }
    }
}

impl TryFrom<u8> for Cell {
    type Error = LightsOutError;

    fn try_from(value: u8) -> LightsOutResult<Self> {
        match value {
            0 => Ok(Cell::Off),
            1 => Ok(Cell::On),
            other => Err(LightsOutError::InvalidCell {
                value: other.to_string(),
            }),
        }
    }
}

/// A 3x3 board, row-major.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid {
    cells: [Cell; GRID_SIZE],
}

impl Grid {
    pub fn new(cells: [Cell; GRID_SIZE]) -> Self {
        Self { cells }
    }

    /// The solved board.
    pub fn all_off() -> Self {
        Self::default()
    }

    /// Build a board from 0/1 values.
    pub fn from_bits(bits: [u8; GRID_SIZE]) -> LightsOutResult<Self> {
        let mut cells = [Cell::Off; GRID_SIZE];
        for (cell, bit) in cells.iter_mut().zip(bits) {
            *cell = Cell::try_from(bit)?;
        }
        Ok(Self { cells })
    }

    pub fn cells(&self) -> &[Cell; GRID_SIZE] {
        &self.cells
    }

    /// Cell at `index`, or `None` off the board.
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// The board as 0/1 values.
    pub fn bits(&self) -> [u8; GRID_SIZE] {
        self.cells.map(Cell::bit)
    }

    /// Indices of lit cells.
    pub fn lit(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_on())
            .map(|(i, _)| i)
    }

    pub fn lit_count(&self) -> usize {
        self.lit().count()
    }

    pub fn is_solved(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_on())
    }

    /// Press `index`: flip it and its orthogonal neighbours.
    pub fn toggle(&mut self, index: usize) -> LightsOutResult<()> {
        let cells = neighborhood(index).ok_or(LightsOutError::IndexOutOfRange { index })?;
        for &i in cells {
            self.cells[i] = self.cells[i].flipped();
        }
        Ok(())
    }

    /// Press every cell selected by `press`, in index order.
    pub fn apply(&mut self, press: &PressVector) {
        for index in press.pressed() {
            self.press(index);
        }
    }

    /// Toggle for indices already known to be on the board.
    pub(crate) fn press(&mut self, index: usize) {
        for &i in NEIGHBORHOOD[index] {
            self.cells[i] = self.cells[i].flipped();
        }
    }
}

impl TryFrom<&[u8]> for Grid {
    type Error = LightsOutError;

    fn try_from(bits: &[u8]) -> LightsOutResult<Self> {
        let bits: [u8; GRID_SIZE] = bits
            .try_into()
            .map_err(|_| LightsOutError::InvalidGridSize { len: bits.len() })?;
        Self::from_bits(bits)
    }
}

impl fmt::Display for Grid {
    /// Three rows of `■` (on) and `□` (off).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (r, row) in self.cells.chunks(GRID_WIDTH).enumerate() {
            if r > 0 {
                writeln!(f)?;
            }
            let line: Vec<&str> = row
                .iter()
                .map(|cell| if cell.is_on() { "■" } else { "□" })
                .collect();
            write!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed_by(index: usize) -> Vec<usize> {
        let mut grid = Grid::all_off();
        grid.toggle(index).unwrap();
        grid.lit().collect()
    }

    #[test]
    fn test_toggle_boundaries() {
        assert_eq!(changed_by(0), vec![0, 1, 3]);
        assert_eq!(changed_by(4), vec![1, 3, 4, 5, 7]);
        assert_eq!(changed_by(8), vec![5, 7, 8]);
    }

    #[test]
    fn test_neighborhood_matches_adjacency_rule() {
        for i in 0..GRID_SIZE {
            let mut expected = vec![i];
            if i >= GRID_WIDTH {
                expected.push(i - GRID_WIDTH);
            }
            if i + GRID_WIDTH < GRID_SIZE {
                expected.push(i + GRID_WIDTH);
            }
            if i % GRID_WIDTH != 0 {
                expected.push(i - 1);
            }
            if i % GRID_WIDTH != GRID_WIDTH - 1 {
                expected.push(i + 1);
            }
            expected.sort_unstable();
            assert_eq!(NEIGHBORHOOD[i], expected.as_slice(), "index {i}");
        }
    }

    #[test]
    fn test_corner_edge_interior_sizes() {
        let sizes: Vec<usize> = NEIGHBORHOOD.iter().map(|n| n.len()).collect();
        assert_eq!(sizes, vec![3, 4, 3, 4, 5, 4, 3, 4, 3]);
    }

    #[test]
    fn test_toggle_out_of_range() {
        let mut grid = Grid::all_off();
        assert!(matches!(
            grid.toggle(9),
            Err(LightsOutError::IndexOutOfRange { index: 9 })
        ));
        assert!(grid.is_solved());
        assert_eq!(neighborhood(9), None);
    }

    #[test]
    fn test_try_from_slice() {
        let grid = Grid::try_from(&[0u8, 1, 1, 1, 0, 0, 1, 1, 1][..]).unwrap();
        assert_eq!(grid.lit_count(), 6);
        assert_eq!(grid.bits(), [0, 1, 1, 1, 0, 0, 1, 1, 1]);

        assert!(matches!(
            Grid::try_from(&[0u8, 1][..]),
            Err(LightsOutError::InvalidGridSize { len: 2 })
        ));
        assert!(matches!(
            Grid::try_from(&[2u8, 0, 0, 0, 0, 0, 0, 0, 0][..]),
            Err(LightsOutError::InvalidCell { .. })
        ));
    }

    #[test]
    fn test_display() {
        let grid = Grid::from_bits([1, 0, 0, 0, 1, 0, 0, 0, 1]).unwrap();
        assert_eq!(grid.to_string(), "■ □ □\n□ ■ □\n□ □ ■");
    }

    #[test]
    fn test_apply_solves_known_board() {
        let mut grid = Grid::from_bits([0, 1, 1, 1, 0, 0, 1, 1, 1]).unwrap();
        let press: PressVector = "110010101".parse().unwrap();
        grid.apply(&press);
        assert!(grid.is_solved());
    }

    #[test]
    fn test_apply_matches_checked_toggle() {
        let start = Grid::from_bits([1, 0, 1, 0, 0, 1, 0, 1, 0]).unwrap();
        let press: PressVector = "011100110".parse().unwrap();

        let mut applied = start;
        applied.apply(&press);

        let mut replay = start;
        for i in press.pressed() {
            replay.toggle(i).unwrap();
        }
        assert_eq!(applied, replay);
    }
}
