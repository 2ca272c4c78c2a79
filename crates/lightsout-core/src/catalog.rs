//! Predefined boards and the custom board loader.

use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::{LightsOutError, LightsOutResult};
use crate::grid::{Cell, GRID_SIZE, Grid};

/// Default file name for custom boards.
pub const CUSTOM_GRID_FILE: &str = "custom_grid.txt";

/// Built-in boards, row-major.
pub const CATALOG: [[u8; GRID_SIZE]; 18] = [
    [0, 1, 1, 1, 0, 0, 1, 1, 1],
    [0, 0, 1, 0, 1, 0, 1, 0, 1],
    [1, 0, 0, 1, 0, 0, 1, 1, 1],
    [1, 1, 1, 1, 0, 1, 1, 1, 1],
    [1, 0, 0, 0, 1, 0, 0, 1, 1],
    [1, 0, 1, 1, 0, 0, 1, 0, 1],
    [1, 0, 0, 0, 0, 1, 0, 1, 1],
    [1, 1, 1, 0, 1, 1, 0, 0, 1],
    [0, 1, 0, 0, 0, 1, 1, 0, 1],
    [1, 0, 1, 0, 0, 0, 1, 0, 0],
    [1, 1, 1, 0, 1, 0, 1, 1, 1],
    [0, 1, 0, 0, 1, 0, 1, 1, 1],
    [0, 0, 0, 0, 0, 1, 1, 0, 1],
    [0, 1, 1, 0, 0, 0, 1, 0, 0],
    [0, 0, 1, 0, 0, 1, 0, 0, 0],
    [1, 0, 1, 0, 0, 1, 0, 1, 0],
    [0, 0, 0, 0, 1, 1, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1],
];

/// The built-in boards.
pub fn builtin() -> Vec<Grid> {
    CATALOG
        .iter()
        .map(|&bits| Grid::new(bits.map(|b| Cell::from(b != 0))))
        .collect()
}

/// A uniformly chosen board, or `None` when `boards` is empty.
pub fn pick<R: Rng + ?Sized>(boards: &[Grid], rng: &mut R) -> Option<Grid> {
    boards.choose(rng).copied()
}

/// Parse comma- or whitespace-separated 0/1 values into boards of 9.
///
/// A value count of zero or one that does not split into whole boards is
/// `InvalidGridSize`; any value other than 0 or 1 is `InvalidCell`.
pub fn parse_custom(text: &str) -> LightsOutResult<Vec<Grid>> {
    let values = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| match token {
            "0" => Ok(0u8),
            "1" => Ok(1u8),
            other => Err(LightsOutError::InvalidCell {
                value: other.to_string(),
            }),
        })
        .collect::<LightsOutResult<Vec<u8>>>()?;

    if values.is_empty() || values.len() % GRID_SIZE != 0 {
        return Err(LightsOutError::InvalidGridSize { len: values.len() });
    }

    values.chunks(GRID_SIZE).map(Grid::try_from).collect()
}

/// Read and parse a custom board file.
pub fn load_custom(path: impl AsRef<Path>) -> LightsOutResult<Vec<Grid>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let boards = parse_custom(&text)?;
    debug!(path = %path.display(), boards = boards.len(), "loaded custom boards");
    Ok(boards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_catalog_is_binary() {
        for (i, bits) in CATALOG.iter().enumerate() {
            assert!(Grid::from_bits(*bits).is_ok(), "board {i}");
        }
        assert_eq!(builtin().len(), 18);
        assert_eq!(builtin()[0].bits(), [0, 1, 1, 1, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn test_pick() {
        let boards = builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let board = pick(&boards, &mut rng).unwrap();
        assert!(boards.contains(&board));
        assert_eq!(pick(&[], &mut rng), None);
    }

    #[test]
    fn test_parse_custom_two_boards() {
        let text = "1,0,0,0,1,0,0,0,1,\n0, 1, 0, 1, 1, 1, 0, 1, 0\n";
        let boards = parse_custom(text).unwrap();
        assert_eq!(boards.len(), 2);
        assert_eq!(boards[1].bits(), [0, 1, 0, 1, 1, 1, 0, 1, 0]);
    }

    #[test]
    fn test_parse_custom_rejects_partial_board() {
        let text = "1,0,0,0,1,0,0,0,1,1";
        assert!(matches!(
            parse_custom(text),
            Err(LightsOutError::InvalidGridSize { len: 10 })
        ));
        assert!(matches!(
            parse_custom("  "),
            Err(LightsOutError::InvalidGridSize { len: 0 })
        ));
    }

    #[test]
    fn test_parse_custom_rejects_bad_cell() {
        assert!(matches!(
            parse_custom("1,0,2,0,1,0,0,0,1"),
            Err(LightsOutError::InvalidCell { value }) if value == "2"
        ));
        assert!(matches!(
            parse_custom("1,0,x,0,1,0,0,0,1"),
            Err(LightsOutError::InvalidCell { .. })
        ));
    }

    #[test]
    fn test_load_custom_missing_file() {
        assert!(matches!(
            load_custom("/nonexistent/custom_grid.txt"),
            Err(LightsOutError::Io(_))
        ));
    }
}
