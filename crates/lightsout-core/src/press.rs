//! Press vectors: which cells to press.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{LightsOutError, LightsOutResult};
use crate::grid::GRID_SIZE;

/// Nine press bits; bit `i` set means "press cell `i`".
///
/// The text form is nine `0`/`1` characters, character `k` being grid
/// index `k`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PressVector {
    bits: [bool; GRID_SIZE],
}

impl PressVector {
    pub fn new(bits: [bool; GRID_SIZE]) -> Self {
        Self { bits }
    }

    /// Whether `index` is pressed. Indices off the board never are.
    pub fn is_pressed(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Pressed indices in ascending order.
    pub fn pressed(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, pressed)| **pressed)
            .map(|(i, _)| i)
    }

    /// Number of presses.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    pub fn bits(&self) -> &[bool; GRID_SIZE] {
        &self.bits
    }

    /// Parse a 9-character `0`/`1` string.
    pub fn parse_bitstring(s: &str) -> LightsOutResult<Self> {
        let invalid = || LightsOutError::InvalidBitstring(s.to_string());
        if s.chars().count() != GRID_SIZE {
            return Err(invalid());
        }
        let mut bits = [false; GRID_SIZE];
        for (bit, ch) in bits.iter_mut().zip(s.chars()) {
            *bit = match ch {
                '0' => false,
                '1' => true,
                _ => return Err(invalid()),
            };
        }
        Ok(Self { bits })
    }
}

impl FromStr for PressVector {
    type Err = LightsOutError;

    fn from_str(s: &str) -> LightsOutResult<Self> {
        Self::parse_bitstring(s)
    }
}

impl fmt::Display for PressVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        let press: PressVector = "110010101".parse().unwrap();
        assert!(press.is_pressed(0));
        assert!(!press.is_pressed(2));
        assert!(press.is_pressed(8));
        assert!(!press.is_pressed(42));
        assert_eq!(press.count(), 5);
        assert_eq!(press.pressed().collect::<Vec<_>>(), vec![0, 1, 4, 6, 8]);
        assert_eq!(press.to_string(), "110010101");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        for bad in ["", "11001010", "1100101011", "11001010x", "１１００１０１０１"] {
            assert!(
                matches!(
                    bad.parse::<PressVector>(),
                    Err(LightsOutError::InvalidBitstring(_))
                ),
                "{bad:?}"
            );
        }
    }
}
