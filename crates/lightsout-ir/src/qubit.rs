//! Qubit and classical bit types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl QubitId {
    /// Position of this qubit in the circuit's qubit list.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// Unique identifier for a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ClbitId(pub u32);

impl ClbitId {
    /// Position of this bit in the circuit's classical bit list.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ClbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for ClbitId {
    fn from(id: u32) -> Self {
        ClbitId(id)
    }
}

/// A quantum or classical bit with optional register membership.
///
/// The register name and index are only used for display; operations always
/// address bits by id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bit<I> {
    /// The unique identifier.
    pub id: I,
    /// The name of the register this bit belongs to, if any.
    pub register: Option<String>,
    /// The index within the register, if any.
    pub index: Option<u32>,
}

/// A qubit.
pub type Qubit = Bit<QubitId>;

/// A classical bit.
pub type Clbit = Bit<ClbitId>;

impl<I> Bit<I> {
    /// Create a bit that belongs to no register.
    pub fn new(id: I) -> Self {
        Self {
            id,
            register: None,
            index: None,
        }
    }

    /// Create a bit at `index` of the named register.
    pub fn with_register(id: I, register: impl Into<String>, index: u32) -> Self {
        Self {
            id,
            register: Some(register.into()),
            index: Some(index),
        }
    }

    /// Same register membership, different id.
    pub(crate) fn relabel<J>(&self, id: J) -> Bit<J> {
        Bit {
            id,
            register: self.register.clone(),
            index: self.index,
        }
    }
}

impl<I: fmt::Display> fmt::Display for Bit<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.register, self.index) {
            (Some(reg), Some(idx)) => write!(f, "{reg}[{idx}]"),
            _ => write!(f, "{}", self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        let q = Qubit::new(QubitId(0));
        assert_eq!(format!("{q}"), "q0");

        let q_reg = Qubit::with_register(QubitId(11), "flip", 2);
        assert_eq!(format!("{q_reg}"), "flip[2]");
    }

    #[test]
    fn test_clbit_display() {
        let c = Clbit::new(ClbitId(3));
        assert_eq!(format!("{c}"), "c3");

        let c_reg = Clbit::with_register(ClbitId(1), "result", 1);
        assert_eq!(format!("{c_reg}"), "result[1]");
    }

    #[test]
    fn test_relabel_keeps_register() {
        let q = Qubit::with_register(QubitId(4), "tile", 4);
        let moved = q.relabel(QubitId(15));
        assert_eq!(moved.id, QubitId(15));
        assert_eq!(format!("{moved}"), "tile[4]");
    }
}
