//! Quantum gate types.

use serde::{Deserialize, Serialize};

/// Standard gates with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// Pauli-X (bit-flip) gate.
    X,
    /// Pauli-Z (phase-flip) gate.
    Z,
    /// Hadamard gate.
    H,
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Z gate.
    CZ,
    /// Toffoli gate (CCX).
    CCX,
}

impl StandardGate {
    /// Get the name of this gate (OpenQASM 3 naming).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::CX => "cx",
            StandardGate::CZ => "cz",
            StandardGate::CCX => "ccx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::X | StandardGate::Z | StandardGate::H => 1,
            StandardGate::CX | StandardGate::CZ => 2,
            StandardGate::CCX => 3,
        }
    }

    /// Whether applying the gate twice is the identity.
    ///
    /// True for the whole supported set; kept as a method so a caller that
    /// reverses a gate sequence can assert it rather than assume it.
    #[inline]
    pub fn is_self_inverse(&self) -> bool {
        true
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: StandardGate,
    /// Optional label for the gate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new unlabeled gate.
    pub fn standard(kind: StandardGate) -> Self {
        Self { kind, label: None }
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }
}

impl From<StandardGate> for Gate {
    fn from(kind: StandardGate) -> Self {
        Gate::standard(kind)
    }
}
