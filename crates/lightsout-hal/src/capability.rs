//! Backend capability introspection.

use serde::{Deserialize, Serialize};

/// What a backend can execute.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM 3 naming convention).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator (`true`) or real hardware (`false`).
    pub is_simulator: bool,
    /// Additional capability flags, e.g. `"sparse_statevector"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Capabilities of a local simulator with the given width.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::classical_reversible_with_h(),
            max_shots: 100_000,
            is_simulator: true,
            features: vec!["sparse_statevector".into(), "terminal_measurement".into()],
        }
    }

    /// Check whether a gate name is accepted.
    pub fn supports_gate(&self, name: &str) -> bool {
        self.gate_set.contains(name)
    }
}

/// Gates a backend accepts, grouped by arity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
}

impl GateSet {
    /// X/Z/H plus controlled NOT and phase, plus Toffoli.
    ///
    /// This is everything the lights-out circuit needs: reversible classical
    /// logic, Hadamards for superposition and phase flips for the diffusion.
    pub fn classical_reversible_with_h() -> Self {
        Self {
            single_qubit: vec!["x".into(), "z".into(), "h".into()],
            two_qubit: vec!["cx".into(), "cz".into()],
            three_qubit: vec!["ccx".into()],
        }
    }

    /// Check whether a gate name is in the set.
    pub fn contains(&self, name: &str) -> bool {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .chain(&self.three_qubit)
            .any(|g| g == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(20);
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 20);
        assert!(caps.supports_gate("ccx"));
        assert!(caps.supports_gate("h"));
        assert!(!caps.supports_gate("rx"));
    }
}
