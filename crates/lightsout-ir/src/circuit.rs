//! High-level circuit builder API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A quantum circuit.
///
/// Instructions are validated as they are appended, so a `Circuit` never
/// references a bit it does not own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit, indexed by `QubitId`.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit, indexed by `ClbitId`.
    clbits: Vec<Clbit>,
    /// Instructions in program order.
    instructions: Vec<Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            instructions: vec![],
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    fn next_qubit_id(&self) -> QubitId {
        QubitId(self.qubits.len() as u32)
    }

    fn next_clbit_id(&self) -> ClbitId {
        ClbitId(self.clbits.len() as u32)
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = self.next_qubit_id();
        self.qubits.push(Qubit::new(id));
        id
    }

    /// Add a quantum register with multiple qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = self.next_qubit_id();
                self.qubits.push(Qubit::with_register(id, &name, i));
                id
            })
            .collect()
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = self.next_clbit_id();
        self.clbits.push(Clbit::new(id));
        id
    }

    /// Add a classical register with multiple bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        (0..size)
            .map(|i| {
                let id = self.next_clbit_id();
                self.clbits.push(Clbit::with_register(id, &name, i));
                id
            })
            .collect()
    }

    /// Validate and append an instruction.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        self.validate(&instruction)?;
        self.instructions.push(instruction);
        Ok(self)
    }

    fn validate(&self, instruction: &Instruction) -> IrResult<()> {
        let context = || Some(instruction.name().to_string());

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let got = instruction.qubits.len() as u32;
            if got != gate.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: gate.num_qubits(),
                    got,
                });
            }
        }

        for (pos, &qubit) in instruction.qubits.iter().enumerate() {
            if qubit.index() >= self.qubits.len() {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: context(),
                });
            }
            if instruction.qubits[..pos].contains(&qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: context(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if clbit.index() >= self.clbits.len() {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: context(),
                });
            }
        }

        Ok(())
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::X, qubit))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::Z, qubit))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::single_qubit_gate(StandardGate::H, qubit))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CX, control, target))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::two_qubit_gate(StandardGate::CZ, control, target))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))
    }

    /// Apply a multi-controlled X gate.
    ///
    /// Up to two controls map directly onto `x`, `cx` and `ccx`. Three
    /// controls use one clean ancilla: the first two controls are ANDed into
    /// the ancilla, a Toffoli with the third control flips the target, and the
    /// ancilla is uncomputed back to |0⟩.
    pub fn mcx(
        &mut self,
        controls: &[QubitId],
        target: QubitId,
        ancilla: Option<QubitId>,
    ) -> IrResult<&mut Self> {
        match (controls, ancilla) {
            ([], _) => self.x(target),
            ([c], _) => self.cx(*c, target),
            ([c1, c2], _) => self.ccx(*c1, *c2, target),
            ([c1, c2, c3], Some(anc)) => {
                self.ccx(*c1, *c2, anc)?
                    .ccx(anc, *c3, target)?
                    .ccx(*c1, *c2, anc)
            }
            _ => Err(IrError::UnsupportedControlCount {
                controls: controls.len(),
            }),
        }
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.apply(Instruction::measure(qubit, clbit))
    }

    /// Apply a barrier to the specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.apply(Instruction::barrier(qubits))
    }

    // =========================================================================
    // Transformations
    // =========================================================================

    /// Return a copy of the circuit with the bit order reversed.
    ///
    /// Qubit `i` becomes qubit `n - 1 - i` and classical bit `j` becomes
    /// `m - 1 - j`, keeping register membership. Measured bitstrings of the
    /// reversed circuit therefore read in the opposite order.
    #[must_use]
    pub fn reverse_bits(&self) -> Self {
        let nq = self.qubits.len() as u32;
        let nc = self.clbits.len() as u32;
        let flip_q = |q: QubitId| QubitId(nq - 1 - q.0);
        let flip_c = |c: ClbitId| ClbitId(nc - 1 - c.0);

        let qubits = self
            .qubits
            .iter()
            .rev()
            .enumerate()
            .map(|(i, q)| q.relabel(QubitId(i as u32)))
            .collect();
        let clbits = self
            .clbits
            .iter()
            .rev()
            .enumerate()
            .map(|(i, c)| c.relabel(ClbitId(i as u32)))
            .collect();
        let instructions = self
            .instructions
            .iter()
            .map(|inst| Instruction {
                kind: inst.kind.clone(),
                qubits: inst.qubits.iter().copied().map(flip_q).collect(),
                clbits: inst.clbits.iter().copied().map(flip_c).collect(),
            })
            .collect();

        Self {
            name: self.name.clone(),
            qubits,
            clbits,
            instructions,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Get the instructions in program order.
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Number of gate instructions (measurements and barriers excluded).
    pub fn gate_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_gate()).count()
    }

    /// Count instructions by name.
    pub fn count_ops(&self) -> BTreeMap<&'static str, usize> {
        let mut ops = BTreeMap::new();
        for inst in &self.instructions {
            *ops.entry(inst.name()).or_insert(0) += 1;
        }
        ops
    }

    /// Get the circuit depth.
    ///
    /// Each wire tracks the layer of its latest operation; an instruction sits
    /// one layer above the deepest wire it touches. Barriers align their wires
    /// without adding a layer.
    pub fn depth(&self) -> usize {
        let mut qubit_level = vec![0usize; self.qubits.len()];
        let mut clbit_level = vec![0usize; self.clbits.len()];
        let mut depth = 0;

        for inst in &self.instructions {
            let front = inst
                .qubits
                .iter()
                .map(|q| qubit_level[q.index()])
                .chain(inst.clbits.iter().map(|c| clbit_level[c.index()]))
                .max()
                .unwrap_or(0);
            let level = if inst.is_barrier() { front } else { front + 1 };
            for q in &inst.qubits {
                qubit_level[q.index()] = level;
            }
            for c in &inst.clbits {
                clbit_level[c.index()] = level;
            }
            depth = depth.max(level);
        }

        depth
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit.
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::with_size("bell", 2, 2);
        circuit
            .h(QubitId(0))?
            .cx(QubitId(0), QubitId(1))?
            .measure(QubitId(0), ClbitId(0))?
            .measure(QubitId(1), ClbitId(1))?;
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new("test");
        assert_eq!(circuit.name(), "test");
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(circuit.depth(), 0);
    }

    #[test]
    fn test_add_registers() {
        let mut circuit = Circuit::new("test");
        let tile = circuit.add_qreg("tile", 9);
        let flip = circuit.add_qreg("flip", 9);
        let out = circuit.add_creg("result", 9);

        assert_eq!(tile[0], QubitId(0));
        assert_eq!(flip[0], QubitId(9));
        assert_eq!(out[8], ClbitId(8));
        assert_eq!(circuit.num_qubits(), 18);
        assert_eq!(format!("{}", circuit.qubits()[10]), "flip[1]");
    }

    #[test]
    fn test_bell_state_depth() {
        let circuit = Circuit::bell().unwrap();
        assert_eq!(circuit.depth(), 3); // H, CX, parallel measures
        assert_eq!(circuit.gate_count(), 2);
    }

    #[test]
    fn test_unknown_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let err = circuit.cx(QubitId(0), QubitId(5)).unwrap_err();
        assert!(matches!(err, IrError::QubitNotFound { qubit: QubitId(5), .. }));
        assert_eq!(circuit.instructions().len(), 0);
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut circuit = Circuit::with_size("test", 3, 0);
        let err = circuit.ccx(QubitId(0), QubitId(1), QubitId(0)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { qubit: QubitId(0), .. }));
    }

    #[test]
    fn test_arity_checked() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let err = circuit
            .apply(Instruction::gate(StandardGate::CX, [QubitId(0)]))
            .unwrap_err();
        assert!(matches!(
            err,
            IrError::QubitCountMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_mcx_three_controls_uses_ancilla() {
        let mut circuit = Circuit::with_size("test", 5, 0);
        let controls = [QubitId(0), QubitId(1), QubitId(2)];
        circuit
            .mcx(&controls, QubitId(3), Some(QubitId(4)))
            .unwrap();

        let ops = circuit.count_ops();
        assert_eq!(ops.get("ccx"), Some(&3));
        // Ancilla is touched by the compute and uncompute Toffolis only
        let ancilla_uses = circuit
            .instructions()
            .iter()
            .filter(|i| i.qubits.contains(&QubitId(4)))
            .count();
        assert_eq!(ancilla_uses, 3);
    }

    #[test]
    fn test_mcx_without_ancilla_fails() {
        let mut circuit = Circuit::with_size("test", 4, 0);
        let err = circuit
            .mcx(&[QubitId(0), QubitId(1), QubitId(2)], QubitId(3), None)
            .unwrap_err();
        assert!(matches!(err, IrError::UnsupportedControlCount { controls: 3 }));
    }

    #[test]
    fn test_reverse_bits() {
        let mut circuit = Circuit::new("test");
        let q = circuit.add_qreg("q", 3);
        let c = circuit.add_creg("c", 3);
        circuit.cx(q[0], q[1]).unwrap().measure(q[0], c[0]).unwrap();

        let reversed = circuit.reverse_bits();
        let inst = &reversed.instructions()[0];
        assert_eq!(inst.qubits, vec![QubitId(2), QubitId(1)]);
        let meas = &reversed.instructions()[1];
        assert_eq!(meas.qubits, vec![QubitId(2)]);
        assert_eq!(meas.clbits, vec![ClbitId(2)]);
        assert_eq!(format!("{}", reversed.qubits()[2]), "q[0]");

        // Involution
        assert_eq!(reversed.reverse_bits(), circuit);
    }
}
