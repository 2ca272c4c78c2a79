//! Sparse statevector simulation engine.

use num_complex::Complex64;
use rustc_hash::FxHashMap;
use std::f64::consts::FRAC_1_SQRT_2;

use lightsout_ir::{Instruction, InstructionKind, StandardGate};

/// Amplitudes below this magnitude are dropped after interfering gates.
const PRUNE_THRESHOLD: f64 = 1e-12;

/// A quantum state stored as a map from basis index to amplitude.
///
/// Bit `q` of a basis index is the value of qubit `q`.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: FxHashMap<u64, Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    ///
    /// Basis indices are `u64`, so at most 64 qubits are representable.
    pub fn new(num_qubits: usize) -> Self {
        debug_assert!(num_qubits <= 64);
        let mut amplitudes = FxHashMap::default();
        amplitudes.insert(0, Complex64::new(1.0, 0.0));
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Number of basis states currently holding amplitude.
    pub fn support_size(&self) -> usize {
        self.amplitudes.len()
    }

    /// Amplitude of a basis state.
    pub fn amplitude(&self, basis: u64) -> Complex64 {
        self.amplitudes
            .get(&basis)
            .copied()
            .unwrap_or(Complex64::new(0.0, 0.0))
    }

    /// Probability of a basis state.
    pub fn probability(&self, basis: u64) -> f64 {
        self.amplitude(basis).norm_sqr()
    }

    /// Sum of all probabilities. Stays at 1 up to rounding.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.values().map(|a| a.norm_sqr()).sum()
    }

    /// Apply an instruction. Measurements and barriers leave the state alone.
    pub fn apply(&mut self, instruction: &Instruction) {
        if let InstructionKind::Gate(gate) = &instruction.kind {
            let qubits: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
            self.apply_standard_gate(gate.kind, &qubits);
        }
    }

    /// Apply a standard gate to specific qubits.
    pub fn apply_standard_gate(&mut self, gate: StandardGate, qubits: &[usize]) {
        match gate {
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::CCX => self.apply_ccx(qubits[0], qubits[1], qubits[2]),
        }
    }

    /// Relabel basis states through a bijection on indices.
    fn permute(&mut self, f: impl Fn(u64) -> u64) {
        self.amplitudes = std::mem::take(&mut self.amplitudes)
            .into_iter()
            .map(|(basis, amp)| (f(basis), amp))
            .collect();
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1u64 << qubit;
        self.permute(|basis| basis ^ mask);
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let c = 1u64 << control;
        let t = 1u64 << target;
        self.permute(|basis| if basis & c != 0 { basis ^ t } else { basis });
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let controls = (1u64 << c1) | (1u64 << c2);
        let t = 1u64 << target;
        self.permute(|basis| {
            if basis & controls == controls {
                basis ^ t
            } else {
                basis
            }
        });
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1u64 << qubit;
        for (basis, amp) in &mut self.amplitudes {
            if basis & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_cz(&mut self, q1: usize, q2: usize) {
        let mask = (1u64 << q1) | (1u64 << q2);
        for (basis, amp) in &mut self.amplitudes {
            if basis & mask == mask {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1u64 << qubit;
        let mut next: FxHashMap<u64, Complex64> =
            FxHashMap::with_capacity_and_hasher(self.amplitudes.len() * 2, Default::default());

        for (basis, amp) in self.amplitudes.drain() {
            let scaled = amp * FRAC_1_SQRT_2;
            let zero = basis & !mask;
            let one = basis | mask;
            *next.entry(zero).or_default() += scaled;
            if basis & mask == 0 {
                *next.entry(one).or_default() += scaled;
            } else {
                *next.entry(one).or_default() -= scaled;
            }
        }

        next.retain(|_, amp| amp.norm() >= PRUNE_THRESHOLD);
        self.amplitudes = next;
    }

    /// Distribution over measurement outcomes.
    ///
    /// `measured` lists `(qubit, clbit)` pairs; the outcome key has bit `c`
    /// set when the qubit measured into clbit `c` is 1. The result is sorted
    /// by outcome so sampling from it is reproducible under a fixed seed.
    pub fn marginal(&self, measured: &[(usize, usize)]) -> Vec<(u64, f64)> {
        let mut outcomes: FxHashMap<u64, f64> = FxHashMap::default();
        for (basis, amp) in &self.amplitudes {
            let mut outcome = 0u64;
            for &(qubit, clbit) in measured {
                if basis & (1u64 << qubit) != 0 {
                    outcome |= 1u64 << clbit;
                }
            }
            *outcomes.entry(outcome).or_default() += amp.norm_sqr();
        }

        let mut sorted: Vec<(u64, f64)> = outcomes.into_iter().collect();
        sorted.sort_unstable_by_key(|(outcome, _)| *outcome);
        sorted
    }
}

/// Render an outcome as a bitstring with clbit 0 rightmost.
pub fn outcome_to_bitstring(outcome: u64, num_clbits: usize) -> String {
    (0..num_clbits)
        .rev()
        .map(|c| if outcome & (1u64 << c) != 0 { '1' } else { '0' })
        .collect()
}
