//! Lights-Out Circuit Intermediate Representation
//!
//! This crate provides the data structures used to describe the quantum
//! circuits built by the lights-out solver and executed by a backend.
//!
//! # Overview
//!
//! A [`Circuit`] is a flat, validated list of [`Instruction`]s over a set of
//! qubits and classical bits. Registers are named slices of those bits, so a
//! circuit can be printed as `tile[4]` rather than `q4`.
//!
//! The gate set is deliberately small: the solver only needs bit-flips,
//! Hadamards, phase flips and (multi-)controlled NOTs. Every gate in
//! [`StandardGate`] is self-inverse, which is what lets a propagation network
//! be undone by replaying it backwards.
//!
//! # Example: Building a Bell State
//!
//! ```rust
//! use lightsout_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("bell_state", 2, 2);
//!
//! circuit
//!     .h(QubitId(0))?
//!     .cx(QubitId(0), QubitId(1))?
//!     .measure(QubitId(0), ClbitId(0))?
//!     .measure(QubitId(1), ClbitId(1))?;
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.depth(), 3);
//! # Ok::<(), lightsout_ir::IrError>(())
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X` | 1 | Pauli-X (bit-flip) |
//! | `Z` | 1 | Pauli-Z (phase-flip) |
//! | `H` | 1 | Hadamard |
//! | `CX` | 2 | Controlled-NOT |
//! | `CZ` | 2 | Controlled-Z |
//! | `CCX` | 3 | Toffoli |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use error::{IrError, IrResult};
pub use gate::{Gate, StandardGate};
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Bit, Clbit, ClbitId, Qubit, QubitId};
