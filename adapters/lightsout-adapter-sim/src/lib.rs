//! Lights-Out Local Simulator
//!
//! A sparse statevector simulator implementing [`lightsout_hal::Backend`].
//!
//! Only basis states with non-negligible amplitude are stored, so cost
//! scales with the number of populated states rather than with `2^n`. The
//! solver circuit touches 20 qubits but never holds more than a handful of
//! populated states: Hadamards only ever act on the search and oracle
//! qubits, and everything else is reversible classical logic.
//!
//! The state is evolved once per job. Shots are then drawn from the
//! marginal distribution of the measured qubits, which requires every
//! measurement to be terminal.
//!
//! # Example
//!
//! ```ignore
//! use lightsout_adapter_sim::SimulatorBackend;
//! use lightsout_hal::Backend;
//! use lightsout_ir::Circuit;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new().with_seed(7);
//!     println!("Max qubits: {}", backend.capabilities().num_qubits);
//!
//!     let result = backend.execute(&Circuit::bell()?, 1000).await?;
//!     println!("{:?}", result.counts.sorted());
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::{DEFAULT_MAX_QUBITS, MAX_RETAINED_JOBS, SimulatorBackend};
pub use statevector::Statevector;
