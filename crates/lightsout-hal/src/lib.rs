//! Lights-Out Hardware Abstraction Layer
//!
//! This crate is the seam between the solver and whatever executes its
//! circuits. The solver only ever talks to a [`Backend`]; the bundled local
//! simulator lives in `lightsout-adapter-sim`, and any other executor (a
//! remote service, a different simulator) plugs in by implementing the same
//! trait.
//!
//! # Overview
//!
//! - [`Backend`] for job submission and result retrieval
//! - [`Capabilities`] to describe what a backend accepts
//! - [`Job`], [`JobId`], [`JobStatus`] for the job lifecycle
//! - [`Counts`] and [`ExecutionResult`] for measurement results
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use lightsout_hal::Backend;
//! use lightsout_adapter_sim::SimulatorBackend;
//! use lightsout_ir::Circuit;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let circuit = Circuit::bell()?;
//!     let backend = SimulatorBackend::new();
//!
//!     let result = backend.execute(&circuit, 1000).await?;
//!     if let Some((bitstring, count)) = result.counts.sorted().first() {
//!         println!("Most frequent: {} ({} times)", bitstring, count);
//!     }
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod result;

pub use backend::{Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use result::{Counts, ExecutionResult};
