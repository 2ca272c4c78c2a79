//! Simulator backend implementation.

use async_trait::async_trait;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use lightsout_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, Counts,
    ExecutionResult, HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use lightsout_ir::{Circuit, InstructionKind};

use crate::statevector::{Statevector, outcome_to_bitstring};

/// Default qubit limit. The solver circuit needs 20.
pub const DEFAULT_MAX_QUBITS: u32 = 24;

/// Basis indices are `u64`.
const HARD_MAX_QUBITS: u32 = 64;

/// Finished jobs kept for callers that submit without releasing. The oldest
/// finished job is evicted beyond this.
pub const MAX_RETAINED_JOBS: usize = 1024;

/// Job data for the simulator.
struct SimJob {
    /// Submission order, used to evict the oldest job first.
    seq: u64,
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local sparse statevector simulator.
///
/// Jobs run to completion inside [`Backend::submit`], so a job is
/// `Completed` or `Failed` by the time its id is returned.
pub struct SimulatorBackend {
    config: BackendConfig,
    capabilities: Capabilities,
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
    next_seq: AtomicU64,
    max_qubits: u32,
    seed: Option<u64>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with custom max qubits (capped at 64).
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        let max_qubits = max_qubits.min(HARD_MAX_QUBITS);
        Self {
            config: BackendConfig::new("simulator"),
            capabilities: Capabilities::simulator(max_qubits),
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
            next_seq: AtomicU64::new(0),
            max_qubits,
            seed: None,
        }
    }

    /// Fix the sampling seed. Every job then draws the same shot sequence
    /// for the same circuit.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The configured seed, if any.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Number of jobs currently held.
    pub fn job_count(&self) -> usize {
        self.lock_jobs().len()
    }

    /// Collect `(qubit, clbit)` pairs, rejecting gates after a measurement
    /// on the same qubit.
    fn terminal_measurements(circuit: &Circuit) -> Result<Vec<(usize, usize)>, String> {
        let mut measured_qubits = FxHashSet::default();
        let mut measured = Vec::new();

        for inst in circuit.instructions() {
            match &inst.kind {
                InstructionKind::Measure => {
                    for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                        measured_qubits.insert(q.index());
                        measured.push((q.index(), c.index()));
                    }
                }
                InstructionKind::Gate(gate) => {
                    let after_measure = inst
                        .qubits
                        .iter()
                        .find(|q| measured_qubits.contains(&q.index()));
                    if let Some(q) = after_measure {
                        return Err(format!(
                            "gate '{}' acts on {} after it was measured",
                            gate.name(),
                            q
                        ));
                    }
                }
                InstructionKind::Barrier => {}
            }
        }

        Ok(measured)
    }

    /// Evolve the state once and sample all shots from it.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        let measured =
            Self::terminal_measurements(circuit).map_err(HalError::Unsupported)?;

        debug!(
            "Starting simulation: {} qubits, {} instructions, {} shots",
            circuit.num_qubits(),
            circuit.instructions().len(),
            shots
        );

        let mut sv = Statevector::new(circuit.num_qubits());
        for inst in circuit.instructions() {
            sv.apply(inst);
        }
        debug!("Final state has {} populated basis states", sv.support_size());

        let marginal = sv.marginal(&measured);
        let weights = WeightedIndex::new(marginal.iter().map(|(_, p)| *p))
            .map_err(|e| HalError::JobFailed(format!("cannot sample final state: {e}")))?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut tallies = vec![0u64; marginal.len()];
        for _ in 0..shots {
            tallies[weights.sample(&mut rng)] += 1;
        }

        let num_clbits = circuit.num_clbits();
        let mut counts = Counts::new();
        for ((outcome, _), n) in marginal.iter().zip(tallies) {
            if n > 0 {
                counts.insert(outcome_to_bitstring(*outcome, num_clbits), n);
            }
        }

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(ExecutionResult::new(counts, shots)
            .with_execution_time(elapsed.as_millis() as u64)
            .with_metadata(serde_json::json!({
                "method": "sparse_statevector",
                "support_size": sv.support_size(),
                "seed": self.seed,
            })))
    }

    fn lock_jobs(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, SimJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let mut reasons = Vec::new();

        if circuit.num_qubits() > self.max_qubits as usize {
            reasons.push(format!(
                "circuit has {} qubits but simulator supports {}",
                circuit.num_qubits(),
                self.max_qubits
            ));
        }

        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                if !self.capabilities.supports_gate(gate.name()) {
                    reasons.push(format!("unsupported gate '{}'", gate.name()));
                }
            }
        }

        if let Err(reason) = Self::terminal_measurements(circuit) {
            reasons.push(reason);
        }

        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if circuit.num_qubits() > self.max_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but simulator only supports {}",
                circuit.num_qubits(),
                self.max_qubits
            )));
        }
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} not in 1..={}",
                self.capabilities.max_shots
            )));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let job = Job::new(job_id.clone(), shots).with_backend(self.name());
        {
            let mut jobs = self.lock_jobs();
            evict_finished(&mut jobs, MAX_RETAINED_JOBS - 1);
            jobs.insert(
                job_id.0.clone(),
                SimJob {
                    seq: self.next_seq.fetch_add(1, Ordering::Relaxed),
                    job,
                    result: None,
                },
            );
        }
        debug!("Submitted job: {}", job_id);

        let outcome = self.run_simulation(circuit, shots);

        let mut jobs = self.lock_jobs();
        if let Some(sim_job) = jobs.get_mut(&job_id.0) {
            match outcome {
                Ok(result) => {
                    sim_job.result = Some(result);
                    sim_job.job.transition(JobStatus::Completed);
                }
                Err(e) => {
                    warn!("Job {} failed: {}", job_id, e);
                    sim_job.job.transition(JobStatus::Failed(e.to_string()));
                }
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.lock_jobs()
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.lock_jobs();
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;

        match (&sim_job.job.status, &sim_job.result) {
            (JobStatus::Completed, Some(result)) => Ok(result.clone()),
            (JobStatus::Failed(msg), _) => Err(HalError::JobFailed(msg.clone())),
            (JobStatus::Cancelled, _) => Err(HalError::JobCancelled),
            (status, _) => Err(HalError::JobFailed(format!(
                "job {job_id} has no result (status: {status})"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.lock_jobs();
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        sim_job.job.transition(JobStatus::Cancelled);
        Ok(())
    }

    async fn release(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.lock_jobs();
        if jobs.get(&job_id.0).is_some_and(|j| j.job.status.is_terminal()) {
            jobs.remove(&job_id.0);
            debug!("Released job: {}", job_id);
        }
        Ok(())
    }
}

/// Drop the oldest finished jobs until at most `keep` remain.
fn evict_finished(jobs: &mut FxHashMap<String, SimJob>, keep: usize) {
    while jobs.len() > keep {
        let oldest = jobs
            .iter()
            .filter(|(_, j)| j.job.status.is_terminal())
            .min_by_key(|(_, j)| j.seq)
            .map(|(id, _)| id.clone());
        match oldest {
            Some(id) => {
                jobs.remove(&id);
            }
            None => break,
        }
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.extra_u64("max_qubits")? {
            Some(n) => u32::try_from(n)
                .map_err(|_| HalError::Configuration(format!("max_qubits {n} out of range")))?,
            None => DEFAULT_MAX_QUBITS,
        };
        let seed = config.extra_u64("seed")?;

        let mut backend = Self::with_max_qubits(max_qubits);
        backend.seed = seed;
        backend.config = config;
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightsout_ir::{ClbitId, QubitId};

    #[test]
    fn test_terminal_measurements_rejects_mid_circuit() {
        let mut circuit = Circuit::with_size("mid", 1, 1);
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.x(QubitId(0)).unwrap();
        assert!(SimulatorBackend::terminal_measurements(&circuit).is_err());
    }

    #[test]
    fn test_from_config() {
        let config = BackendConfig::new("simulator")
            .with_extra("seed", serde_json::json!(11))
            .with_extra("max_qubits", serde_json::json!(100));
        let backend = SimulatorBackend::from_config(config).unwrap();
        assert_eq!(backend.seed(), Some(11));
        assert_eq!(backend.capabilities().num_qubits, 64);
    }
}
