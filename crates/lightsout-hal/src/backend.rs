//! The backend trait and its supporting types.
//!
//! ```text
//! capabilities() ──→ validate() ──→ submit() ──→ status() ──→ result()
//!    (sync)            (async)       (async)      (async)      (async)
//! ```
//!
//! [`Backend::execute`] strings the whole sequence together for callers that
//! only want counts back, which is what the solver does.

use std::time::Duration;

use async_trait::async_trait;
use lightsout_ir::Circuit;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Construction-time settings for a backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Backend name.
    pub name: String,
    /// Backend-specific options such as `seed` or `max_qubits`.
    #[serde(default)]
    pub extra: FxHashMap<String, serde_json::Value>,
}

impl BackendConfig {
    /// Create a new backend configuration.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add an extra option.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// Read an extra option as an unsigned integer.
    ///
    /// A present key with a non-integer value is an error rather than being
    /// silently ignored.
    pub fn extra_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!("'{key}' must be an unsigned integer, got {value}"))
            }),
        }
    }
}

/// Something that can run circuits and report measurement counts.
///
/// - `capabilities()` is synchronous; implementations cache it.
/// - `submit()` returns a job that starts `Queued`.
/// - `result()` is only meaningful once `status()` reports `Completed`.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Get the name of this backend.
    fn name(&self) -> &str;

    /// Get the capabilities of this backend.
    fn capabilities(&self) -> &Capabilities;

    /// Check whether the backend is accepting jobs.
    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Check a circuit against qubit count and gate set.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Submit a circuit for execution.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    /// Get the status of a job.
    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Get the result of a completed job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Cancel a queued or running job.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Forget a finished job once its result has been collected.
    ///
    /// Backends that keep per-job state drop it here; the job id is unknown
    /// afterwards. Releasing a job that is still queued or running is a
    /// no-op.
    async fn release(&self, job_id: &JobId) -> HalResult<()> {
        let _ = job_id;
        Ok(())
    }

    /// Wait for a job to complete and return its result.
    ///
    /// Polls every 500ms for up to 5 minutes.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let poll_interval = Duration::from_millis(500);
        let max_polls = 600;

        for _ in 0..max_polls {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    tokio::time::sleep(poll_interval).await;
                }
            }
        }

        Err(HalError::Timeout(job_id.0.clone()))
    }

    /// Validate, submit, wait and release in one call.
    async fn execute(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let availability = self.availability().await?;
        if !availability.is_available {
            return Err(HalError::BackendUnavailable(
                availability
                    .status_message
                    .unwrap_or_else(|| self.name().to_string()),
            ));
        }

        match self.validate(circuit).await? {
            ValidationResult::Valid => {}
            ValidationResult::Invalid { reasons } => {
                return Err(HalError::InvalidCircuit(reasons.join("; ")));
            }
        }

        let job_id = self.submit(circuit, shots).await?;
        debug!(backend = self.name(), job = %job_id, shots, "job submitted");
        let outcome = self.wait(&job_id).await;
        if let Err(e) = self.release(&job_id).await {
            debug!(job = %job_id, error = %e, "release failed");
        }
        outcome
    }
}

/// Backend availability information.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    /// Whether the backend is currently accepting jobs.
    pub is_available: bool,
    /// Human-readable status message.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Availability of a local simulator.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            status_message: None,
        }
    }

    /// Create availability for an offline backend.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            status_message: Some(reason.into()),
        }
    }
}

/// Outcome of checking a circuit against backend constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Circuit can be submitted as-is.
    Valid,
    /// Circuit cannot run on this backend.
    Invalid {
        /// Reasons the circuit is invalid.
        reasons: Vec<String>,
    },
}

impl ValidationResult {
    /// Check if the circuit is valid.
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }
}

/// Trait for creating backends from configuration.
pub trait BackendFactory: Backend + Sized {
    /// Create a backend from configuration.
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}
