//! Amplitude-amplification solver.
//!
//! ```text
//! Idle ──→ CircuitBuilt ──→ Searching ──→ Sampled ──→ SolutionReady ──→ Idle
//! ```
//!
//! One pass per call. There is no retry and no resampling; a failure at
//! any phase is returned to the caller as is.

use std::fmt;

use lightsout_hal::{Backend, Counts};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::circuit::ConstraintCircuitBuilder;
use crate::error::{LightsOutError, LightsOutResult};
use crate::grid::Grid;
use crate::press::PressVector;

/// Shots per solve.
pub const DEFAULT_SHOTS: u32 = 5000;

/// Default minimum ratio of the top count to the runner-up.
pub const DEFAULT_DOMINANCE_RATIO: f64 = 2.0;

/// Solver settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Shots per execution.
    pub shots: u32,
    /// Required ratio of the top count over the runner-up. `None` accepts
    /// whatever comes out on top.
    pub dominance_ratio: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            dominance_ratio: Some(DEFAULT_DOMINANCE_RATIO),
        }
    }
}

/// Where a solve currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverPhase {
    Idle,
    CircuitBuilt,
    Searching,
    Sampled,
    SolutionReady,
}

impl SolverPhase {
    /// The following phase; `SolutionReady` wraps to `Idle`.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            SolverPhase::Idle => SolverPhase::CircuitBuilt,
            SolverPhase::CircuitBuilt => SolverPhase::Searching,
            SolverPhase::Searching => SolverPhase::Sampled,
            SolverPhase::Sampled => SolverPhase::SolutionReady,
            SolverPhase::SolutionReady => SolverPhase::Idle,
        }
    }
}

impl fmt::Display for SolverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SolverPhase::Idle => "idle",
            SolverPhase::CircuitBuilt => "circuit-built",
            SolverPhase::Searching => "searching",
            SolverPhase::Sampled => "sampled",
            SolverPhase::SolutionReady => "solution-ready",
        };
        f.write_str(name)
    }
}

/// One observed outcome and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasurementSample {
    pub bitstring: String,
    pub count: u64,
}

impl MeasurementSample {
    /// Interpret the bitstring as presses.
    pub fn press_vector(&self) -> LightsOutResult<PressVector> {
        self.bitstring.parse()
    }
}

/// Samples from one execution, most frequent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSet {
    samples: Vec<MeasurementSample>,
}

impl SampleSet {
    /// Sort counts by descending frequency, ties by bitstring.
    pub fn from_counts(counts: &Counts) -> Self {
        let samples = counts
            .sorted()
            .into_iter()
            .map(|(bitstring, count)| MeasurementSample {
                bitstring: bitstring.to_string(),
                count,
            })
            .collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[MeasurementSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn total_shots(&self) -> u64 {
        self.samples.iter().map(|s| s.count).sum()
    }

    pub fn top(&self) -> Option<&MeasurementSample> {
        self.samples.first()
    }

    pub fn runner_up(&self) -> Option<&MeasurementSample> {
        self.samples.get(1)
    }

    /// Fail unless the top count is at least `ratio` times the runner-up.
    /// A lone outcome always passes.
    pub fn check_dominance(&self, ratio: f64) -> LightsOutResult<()> {
        let top = self.top().ok_or(LightsOutError::EmptySampleSet)?;
        match self.runner_up() {
            Some(second) if (top.count as f64) < ratio * second.count as f64 => {
                Err(LightsOutError::NoDominantOutcome {
                    top: top.count,
                    runner_up: second.count,
                })
            }
            _ => Ok(()),
        }
    }
}

/// Size of the executed circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitStats {
    pub num_qubits: usize,
    pub gate_count: usize,
    pub depth: usize,
}

/// A press vector with the evidence behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub press: PressVector,
    pub samples: SampleSet,
    pub circuit: CircuitStats,
    pub execution_time_ms: Option<u64>,
}

impl Solution {
    /// Share of shots that produced the chosen press vector.
    pub fn confidence(&self) -> f64 {
        let total = self.samples.total_shots();
        match self.samples.top() {
            Some(top) if total > 0 => top.count as f64 / total as f64,
            _ => 0.0,
        }
    }
}

/// Grover search for the presses that clear a board.
///
/// The returned presses are not checked against the board; use
/// [`Grid::apply`] and [`Grid::is_solved`] for that.
pub struct Solver<B> {
    backend: B,
    config: SolverConfig,
}

impl<B: Backend> Solver<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SolverConfig::default())
    }

    pub fn with_config(backend: B, config: SolverConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The most frequent outcome for `grid`.
    pub async fn solve(&self, grid: &Grid) -> LightsOutResult<PressVector> {
        Ok(self.solve_detailed(grid).await?.press)
    }

    /// Like [`Solver::solve`], also returning the samples and circuit size.
    pub async fn solve_detailed(&self, grid: &Grid) -> LightsOutResult<Solution> {
        let mut phase = SolverPhase::Idle;

        let circuit = ConstraintCircuitBuilder::build(grid)?;
        let stats = CircuitStats {
            num_qubits: circuit.num_qubits(),
            gate_count: circuit.gate_count(),
            depth: circuit.depth(),
        };
        advance(&mut phase);

        // `execute` checks availability before submitting.
        advance(&mut phase);
        let result = self.backend.execute(&circuit, self.config.shots).await?;
        let samples = SampleSet::from_counts(&result.counts);
        advance(&mut phase);
        debug!(
            outcomes = samples.len(),
            shots = samples.total_shots(),
            "sampled search register"
        );

        if samples.total_shots() == 0 {
            return Err(LightsOutError::EmptySampleSet);
        }
        if let Some(ratio) = self.config.dominance_ratio {
            samples.check_dominance(ratio)?;
        }
        let press = samples
            .top()
            .ok_or(LightsOutError::EmptySampleSet)?
            .press_vector()?;
        advance(&mut phase);

        let solution = Solution {
            press,
            samples,
            circuit: stats,
            execution_time_ms: result.execution_time_ms,
        };
        info!(
            press = %solution.press,
            confidence = solution.confidence(),
            "solution ready"
        );
        advance(&mut phase);
        Ok(solution)
    }
}

fn advance(phase: &mut SolverPhase) {
    let next = phase.next();
    debug!(from = %phase, to = %next, "solver phase");
    *phase = next;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cycle() {
        let mut phase = SolverPhase::Idle;
        let mut seen = vec![phase];
        for _ in 0..5 {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(
            seen,
            vec![
                SolverPhase::Idle,
                SolverPhase::CircuitBuilt,
                SolverPhase::Searching,
                SolverPhase::Sampled,
                SolverPhase::SolutionReady,
                SolverPhase::Idle,
            ]
        );
    }

    #[test]
    fn test_sample_set_ordering() {
        let counts = Counts::from_pairs([("000000001", 3), ("110010101", 4700), ("000000010", 9)]);
        let samples = SampleSet::from_counts(&counts);
        assert_eq!(samples.len(), 3);
        assert_eq!(samples.total_shots(), 4712);
        assert_eq!(samples.top().unwrap().bitstring, "110010101");
        assert_eq!(samples.runner_up().unwrap().count, 9);
        assert!(samples.check_dominance(2.0).is_ok());
    }

    #[test]
    fn test_dominance_failure() {
        let counts = Counts::from_pairs([("000000001", 60), ("000000010", 40)]);
        let samples = SampleSet::from_counts(&counts);
        assert!(matches!(
            samples.check_dominance(2.0),
            Err(LightsOutError::NoDominantOutcome {
                top: 60,
                runner_up: 40
            })
        ));
        assert!(samples.check_dominance(1.5).is_ok());
    }

    #[test]
    fn test_dominance_single_and_empty() {
        let single = SampleSet::from_counts(&Counts::from_pairs([("000000000", 5)]));
        assert!(single.check_dominance(100.0).is_ok());

        let empty = SampleSet::default();
        assert!(matches!(
            empty.check_dominance(2.0),
            Err(LightsOutError::EmptySampleSet)
        ));
    }

    #[test]
    fn test_default_config() {
        let config = SolverConfig::default();
        assert_eq!(config.shots, 5000);
        assert_eq!(config.dominance_ratio, Some(2.0));
    }
}
