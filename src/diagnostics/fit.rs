use super::timing::TimingBreakdown;
use serde::Serialize;

/// Lifecycle of a training session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FitState {
    #[default]
    Uninitialized,
    Initialized,
    Iterating,
    /// Recovering from a numerical failure.
    Reinitializing,
    Converged,
}

/// One E/M round of the successful attempt.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IterationRecord {
    pub iteration: usize,
    /// Weight-averaged log-likelihood computed by the E-step.
    pub log_likelihood: f64,
    /// Gain over the previous round; `None` on the first round.
    pub gain: Option<f64>,
}

/// A failed attempt that triggered a restart.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestartEvent {
    /// 1-based restart number.
    pub restart: usize,
    /// Seed the next attempt runs with.
    pub next_seed: u64,
    /// Cluster count of the next attempt.
    pub num_clusters: usize,
    pub reason: String,
}

#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitReport {
    pub requested_clusters: usize,
    pub final_clusters: usize,
    pub state: FitState,
    /// True when the tolerance stopped the loop, false when the iteration
    /// cap did.
    pub converged: bool,
    pub iterations: Vec<IterationRecord>,
    pub restarts: Vec<RestartEvent>,
    pub final_log_likelihood: f64,
    pub timing: TimingBreakdown,
}

impl FitReport {
    pub fn new(requested_clusters: usize) -> Self {
        Self {
            requested_clusters,
            final_clusters: requested_clusters,
            ..Default::default()
        }
    }

    pub fn num_iterations(&self) -> usize {
        self.iterations.len()
    }

    /// Largest drop in log-likelihood between consecutive rounds, or 0.
    pub fn max_regression(&self) -> f64 {
        self.iterations
            .iter()
            .filter_map(|r| r.gain)
            .fold(0.0, |worst: f64, gain| worst.max(-gain))
    }
}
