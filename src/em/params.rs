use crate::dataset::Instance;
use serde::{Deserialize, Serialize};

/// How nominal attributes contribute to the per-cluster density.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NominalDensity {
    /// Treat nominal codes as numeric values under the cluster Gaussian.
    #[default]
    Gaussian,
    /// Laplace-smoothed per-cluster value frequencies.
    Discrete,
}

/// Parameters of an EM fit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmParams {
    /// Number of mixture components (>= 1).
    pub num_clusters: usize,
    /// Upper bound on E/M rounds per attempt (>= 1).
    pub max_iterations: usize,
    /// Global standard deviation floor.
    pub min_std_dev: f64,
    /// Optional floor per attribute, overriding `min_std_dev`.
    pub min_std_dev_per_attribute: Option<Vec<f64>>,
    /// Starting PRNG seed; each restart advances it by one.
    pub seed: u64,
    /// Stop once the average log-likelihood gains less than this.
    pub convergence_tolerance: f64,
    /// Total restarts allowed after numerical failures. `None` retries until
    /// the cluster count cannot shrink any further.
    pub max_restarts: Option<usize>,
    /// Consecutive failures after which one cluster is dropped.
    pub restarts_per_reduction: usize,
    /// Evaluate the E-step rows on the rayon pool.
    pub parallel: bool,
    pub nominal_density: NominalDensity,
}

impl Default for EmParams {
    fn default() -> Self {
        Self {
            num_clusters: 2,
            max_iterations: 100,
            min_std_dev: 1e-6,
            min_std_dev_per_attribute: None,
            seed: 100,
            convergence_tolerance: 1e-6,
            max_restarts: Some(100),
            restarts_per_reduction: 5,
            parallel: false,
            nominal_density: NominalDensity::Gaussian,
        }
    }
}

impl EmParams {
    pub fn with_clusters(num_clusters: usize) -> Self {
        Self {
            num_clusters,
            ..Default::default()
        }
    }

    /// Floor applied to attribute `attr`.
    pub fn floor_for(&self, attr: usize) -> f64 {
        self.min_std_dev_per_attribute
            .as_ref()
            .and_then(|floors| floors.get(attr).copied())
            .unwrap_or(self.min_std_dev)
    }
}

/// Starting point of the mixture.
#[derive(Clone, Debug, PartialEq)]
pub enum Initialization {
    /// One center row per cluster (missing cells fall back to the dataset
    /// mean or mode) and non-negative sizes seeding the priors.
    Centers {
        centers: Vec<Instance>,
        sizes: Vec<f64>,
    },
    /// Distinct dataset rows drawn with the seeded PRNG, equal priors.
    RandomRows,
}

impl Initialization {
    pub fn centers(centers: Vec<Instance>, sizes: Vec<f64>) -> Self {
        Initialization::Centers { centers, sizes }
    }
}
