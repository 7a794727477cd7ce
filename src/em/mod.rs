//! Expectation-Maximization over a diagonal Gaussian mixture.
//!
//! The engine alternates two passes over a borrowed [`Dataset`]:
//!
//! 1) E-step: for every row, per-cluster log joint densities (sum of
//!    per-attribute Gaussian log densities over the non-missing cells plus the
//!    log prior) are normalized with log-sum-exp into responsibilities. The
//!    weight-averaged log-likelihood is returned.
//! 2) M-step: priors become the weighted column sums of the responsibilities;
//!    means and standard deviations are rebuilt from weighted sufficient
//!    statistics. Deviations never fall under the configured floor.
//!
//! The loop stops when the log-likelihood gain drops below the tolerance
//! (checked from the second round on) or at `max_iterations`. A numerical
//! failure inside the loop reseeds, reinitializes the mixture, and retries;
//! repeated failures drop one cluster at a time. See [`EmParams`] for the
//! restart budget.
//!
//! ```no_run
//! use extended_em::prelude::*;
//!
//! # fn main() -> extended_em::Result<()> {
//! let mut data = Dataset::new("demo", vec![Attribute::numeric("x")]);
//! for x in [1.0, 1.0, 2.0, 8.0, 9.0, 9.0] {
//!     data.add(Instance::numeric(&[x]))?;
//! }
//! let init = Initialization::centers(
//!     vec![Instance::numeric(&[1.5]), Instance::numeric(&[8.5])],
//!     vec![3.0, 3.0],
//! );
//! let fitted = ExtendedEm::new(EmParams::with_clusters(2)).fit(&data, &init)?;
//! println!("priors={:?}", fitted.cluster_priors());
//! # Ok(())
//! # }
//! ```

pub mod density;
mod expectation;
mod fitted;
mod maximization;
pub mod model;
pub mod params;
mod restart;
mod trainer;


pub use fitted::{ClusterSummary, FitSummary, FittedModel};
pub use model::{DiscreteEstimator, EmModel, NormalEstimate};
pub use params::{EmParams, Initialization, NominalDensity};

use crate::dataset::Dataset;
use crate::error::Result;
use trainer::Trainer;

/// EM clusterer configured once and fitted against any number of datasets.
#[derive(Clone, Debug, Default)]
pub struct ExtendedEm {
    params: EmParams,
}

impl ExtendedEm {
    pub fn new(params: EmParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &EmParams {
        &self.params
    }

    /// Fit a mixture to `data` starting from `init`.
    ///
    /// Argument problems are returned immediately. Numerical failures are
    /// retried internally and only surface as
    /// [`EmError::RetryBudgetExhausted`](crate::EmError::RetryBudgetExhausted).
    pub fn fit(&self, data: &Dataset, init: &Initialization) -> Result<FittedModel> {
        Trainer::new(data, &self.params, init)?.run()
    }
}
