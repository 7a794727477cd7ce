//! Mixture state owned by a training session.

use super::density::{log_normal_density, log_sum_exp, logs_to_probs, normalize};
use super::params::{EmParams, NominalDensity};
use crate::dataset::{AttributeKind, Dataset, Instance, Value};
use crate::error::{EmError, Result};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// Gaussian parameters of one (cluster, attribute) cell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NormalEstimate {
    pub mean: f64,
    pub std_dev: f64,
    /// Summed `weight · responsibility` of the rows that informed the cell.
    pub weight_sum: f64,
}

/// Column facts fixed for the duration of a fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct ColumnSummary {
    pub min: f64,
    pub max: f64,
    /// Whole-column standard deviation from the attribute statistics.
    pub std_dev: f64,
    pub floor: f64,
}

impl ColumnSummary {
    pub(crate) fn collect(data: &Dataset, params: &EmParams) -> Result<Vec<Self>> {
        (0..data.num_attributes())
            .map(|j| {
                let (min, max) = data.min_max(j)?;
                Ok(Self {
                    min,
                    max,
                    std_dev: data.attribute_stats(j)?.std_dev(),
                    floor: params.floor_for(j),
                })
            })
            .collect()
    }

    /// Replace a standard deviation that fell to the floor by the column
    /// deviation, and that by the floor when it is unusable too.
    pub(crate) fn repair_std_dev(&self, std_dev: f64) -> f64 {
        let mut s = std_dev;
        if !(s > self.floor) {
            s = self.std_dev;
            if !(s > self.floor) {
                s = self.floor;
            }
        }
        if s.is_infinite() {
            s = self.floor;
        }
        s
    }
}

/// Laplace-capable frequency table for one nominal attribute in one cluster.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiscreteEstimator {
    counts: Vec<f64>,
    sum_of_counts: f64,
}

impl DiscreteEstimator {
    pub fn new(num_symbols: usize, laplace: bool) -> Self {
        let start = if laplace { 1.0 } else { 0.0 };
        Self {
            counts: vec![start; num_symbols],
            sum_of_counts: start * num_symbols as f64,
        }
    }

    pub fn add_value(&mut self, code: usize, weight: f64) {
        if let Some(slot) = self.counts.get_mut(code) {
            *slot += weight;
            self.sum_of_counts += weight;
        }
    }

    pub fn probability(&self, code: usize) -> f64 {
        if self.sum_of_counts == 0.0 {
            return 0.0;
        }
        self.counts.get(code).map_or(0.0, |c| c / self.sum_of_counts)
    }
}

/// Parameters, priors, and responsibilities of a `k`-component mixture.
#[derive(Clone, Debug)]
pub struct EmModel {
    /// `k × m` cluster means.
    pub(crate) means: DMatrix<f64>,
    /// `k × m` cluster standard deviations.
    pub(crate) std_devs: DMatrix<f64>,
    /// `k × m` effective weight behind each estimate.
    pub(crate) weight_sums: DMatrix<f64>,
    pub(crate) priors: DVector<f64>,
    /// `n × k` posterior membership of every training row.
    pub(crate) responsibilities: DMatrix<f64>,
    /// Per attribute: one estimator per cluster when the attribute is
    /// nominal and modelled discretely.
    pub(crate) nominal: Vec<Option<Vec<DiscreteEstimator>>>,
}

impl EmModel {
    /// Seed a model from explicit centers and sizes. Only the first
    /// `num_clusters` centers and sizes are used.
    pub(crate) fn initialize(
        data: &Dataset,
        centers: &[Instance],
        sizes: &[f64],
        num_clusters: usize,
        columns: &[ColumnSummary],
        params: &EmParams,
    ) -> Result<Self> {
        let k = num_clusters;
        let m = data.num_attributes();
        if k == 0 {
            return Err(EmError::invalid("number of clusters must be > 0"));
        }
        if centers.len() < k || sizes.len() < k {
            return Err(EmError::invalid(format!(
                "{k} clusters need as many centers and sizes (got {} and {})",
                centers.len(),
                sizes.len()
            )));
        }

        let mut means = DMatrix::zeros(k, m);
        let mut std_devs = DMatrix::zeros(k, m);
        for (c, center) in centers.iter().take(k).enumerate() {
            data.check_instance(center)?;
            for (j, column) in columns.iter().enumerate() {
                means[(c, j)] = if center.is_missing(j) {
                    data.mean_or_mode(j)?
                } else {
                    center.value(j)
                };
                let spread = (column.max - column.min) / (2.0 * k as f64);
                std_devs[(c, j)] = column.repair_std_dev(spread);
            }
        }

        let mut priors: Vec<f64> = sizes.iter().take(k).copied().collect();
        normalize(&mut priors)
            .map_err(|e| EmError::invalid(format!("cluster sizes: {e}")))?;

        let nominal = data
            .attributes()
            .iter()
            .enumerate()
            .map(|(j, attr)| match (attr.kind, params.nominal_density) {
                (AttributeKind::Nominal { num_values }, NominalDensity::Discrete) => Some(
                    (0..k)
                        .map(|c| {
                            let mut est = DiscreteEstimator::new(num_values as usize, true);
                            est.add_value(means[(c, j)] as usize, 1.0);
                            est
                        })
                        .collect(),
                ),
                _ => None,
            })
            .collect();

        Ok(Self {
            means,
            std_devs,
            weight_sums: DMatrix::from_element(k, m, 1.0),
            priors: DVector::from_vec(priors),
            responsibilities: DMatrix::zeros(data.num_instances(), k),
            nominal,
        })
    }

    pub fn num_clusters(&self) -> usize {
        self.priors.len()
    }

    pub fn num_attributes(&self) -> usize {
        self.means.ncols()
    }

    pub fn means(&self) -> &DMatrix<f64> {
        &self.means
    }

    pub fn std_devs(&self) -> &DMatrix<f64> {
        &self.std_devs
    }

    pub fn weight_sums(&self) -> &DMatrix<f64> {
        &self.weight_sums
    }

    pub fn priors(&self) -> &DVector<f64> {
        &self.priors
    }

    /// Owned copy of the prior vector.
    pub fn cluster_priors(&self) -> Vec<f64> {
        self.priors.iter().copied().collect()
    }

    /// Posterior membership of each training row (`n × k`).
    pub fn responsibilities(&self) -> &DMatrix<f64> {
        &self.responsibilities
    }

    pub fn estimate(&self, cluster: usize, attr: usize) -> Result<NormalEstimate> {
        if cluster >= self.num_clusters() {
            return Err(EmError::out_of_range("cluster", cluster, self.num_clusters()));
        }
        if attr >= self.num_attributes() {
            return Err(EmError::out_of_range("attribute", attr, self.num_attributes()));
        }
        Ok(NormalEstimate {
            mean: self.means[(cluster, attr)],
            std_dev: self.std_devs[(cluster, attr)],
            weight_sum: self.weight_sums[(cluster, attr)],
        })
    }

    /// Discrete estimators of nominal attribute `attr`, if it is modelled
    /// discretely.
    pub fn discrete_estimators(&self, attr: usize) -> Option<&[DiscreteEstimator]> {
        self.nominal.get(attr).and_then(|e| e.as_deref())
    }

    /// Log conditional density of `inst` under each cluster. Missing cells
    /// are skipped.
    pub fn log_density_per_cluster(&self, inst: &Instance) -> Vec<f64> {
        (0..self.num_clusters())
            .map(|c| {
                let mut logprob = 0.0;
                for j in 0..self.num_attributes() {
                    if inst.is_missing(j) {
                        continue;
                    }
                    logprob += match (&self.nominal[j], inst.get(j)) {
                        (Some(estimators), Some(Value::Nominal(code))) => {
                            estimators[c].probability(*code as usize).ln()
                        }
                        _ => log_normal_density(
                            inst.value(j),
                            self.means[(c, j)],
                            self.std_devs[(c, j)],
                        ),
                    };
                }
                logprob
            })
            .collect()
    }

    /// Per-cluster `ln p(x | c) + ln p(c)`. The prior term is left out for a
    /// cluster whose prior is not positive, so it can still claim rows.
    pub fn log_joint_densities(&self, inst: &Instance) -> Vec<f64> {
        let mut joint = self.log_density_per_cluster(inst);
        for (w, &prior) in joint.iter_mut().zip(self.priors.iter()) {
            if prior > 0.0 {
                *w += prior.ln();
            }
        }
        joint
    }

    /// Log of the mixture density at `inst`.
    pub fn log_density_for_instance(&self, inst: &Instance) -> f64 {
        log_sum_exp(&self.log_joint_densities(inst))
    }

    /// Posterior cluster membership of `inst`.
    pub fn distribution_for_instance(&self, inst: &Instance) -> Result<Vec<f64>> {
        logs_to_probs(&self.log_joint_densities(inst))
    }
}
