use super::model::{EmModel, NormalEstimate};
use crate::dataset::{max_index, Instance};
use crate::diagnostics::FitReport;
use crate::error::{EmError, Result};
use nalgebra::{DMatrix, DVector};
use serde::Serialize;

/// Priors and per-attribute estimates of one cluster.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub prior: f64,
    pub estimates: Vec<NormalEstimate>,
}

/// Serializable view of a fitted model.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FitSummary {
    pub clusters: Vec<ClusterSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignments: Option<Vec<usize>>,
    pub report: FitReport,
}

/// Outcome of a successful fit: the final mixture and the report of how it
/// was reached.
///
/// The responsibilities are those of the last E-step. When the tolerance
/// stopped the loop the parameters are the ones that E-step evaluated; when
/// the iteration cap did, one more M-step has refined them since.
#[derive(Clone, Debug)]
pub struct FittedModel {
    model: EmModel,
    report: FitReport,
}

impl FittedModel {
    pub(crate) fn new(model: EmModel, report: FitReport) -> Self {
        Self { model, report }
    }

    pub fn model(&self) -> &EmModel {
        &self.model
    }

    pub fn into_model(self) -> EmModel {
        self.model
    }

    pub fn report(&self) -> &FitReport {
        &self.report
    }

    /// Cluster count actually fitted (restarts may have reduced it).
    pub fn num_clusters(&self) -> usize {
        self.model.num_clusters()
    }

    pub fn log_likelihood(&self) -> f64 {
        self.report.final_log_likelihood
    }

    pub fn iterations(&self) -> usize {
        self.report.num_iterations()
    }

    pub fn converged(&self) -> bool {
        self.report.converged
    }

    pub fn means(&self) -> &DMatrix<f64> {
        self.model.means()
    }

    pub fn std_devs(&self) -> &DMatrix<f64> {
        self.model.std_devs()
    }

    pub fn estimate(&self, cluster: usize, attr: usize) -> Result<NormalEstimate> {
        self.model.estimate(cluster, attr)
    }

    /// `k × m` table of every cluster/attribute estimate.
    pub fn estimates(&self) -> Vec<Vec<NormalEstimate>> {
        (0..self.num_clusters())
            .map(|c| {
                (0..self.model.num_attributes())
                    .filter_map(|j| self.model.estimate(c, j).ok())
                    .collect()
            })
            .collect()
    }

    pub fn priors(&self) -> &DVector<f64> {
        self.model.priors()
    }

    pub fn cluster_priors(&self) -> Vec<f64> {
        self.model.cluster_priors()
    }

    pub fn responsibilities(&self) -> &DMatrix<f64> {
        self.model.responsibilities()
    }

    fn check_arity(&self, inst: &Instance) -> Result<()> {
        if inst.num_values() != self.model.num_attributes() {
            return Err(EmError::invalid(format!(
                "instance has {} values, model has {} attributes",
                inst.num_values(),
                self.model.num_attributes()
            )));
        }
        Ok(())
    }

    pub fn log_density_for_instance(&self, inst: &Instance) -> Result<f64> {
        self.check_arity(inst)?;
        Ok(self.model.log_density_for_instance(inst))
    }

    pub fn distribution_for_instance(&self, inst: &Instance) -> Result<Vec<f64>> {
        self.check_arity(inst)?;
        self.model.distribution_for_instance(inst)
    }

    /// Most probable cluster for `inst`, lowest index on ties.
    pub fn cluster_for_instance(&self, inst: &Instance) -> Result<usize> {
        Ok(max_index(&self.distribution_for_instance(inst)?))
    }

    /// Hard assignment of every training row from its responsibilities.
    pub fn assignments(&self) -> Vec<usize> {
        let resp = self.model.responsibilities();
        (0..resp.nrows())
            .map(|l| {
                let row: Vec<f64> = resp.row(l).iter().copied().collect();
                max_index(&row)
            })
            .collect()
    }

    pub fn summary(&self, include_assignments: bool) -> FitSummary {
        let priors = self.cluster_priors();
        FitSummary {
            clusters: self
                .estimates()
                .into_iter()
                .zip(priors)
                .map(|(estimates, prior)| ClusterSummary { prior, estimates })
                .collect(),
            assignments: include_assignments.then(|| self.assignments()),
            report: self.report.clone(),
        }
    }
}
