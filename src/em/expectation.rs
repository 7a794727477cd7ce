use super::density::{log_sum_exp, logs_to_probs};
use super::model::EmModel;
use crate::dataset::{Dataset, Instance};
use crate::error::{EmError, Result};
use rayon::prelude::*;

struct RowPosterior {
    probs: Vec<f64>,
    weighted_log_density: f64,
    weight: f64,
}

fn row_posterior(model: &EmModel, row: usize, inst: &Instance) -> Result<RowPosterior> {
    let joint = model.log_joint_densities(inst);
    let probs = logs_to_probs(&joint)
        .map_err(|e| EmError::numerical(format!("row {row}: {e}")))?;
    Ok(RowPosterior {
        probs,
        weighted_log_density: inst.weight() * log_sum_exp(&joint),
        weight: inst.weight(),
    })
}

/// E-step: refresh every row's responsibilities and return the
/// weight-averaged log-likelihood of the data under the current parameters.
pub(crate) fn e_step(data: &Dataset, model: &mut EmModel, parallel: bool) -> Result<f64> {
    let shared = &*model;
    let rows: Vec<RowPosterior> = if parallel {
        data.instances()
            .par_iter()
            .enumerate()
            .map(|(row, inst)| row_posterior(shared, row, inst))
            .collect::<Result<_>>()?
    } else {
        data.instances()
            .iter()
            .enumerate()
            .map(|(row, inst)| row_posterior(shared, row, inst))
            .collect::<Result<_>>()?
    };

    let mut log_likelihood = 0.0;
    let mut sum_of_weights = 0.0;
    for (l, posterior) in rows.iter().enumerate() {
        for (c, &p) in posterior.probs.iter().enumerate() {
            model.responsibilities[(l, c)] = p;
        }
        log_likelihood += posterior.weighted_log_density;
        sum_of_weights += posterior.weight;
    }
    if !(sum_of_weights > 0.0) {
        return Err(EmError::numerical("dataset carries no weight"));
    }
    let average = log_likelihood / sum_of_weights;
    if !average.is_finite() {
        return Err(EmError::numerical(format!(
            "average log-likelihood is not finite ({average})"
        )));
    }
    Ok(average)
}
