use super::density::normalize;
use super::model::{ColumnSummary, DiscreteEstimator, EmModel};
use crate::dataset::{Dataset, Value};
use crate::error::{EmError, Result};

/// Standard deviation given to a cell that received no weight at all.
pub(crate) const EMPTY_CELL_STD_DEV: f64 = f64::MAX;

/// Re-estimate priors from the responsibilities, weighted by row weight.
pub(crate) fn estimate_priors(data: &Dataset, model: &mut EmModel) -> Result<()> {
    let k = model.num_clusters();
    let mut priors = vec![0.0; k];
    for (l, inst) in data.instances().iter().enumerate() {
        for (c, prior) in priors.iter_mut().enumerate() {
            *prior += inst.weight() * model.responsibilities[(l, c)];
        }
    }
    normalize(&mut priors).map_err(|e| EmError::numerical(format!("priors: {e}")))?;
    for (c, p) in priors.into_iter().enumerate() {
        model.priors[c] = p;
    }
    Ok(())
}

/// M-step: priors, then per (cluster, attribute) weighted mean and standard
/// deviation from the sufficient statistics `Σwr·x`, `Σwr`, `Σwr·x²`.
///
/// A cell without weight is parked at mean `min_std_dev` with the empty-cell
/// deviation so it stops influencing the E-step. Deviations at or below the
/// floor are replaced by the column deviation, then by the floor.
pub(crate) fn m_step(
    data: &Dataset,
    model: &mut EmModel,
    columns: &[ColumnSummary],
    min_std_dev: f64,
) -> Result<()> {
    estimate_priors(data, model)?;

    let k = model.num_clusters();
    for (j, column) in columns.iter().enumerate() {
        for c in 0..k {
            let (mut sum_x, mut sum_w, mut sum_xx) = (0.0, 0.0, 0.0);
            for (l, inst) in data.instances().iter().enumerate() {
                if inst.is_missing(j) {
                    continue;
                }
                let x = inst.value(j);
                let w = inst.weight() * model.responsibilities[(l, c)];
                sum_x += w * x;
                sum_w += w;
                sum_xx += w * x * x;
            }
            model.weight_sums[(c, j)] = sum_w;

            if sum_w <= 0.0 {
                model.means[(c, j)] = min_std_dev;
                model.std_devs[(c, j)] = EMPTY_CELL_STD_DEV;
                continue;
            }
            let variance = ((sum_xx - sum_x * sum_x / sum_w) / sum_w).max(0.0);
            model.std_devs[(c, j)] = column.repair_std_dev(variance.sqrt());
            model.means[(c, j)] = sum_x / sum_w;
        }
    }

    update_discrete_estimators(data, model);
    Ok(())
}

fn update_discrete_estimators(data: &Dataset, model: &mut EmModel) {
    let k = model.num_clusters();
    for (j, attr) in data.attributes().iter().enumerate() {
        let Some(num_values) = attr.num_values() else {
            continue;
        };
        if model.nominal[j].is_none() {
            continue;
        }
        let mut estimators: Vec<DiscreteEstimator> = (0..k)
            .map(|_| DiscreteEstimator::new(num_values as usize, true))
            .collect();
        for (l, inst) in data.instances().iter().enumerate() {
            if let Some(Value::Nominal(code)) = inst.get(j) {
                for (c, est) in estimators.iter_mut().enumerate() {
                    est.add_value(*code as usize, inst.weight() * model.responsibilities[(l, c)]);
                }
            }
        }
        model.nominal[j] = Some(estimators);
    }
}
