//! Log-space density helpers shared by the E-step and the inference API.

use crate::dataset::max_index;
use crate::error::{EmError, Result};

/// `ln(sqrt(2π))`.
pub const LOG_SQRT_2PI: f64 = 0.918_938_533_204_672_8;

/// Log density of `N(mean, std_dev²)` at `x`. `std_dev` must be non-zero.
#[inline]
pub fn log_normal_density(x: f64, mean: f64, std_dev: f64) -> f64 {
    let diff = x - mean;
    -(diff * diff / (2.0 * std_dev * std_dev)) - LOG_SQRT_2PI - std_dev.ln()
}

/// `ln(Σ exp(a_i))` evaluated around the maximum to avoid overflow.
pub fn log_sum_exp(a: &[f64]) -> f64 {
    if a.is_empty() {
        return f64::NEG_INFINITY;
    }
    let max = a[max_index(a)];
    let sum: f64 = a.iter().map(|&x| (x - max).exp()).sum();
    max + sum.ln()
}

/// Turn log weights into a probability vector.
pub fn logs_to_probs(a: &[f64]) -> Result<Vec<f64>> {
    if a.is_empty() {
        return Err(EmError::invalid("cannot normalize an empty vector"));
    }
    let max = a[max_index(a)];
    let mut probs: Vec<f64> = a.iter().map(|&x| (x - max).exp()).collect();
    let sum = probs.iter().sum();
    normalize_with_sum(&mut probs, sum)?;
    Ok(probs)
}

pub fn normalize(values: &mut [f64]) -> Result<()> {
    let sum = values.iter().sum();
    normalize_with_sum(values, sum)
}

/// Divide every entry by `sum`. Zero and NaN sums are rejected.
pub fn normalize_with_sum(values: &mut [f64], sum: f64) -> Result<()> {
    if sum.is_nan() {
        return Err(EmError::invalid("can't normalize array, sum is NaN"));
    }
    if sum == 0.0 {
        return Err(EmError::invalid("can't normalize array, sum is zero"));
    }
    for v in values.iter_mut() {
        *v /= sum;
    }
    Ok(())
}
