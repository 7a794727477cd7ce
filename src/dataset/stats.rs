use serde::Serialize;

/// Tolerance used to decide whether a value is integral.
const INTEGER_TOLERANCE: f64 = 1e-6;

/// Weighted running accumulator for a numeric attribute.
///
/// `count` is the total weight added, so a single unit-weight observation has
/// an infinite standard deviation and an empty accumulator has NaN moments.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct NumericStats {
    pub count: f64,
    pub sum: f64,
    pub sum_sq: f64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl NumericStats {
    pub fn new() -> Self {
        Self {
            min: f64::NAN,
            max: f64::NAN,
            mean: f64::NAN,
            std_dev: f64::NAN,
            ..Default::default()
        }
    }

    pub fn add(&mut self, value: f64, weight: f64) {
        self.count += weight;
        self.sum += value * weight;
        self.sum_sq += value * value * weight;
        if self.min.is_nan() || value < self.min {
            self.min = value;
        }
        if self.max.is_nan() || value > self.max {
            self.max = value;
        }
    }

    /// Refresh `mean` and `std_dev` from the running sums.
    pub fn calculate_derived(&mut self) {
        self.mean = f64::NAN;
        self.std_dev = f64::NAN;
        if self.count > 0.0 {
            self.mean = self.sum / self.count;
            self.std_dev = f64::INFINITY;
            if self.count > 1.0 {
                let var = (self.sum_sq - self.sum * self.sum / self.count) / (self.count - 1.0);
                self.std_dev = var.max(0.0).sqrt();
            }
        }
    }
}

/// Summary of one attribute column, built by
/// [`Dataset::attribute_stats`](super::Dataset::attribute_stats).
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AttributeStats {
    /// Count per nominal code (nominal attributes only).
    pub nominal_counts: Option<Vec<usize>>,
    /// Summed instance weight per nominal code (nominal attributes only).
    pub nominal_weights: Option<Vec<f64>>,
    pub total_count: usize,
    pub missing_count: usize,
    /// Distinct values observed exactly once.
    pub unique_count: usize,
    pub int_count: usize,
    pub real_count: usize,
    /// Distinct non-missing values.
    pub distinct_count: usize,
    /// Weighted moments (numeric attributes only).
    pub numeric_stats: Option<NumericStats>,
}

impl AttributeStats {
    pub(crate) fn for_nominal(num_values: usize) -> Self {
        Self {
            nominal_counts: Some(vec![0; num_values]),
            nominal_weights: Some(vec![0.0; num_values]),
            ..Default::default()
        }
    }

    pub(crate) fn for_numeric() -> Self {
        Self {
            numeric_stats: Some(NumericStats::new()),
            ..Default::default()
        }
    }

    /// Record one run of `count` equal values carrying `weight` in total.
    pub(crate) fn add_distinct(&mut self, value: f64, count: usize, weight: f64) {
        if count == 0 {
            return;
        }
        if count == 1 {
            self.unique_count += 1;
        }
        if (value - value.trunc()).abs() < INTEGER_TOLERANCE {
            self.int_count += count;
        } else {
            self.real_count += count;
        }
        if let (Some(counts), Some(weights)) =
            (self.nominal_counts.as_mut(), self.nominal_weights.as_mut())
        {
            let code = value as usize;
            if code < counts.len() {
                counts[code] = count;
                weights[code] = weight;
            }
        }
        if let Some(stats) = self.numeric_stats.as_mut() {
            stats.add(value, weight);
            stats.calculate_derived();
        }
        self.distinct_count += 1;
    }

    /// Standard deviation over the whole column; NaN for nominal attributes
    /// or an all-missing column, infinite for a single unit of weight.
    pub fn std_dev(&self) -> f64 {
        self.numeric_stats.as_ref().map_or(f64::NAN, |s| s.std_dev)
    }
}
