//! Weighted tabular dataset consumed by the EM engine.
//!
//! - [`attribute`]: column descriptors (numeric or nominal).
//! - [`instance`]: tagged cell values and weighted rows.
//! - [`stats`]: per-attribute summaries built from a sorted column pass.
//! - [`sort`]: the stable index sort backing those summaries.

pub mod attribute;
pub mod instance;
pub mod sort;
pub mod stats;


pub use attribute::{Attribute, AttributeKind};
pub use instance::{Instance, Value};
pub use sort::stable_sort_indices;
pub use stats::{AttributeStats, NumericStats};

use crate::error::{EmError, Result};

/// Ordered collection of weighted instances sharing one attribute schema.
///
/// The schema is fixed at construction; rows are validated against it when
/// added.
#[derive(Clone, Debug, PartialEq)]
pub struct Dataset {
    name: String,
    attributes: Vec<Attribute>,
    instances: Vec<Instance>,
}

impl Dataset {
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self::with_capacity(name, attributes, 0)
    }

    pub fn with_capacity(
        name: impl Into<String>,
        attributes: Vec<Attribute>,
        capacity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            attributes,
            instances: Vec::with_capacity(capacity),
        }
    }

    /// Empty dataset with the same name and schema.
    pub fn empty_like(&self) -> Self {
        Self::new(self.name.clone(), self.attributes.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Append a row after checking arity, value kinds, and weight.
    pub fn add(&mut self, instance: Instance) -> Result<()> {
        self.check_instance(&instance)?;
        if !(instance.weight() > 0.0 && instance.weight().is_finite()) {
            return Err(EmError::invalid(format!(
                "instance weight must be positive and finite, got {}",
                instance.weight()
            )));
        }
        self.instances.push(instance);
        Ok(())
    }

    /// Check that `instance` matches this schema (weight is not inspected).
    pub fn check_instance(&self, instance: &Instance) -> Result<()> {
        if instance.num_values() != self.attributes.len() {
            return Err(EmError::invalid(format!(
                "instance has {} values, dataset '{}' has {} attributes",
                instance.num_values(),
                self.name,
                self.attributes.len()
            )));
        }
        for (attr, value) in self.attributes.iter().zip(instance.values()) {
            attr.check_value(value)?;
        }
        Ok(())
    }

    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn attribute(&self, index: usize) -> Result<&Attribute> {
        self.attributes
            .get(index)
            .ok_or(EmError::out_of_range("attribute", index, self.attributes.len()))
    }

    pub fn instance(&self, index: usize) -> Result<&Instance> {
        self.instances
            .get(index)
            .ok_or(EmError::out_of_range("instance", index, self.instances.len()))
    }

    pub fn total_weight(&self) -> f64 {
        self.instances.iter().map(Instance::weight).sum()
    }

    /// Column `attr` as doubles, NaN where missing.
    pub fn values(&self, attr: usize) -> Result<Vec<f64>> {
        self.attribute(attr)?;
        Ok(self.instances.iter().map(|inst| inst.value(attr)).collect())
    }

    /// Smallest and largest non-missing value of `attr`; `(NaN, NaN)` when
    /// the column is entirely missing.
    pub fn min_max(&self, attr: usize) -> Result<(f64, f64)> {
        self.attribute(attr)?;
        let mut range = (f64::NAN, f64::NAN);
        for inst in self.instances.iter().filter(|inst| !inst.is_missing(attr)) {
            let x = inst.value(attr);
            if range.0.is_nan() {
                range = (x, x);
            } else if x < range.0 {
                range.0 = x;
            } else if x > range.1 {
                range.1 = x;
            }
        }
        Ok(range)
    }

    /// Weighted mean of a numeric attribute, or the weighted mode code of a
    /// nominal one (lowest code on ties). Missing cells are ignored; a
    /// numeric column without weight yields 0.
    pub fn mean_or_mode(&self, attr: usize) -> Result<f64> {
        let attribute = self.attribute(attr)?;
        let present = self.instances.iter().filter(|inst| !inst.is_missing(attr));
        match attribute.kind {
            AttributeKind::Numeric => {
                let (mut weighted, mut found) = (0.0, 0.0);
                for inst in present {
                    found += inst.weight();
                    weighted += inst.weight() * inst.value(attr);
                }
                Ok(if found <= 0.0 { 0.0 } else { weighted / found })
            }
            AttributeKind::Nominal { num_values } => {
                let mut counts = vec![0.0; num_values as usize];
                for inst in present {
                    let code = inst.get(attr).and_then(Value::code);
                    if let Some(slot) = code.and_then(|c| counts.get_mut(c as usize)) {
                        *slot += inst.weight();
                    }
                }
                Ok(max_index(&counts) as f64)
            }
        }
    }

    /// Summarize attribute `attr` from one pass over its stably sorted column.
    pub fn attribute_stats(&self, attr: usize) -> Result<AttributeStats> {
        let attribute = self.attribute(attr)?;
        let mut result = match attribute.kind {
            AttributeKind::Numeric => AttributeStats::for_numeric(),
            AttributeKind::Nominal { num_values } => {
                AttributeStats::for_nominal(num_values as usize)
            }
        };
        result.total_count = self.num_instances();

        let column = self.values(attr)?;
        let sorted = stable_sort_indices(&column);
        let mut run: Option<(f64, usize, f64)> = None;
        for (pos, &row) in sorted.iter().enumerate() {
            let current = &self.instances[row];
            if current.is_missing(attr) {
                result.missing_count = self.num_instances() - pos;
                break;
            }
            let x = current.value(attr);
            match run.as_mut() {
                Some((value, count, weight)) if *value == x => {
                    *count += 1;
                    *weight += current.weight();
                }
                _ => {
                    if let Some((value, count, weight)) = run {
                        result.add_distinct(value, count, weight);
                    }
                    run = Some((x, 1, current.weight()));
                }
            }
        }
        if let Some((value, count, weight)) = run {
            result.add_distinct(value, count, weight);
        }
        Ok(result)
    }
}

/// Position of the largest entry; the first one wins ties.
pub(crate) fn max_index(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate().skip(1) {
        if v > values[best] {
            best = i;
        }
    }
    best
}
