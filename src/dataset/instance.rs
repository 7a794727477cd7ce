/// A single cell of an [`Instance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    Numeric(f64),
    Nominal(u32),
    Missing,
}

impl Value {
    /// `Numeric(NaN)` counts as missing.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Numeric(x) => x.is_nan(),
            Value::Nominal(_) => false,
        }
    }

    /// The value as a double; NaN when missing.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Numeric(x) => x,
            Value::Nominal(code) => code as f64,
            Value::Missing => f64::NAN,
        }
    }

    /// Nominal code, if this is a nominal value.
    pub fn code(&self) -> Option<u32> {
        match *self {
            Value::Nominal(code) => Some(code),
            _ => None,
        }
    }
}

/// Weighted row of attribute values.
#[derive(Clone, Debug, PartialEq)]
pub struct Instance {
    values: Vec<Value>,
    weight: f64,
}

impl Instance {
    /// Instance with unit weight.
    pub fn new(values: Vec<Value>) -> Self {
        Self::with_weight(values, 1.0)
    }

    pub fn with_weight(values: Vec<Value>, weight: f64) -> Self {
        Self { values, weight }
    }

    /// Convenience constructor for all-numeric rows; NaN marks a missing cell.
    pub fn numeric(values: &[f64]) -> Self {
        Self::new(values.iter().map(|&x| Value::Numeric(x)).collect())
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn num_values(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, attr: usize) -> Option<&Value> {
        self.values.get(attr)
    }

    /// Value of attribute `attr` as a double. Missing cells and indices past
    /// the row length read as NaN.
    pub fn value(&self, attr: usize) -> f64 {
        self.values.get(attr).map_or(f64::NAN, Value::as_f64)
    }

    pub fn is_missing(&self, attr: usize) -> bool {
        self.values.get(attr).map_or(true, Value::is_missing)
    }
}
