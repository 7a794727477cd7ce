use super::instance::Value;
use crate::error::{EmError, Result};
use serde::{Deserialize, Serialize};

/// Kind of an attribute column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    Numeric,
    /// Nominal values are codes in `0..num_values`.
    Nominal { num_values: u32 },
}

/// Column descriptor of a [`Dataset`](super::Dataset).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Numeric,
        }
    }

    pub fn nominal(name: impl Into<String>, num_values: u32) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::Nominal { num_values },
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self.kind, AttributeKind::Numeric)
    }

    pub fn is_nominal(&self) -> bool {
        matches!(self.kind, AttributeKind::Nominal { .. })
    }

    /// Number of nominal values, `None` for numeric attributes.
    pub fn num_values(&self) -> Option<u32> {
        match self.kind {
            AttributeKind::Numeric => None,
            AttributeKind::Nominal { num_values } => Some(num_values),
        }
    }

    /// Interpret a raw number as a value of this attribute. `None` and NaN map
    /// to [`Value::Missing`]; nominal codes must be integral and in range.
    pub fn parse_value(&self, raw: Option<f64>) -> Result<Value> {
        let Some(x) = raw.filter(|x| !x.is_nan()) else {
            return Ok(Value::Missing);
        };
        match self.kind {
            AttributeKind::Numeric => {
                if x.is_finite() {
                    Ok(Value::Numeric(x))
                } else {
                    Err(EmError::invalid(format!(
                        "attribute '{}': non-finite value {x}",
                        self.name
                    )))
                }
            }
            AttributeKind::Nominal { num_values } => {
                if x >= 0.0 && x.fract() == 0.0 && x < num_values as f64 {
                    Ok(Value::Nominal(x as u32))
                } else {
                    Err(EmError::invalid(format!(
                        "attribute '{}': nominal code {x} outside 0..{num_values}",
                        self.name
                    )))
                }
            }
        }
    }

    /// Check that `value` is admissible for this attribute.
    pub(crate) fn check_value(&self, value: &Value) -> Result<()> {
        match (self.kind, value) {
            (_, Value::Missing) => Ok(()),
            (AttributeKind::Numeric, Value::Numeric(x)) if x.is_finite() || x.is_nan() => Ok(()),
            (AttributeKind::Nominal { num_values }, Value::Nominal(code)) if *code < num_values => {
                Ok(())
            }
            _ => Err(EmError::invalid(format!(
                "attribute '{}' ({:?}) cannot hold {:?}",
                self.name, self.kind, value
            ))),
        }
    }
}
