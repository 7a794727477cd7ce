#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod dataset;
pub mod diagnostics;
pub mod em;
pub mod error;

// Tooling support for the binaries.
pub mod config;
pub mod io;

// --- High-level re-exports -------------------------------------------------

pub use crate::dataset::{Attribute, AttributeKind, AttributeStats, Dataset, Instance, Value};
pub use crate::em::{EmModel, EmParams, ExtendedEm, FittedModel, Initialization, NominalDensity};
pub use crate::error::{EmError, Result};

// Fit diagnostics attached to every fitted model.
pub use crate::diagnostics::{FitReport, FitState};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use extended_em::prelude::*;
///
/// # fn main() -> extended_em::Result<()> {
/// let mut data = Dataset::new("points", vec![Attribute::numeric("x"), Attribute::numeric("y")]);
/// data.add(Instance::numeric(&[0.0, 0.1]))?;
/// data.add(Instance::numeric(&[5.0, f64::NAN]))?;
/// data.add(Instance::numeric(&[5.2, 4.9]))?;
///
/// let fitted = ExtendedEm::new(EmParams::with_clusters(2)).fit(&data, &Initialization::RandomRows)?;
/// println!("k={} loglik={:.3}", fitted.num_clusters(), fitted.log_likelihood());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::dataset::{Attribute, Dataset, Instance, Value};
    pub use crate::em::{EmParams, ExtendedEm, FittedModel, Initialization};
}
