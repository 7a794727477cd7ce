//! Serializable record of an EM fit.
//!
//! [`FitReport`] is attached to every fitted model. It captures the
//! log-likelihood trace of the successful attempt, every restart that
//! preceded it, and wall-clock timings of the fit phases.

pub mod fit;
pub mod timing;

pub use fit::{FitReport, FitState, IterationRecord, RestartEvent};
pub use timing::{Stage, StageTiming, TimingBreakdown};
