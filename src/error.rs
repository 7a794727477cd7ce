//! Error taxonomy shared by the dataset model and the EM engine.

use thiserror::Error;

/// Errors raised by dataset construction, statistics, and EM training.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EmError {
    /// A caller-supplied argument is unusable (zero clusters, mismatched
    /// lengths, a zero-sum or NaN-sum vector to normalize, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// An E/M iteration produced an unusable numeric state.
    #[error("numerical failure: {0}")]
    NumericalFailure(String),
    /// An attribute, instance, or cluster index outside the valid range.
    #[error("{kind} index {index} out of range (len {len})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        len: usize,
    },
    /// The restart loop ran out of retries or clusters.
    #[error("training abandoned after {restarts} restarts: {last_failure}")]
    RetryBudgetExhausted {
        restarts: usize,
        last_failure: String,
    },
}

impl EmError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        EmError::InvalidArgument(msg.into())
    }

    pub(crate) fn numerical(msg: impl Into<String>) -> Self {
        EmError::NumericalFailure(msg.into())
    }

    pub(crate) fn out_of_range(kind: &'static str, index: usize, len: usize) -> Self {
        EmError::IndexOutOfRange { kind, index, len }
    }
}

pub type Result<T> = std::result::Result<T, EmError>;
