//! Crate-level error types.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by training, prediction, and configuration.
///
/// Per-iteration failures abort training and leave the model holding any
/// trees successfully built so far; there is no automatic retry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A required hyperparameter is missing or out of range.
    #[error("invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Dimensions of the inputs disagree (X rows vs y length, prediction
    /// input length vs feature count, train vs validation feature counts).
    #[error("shape mismatch: {reason}")]
    InvalidShape { reason: String },

    /// Training input is empty or has fewer than two rows.
    #[error("degenerate dataset: got {n_rows} row(s), need at least 2")]
    DegenerateDataset { n_rows: usize },

    /// The Hessian denominator collapsed while computing a leaf weight.
    ///
    /// Unreachable with `lambda > 0` since per-sample hessians are
    /// non-negative for both supported metrics.
    #[error("numerical instability: hessian sum {hess_sum} + lambda {lambda} must be positive")]
    NumericalInstability { hess_sum: f64, lambda: f64 },
}

impl Error {
    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_shape(reason: impl Into<String>) -> Self {
        Self::InvalidShape {
            reason: reason.into(),
        }
    }
}
