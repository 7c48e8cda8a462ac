//! Loss functions for gradient boosting.
//!
//! A metric supplies the four operations the boosting loop needs: gradients
//! and hessians of the loss at the current predictions, the scalar loss for
//! progress tracking, and the transform from a raw ensemble score to a
//! prediction.
//!
//! Two concrete variants exist: [`LogLoss`] for binary classification and
//! [`Rmse`] for regression. The [`Metric`] enum wraps them for configuration
//! and delegates to the underlying type, so no dynamic dispatch is needed.

mod classification;
mod regression;

pub use classification::LogLoss;
pub use regression::Rmse;

use crate::error::{Error, Result};

// =============================================================================
// MetricFn Trait
// =============================================================================

/// A twice-differentiable loss usable by the boosting loop.
///
/// `gradients` and `hessian` are evaluated on *transformed* predictions
/// (probabilities for [`LogLoss`], raw values for [`Rmse`]), matching how the
/// trainer rescores the ensemble before each round.
pub trait MetricFn: Send + Sync {
    /// First derivative of the loss per sample, pointing toward loss increase.
    ///
    /// Fails with [`Error::InvalidShape`] on mismatched input lengths.
    fn gradients(&self, predictions: &[f64], targets: &[f64]) -> Result<Vec<f64>>;

    /// Diagonal second derivative of the loss per sample.
    fn hessian(&self, predictions: &[f64]) -> Vec<f64>;

    /// Scalar loss over a prediction/target pair.
    ///
    /// Fails with [`Error::InvalidShape`] on mismatched input lengths.
    fn loss(&self, predictions: &[f64], targets: &[f64]) -> Result<f64>;

    /// Transform a raw ensemble score into a prediction.
    fn score_to_prediction(&self, score: f64) -> f64;

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;
}

/// Shared input validation for the per-sample operations.
pub(crate) fn check_same_len(predictions: &[f64], targets: &[f64]) -> Result<()> {
    if predictions.len() != targets.len() {
        return Err(Error::invalid_shape(format!(
            "{} predictions vs {} targets",
            predictions.len(),
            targets.len()
        )));
    }
    Ok(())
}

// =============================================================================
// Metric Enum
// =============================================================================

/// Metric selector for configuration.
///
/// Each variant stores a pre-constructed instance of the underlying loss type
/// and delegates the [`MetricFn`] operations to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Binary cross-entropy on {0, 1} labels.
    LogLoss(LogLoss),
    /// Root mean squared error for regression.
    Rmse(Rmse),
}

impl Metric {
    /// Binary classification log loss.
    pub fn logloss() -> Self {
        Self::LogLoss(LogLoss)
    }

    /// Regression RMSE.
    pub fn rmse() -> Self {
        Self::Rmse(Rmse)
    }

    /// Resolve the numeric `metric` configuration key: 0 = LogLoss, 1 = RMSE.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::logloss()),
            1 => Ok(Self::rmse()),
            other => Err(Error::invalid_config(format!(
                "metric must be 0 (logloss) or 1 (rmse), got {}",
                other
            ))),
        }
    }
}

impl Default for Metric {
    fn default() -> Self {
        Self::rmse()
    }
}

impl MetricFn for Metric {
    fn gradients(&self, predictions: &[f64], targets: &[f64]) -> Result<Vec<f64>> {
        match self {
            Self::LogLoss(inner) => inner.gradients(predictions, targets),
            Self::Rmse(inner) => inner.gradients(predictions, targets),
        }
    }

    fn hessian(&self, predictions: &[f64]) -> Vec<f64> {
        match self {
            Self::LogLoss(inner) => inner.hessian(predictions),
            Self::Rmse(inner) => inner.hessian(predictions),
        }
    }

    fn loss(&self, predictions: &[f64], targets: &[f64]) -> Result<f64> {
        match self {
            Self::LogLoss(inner) => inner.loss(predictions, targets),
            Self::Rmse(inner) => inner.loss(predictions, targets),
        }
    }

    fn score_to_prediction(&self, score: f64) -> f64 {
        match self {
            Self::LogLoss(inner) => inner.score_to_prediction(score),
            Self::Rmse(inner) => inner.score_to_prediction(score),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::LogLoss(inner) => inner.name(),
            Self::Rmse(inner) => inner.name(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
