//! Binary classification loss.

use crate::error::Result;

use super::{check_same_len, MetricFn};

/// Numerical tolerance at the boundary of `log(p)` and `log(1 - p)`.
const EPS: f64 = 1e-8;

// =============================================================================
// LogLoss
// =============================================================================

/// Log loss (binary cross-entropy) for labels in {0, 1}.
///
/// With `p = sigmoid(score)`:
/// - Loss: `-mean(y * ln(p) + (1 - y) * ln(1 - p))`, `p` clipped to
///   `[EPS, 1 - EPS]`
/// - Gradient: `p - y`
/// - Hessian: `p * (1 - p)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogLoss;

impl LogLoss {
    #[inline]
    pub(crate) fn sigmoid(score: f64) -> f64 {
        1.0 / (1.0 + (-score).exp())
    }

    #[inline]
    fn clip(p: f64) -> f64 {
        p.clamp(EPS, 1.0 - EPS)
    }
}

impl MetricFn for LogLoss {
    fn gradients(&self, predictions: &[f64], targets: &[f64]) -> Result<Vec<f64>> {
        check_same_len(predictions, targets)?;
        Ok(predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &y)| p - y)
            .collect())
    }

    fn hessian(&self, predictions: &[f64]) -> Vec<f64> {
        predictions.iter().map(|&p| p * (1.0 - p)).collect()
    }

    fn loss(&self, predictions: &[f64], targets: &[f64]) -> Result<f64> {
        check_same_len(predictions, targets)?;
        if predictions.is_empty() {
            return Ok(0.0);
        }

        let sum: f64 = predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &y)| {
                let p = Self::clip(p);
                y * p.ln() + (1.0 - y) * (1.0 - p).ln()
            })
            .sum();

        Ok(-sum / predictions.len() as f64)
    }

    fn score_to_prediction(&self, score: f64) -> f64 {
        Self::sigmoid(score)
    }

    fn name(&self) -> &'static str {
        "logloss"
    }
}

// =============================================================================
// Tests
// =============================================================================
