//! Regression loss.

use crate::error::Result;

use super::{check_same_len, MetricFn};

// =============================================================================
// Rmse
// =============================================================================

/// Root mean squared error with identity prediction transform.
///
/// - Loss: `sqrt(mean((y - p)^2))`
/// - Gradient: `2 * (p - y)`
/// - Hessian: constant `2`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn gradients(&self, predictions: &[f64], targets: &[f64]) -> Result<Vec<f64>> {
        check_same_len(predictions, targets)?;
        Ok(predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &y)| 2.0 * (p - y))
            .collect())
    }

    fn hessian(&self, predictions: &[f64]) -> Vec<f64> {
        vec![2.0; predictions.len()]
    }

    fn loss(&self, predictions: &[f64], targets: &[f64]) -> Result<f64> {
        check_same_len(predictions, targets)?;
        if predictions.is_empty() {
            return Ok(0.0);
        }

        let sum_sq: f64 = predictions
            .iter()
            .zip(targets.iter())
            .map(|(&p, &y)| (y - p) * (y - p))
            .sum();

        Ok((sum_sq / predictions.len() as f64).sqrt())
    }

    fn score_to_prediction(&self, score: f64) -> f64 {
        score
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    #[test]
    fn gradient_is_twice_residual() {
        let grads = Rmse.gradients(&[1.0, 2.0, 3.0], &[0.5, 2.5, 2.5]).unwrap();
        assert_abs_diff_eq!(grads[0], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(grads[1], -1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(grads[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn hessian_is_constant_two() {
        assert_eq!(Rmse.hessian(&[0.0, 5.0, -3.0]), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn loss_matches_closed_form() {
        // Residuals 3 and 4: sqrt((9 + 16) / 2) = sqrt(12.5).
        let loss = Rmse.loss(&[3.0, 0.0], &[0.0, 4.0]).unwrap();
        assert_abs_diff_eq!(loss, 12.5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn identity_transform() {
        assert_eq!(Rmse.score_to_prediction(1.25), 1.25);
        assert_eq!(Rmse.score_to_prediction(-7.0), -7.0);
    }

    #[test]
    fn perfect_fit_has_zero_loss() {
        let loss = Rmse.loss(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        assert_eq!(loss, 0.0);
    }
}
