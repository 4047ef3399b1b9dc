//! Training objectives (loss functions).

use ndarray::ArrayView1;

use super::gradients::GradsTuple;

/// An objective computes per-row gradients and the ensemble's base score.
pub trait ObjectiveFn: Send + Sync {
    /// Fill `grad_hess` from current predictions and targets.
    fn compute_gradients_into(
        &self,
        predictions: &[f32],
        targets: ArrayView1<f32>,
        grad_hess: &mut [GradsTuple],
    );

    /// Initial prediction before any tree is added.
    fn base_score(&self, targets: ArrayView1<f32>) -> f32;

    fn name(&self) -> &'static str;
}

/// Squared error loss (L2) for regression.
///
/// - Loss: `0.5 * (pred - target)²`
/// - Gradient: `pred - target`
/// - Hessian: `1.0`
#[derive(Debug, Clone, Copy, Default)]
pub struct SquaredLoss;

impl ObjectiveFn for SquaredLoss {
    fn compute_gradients_into(
        &self,
        predictions: &[f32],
        targets: ArrayView1<f32>,
        grad_hess: &mut [GradsTuple],
    ) {
        debug_assert_eq!(predictions.len(), targets.len());
        debug_assert_eq!(predictions.len(), grad_hess.len());

        for ((gh, &pred), &target) in grad_hess.iter_mut().zip(predictions).zip(targets.iter()) {
            gh.grad = pred - target;
            gh.hess = 1.0;
        }
    }

    fn base_score(&self, targets: ArrayView1<f32>) -> f32 {
        if targets.is_empty() {
            return 0.0;
        }
        let sum: f64 = targets.iter().map(|&y| y as f64).sum();
        (sum / targets.len() as f64) as f32
    }

    fn name(&self) -> &'static str {
        "squared"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn gradients_are_residuals() {
        let targets = array![1.0f32, 2.0, 3.0];
        let predictions = vec![1.5f32, 2.0, 2.0];
        let mut grad_hess = vec![GradsTuple::default(); 3];

        SquaredLoss.compute_gradients_into(&predictions, targets.view(), &mut grad_hess);

        assert_abs_diff_eq!(grad_hess[0].grad, 0.5);
        assert_abs_diff_eq!(grad_hess[1].grad, 0.0);
        assert_abs_diff_eq!(grad_hess[2].grad, -1.0);
        assert!(grad_hess.iter().all(|gh| gh.hess == 1.0));
    }

    #[test]
    fn base_score_is_mean_target() {
        let targets = array![2.0f32, 4.0, 6.0];
        assert_abs_diff_eq!(SquaredLoss.base_score(targets.view()), 4.0);
        assert_eq!(SquaredLoss.base_score(array![].view()), 0.0);
    }
}
