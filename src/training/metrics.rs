//! Evaluation metrics.
//!
//! Metrics are separate from loss functions: the ensemble is trained with
//! squared error but monitored and reported with the scale-invariant RMSPE.

/// Substituted for exact-zero targets before dividing.
///
/// The splitter already removes zero-sales rows from both partitions, so in
/// the intended pipeline this never fires; it stays as protection against
/// future splitter changes. Substitution inflates the reported error for
/// any zero target it touches.
pub const ZERO_TARGET_EPSILON: f32 = 1e-6;

/// A metric for evaluating prediction quality.
pub trait MetricFn: Send + Sync {
    /// Compute the metric over index-aligned predictions and targets.
    fn compute(&self, predictions: &[f32], targets: &[f32]) -> f64;

    /// Whether higher values indicate better performance.
    fn higher_is_better(&self) -> bool {
        false
    }

    /// Name of the metric (for logging).
    fn name(&self) -> &'static str;
}

/// Root Mean Squared Error: `sqrt(mean((pred - target)²))`. Lower is better.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmse;

impl MetricFn for Rmse {
    fn compute(&self, predictions: &[f32], targets: &[f32]) -> f64 {
        debug_assert_eq!(predictions.len(), targets.len());
        if targets.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(&p, &y)| {
                let diff = p as f64 - y as f64;
                diff * diff
            })
            .sum();
        (sum_sq / targets.len() as f64).sqrt()
    }

    fn name(&self) -> &'static str {
        "rmse"
    }
}

/// Root Mean Squared Percentage Error. Lower is better.
///
/// `sqrt(mean(((y − ŷ) / y)²))` with [`ZERO_TARGET_EPSILON`] substituted
/// for `y = 0`, making error magnitude comparable across stores of very
/// different sales volume.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rmspe;

impl MetricFn for Rmspe {
    fn compute(&self, predictions: &[f32], targets: &[f32]) -> f64 {
        debug_assert_eq!(predictions.len(), targets.len());
        if targets.is_empty() {
            return 0.0;
        }
        let sum_sq: f64 = predictions
            .iter()
            .zip(targets)
            .map(|(&p, &y)| {
                let y = f64::from(if y == 0.0 { ZERO_TARGET_EPSILON } else { y });
                let pct = (y - p as f64) / y;
                pct * pct
            })
            .sum();
        (sum_sq / targets.len() as f64).sqrt()
    }

    fn name(&self) -> &'static str {
        "rmspe"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rmse_known_value() {
        // sqrt((1 + 4) / 2) = sqrt(2.5)
        let rmse = Rmse.compute(&[1.0, 2.0], &[0.0, 0.0]);
        assert_abs_diff_eq!(rmse, 2.5f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn rmspe_perfect() {
        let rmspe = Rmspe.compute(&[10.0, 20.0], &[10.0, 20.0]);
        assert_abs_diff_eq!(rmspe, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn rmspe_known_value() {
        // y=10, p=12 -> -0.2 ; y=20, p=18 -> 0.1
        let rmspe = Rmspe.compute(&[12.0, 18.0], &[10.0, 20.0]);
        let expected = ((0.04 + 0.01) / 2.0f64).sqrt();
        assert_abs_diff_eq!(rmspe, expected, epsilon = 1e-9);
    }

    #[test]
    fn rmspe_substitutes_epsilon_for_zero_targets() {
        // A zero target contributes ((eps - 1) / eps)² instead of dividing
        // by zero; the result is enormous but finite.
        let rmspe = Rmspe.compute(&[1.0], &[0.0]);
        assert!(rmspe.is_finite());
        assert!(rmspe > 1e5);
    }

    #[test]
    fn metric_properties() {
        assert!(!Rmse.higher_is_better());
        assert!(!Rmspe.higher_is_better());
        assert_eq!(Rmse.name(), "rmse");
        assert_eq!(Rmspe.name(), "rmspe");
    }
}
