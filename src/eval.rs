//! Final model evaluation.
//!
//! The reported score is recomputed here, independent of the trainer's
//! early-stopping bookkeeping. [`rmspe`] deliberately carries its own
//! implementation of the epsilon-substitution rule; a test pins it to the
//! trainer's metric so the two can never drift apart silently.

use log::info;

use crate::dataset::Dataset;
use crate::model::SalesModel;
use crate::training::ZERO_TARGET_EPSILON;
use crate::utils::Parallelism;

/// Root Mean Squared Percentage Error over index-aligned slices.
///
/// Zero targets are replaced with [`ZERO_TARGET_EPSILON`] before dividing;
/// the substitution inflates the reported error for those rows and is the
/// documented cost of keeping evaluation total.
pub fn rmspe(predictions: &[f32], targets: &[f32]) -> f64 {
    debug_assert_eq!(predictions.len(), targets.len());
    if targets.is_empty() {
        return 0.0;
    }

    let sum_sq: f64 = targets
        .iter()
        .zip(predictions)
        .map(|(&y, &p)| {
            let y = f64::from(if y == 0.0 { ZERO_TARGET_EPSILON } else { y });
            let pct = (y - p as f64) / y;
            pct * pct
        })
        .sum();
    (sum_sq / targets.len() as f64).sqrt()
}

/// Compute the final validation RMSPE for a trained model.
pub fn final_validation_score(
    model: &SalesModel,
    validation: &Dataset,
    parallelism: Parallelism,
) -> f64 {
    let predictions = model.predict_batch(validation.features(), parallelism);
    let targets = validation
        .targets()
        .to_slice()
        .expect("targets should be contiguous");
    let score = rmspe(&predictions, targets);
    info!("final validation rmspe: {score:.4}");
    score
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::training::{MetricFn, Rmspe};
    use approx::assert_abs_diff_eq;

    #[test]
    fn agrees_with_trainer_metric() {
        // Includes a zero target so the substitution path is exercised in
        // both implementations.
        let targets = [10.0f32, 20.0, 0.0];
        let predictions = [12.0f32, 18.0, 1.0];

        let standalone = rmspe(&predictions, &targets);
        let trainer_metric = Rmspe.compute(&predictions, &targets);
        assert_abs_diff_eq!(standalone, trainer_metric, epsilon = 1e-12);
        assert!(standalone.is_finite());
    }

    #[test]
    fn known_value_without_zeros() {
        let value = rmspe(&[12.0, 18.0], &[10.0, 20.0]);
        assert_abs_diff_eq!(value, ((0.04 + 0.01) / 2.0f64).sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn empty_input_is_zero() {
        assert_eq!(rmspe(&[], &[]), 0.0);
    }
}
