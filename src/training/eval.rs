//! Per-round evaluation during training.

use crate::dataset::Dataset;

use super::metrics::MetricFn;

/// A computed metric value with its name and direction.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue {
    /// E.g. `"train-rmspe"`, `"valid-rmspe"`.
    pub name: String,
    pub value: f64,
    pub higher_is_better: bool,
}

impl MetricValue {
    pub fn new(name: impl Into<String>, value: f64, higher_is_better: bool) -> Self {
        Self { name: name.into(), value, higher_is_better }
    }
}

impl std::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:.6}", self.name, self.value)
    }
}

/// Named evaluation dataset.
#[derive(Debug, Clone, Copy)]
pub struct EvalSet<'a> {
    pub name: &'a str,
    pub dataset: &'a Dataset,
}

impl<'a> EvalSet<'a> {
    pub fn new(name: &'a str, dataset: &'a Dataset) -> Self {
        Self { name, dataset }
    }
}

/// Compute the round's metric on the training set and every eval set.
///
/// `eval_predictions[i]` holds the accumulated predictions for
/// `eval_sets[i]`. The training metric is always index 0 of the result.
pub fn evaluate_round(
    metric: &dyn MetricFn,
    train_predictions: &[f32],
    train_targets: &[f32],
    eval_sets: &[EvalSet<'_>],
    eval_predictions: &[Vec<f32>],
) -> Vec<MetricValue> {
    debug_assert_eq!(eval_sets.len(), eval_predictions.len());

    let mut metrics = Vec::with_capacity(1 + eval_sets.len());
    metrics.push(MetricValue::new(
        format!("train-{}", metric.name()),
        metric.compute(train_predictions, train_targets),
        metric.higher_is_better(),
    ));

    for (eval_set, predictions) in eval_sets.iter().zip(eval_predictions) {
        let targets = eval_set.dataset.targets();
        let targets = targets.to_slice().expect("targets should be contiguous");
        metrics.push(MetricValue::new(
            format!("{}-{}", eval_set.name, metric.name()),
            metric.compute(predictions, targets),
            metric.higher_is_better(),
        ));
    }
    metrics
}

/// The value early stopping should monitor.
///
/// Eval sets are indices 1.. of the round metrics; falls back to the
/// training metric when the requested set does not exist.
pub fn early_stop_value(metrics: &[MetricValue], eval_set_idx: usize) -> f64 {
    let idx = if eval_set_idx + 1 < metrics.len() { eval_set_idx + 1 } else { 0 };
    metrics.get(idx).map(|m| m.value).unwrap_or(f64::NAN)
}
