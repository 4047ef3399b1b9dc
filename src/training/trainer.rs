//! Boosting loop: orchestrates gradients, tree growth, evaluation, and
//! early stopping.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::Dataset;
use crate::repr::Forest;
use crate::utils::Parallelism;

use super::callback::{EarlyStopAction, EarlyStopping};
use super::eval::{self, EvalSet};
use super::gradients::Gradients;
use super::grower::{GainParams, GrowerParams, TreeGrower};
use super::logger::{TrainingLogger, Verbosity};
use super::metrics::MetricFn;
use super::objective::ObjectiveFn;

/// Hyperparameters for one training run.
///
/// Defaults mirror the production configuration: squared-error objective,
/// RMSPE monitoring, and the fixed seed that makes runs reproducible.
#[derive(Debug, Clone)]
pub struct GbdtParams {
    /// Upper bound on boosting rounds.
    pub n_rounds: u32,
    /// Shrinkage applied to every leaf weight.
    pub learning_rate: f32,
    /// Maximum tree depth.
    pub max_depth: u32,
    /// Fraction of rows sampled per round.
    pub subsample: f32,
    /// Fraction of columns sampled per tree.
    pub colsample: f32,
    /// L2 regularization on leaf weights.
    pub reg_lambda: f32,
    /// Minimum hessian sum per child.
    pub min_child_weight: f32,
    /// Minimum gain to keep a split.
    pub min_gain: f32,
    /// Stop after this many rounds without improvement. 0 disables.
    pub early_stopping_rounds: u32,
    /// Random seed for row/column sampling.
    pub seed: u64,
    /// Log metric lines every this many rounds.
    pub log_every: u32,
    /// Training output verbosity.
    pub verbosity: Verbosity,
}

impl Default for GbdtParams {
    fn default() -> Self {
        Self {
            n_rounds: 1000,
            learning_rate: 0.05,
            max_depth: 8,
            subsample: 0.7,
            colsample: 0.7,
            reg_lambda: 1.0,
            min_child_weight: 1.0,
            min_gain: 0.0,
            early_stopping_rounds: 50,
            seed: 42,
            log_every: 100,
            verbosity: Verbosity::Info,
        }
    }
}

impl GbdtParams {
    fn grower_params(&self) -> GrowerParams {
        GrowerParams {
            gain: GainParams {
                reg_lambda: self.reg_lambda,
                min_child_weight: self.min_child_weight,
                min_gain: self.min_gain,
            },
            learning_rate: self.learning_rate,
            max_depth: self.max_depth,
        }
    }
}

/// Result of a training run.
#[derive(Debug, Clone)]
pub struct TrainOutcome {
    /// The ensemble, truncated to the best-observed round when early
    /// stopping triggered.
    pub forest: Forest,
    /// Round index of the best monitored metric (when monitoring ran).
    pub best_iteration: Option<usize>,
    /// Best monitored metric value.
    pub best_score: Option<f64>,
}

/// Gradient-boosting trainer.
pub struct GbdtTrainer<O: ObjectiveFn, M: MetricFn> {
    objective: O,
    metric: M,
    params: GbdtParams,
}

impl<O: ObjectiveFn, M: MetricFn> GbdtTrainer<O, M> {
    pub fn new(objective: O, metric: M, params: GbdtParams) -> Self {
        Self { objective, metric, params }
    }

    pub fn params(&self) -> &GbdtParams {
        &self.params
    }

    /// Train an ensemble on `train`, monitoring the first eval set for
    /// early stopping (the training metric when none is given).
    ///
    /// Returns `None` if the inputs are unusable (no rows or features).
    pub fn train(
        &self,
        train: &Dataset,
        eval_sets: &[EvalSet<'_>],
        parallelism: Parallelism,
    ) -> Option<TrainOutcome> {
        let n_rows = train.n_rows();
        let n_features = train.n_features();
        if n_rows == 0 || n_features == 0 {
            return None;
        }

        let targets = train
            .targets()
            .to_slice()
            .expect("targets should be contiguous");

        let base_score = self.objective.base_score(train.targets());
        let mut forest = Forest::new(base_score);
        let mut predictions = vec![base_score; n_rows];
        let mut eval_predictions: Vec<Vec<f32>> = eval_sets
            .iter()
            .map(|set| vec![base_score; set.dataset.n_rows()])
            .collect();

        let mut gradients = Gradients::new(n_rows);
        let grower = TreeGrower::new(train.features(), self.params.grower_params(), parallelism);

        let mut early_stopping = EarlyStopping::new(
            self.params.early_stopping_rounds as usize,
            self.metric.higher_is_better(),
        );
        let mut best_n_trees = 0usize;

        let logger = TrainingLogger::new(self.params.verbosity, self.params.log_every);
        logger.start_training(self.params.n_rounds);

        for round in 0..self.params.n_rounds {
            self.objective
                .compute_gradients_into(&predictions, train.targets(), gradients.pairs_mut());

            let mut rng = StdRng::seed_from_u64(self.params.seed.wrapping_add(round as u64));
            let rows = sample_fraction(n_rows, self.params.subsample, &mut rng);
            let columns = sample_fraction(n_features, self.params.colsample, &mut rng);

            let tree = grower.grow(gradients.pairs(), rows, &columns);

            // The tree trained on a row subset still applies to every row.
            tree.predict_into(train.features(), &mut predictions, parallelism);
            for (set, preds) in eval_sets.iter().zip(eval_predictions.iter_mut()) {
                tree.predict_into(set.dataset.features(), preds, parallelism);
            }
            forest.push_tree(tree);

            let round_metrics = eval::evaluate_round(
                &self.metric,
                &predictions,
                targets,
                eval_sets,
                &eval_predictions,
            );
            logger.log_metrics(round, &round_metrics);

            match early_stopping.update(eval::early_stop_value(&round_metrics, 0)) {
                EarlyStopAction::Improved => {
                    best_n_trees = forest.n_trees();
                }
                EarlyStopAction::Stop => {
                    logger.log_early_stopping(
                        round,
                        early_stopping.best_round(),
                        self.metric.name(),
                    );
                    break;
                }
                EarlyStopAction::Continue => {}
            }
        }

        // Rewind to the best round rather than the last one.
        let forest = if early_stopping.is_enabled()
            && best_n_trees > 0
            && best_n_trees < forest.n_trees()
        {
            forest.truncated(best_n_trees)
        } else {
            forest
        };
        logger.finish_training(forest.n_trees());

        Some(TrainOutcome {
            forest,
            best_iteration: early_stopping.best_value().map(|_| early_stopping.best_round()),
            best_score: early_stopping.best_value(),
        })
    }
}

/// Sample `fraction` of `n` indices without replacement, sorted ascending.
///
/// A fraction at or above 1 keeps every index (and skips shuffling, so a
/// full-sample run is deterministic regardless of the rng state).
fn sample_fraction(n: usize, fraction: f32, rng: &mut StdRng) -> Vec<u32> {
    if fraction >= 1.0 {
        return (0..n as u32).collect();
    }
    let keep = ((n as f64 * fraction as f64).floor() as usize).max(1);
    let mut indices: Vec<u32> = (0..n as u32).collect();
    indices.shuffle(rng);
    indices.truncate(keep);
    indices.sort_unstable();
    indices
}
