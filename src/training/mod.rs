//! Training infrastructure for the boosted ensemble.
//!
//! - [`GbdtTrainer`] / [`GbdtParams`]: the boosting loop and its
//!   hyperparameters
//! - [`ObjectiveFn`] / [`SquaredLoss`]: gradient computation
//! - [`MetricFn`] / [`Rmse`] / [`Rmspe`]: evaluation during training
//! - [`EarlyStopping`]: stop when the validation metric plateaus
//! - [`EvalSet`], [`MetricValue`]: per-round evaluation plumbing
//! - [`TrainingLogger`], [`Verbosity`]: round progress lines

mod callback;
mod eval;
mod gradients;
mod grower;
mod logger;
mod metrics;
mod objective;
mod trainer;

pub use callback::{EarlyStopAction, EarlyStopping};
pub use eval::{early_stop_value, evaluate_round, EvalSet, MetricValue};
pub use gradients::{Gradients, GradsTuple};
pub use grower::{GainParams, GrowerParams, TreeGrower};
pub use logger::{TrainingLogger, Verbosity};
pub use metrics::{MetricFn, Rmse, Rmspe, ZERO_TARGET_EPSILON};
pub use objective::{ObjectiveFn, SquaredLoss};
pub use trainer::{GbdtParams, GbdtTrainer, TrainOutcome};
