//! The end-to-end training pipeline.
//!
//! A synchronous batch run: each stage completes before the next starts,
//! every stage consumes the full in-memory table its predecessor produced,
//! and one run writes one model artifact (last writer wins on rerun).

use std::path::PathBuf;

use log::info;

use crate::config::PipelineConfig;
use crate::data;
use crate::dataset::Dataset;
use crate::error::PipelineError;
use crate::eval;
use crate::features::{self, CategoricalEncoder, FEATURE_NAMES};
use crate::model::{ModelMeta, SalesModel};
use crate::split;
use crate::training::{EvalSet, GbdtTrainer, Rmspe, SquaredLoss};
use crate::utils::Parallelism;

/// Summary of a completed pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub train_rows: usize,
    pub validation_rows: usize,
    pub n_trees: usize,
    pub best_iteration: Option<usize>,
    pub validation_rmspe: f64,
    pub model_path: PathBuf,
}

/// Run the full training pipeline with the default configuration.
pub fn run_training_pipeline() -> Result<PipelineReport, PipelineError> {
    run_training_pipeline_with(&PipelineConfig::default())
}

/// Run the full training pipeline: merge, engineer, encode, split, train,
/// evaluate, persist.
pub fn run_training_pipeline_with(
    config: &PipelineConfig,
) -> Result<PipelineReport, PipelineError> {
    let parallelism =
        Parallelism::from_threads(std::thread::available_parallelism().map_or(1, |n| n.get()));

    info!("--- step 1: data preparation ---");
    let merged = data::merge_or_load(
        &config.train_csv(),
        &config.store_csv(),
        &config.merged_csv(),
    )?;

    info!("--- step 2: feature engineering ---");
    let (engineered, imputation) = features::engineer_features(merged);

    info!("--- step 3: encoding categorical features ---");
    let encoder = CategoricalEncoder::fit(&engineered);

    info!("--- step 4: train/validation split ---");
    let split = split::temporal_split(engineered, config.validation_weeks);
    let train = Dataset::from_records(&split.train, &encoder)?;
    let validation = Dataset::from_records(&split.validation, &encoder)?;
    info!("training set: {} rows", train.n_rows());
    info!("validation set: {} rows", validation.n_rows());

    info!("--- step 5: model training ---");
    let trainer = GbdtTrainer::new(SquaredLoss, Rmspe, config.params.clone());
    let eval_sets = [EvalSet::new("valid", &validation)];
    let outcome = trainer
        .train(&train, &eval_sets, parallelism)
        .ok_or(PipelineError::TrainingFailed)?;

    let meta = ModelMeta::new(FEATURE_NAMES.iter().map(|s| s.to_string()).collect())
        .with_best_iteration(outcome.best_iteration, outcome.best_score);
    let model = SalesModel::new(outcome.forest, meta, encoder, imputation);

    info!("--- step 6: model evaluation ---");
    let validation_rmspe = eval::final_validation_score(&model, &validation, parallelism);

    info!("--- step 7: saving model ---");
    let model_path = config.model_path();
    model.save(&model_path)?;
    info!("model saved to {}", model_path.display());

    Ok(PipelineReport {
        train_rows: train.n_rows(),
        validation_rows: validation.n_rows(),
        n_trees: model.n_trees(),
        best_iteration: model.meta().best_iteration,
        validation_rmspe,
        model_path,
    })
}
