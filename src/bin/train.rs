//! Training pipeline entry point.
//!
//! Reads the fixed input layout relative to the working directory (or the
//! directory given as the first argument) and writes one model artifact.
//! Exit status reflects whether every stage completed.

use std::process::ExitCode;

use log::{error, info};

use storecast::{run_training_pipeline, run_training_pipeline_with, PipelineConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let report = match std::env::args().nth(1) {
        Some(root) => run_training_pipeline_with(&PipelineConfig::rooted_at(root)),
        None => run_training_pipeline(),
    };

    match report {
        Ok(report) => {
            info!(
                "pipeline finished: {} trees (best round {:?}), validation rmspe {:.4}",
                report.n_trees, report.best_iteration, report.validation_rmspe
            );
            info!("artifact: {}", report.model_path.display());
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("pipeline failed: {err}");
            ExitCode::FAILURE
        }
    }
}
