//! storecast: daily retail sales forecasting.
//!
//! Trains a gradient-boosted regression ensemble on historical per-store
//! daily records, deriving calendar, competition, and promotion features
//! from the raw tables.
//!
//! # Key Types
//!
//! - [`PipelineConfig`] / [`run_training_pipeline`] - the end-to-end run
//! - [`SalesModel`] - trained ensemble with prediction and save/load
//! - [`GbdtTrainer`] / [`GbdtParams`] - the boosting loop
//! - [`Dataset`] - feature matrix with aligned targets
//! - [`CategoricalEncoder`] - stable categorical integer codes
//!
//! # Pipeline
//!
//! Merge → engineer → encode → split → train → evaluate → persist. Use
//! [`run_training_pipeline`] for the default layout or
//! [`run_training_pipeline_with`] to point at other directories. The
//! feature order contract lives in [`features::FEATURE_NAMES`].

pub mod config;
pub mod data;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod features;
pub mod model;
pub mod persist;
pub mod pipeline;
pub mod repr;
pub mod split;
pub mod training;
pub mod utils;

pub use config::PipelineConfig;
pub use dataset::Dataset;
pub use error::{DatasetError, PipelineError};
pub use features::{CategoricalEncoder, FEATURE_NAMES, N_FEATURES};
pub use model::SalesModel;
pub use pipeline::{run_training_pipeline, run_training_pipeline_with, PipelineReport};
pub use training::{GbdtParams, GbdtTrainer};
pub use utils::Parallelism;
