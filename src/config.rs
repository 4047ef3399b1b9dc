//! Pipeline configuration.
//!
//! One [`PipelineConfig`] value is constructed at process start and passed
//! down through every stage; nothing reads ambient global state.

use std::path::{Path, PathBuf};

use crate::training::GbdtParams;

/// Transaction table file name under the raw data directory.
pub const TRAIN_FILE: &str = "train.csv";
/// Store metadata table file name under the raw data directory.
pub const STORE_FILE: &str = "store.csv";
/// Merged intermediate table file name under the processed data directory.
pub const MERGED_FILE: &str = "train_merged.csv";
/// Model artifact file name under the model directory.
pub const MODEL_FILE: &str = "sales_model.json";

/// Configuration for one training-pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding `train.csv` and `store.csv`.
    pub raw_data_dir: PathBuf,
    /// Directory for the merged intermediate table.
    pub processed_data_dir: PathBuf,
    /// Directory for the model artifact.
    pub model_dir: PathBuf,
    /// Length of the validation window, counted back from the newest date.
    pub validation_weeks: i64,
    /// Boosting hyperparameters.
    pub params: GbdtParams,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_data_dir: PathBuf::from("data/raw"),
            processed_data_dir: PathBuf::from("data/processed"),
            model_dir: PathBuf::from("models"),
            validation_weeks: 6,
            params: GbdtParams::default(),
        }
    }
}

impl PipelineConfig {
    /// Root all data and model paths under one directory, keeping the
    /// default layout (`raw/`, `processed/`, `models/`).
    pub fn rooted_at(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            raw_data_dir: root.join("data/raw"),
            processed_data_dir: root.join("data/processed"),
            model_dir: root.join("models"),
            ..Self::default()
        }
    }

    pub fn train_csv(&self) -> PathBuf {
        self.raw_data_dir.join(TRAIN_FILE)
    }

    pub fn store_csv(&self) -> PathBuf {
        self.raw_data_dir.join(STORE_FILE)
    }

    pub fn merged_csv(&self) -> PathBuf {
        self.processed_data_dir.join(MERGED_FILE)
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE)
    }
}
