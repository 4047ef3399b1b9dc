//! High-level sales model: forest, metadata, and the preprocessing state
//! needed to turn an engineered record into a prediction.

mod meta;

pub use meta::ModelMeta;

use std::path::Path;

use ndarray::ArrayView2;

use crate::data::MergedRecord;
use crate::features::{self, CategoricalEncoder, EngineeredRecord, ImputationStats};
use crate::persist::{self, PersistError};
use crate::repr::Forest;
use crate::utils::Parallelism;

/// A trained sales forecaster.
///
/// Bundles the ensemble with everything inference needs to reproduce the
/// training-time feature space: feature order, fitted categorical
/// vocabularies, and the imputation statistic. All of it persists into one
/// artifact file, so no consumer has to keep encodings in sync by hand.
#[derive(Debug, Clone)]
pub struct SalesModel {
    forest: Forest,
    meta: ModelMeta,
    encoder: CategoricalEncoder,
    imputation: ImputationStats,
}

impl SalesModel {
    pub fn new(
        forest: Forest,
        meta: ModelMeta,
        encoder: CategoricalEncoder,
        imputation: ImputationStats,
    ) -> Self {
        Self { forest, meta, encoder, imputation }
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    pub fn encoder(&self) -> &CategoricalEncoder {
        &self.encoder
    }

    pub fn imputation(&self) -> &ImputationStats {
        &self.imputation
    }

    pub fn n_trees(&self) -> usize {
        self.forest.n_trees()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.meta.feature_names
    }

    /// Predict from a feature vector already in training order.
    pub fn predict_row(&self, features: &[f32]) -> f32 {
        debug_assert_eq!(features.len(), self.meta.n_features);
        self.forest.predict_row(features)
    }

    /// Predict every row of a feature matrix in training order.
    pub fn predict_batch(&self, features: ArrayView2<f32>, parallelism: Parallelism) -> Vec<f32> {
        self.forest.predict_batch(features, parallelism)
    }

    /// Predict directly from a merged record, running the same feature
    /// derivations and encoding as training.
    pub fn predict_record(&self, record: MergedRecord) -> f32 {
        let engineered = features::engineer_one(record, &self.imputation);
        self.predict_engineered(&engineered)
    }

    /// Predict from an already engineered record.
    pub fn predict_engineered(&self, record: &EngineeredRecord) -> f32 {
        let row = features::feature_row(record, &self.encoder);
        self.forest.predict_row(&row)
    }

    /// Serialize to the single artifact file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        persist::save(self, path.as_ref())
    }

    /// Load an artifact written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        persist::load(path.as_ref())
    }
}
