//! Serializable schema for the model artifact.
//!
//! Schema types are plain data, separate from the runtime types, so the
//! artifact format does not leak training-only representations. There is no
//! version field: consumers accept the single current layout, and the
//! artifact itself carries the feature-name list, encoder vocabularies, and
//! imputation value that must stay in sync with it.

use serde::{Deserialize, Serialize};

/// Top-level artifact layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSchema {
    pub meta: ModelMetaSchema,
    pub forest: ForestSchema,
    pub encoder: EncoderSchema,
    pub imputation: ImputationSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetaSchema {
    pub n_features: usize,
    pub feature_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_iteration: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_score: Option<f64>,
    /// Objective name, for reproducibility; not used at inference.
    pub objective: String,
}

/// Forest as a list of SoA trees plus the base score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestSchema {
    pub base_score: f32,
    pub trees: Vec<TreeSchema>,
}

/// One tree in SoA layout, arrays indexed by node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeSchema {
    pub split_indices: Vec<u32>,
    pub thresholds: Vec<f32>,
    pub children_left: Vec<u32>,
    pub children_right: Vec<u32>,
    pub default_left: Vec<bool>,
    pub is_leaf: Vec<bool>,
    pub leaf_values: Vec<f32>,
}

/// Fitted categorical vocabularies, sorted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSchema {
    pub store_type: Vec<String>,
    pub assortment: Vec<String>,
    pub state_holiday: Vec<String>,
}

/// Batch statistics used for missing-value imputation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImputationSchema {
    pub competition_distance: f32,
}
