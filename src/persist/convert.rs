//! Conversion between runtime types and the artifact schema.

use crate::features::{CategoricalEncoder, ImputationStats};
use crate::model::{ModelMeta, SalesModel};
use crate::repr::{Forest, Tree};

use super::schema::{
    EncoderSchema, ForestSchema, ImputationSchema, ModelMetaSchema, ModelSchema, TreeSchema,
};
use super::PersistError;

pub(super) fn model_to_schema(model: &SalesModel) -> ModelSchema {
    ModelSchema {
        meta: ModelMetaSchema {
            n_features: model.meta().n_features,
            feature_names: model.meta().feature_names.clone(),
            best_iteration: model.meta().best_iteration,
            best_score: model.meta().best_score,
            objective: "squared".to_string(),
        },
        forest: forest_to_schema(model.forest()),
        encoder: EncoderSchema {
            store_type: model.encoder().store_type_vocab().to_vec(),
            assortment: model.encoder().assortment_vocab().to_vec(),
            state_holiday: model.encoder().state_holiday_vocab().to_vec(),
        },
        imputation: ImputationSchema {
            competition_distance: model.imputation().competition_distance,
        },
    }
}

pub(super) fn model_from_schema(schema: ModelSchema) -> Result<SalesModel, PersistError> {
    if schema.meta.n_features != schema.meta.feature_names.len() {
        return Err(PersistError::Invalid(format!(
            "n_features {} does not match {} feature names",
            schema.meta.n_features,
            schema.meta.feature_names.len()
        )));
    }

    let forest = forest_from_schema(schema.forest)?;
    let meta = ModelMeta::new(schema.meta.feature_names)
        .with_best_iteration(schema.meta.best_iteration, schema.meta.best_score);
    let encoder = CategoricalEncoder::from_vocabularies(
        schema.encoder.store_type,
        schema.encoder.assortment,
        schema.encoder.state_holiday,
    );
    let imputation = ImputationStats {
        competition_distance: schema.imputation.competition_distance,
    };

    Ok(SalesModel::new(forest, meta, encoder, imputation))
}

fn forest_to_schema(forest: &Forest) -> ForestSchema {
    ForestSchema {
        base_score: forest.base_score(),
        trees: forest.trees().map(tree_to_schema).collect(),
    }
}

fn forest_from_schema(schema: ForestSchema) -> Result<Forest, PersistError> {
    let mut forest = Forest::new(schema.base_score);
    for tree in schema.trees {
        forest.push_tree(tree_from_schema(tree)?);
    }
    forest
        .validate()
        .map_err(|e| PersistError::Invalid(format!("{e:?}")))?;
    Ok(forest)
}

fn tree_to_schema(tree: &Tree) -> TreeSchema {
    let nodes = 0..tree.n_nodes() as u32;
    TreeSchema {
        split_indices: nodes.clone().map(|n| tree.split_index(n)).collect(),
        thresholds: nodes.clone().map(|n| tree.split_threshold(n)).collect(),
        children_left: nodes.clone().map(|n| tree.left_child(n)).collect(),
        children_right: nodes.clone().map(|n| tree.right_child(n)).collect(),
        default_left: nodes.clone().map(|n| tree.default_left(n)).collect(),
        is_leaf: nodes.clone().map(|n| tree.is_leaf(n)).collect(),
        leaf_values: nodes.map(|n| tree.leaf_value(n)).collect(),
    }
}

fn tree_from_schema(schema: TreeSchema) -> Result<Tree, PersistError> {
    let n_nodes = schema.is_leaf.len();
    let lengths = [
        schema.split_indices.len(),
        schema.thresholds.len(),
        schema.children_left.len(),
        schema.children_right.len(),
        schema.default_left.len(),
        schema.leaf_values.len(),
    ];
    if lengths.iter().any(|&len| len != n_nodes) {
        return Err(PersistError::Invalid(format!(
            "tree arrays disagree on node count: {lengths:?} vs {n_nodes}"
        )));
    }

    Ok(Tree::new(
        schema.split_indices,
        schema.thresholds,
        schema.children_left,
        schema.children_right,
        schema.default_left,
        schema.is_leaf,
        schema.leaf_values,
    ))
}
