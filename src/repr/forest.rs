//! Forest: the boosted collection of regression trees.

use ndarray::ArrayView2;

use crate::utils::Parallelism;

use super::tree::{Tree, TreeValidationError};

/// Structural validation errors for [`Forest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestValidationError {
    InvalidTree { tree_idx: usize, error: TreeValidationError },
}

/// Additive ensemble of regression trees with a base score.
///
/// A prediction is `base_score + Σ tree(sample)`. Single-output regression
/// only; trees are applied in training order.
#[derive(Debug, Clone, PartialEq)]
pub struct Forest {
    trees: Vec<Tree>,
    base_score: f32,
}

impl Forest {
    pub fn new(base_score: f32) -> Self {
        Self { trees: Vec::new(), base_score }
    }

    pub fn push_tree(&mut self, tree: Tree) {
        self.trees.push(tree);
    }

    #[inline]
    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    #[inline]
    pub fn base_score(&self) -> f32 {
        self.base_score
    }

    #[inline]
    pub fn tree(&self, idx: usize) -> &Tree {
        &self.trees[idx]
    }

    pub fn trees(&self) -> impl Iterator<Item = &Tree> {
        self.trees.iter()
    }

    /// Predict a single sample.
    pub fn predict_row(&self, sample: &[f32]) -> f32 {
        self.trees
            .iter()
            .fold(self.base_score, |acc, tree| acc + tree.predict_row(sample))
    }

    /// Predict every row of a feature matrix.
    pub fn predict_batch(&self, features: ArrayView2<f32>, parallelism: Parallelism) -> Vec<f32> {
        let mut predictions = vec![self.base_score; features.nrows()];
        for tree in &self.trees {
            tree.predict_into(features, &mut predictions, parallelism);
        }
        predictions
    }

    /// Copy of this forest keeping only the first `n_trees` trees.
    ///
    /// Used by early stopping to rewind to the best-observed round.
    pub fn truncated(&self, n_trees: usize) -> Self {
        Self {
            trees: self.trees.iter().take(n_trees).cloned().collect(),
            base_score: self.base_score,
        }
    }

    /// Validate every tree's structural invariants.
    pub fn validate(&self) -> Result<(), ForestValidationError> {
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate()
                .map_err(|error| ForestValidationError::InvalidTree { tree_idx, error })?;
        }
        Ok(())
    }
}
