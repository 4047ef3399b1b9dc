//! Regression tree storage and traversal.
//!
//! [`Tree`] is the immutable structure-of-arrays form used for prediction
//! and persistence; [`MutableTree`] is the append-and-patch form the grower
//! builds during training and then freezes.

use ndarray::ArrayView2;
use rayon::prelude::*;

use crate::utils::Parallelism;

use super::NodeId;

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeValidationError {
    /// Tree has no nodes.
    EmptyTree,
    /// A child pointer references an out-of-bounds node.
    ChildOutOfBounds { node: NodeId, child: NodeId, n_nodes: usize },
    /// A node references itself as a child.
    SelfLoop { node: NodeId },
    /// A node was reached by more than one path, or a cycle exists.
    DuplicateVisit { node: NodeId },
    /// A node exists in storage but is unreachable from the root.
    UnreachableNode { node: NodeId },
}

/// Structure-of-arrays regression tree.
///
/// Nodes live in flat parallel arrays for cache-friendly traversal; child
/// indices are local to the tree with node 0 as root. Splits are numeric
/// (`value < threshold` goes left); missing values follow `default_left`.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f32]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f32]>,
}

impl Tree {
    /// Create a tree from parallel arrays. All arrays must share one length.
    pub fn new(
        split_indices: Vec<u32>,
        split_thresholds: Vec<f32>,
        left_children: Vec<u32>,
        right_children: Vec<u32>,
        default_left: Vec<bool>,
        is_leaf: Vec<bool>,
        leaf_values: Vec<f32>,
    ) -> Self {
        let n_nodes = split_indices.len();
        debug_assert_eq!(n_nodes, split_thresholds.len());
        debug_assert_eq!(n_nodes, left_children.len());
        debug_assert_eq!(n_nodes, right_children.len());
        debug_assert_eq!(n_nodes, default_left.len());
        debug_assert_eq!(n_nodes, is_leaf.len());
        debug_assert_eq!(n_nodes, leaf_values.len());

        Self {
            split_indices: split_indices.into_boxed_slice(),
            split_thresholds: split_thresholds.into_boxed_slice(),
            left_children: left_children.into_boxed_slice(),
            right_children: right_children.into_boxed_slice(),
            default_left: default_left.into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: leaf_values.into_boxed_slice(),
        }
    }

    /// A single-leaf tree (a tree that never found a useful split).
    pub fn single_leaf(value: f32) -> Self {
        Self::new(vec![0], vec![0.0], vec![0], vec![0], vec![true], vec![true], vec![value])
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    #[inline]
    pub fn is_leaf(&self, node: NodeId) -> bool {
        self.is_leaf[node as usize]
    }

    #[inline]
    pub fn split_index(&self, node: NodeId) -> u32 {
        self.split_indices[node as usize]
    }

    #[inline]
    pub fn split_threshold(&self, node: NodeId) -> f32 {
        self.split_thresholds[node as usize]
    }

    #[inline]
    pub fn left_child(&self, node: NodeId) -> NodeId {
        self.left_children[node as usize]
    }

    #[inline]
    pub fn right_child(&self, node: NodeId) -> NodeId {
        self.right_children[node as usize]
    }

    #[inline]
    pub fn default_left(&self, node: NodeId) -> bool {
        self.default_left[node as usize]
    }

    #[inline]
    pub fn leaf_value(&self, node: NodeId) -> f32 {
        self.leaf_values[node as usize]
    }

    /// Traverse from the root to the leaf this sample reaches.
    #[inline]
    pub fn traverse_to_leaf(&self, sample: &[f32]) -> NodeId {
        let mut node: NodeId = 0;
        while !self.is_leaf(node) {
            let value = sample[self.split_index(node) as usize];
            node = if value.is_nan() {
                if self.default_left(node) {
                    self.left_child(node)
                } else {
                    self.right_child(node)
                }
            } else if value < self.split_threshold(node) {
                self.left_child(node)
            } else {
                self.right_child(node)
            };
        }
        node
    }

    /// Predict one sample.
    #[inline]
    pub fn predict_row(&self, sample: &[f32]) -> f32 {
        self.leaf_value(self.traverse_to_leaf(sample))
    }

    /// Add this tree's predictions to a buffer (accumulate pattern).
    ///
    /// `features` must be a standard-layout row-major matrix so rows are
    /// contiguous slices.
    pub fn predict_into(
        &self,
        features: ArrayView2<f32>,
        predictions: &mut [f32],
        parallelism: Parallelism,
    ) {
        debug_assert_eq!(predictions.len(), features.nrows());
        let row = |i: usize| {
            features
                .row(i)
                .to_slice()
                .expect("feature matrix rows should be contiguous")
        };

        match parallelism {
            Parallelism::Parallel => {
                predictions
                    .par_iter_mut()
                    .enumerate()
                    .for_each(|(i, pred)| *pred += self.predict_row(row(i)));
            }
            Parallelism::Sequential => {
                for (i, pred) in predictions.iter_mut().enumerate() {
                    *pred += self.predict_row(row(i));
                }
            }
        }
    }

    /// Validate structural invariants (used on deserialized artifacts).
    pub fn validate(&self) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }

        let mut visited = vec![false; n_nodes];
        let mut stack: Vec<NodeId> = vec![0];

        while let Some(node) = stack.pop() {
            let idx = node as usize;
            if visited[idx] {
                return Err(TreeValidationError::DuplicateVisit { node });
            }
            visited[idx] = true;

            if !self.is_leaf(node) {
                let left = self.left_child(node);
                let right = self.right_child(node);
                if left == node || right == node {
                    return Err(TreeValidationError::SelfLoop { node });
                }
                for child in [left, right] {
                    if child as usize >= n_nodes {
                        return Err(TreeValidationError::ChildOutOfBounds {
                            node,
                            child,
                            n_nodes,
                        });
                    }
                }
                stack.push(left);
                stack.push(right);
            }
        }

        if let Some(node) = visited.iter().position(|v| !v) {
            return Err(TreeValidationError::UnreachableNode { node: node as NodeId });
        }
        Ok(())
    }
}

// =============================================================================
// MutableTree
// =============================================================================

/// Append-and-patch tree used during growth.
///
/// The grower initializes a root, turns frontier nodes into splits (which
/// appends both children), and seals finished nodes as leaves. `freeze`
/// produces the immutable SoA form.
#[derive(Debug, Default)]
pub struct MutableTree {
    split_indices: Vec<u32>,
    split_thresholds: Vec<f32>,
    left_children: Vec<u32>,
    right_children: Vec<u32>,
    default_left: Vec<bool>,
    is_leaf: Vec<bool>,
    leaf_values: Vec<f32>,
}

impl MutableTree {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_node(&mut self) -> NodeId {
        let id = self.is_leaf.len() as NodeId;
        self.split_indices.push(0);
        self.split_thresholds.push(0.0);
        self.left_children.push(0);
        self.right_children.push(0);
        self.default_left.push(true);
        self.is_leaf.push(false);
        self.leaf_values.push(0.0);
        id
    }

    /// Create the root node. Must be called exactly once, first.
    pub fn init_root(&mut self) -> NodeId {
        debug_assert!(self.is_leaf.is_empty());
        self.push_node()
    }

    /// Turn `node` into a numeric split and append its children.
    pub fn apply_split(
        &mut self,
        node: NodeId,
        feature: u32,
        threshold: f32,
        default_left: bool,
    ) -> (NodeId, NodeId) {
        let left = self.push_node();
        let right = self.push_node();
        let idx = node as usize;
        self.split_indices[idx] = feature;
        self.split_thresholds[idx] = threshold;
        self.left_children[idx] = left;
        self.right_children[idx] = right;
        self.default_left[idx] = default_left;
        self.is_leaf[idx] = false;
        (left, right)
    }

    /// Seal `node` as a leaf with the given value.
    pub fn make_leaf(&mut self, node: NodeId, value: f32) {
        let idx = node as usize;
        self.is_leaf[idx] = true;
        self.leaf_values[idx] = value;
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    /// Freeze into the immutable SoA representation.
    pub fn freeze(self) -> Tree {
        Tree::new(
            self.split_indices,
            self.split_thresholds,
            self.left_children,
            self.right_children,
            self.default_left,
            self.is_leaf,
            self.leaf_values,
        )
    }
}
