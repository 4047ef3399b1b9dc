//! In-memory dataset: a feature matrix with index-aligned targets.

use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::DatasetError;
use crate::features::{self, CategoricalEncoder, EngineeredRecord, N_FEATURES};

/// One partition of engineered data, ready for training or evaluation.
///
/// Features are row-major `n_rows × N_FEATURES` in the fixed feature order;
/// `targets[i]` is the sales value for row `i`.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Array2<f32>,
    targets: Array1<f32>,
}

impl Dataset {
    /// Build a dataset from raw parts.
    pub fn new(features: Array2<f32>, targets: Array1<f32>) -> Result<Self, DatasetError> {
        if features.nrows() == 0 {
            return Err(DatasetError::Empty);
        }
        if features.nrows() != targets.len() {
            return Err(DatasetError::LengthMismatch {
                n_rows: features.nrows(),
                n_targets: targets.len(),
            });
        }
        Ok(Self { features, targets })
    }

    /// Assemble feature vectors for a slice of engineered records.
    pub fn from_records(
        records: &[EngineeredRecord],
        encoder: &CategoricalEncoder,
    ) -> Result<Self, DatasetError> {
        let mut features = Array2::zeros((records.len(), N_FEATURES));
        let mut targets = Array1::zeros(records.len());

        for (i, rec) in records.iter().enumerate() {
            let row = features::feature_row(rec, encoder);
            features.row_mut(i).assign(&ndarray::arr1(&row));
            targets[i] = rec.record.sales;
        }

        Self::new(features, targets)
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.features.nrows()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    #[inline]
    pub fn features(&self) -> ArrayView2<f32> {
        self.features.view()
    }

    #[inline]
    pub fn targets(&self) -> ArrayView1<f32> {
        self.targets.view()
    }

    /// One row of the feature matrix as a slice.
    #[inline]
    pub fn row(&self, idx: usize) -> &[f32] {
        self.features
            .row(idx)
            .to_slice()
            .expect("row-major feature matrix rows are contiguous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rejects_empty_and_misaligned() {
        let empty = Array2::<f32>::zeros((0, N_FEATURES));
        assert!(matches!(
            Dataset::new(empty, Array1::zeros(0)),
            Err(DatasetError::Empty)
        ));

        let features = Array2::<f32>::zeros((3, N_FEATURES));
        assert!(matches!(
            Dataset::new(features, Array1::zeros(2)),
            Err(DatasetError::LengthMismatch { n_rows: 3, n_targets: 2 })
        ));
    }

    #[test]
    fn rows_are_contiguous_slices() {
        let features = array![[1.0f32, 2.0], [3.0, 4.0]];
        let dataset = Dataset::new(features, array![10.0f32, 20.0]).unwrap();
        assert_eq!(dataset.row(1), &[3.0, 4.0]);
        assert_eq!(dataset.n_rows(), 2);
        assert_eq!(dataset.n_features(), 2);
    }
}
