//! Pipeline-level error types.

use std::path::PathBuf;

/// Errors surfaced by the training pipeline.
///
/// `DataUnavailable` aborts the pipeline before any stage mutates state;
/// everything downstream of data loading is either imputed or reported as a
/// metric, never raised (see the module docs on `features` and `eval`).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// An input file is missing or unreadable.
    #[error("input data unavailable: {path}: {source}")]
    DataUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An input file exists but a row failed to parse.
    #[error("malformed record in {path}: {source}")]
    MalformedRecord {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Writing an output table failed.
    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The engineered table was empty after filtering, or targets and
    /// features fell out of alignment.
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    /// The trainer rejected its inputs and produced no ensemble.
    #[error("training produced no model")]
    TrainingFailed,

    /// Model artifact serialization or deserialization failed.
    #[error(transparent)]
    Persist(#[from] crate::persist::PersistError),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors constructing a [`Dataset`](crate::dataset::Dataset).
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset is empty")]
    Empty,

    #[error("feature/target length mismatch: {n_rows} rows vs {n_targets} targets")]
    LengthMismatch { n_rows: usize, n_targets: usize },
}
