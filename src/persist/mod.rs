//! Model artifact persistence.
//!
//! One JSON file per trained model. Runtime types convert to plain schema
//! structs on save and are structurally validated on load, so a corrupt or
//! hand-edited artifact fails fast instead of mispredicting.

mod convert;
mod schema;

pub use schema::{
    EncoderSchema, ForestSchema, ImputationSchema, ModelMetaSchema, ModelSchema, TreeSchema,
};

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::model::SalesModel;

/// Errors serializing or deserializing a model artifact.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("artifact i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid artifact: {0}")]
    Invalid(String),
}

/// Write the artifact file, creating parent directories as needed.
pub fn save(model: &SalesModel, path: &Path) -> Result<(), PersistError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let schema = convert::model_to_schema(model);
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, &schema)?;
    writer.flush()?;
    Ok(())
}

/// Read and validate an artifact file.
pub fn load(path: &Path) -> Result<SalesModel, PersistError> {
    let file = File::open(path)?;
    let schema: ModelSchema = serde_json::from_reader(BufReader::new(file))?;
    convert::model_from_schema(schema)
}
