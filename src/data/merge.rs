//! Left join of daily transactions with static store metadata.

use std::collections::HashMap;
use std::path::Path;

use log::{info, warn};

use crate::error::PipelineError;

use super::{io, MergedRecord, RawDailyRecord, StoreMetadata};

/// Join every transaction with its store's metadata.
///
/// Output row count always equals the transaction row count; transactions
/// whose store id has no metadata keep `None` metadata fields and are
/// counted with a warning (valid input has none).
pub fn merge_records(
    transactions: &[RawDailyRecord],
    stores: &[StoreMetadata],
) -> Vec<MergedRecord> {
    let by_id: HashMap<u32, &StoreMetadata> =
        stores.iter().map(|s| (s.store_id, s)).collect();

    let mut unmatched = 0usize;
    let merged: Vec<MergedRecord> = transactions
        .iter()
        .map(|txn| {
            let store = by_id.get(&txn.store_id).copied();
            if store.is_none() {
                unmatched += 1;
            }
            MergedRecord::join(txn, store)
        })
        .collect();

    debug_assert_eq!(merged.len(), transactions.len());
    if unmatched > 0 {
        warn!("{unmatched} transactions had no matching store metadata row");
    }
    merged
}

/// Produce the merged table, reusing a previously persisted copy.
///
/// If `merged_path` already exists it is loaded and the join is skipped;
/// otherwise both source tables are read, joined, and the result written to
/// `merged_path` for later runs.
pub fn merge_or_load(
    train_path: &Path,
    store_path: &Path,
    merged_path: &Path,
) -> Result<Vec<MergedRecord>, PipelineError> {
    if merged_path.is_file() {
        info!("loading previously merged table from {}", merged_path.display());
        return io::read_merged(merged_path);
    }

    let transactions = io::read_transactions(train_path)?;
    let stores = io::read_store_metadata(store_path)?;
    info!(
        "merging {} transactions with {} store metadata rows",
        transactions.len(),
        stores.len()
    );

    let merged = merge_records(&transactions, &stores);
    io::write_merged(merged_path, &merged)?;
    info!("merged table written to {}", merged_path.display());
    Ok(merged)
}
