//! CSV input/output for the tabular interfaces.
//!
//! All tables are comma-delimited with a header row. Opening failures map
//! to [`PipelineError::DataUnavailable`] so the pipeline can abort before
//! any stage runs; per-row parse failures name the offending file.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::PipelineError;

use super::{MergedRecord, RawDailyRecord, StoreMetadata};

fn open(path: &Path) -> Result<BufReader<File>, PipelineError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| PipelineError::DataUnavailable { path: path.to_path_buf(), source })
}

fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PipelineError> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|source| PipelineError::MalformedRecord { path: path.to_path_buf(), source })
}

/// Read the per-store daily transaction table.
pub fn read_transactions(path: &Path) -> Result<Vec<RawDailyRecord>, PipelineError> {
    read_table(path)
}

/// Read the static store metadata table.
pub fn read_store_metadata(path: &Path) -> Result<Vec<StoreMetadata>, PipelineError> {
    read_table(path)
}

/// Read a previously persisted merged table.
pub fn read_merged(path: &Path) -> Result<Vec<MergedRecord>, PipelineError> {
    read_table(path)
}

/// Persist the merged table so later runs can skip the join.
pub fn write_merged(path: &Path, records: &[MergedRecord]) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        write_row(&mut writer, record, path)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_row<W: std::io::Write, T: Serialize>(
    writer: &mut csv::Writer<W>,
    row: &T,
    path: &Path,
) -> Result<(), PipelineError> {
    writer
        .serialize(row)
        .map_err(|source| PipelineError::WriteFailed { path: path.to_path_buf(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::test_fixtures;
    use chrono::NaiveDate;

    #[test]
    fn missing_file_is_data_unavailable() {
        let err = read_transactions(Path::new("/nonexistent/train.csv")).unwrap_err();
        assert!(matches!(err, PipelineError::DataUnavailable { .. }));
    }

    #[test]
    fn transactions_round_trip_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train_merged.csv");

        let date = NaiveDate::from_ymd_opt(2015, 6, 1).unwrap();
        let records = vec![
            MergedRecord::join(
                &test_fixtures::transaction(1, date, 5263.0),
                Some(&test_fixtures::store(1)),
            ),
            MergedRecord::join(&test_fixtures::transaction(2, date, 0.0), None),
        ];

        write_merged(&path, &records).unwrap();
        let reloaded = read_merged(&path).unwrap();
        assert_eq!(reloaded, records);
    }

    #[test]
    fn raw_table_parses_flags_and_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("train.csv");
        std::fs::write(
            &path,
            "Store,DayOfWeek,Date,Sales,Customers,Open,Promo,StateHoliday,SchoolHoliday\n\
             1,5,2015-07-31,5263,555,1,1,0,1\n\
             2,7,2015-08-02,0,0,0,0,a,0\n",
        )
        .unwrap();

        let rows = read_transactions(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2015, 7, 31).unwrap());
        assert!(rows[0].open && rows[0].promo && rows[0].school_holiday);
        assert_eq!(rows[1].state_holiday, "a");
        assert!(!rows[1].open);
    }

    #[test]
    fn store_table_parses_missing_cells_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.csv");
        std::fs::write(
            &path,
            "Store,StoreType,Assortment,CompetitionDistance,CompetitionOpenSinceMonth,\
             CompetitionOpenSinceYear,Promo2,Promo2SinceWeek,Promo2SinceYear,PromoInterval\n\
             1,c,a,1270,9,2008,0,,,\n\
             2,a,a,,,,1,13,2010,\"Jan,Apr,Jul,Oct\"\n",
        )
        .unwrap();

        let rows = read_store_metadata(&path).unwrap();
        assert_eq!(rows[0].competition_distance, Some(1270.0));
        assert_eq!(rows[0].promo2_since_week, None);
        assert_eq!(rows[1].competition_distance, None);
        assert_eq!(rows[1].promo_interval.as_deref(), Some("Jan,Apr,Jul,Oct"));
    }
}
