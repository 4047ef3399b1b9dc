//! Temporal train/validation split.

use chrono::{Duration, NaiveDate};
use log::info;

use crate::features::EngineeredRecord;

/// Engineered rows partitioned by the temporal cutoff.
#[derive(Debug)]
pub struct SplitRecords {
    pub train: Vec<EngineeredRecord>,
    pub validation: Vec<EngineeredRecord>,
    pub cutoff: NaiveDate,
}

/// Partition engineered rows into training and validation sets.
///
/// Rows where the store was closed or sales were zero carry no learning
/// signal (and would skew a metric that divides by the target), so they are
/// dropped first. The cutoff is `max(date) − validation_weeks`; rows dated
/// strictly before it train, the rest validate. Validation therefore always
/// holds the most recent interval and no future information reaches
/// training.
pub fn temporal_split(records: Vec<EngineeredRecord>, validation_weeks: i64) -> SplitRecords {
    let informative: Vec<EngineeredRecord> = records
        .into_iter()
        .filter(|r| r.record.open && r.record.sales > 0.0)
        .collect();

    let max_date = informative
        .iter()
        .map(|r| r.record.date)
        .max()
        .unwrap_or(NaiveDate::MIN);
    let cutoff = max_date - Duration::weeks(validation_weeks);

    let (validation, train): (Vec<_>, Vec<_>) = informative
        .into_iter()
        .partition(|r| r.record.date >= cutoff);

    info!(
        "split at {cutoff}: {} training rows, {} validation rows",
        train.len(),
        validation.len()
    );
    SplitRecords { train, validation, cutoff }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{test_fixtures, MergedRecord};
    use crate::features::{engineer_one, ImputationStats};

    fn engineered(store_id: u32, date: NaiveDate, sales: f32, open: bool) -> EngineeredRecord {
        let mut txn = test_fixtures::transaction(store_id, date, sales);
        txn.open = open;
        let merged = MergedRecord::join(&txn, Some(&test_fixtures::store(store_id)));
        engineer_one(merged, &ImputationStats { competition_distance: 100.0 })
    }

    #[test]
    fn last_six_weeks_validate() {
        // Ten weeks of daily records ending 2015-07-31.
        let end = NaiveDate::from_ymd_opt(2015, 7, 31).unwrap();
        let records: Vec<_> = (0..70)
            .map(|i| engineered(1, end - Duration::days(i), 100.0, true))
            .collect();
        let n_input = records.len();

        let split = temporal_split(records, 6);
        assert_eq!(split.cutoff, end - Duration::weeks(6));

        assert!(split.train.iter().all(|r| r.record.date < split.cutoff));
        assert!(split.validation.iter().all(|r| r.record.date >= split.cutoff));
        assert_eq!(split.train.len() + split.validation.len(), n_input);
        // 6 weeks inclusive of the cutoff day itself.
        assert_eq!(split.validation.len(), 43);
    }

    #[test]
    fn partitions_are_disjoint_and_cover_filtered_input() {
        let end = NaiveDate::from_ymd_opt(2015, 7, 31).unwrap();
        let mut records = Vec::new();
        for i in 0..70 {
            let date = end - Duration::days(i);
            records.push(engineered(1, date, 100.0, true));
            records.push(engineered(2, date, 0.0, true)); // zero sales: dropped
            records.push(engineered(3, date, 50.0, false)); // closed: dropped
        }

        let split = temporal_split(records, 6);
        assert_eq!(split.train.len() + split.validation.len(), 70);
        assert!(split
            .train
            .iter()
            .chain(&split.validation)
            .all(|r| r.record.open && r.record.sales > 0.0));

        for t in &split.train {
            assert!(!split
                .validation
                .iter()
                .any(|v| v.record.store_id == t.record.store_id && v.record.date == t.record.date));
        }
    }
}
