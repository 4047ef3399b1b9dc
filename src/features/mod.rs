//! Feature engineering: derived fields and the model's feature vector.
//!
//! Derivations run in a fixed order — calendar, then competition, then
//! promotion — because the promotion rule consumes the derived week/year
//! and the competition rule the derived year/month. Each derivation is a
//! pure function of one record (plus the batch-level imputation statistic),
//! so engineering is idempotent and usable row-at-a-time at inference.

pub mod calendar;
pub mod competition;
mod encoder;
pub mod promo;

pub use encoder::{CategoricalEncoder, ENCODED_COLUMNS};

use log::{info, warn};

use crate::data::MergedRecord;

/// The model's feature names, in training order. Any consumer must present
/// features in exactly this order.
pub const FEATURE_NAMES: [&str; 15] = [
    "Year",
    "Month",
    "Day",
    "DayOfWeek",
    "WeekOfYear",
    "Store",
    "StoreType",
    "Assortment",
    "CompetitionDistance",
    "CompetitionOpen",
    "Promo",
    "Promo2",
    "IsPromo2",
    "StateHoliday",
    "SchoolHoliday",
];

/// Number of model features.
pub const N_FEATURES: usize = FEATURE_NAMES.len();

/// Batch-level statistics the per-row derivations depend on.
///
/// The competition-distance median is the only cross-row input to feature
/// engineering; it is computed once over the training table, persisted in
/// the model artifact, and reused for every later inference row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImputationStats {
    pub competition_distance: f32,
}

impl ImputationStats {
    /// Compute the imputation statistic over a merged table.
    pub fn from_records(records: &[MergedRecord]) -> Self {
        let median =
            competition::distance_median(records.iter().filter_map(|r| r.competition_distance));
        let competition_distance = match median {
            Some(value) => value,
            None => {
                warn!("no competition distances present; imputing 0");
                0.0
            }
        };
        Self { competition_distance }
    }
}

/// A merged record augmented with every derived field.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineeredRecord {
    pub record: MergedRecord,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Monday = 0, ISO convention.
    pub day_of_week: u8,
    /// ISO week number.
    pub week_of_year: u32,
    /// Whole months of competition exposure, never negative.
    pub competition_open: f32,
    /// Distance to the nearest competitor, imputed where missing.
    pub competition_distance: f32,
    /// Whether the recurring promotion is active on this day.
    pub is_promo2: bool,
}

/// Derive all features for a single record.
pub fn engineer_one(record: MergedRecord, stats: &ImputationStats) -> EngineeredRecord {
    let cal = calendar::derive(record.date);

    let competition_open = competition::months_open(
        cal.year,
        cal.month,
        record.competition_open_since_year,
        record.competition_open_since_month,
    );
    let competition_distance = record
        .competition_distance
        .unwrap_or(stats.competition_distance);

    let is_promo2 = promo::is_promo2_active(
        record.promo2.unwrap_or(false),
        record.promo2_since_year,
        record.promo2_since_week,
        record.promo_interval.as_deref(),
        cal.year,
        cal.week_of_year,
        cal.month,
    );

    EngineeredRecord {
        year: cal.year,
        month: cal.month,
        day: cal.day,
        day_of_week: cal.day_of_week,
        week_of_year: cal.week_of_year,
        competition_open,
        competition_distance,
        is_promo2,
        record,
    }
}

/// Derive features for a whole merged table.
///
/// Returns the engineered rows together with the imputation statistics used,
/// which belong in the model artifact.
pub fn engineer_features(records: Vec<MergedRecord>) -> (Vec<EngineeredRecord>, ImputationStats) {
    let stats = ImputationStats::from_records(&records);
    let engineered: Vec<EngineeredRecord> = records
        .into_iter()
        .map(|record| engineer_one(record, &stats))
        .collect();
    info!(
        "engineered {} rows (competition distance median {:.1})",
        engineered.len(),
        stats.competition_distance
    );
    (engineered, stats)
}

/// Assemble one record's feature vector in [`FEATURE_NAMES`] order.
pub fn feature_row(rec: &EngineeredRecord, encoder: &CategoricalEncoder) -> [f32; N_FEATURES] {
    [
        rec.year as f32,
        rec.month as f32,
        rec.day as f32,
        rec.day_of_week as f32,
        rec.week_of_year as f32,
        rec.record.store_id as f32,
        encoder.store_type_code(rec.record.store_type.as_deref()) as f32,
        encoder.assortment_code(rec.record.assortment.as_deref()) as f32,
        rec.competition_distance,
        rec.competition_open,
        u8::from(rec.record.promo) as f32,
        u8::from(rec.record.promo2.unwrap_or(false)) as f32,
        u8::from(rec.is_promo2) as f32,
        encoder.state_holiday_code(&rec.record.state_holiday) as f32,
        u8::from(rec.record.school_holiday) as f32,
    ]
}
