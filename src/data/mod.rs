//! Typed input records and the merged training table.
//!
//! The two source tables (per-store daily transactions and static store
//! metadata) deserialize into explicit structs; missing cells become `None`
//! fields with documented imputation rules applied later by the feature
//! stage, never implicit absent-key lookups.

mod io;
mod merge;

pub use io::{read_merged, read_store_metadata, read_transactions, write_merged};
pub use merge::{merge_or_load, merge_records};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One store's sales for one calendar day. Immutable source input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDailyRecord {
    #[serde(rename = "Store")]
    pub store_id: u32,
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: u8,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Sales")]
    pub sales: f32,
    #[serde(rename = "Customers")]
    pub customers: u32,
    #[serde(rename = "Open", with = "bool_as_int")]
    pub open: bool,
    #[serde(rename = "Promo", with = "bool_as_int")]
    pub promo: bool,
    /// `"0"` for none, or one of `"a"` (public), `"b"` (Easter), `"c"` (Christmas).
    #[serde(rename = "StateHoliday")]
    pub state_holiday: String,
    #[serde(rename = "SchoolHoliday", with = "bool_as_int")]
    pub school_holiday: bool,
}

/// Static per-store attributes, keyed by store id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreMetadata {
    #[serde(rename = "Store")]
    pub store_id: u32,
    #[serde(rename = "StoreType")]
    pub store_type: String,
    #[serde(rename = "Assortment")]
    pub assortment: String,
    #[serde(rename = "CompetitionDistance")]
    pub competition_distance: Option<f32>,
    #[serde(rename = "CompetitionOpenSinceMonth")]
    pub competition_open_since_month: Option<u32>,
    #[serde(rename = "CompetitionOpenSinceYear")]
    pub competition_open_since_year: Option<i32>,
    #[serde(rename = "Promo2", with = "bool_as_int")]
    pub promo2: bool,
    #[serde(rename = "Promo2SinceWeek")]
    pub promo2_since_week: Option<u32>,
    #[serde(rename = "Promo2SinceYear")]
    pub promo2_since_year: Option<i32>,
    /// Comma-joined month abbreviations, e.g. `"Jan,Apr,Jul,Oct"`.
    #[serde(rename = "PromoInterval")]
    pub promo_interval: Option<String>,
}

/// Left join of one [`RawDailyRecord`] with its [`StoreMetadata`].
///
/// Metadata fields are optional: a transaction whose store id has no
/// metadata row keeps `None` there (counted by the merger; must not occur
/// in valid input). The struct is flat so the merged intermediate CSV
/// round-trips through the same serde derives as the sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    #[serde(rename = "Store")]
    pub store_id: u32,
    #[serde(rename = "DayOfWeek")]
    pub day_of_week: u8,
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Sales")]
    pub sales: f32,
    #[serde(rename = "Customers")]
    pub customers: u32,
    #[serde(rename = "Open", with = "bool_as_int")]
    pub open: bool,
    #[serde(rename = "Promo", with = "bool_as_int")]
    pub promo: bool,
    #[serde(rename = "StateHoliday")]
    pub state_holiday: String,
    #[serde(rename = "SchoolHoliday", with = "bool_as_int")]
    pub school_holiday: bool,
    #[serde(rename = "StoreType")]
    pub store_type: Option<String>,
    #[serde(rename = "Assortment")]
    pub assortment: Option<String>,
    #[serde(rename = "CompetitionDistance")]
    pub competition_distance: Option<f32>,
    #[serde(rename = "CompetitionOpenSinceMonth")]
    pub competition_open_since_month: Option<u32>,
    #[serde(rename = "CompetitionOpenSinceYear")]
    pub competition_open_since_year: Option<i32>,
    #[serde(rename = "Promo2", with = "opt_bool_as_int")]
    pub promo2: Option<bool>,
    #[serde(rename = "Promo2SinceWeek")]
    pub promo2_since_week: Option<u32>,
    #[serde(rename = "Promo2SinceYear")]
    pub promo2_since_year: Option<i32>,
    #[serde(rename = "PromoInterval")]
    pub promo_interval: Option<String>,
}

impl MergedRecord {
    /// Join one transaction with its (possibly absent) store metadata.
    pub fn join(txn: &RawDailyRecord, store: Option<&StoreMetadata>) -> Self {
        Self {
            store_id: txn.store_id,
            day_of_week: txn.day_of_week,
            date: txn.date,
            sales: txn.sales,
            customers: txn.customers,
            open: txn.open,
            promo: txn.promo,
            state_holiday: txn.state_holiday.clone(),
            school_holiday: txn.school_holiday,
            store_type: store.map(|s| s.store_type.clone()),
            assortment: store.map(|s| s.assortment.clone()),
            competition_distance: store.and_then(|s| s.competition_distance),
            competition_open_since_month: store.and_then(|s| s.competition_open_since_month),
            competition_open_since_year: store.and_then(|s| s.competition_open_since_year),
            promo2: store.map(|s| s.promo2),
            promo2_since_week: store.and_then(|s| s.promo2_since_week),
            promo2_since_year: store.and_then(|s| s.promo2_since_year),
            promo_interval: store.and_then(|s| s.promo_interval.clone()),
        }
    }
}

/// The source tables encode booleans as `0`/`1` columns.
mod bool_as_int {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}

/// `0`/`1` flag that may be absent entirely (unmatched metadata).
mod opt_bool_as_int {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<bool>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(flag) => serializer.serialize_u8(u8::from(*flag)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<bool>, D::Error> {
        Ok(Option::<u8>::deserialize(deserializer)?.map(|v| v != 0))
    }
}
