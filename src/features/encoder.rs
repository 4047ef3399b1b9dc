//! Stable integer encoding for the categorical feature columns.
//!
//! Vocabularies are fitted once over the engineered training table, carried
//! inside the model artifact, and reused verbatim at inference. Codes are
//! assigned by sorted order of the distinct values, so refitting on the
//! same vocabulary always reproduces the same codes.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;

use super::EngineeredRecord;

/// Names of the encoded columns, in feature order.
pub const ENCODED_COLUMNS: [&str; 3] = ["StoreType", "Assortment", "StateHoliday"];

/// Fitted vocabularies for the three categorical columns.
///
/// Values absent from a vocabulary (including metadata missing entirely)
/// encode to the reserved code `vocab.len()` rather than failing, keeping
/// inference available; each occurrence increments [`unknown_count`] and
/// logs a warning so the degradation is observable.
///
/// [`unknown_count`]: CategoricalEncoder::unknown_count
#[derive(Debug)]
pub struct CategoricalEncoder {
    store_type: Vec<String>,
    assortment: Vec<String>,
    state_holiday: Vec<String>,
    unknown_seen: AtomicU64,
}

impl CategoricalEncoder {
    /// Fit vocabularies from the engineered training table.
    pub fn fit(records: &[EngineeredRecord]) -> Self {
        let mut store_type = BTreeSet::new();
        let mut assortment = BTreeSet::new();
        let mut state_holiday = BTreeSet::new();

        for rec in records {
            if let Some(v) = rec.record.store_type.as_deref() {
                store_type.insert(v.to_string());
            }
            if let Some(v) = rec.record.assortment.as_deref() {
                assortment.insert(v.to_string());
            }
            state_holiday.insert(rec.record.state_holiday.clone());
        }

        Self::from_vocabularies(
            store_type.into_iter().collect(),
            assortment.into_iter().collect(),
            state_holiday.into_iter().collect(),
        )
    }

    /// Rebuild an encoder from persisted vocabularies.
    ///
    /// Vocabularies are sorted defensively so that codes never depend on
    /// artifact field order.
    pub fn from_vocabularies(
        mut store_type: Vec<String>,
        mut assortment: Vec<String>,
        mut state_holiday: Vec<String>,
    ) -> Self {
        store_type.sort();
        assortment.sort();
        state_holiday.sort();
        Self { store_type, assortment, state_holiday, unknown_seen: AtomicU64::new(0) }
    }

    pub fn store_type_vocab(&self) -> &[String] {
        &self.store_type
    }

    pub fn assortment_vocab(&self) -> &[String] {
        &self.assortment
    }

    pub fn state_holiday_vocab(&self) -> &[String] {
        &self.state_holiday
    }

    /// Number of values encoded to the reserved unknown code so far.
    pub fn unknown_count(&self) -> u64 {
        self.unknown_seen.load(Ordering::Relaxed)
    }

    pub fn store_type_code(&self, value: Option<&str>) -> u32 {
        self.encode("StoreType", &self.store_type, value)
    }

    pub fn assortment_code(&self, value: Option<&str>) -> u32 {
        self.encode("Assortment", &self.assortment, value)
    }

    pub fn state_holiday_code(&self, value: &str) -> u32 {
        self.encode("StateHoliday", &self.state_holiday, Some(value))
    }

    fn encode(&self, column: &str, vocab: &[String], value: Option<&str>) -> u32 {
        match value {
            Some(v) => match vocab.binary_search_by(|probe| probe.as_str().cmp(v)) {
                Ok(code) => code as u32,
                Err(_) => {
                    self.unknown_seen.fetch_add(1, Ordering::Relaxed);
                    warn!("unknown {column} value {v:?}; using reserved code {}", vocab.len());
                    vocab.len() as u32
                }
            },
            None => {
                self.unknown_seen.fetch_add(1, Ordering::Relaxed);
                warn!("missing {column} value; using reserved code {}", vocab.len());
                vocab.len() as u32
            }
        }
    }
}

impl Clone for CategoricalEncoder {
    fn clone(&self) -> Self {
        Self {
            store_type: self.store_type.clone(),
            assortment: self.assortment.clone(),
            state_holiday: self.state_holiday.clone(),
            unknown_seen: AtomicU64::new(self.unknown_seen.load(Ordering::Relaxed)),
        }
    }
}

impl PartialEq for CategoricalEncoder {
    fn eq(&self, other: &Self) -> bool {
        self.store_type == other.store_type
            && self.assortment == other.assortment
            && self.state_holiday == other.state_holiday
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> CategoricalEncoder {
        CategoricalEncoder::from_vocabularies(
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            vec!["a".into(), "b".into(), "c".into()],
            vec!["0".into(), "a".into(), "b".into(), "c".into()],
        )
    }

    #[test]
    fn codes_follow_sorted_order() {
        let enc = encoder();
        assert_eq!(enc.store_type_code(Some("a")), 0);
        assert_eq!(enc.store_type_code(Some("d")), 3);
        assert_eq!(enc.state_holiday_code("0"), 0);
        assert_eq!(enc.state_holiday_code("c"), 3);
    }

    #[test]
    fn refit_on_same_vocabulary_is_stable() {
        let first = encoder();
        // Same vocabulary presented in a different order.
        let second = CategoricalEncoder::from_vocabularies(
            vec!["d".into(), "c".into(), "b".into(), "a".into()],
            vec!["c".into(), "a".into(), "b".into()],
            vec!["c".into(), "0".into(), "b".into(), "a".into()],
        );
        assert_eq!(first, second);
        for value in ["a", "b", "c", "d"] {
            assert_eq!(
                first.store_type_code(Some(value)),
                second.store_type_code(Some(value))
            );
        }
    }

    #[test]
    fn unknown_maps_to_reserved_code_and_counts() {
        let enc = encoder();
        assert_eq!(enc.unknown_count(), 0);
        assert_eq!(enc.store_type_code(Some("z")), 4);
        assert_eq!(enc.assortment_code(None), 3);
        assert_eq!(enc.unknown_count(), 2);
    }
}
