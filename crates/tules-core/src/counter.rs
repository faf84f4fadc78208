//! Daily bucket for dictionary API calls.
//!
//! The count and the day it belongs to live in the config store under
//! `dictionary_apicalls` and `date`. Nothing here enforces a limit; it only
//! keeps the bucket honest across day boundaries.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ConfigError;
use crate::storage::{defaults, ConfigStore};

/// Stored `(date, count)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date_key: Option<String>,
    pub count: u64,
}

impl DailyCount {
    pub fn read(store: &ConfigStore) -> Self {
        Self {
            date_key: store
                .get_str(defaults::DICTIONARY_API_DATE)
                .map(str::to_string),
            count: store
                .get_number(defaults::DICTIONARY_API_CALLS)
                .filter(|n| *n >= 0.0)
                .map(|n| n as u64)
                .unwrap_or(0),
        }
    }

    /// Count for `today`, zero when the stored bucket belongs to another day.
    pub fn count_on(&self, today: NaiveDate) -> u64 {
        if self.date_key.as_deref() == Some(date_key(today).as_str()) {
            self.count
        } else {
            0
        }
    }
}

/// `M_D_YYYY`, no zero padding.
pub fn date_key(date: NaiveDate) -> String {
    format!("{}_{}_{}", date.month(), date.day(), date.year())
}

/// Count one call against `today`'s bucket and return the new count.
///
/// # Errors
///
/// Propagates the first store write failure. Both fields are still updated
/// in memory, so the bucket stays correct while the disk is unavailable.
pub fn record_call(store: &mut ConfigStore, today: NaiveDate) -> Result<u64, ConfigError> {
    let today_key = date_key(today);
    let current = DailyCount::read(store);

    let count = if current.date_key.as_deref() == Some(today_key.as_str()) {
        current.count + 1
    } else {
        1
    };

    let counted = store.set(defaults::DICTIONARY_API_CALLS, json!(count));
    let dated = store.set(defaults::DICTIONARY_API_DATE, json!(today_key));
    counted.and(dated)?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn date_key_is_unpadded() {
        assert_eq!(date_key(day(2024, 3, 7)), "3_7_2024");
        assert_eq!(date_key(day(2024, 12, 25)), "12_25_2024");
    }

    #[test]
    fn same_day_calls_accumulate() {
        let mut store = ConfigStore::in_memory(defaults::table());
        let today = day(2024, 5, 1);
        assert_eq!(record_call(&mut store, today).unwrap(), 1);
        assert_eq!(record_call(&mut store, today).unwrap(), 2);
        assert_eq!(DailyCount::read(&store).count_on(today), 2);
        assert_eq!(store.get_str(defaults::DICTIONARY_API_DATE), Some("5_1_2024"));
    }

    #[test]
    fn new_day_resets_before_increment() {
        let mut store = ConfigStore::in_memory(defaults::table());
        for _ in 0..4 {
            record_call(&mut store, day(2024, 5, 1)).unwrap();
        }
        assert_eq!(record_call(&mut store, day(2024, 5, 2)).unwrap(), 1);
        assert_eq!(DailyCount::read(&store).count_on(day(2024, 5, 1)), 0);
    }

    #[test]
    fn unwritable_store_still_buckets_in_memory() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("user-preferences.toml");
        let mut store = ConfigStore::open_at(&path, defaults::table());
        let today = day(2024, 5, 1);

        for _ in 0..3 {
            assert!(matches!(
                record_call(&mut store, today),
                Err(ConfigError::SaveFailed { .. })
            ));
        }
        assert!(!store.is_durable());
        assert_eq!(DailyCount::read(&store).count_on(today), 3);
        assert_eq!(store.get_str(defaults::DICTIONARY_API_DATE), Some("5_1_2024"));
    }

    #[test]
    fn garbage_count_is_treated_as_zero() {
        let mut store = ConfigStore::in_memory(defaults::table());
        let today = day(2024, 5, 1);
        store.set(defaults::DICTIONARY_API_DATE, json!("5_1_2024")).unwrap();
        store.set(defaults::DICTIONARY_API_CALLS, json!("lots")).unwrap();
        assert_eq!(record_call(&mut store, today).unwrap(), 1);
    }
}
