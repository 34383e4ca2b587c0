#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tabi_config::ConfigManager;
use tabi_core::FixedClock;
use tabi_shiori::TripManager;
use tabi_storage_json::{JsonEntityStore, StoragePaths};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// A manager over a JSON book in a fresh directory, with the clock frozen on `today`.
pub fn setup_test_env(today: NaiveDate) -> (TripManager<JsonEntityStore>, ConfigManager, PathBuf) {
    let base = temp_base();
    let store = JsonEntityStore::open_with_retention(StoragePaths::under(&base), "trips", 3)
        .expect("open json store");
    let manager = TripManager::with_clock(store, Arc::new(FixedClock::at_date(today)))
        .expect("create trip manager");
    let config_manager = ConfigManager::with_base_dir(&base).expect("create config manager");
    (manager, config_manager, base)
}
