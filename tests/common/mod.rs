#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use seiva_core::{FixedClock, SchoolSession, SchoolStore};
use seiva_school::{config::ConfigManager, storage::JsonSchoolStorage};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn reference_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 10, 20).expect("valid date")
}

/// Fresh directory that outlives the calling test.
pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Seeded session over JSON storage in `base/data`, not yet loaded.
pub fn session_at(base: &Path, today: NaiveDate) -> (SchoolSession, JsonSchoolStorage) {
    let storage = JsonSchoolStorage::new(base.join("data")).expect("create json storage backend");
    let store = SchoolStore::seeded(Box::new(FixedClock::on(today)));
    (SchoolSession::new(store, Box::new(storage.clone())), storage)
}

/// Isolated session and config manager backed by a unique directory.
pub fn setup_test_env() -> (SchoolSession, JsonSchoolStorage, ConfigManager) {
    let base = temp_base();
    let (session, storage) = session_at(&base, reference_day());
    let config_manager =
        ConfigManager::with_base_dir(base).expect("create config manager for temp dir");
    (session, storage, config_manager)
}
