#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    str::FromStr,
    sync::Mutex,
};

use ledger_core::{Ledger, TextLogStore};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a unique data directory for a single test.
pub fn data_dir() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Opens a ledger over `dir`, panicking if the log could not be read.
pub fn open_ledger(dir: &Path) -> Ledger {
    let (ledger, status) =
        Ledger::open("Personal", Box::new(TextLogStore::in_dir(dir))).expect("open ledger");
    assert!(status.is_loaded(), "unexpected load failure: {:?}", status);
    ledger
}

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("decimal literal")
}
