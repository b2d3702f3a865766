mod common;

use std::fs;

use chrono::NaiveDate;
use common::{data_dir, dec, open_ledger};
use ledger_core::{
    errors::{DataFileError, ParseError},
    ledger::codec,
    storage::{RecordStore, TextLogStore},
    Ledger, LedgerError, Transaction, TransactionDetails, ValidationError,
};

fn sample(id: u64, details: TransactionDetails) -> Transaction {
    Transaction::new(
        id,
        dec("25.00"),
        "Sample",
        Some("Misc"),
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
        details,
    )
    .unwrap()
}

#[test]
fn atomic_save_failure_preserves_original_file() {
    let dir = data_dir();
    let mut ledger = open_ledger(&dir);
    ledger
        .add_income(dec("100"), "Salary", Some("Salary"), Some("Employer"))
        .expect("initial save");

    let store = TextLogStore::in_dir(&dir);
    let original = fs::read(store.primary_path()).expect("read original file");

    // A directory at the temp path makes File::create fail.
    fs::create_dir_all(store.tmp_path()).unwrap();

    let result = ledger.add_expense(dec("30"), "Books", None, false, Some("Card"));
    assert!(
        matches!(
            result,
            Err(LedgerError::Unsaved {
                source: DataFileError::WriteTemp { .. },
                ..
            })
        ),
        "expected the save to fail at the temp write"
    );

    let current = fs::read(store.primary_path()).expect("read after failure");
    assert_eq!(
        current, original,
        "atomic save failure must not corrupt the original file"
    );

    let _ = fs::remove_dir_all(store.tmp_path());
}

#[test]
fn partial_load_keeps_valid_records() {
    let dir = data_dir();
    let store = TextLogStore::in_dir(&dir);
    let income = sample(1001, TransactionDetails::income(Some("Employer")));
    let expense = sample(1002, TransactionDetails::expense(true, Some("Cash")));
    fs::write(
        store.primary_path(),
        format!(
            "{}\ngarbage\n{}\n",
            codec::encode(&income),
            codec::encode(&expense)
        ),
    )
    .unwrap();

    let report = store.load().expect("load");
    assert_eq!(report.valid(), 2);
    assert_eq!(report.invalid(), 1);
    assert_eq!(report.skipped[0].line_no, 2);
    assert_eq!(report.skipped[0].content, "garbage");
    assert_eq!(report.skipped[0].error, ParseError::FieldCount(1));
    assert_eq!(report.records, vec![income, expense]);
}

#[test]
fn ledger_open_reports_skipped_lines() {
    let dir = data_dir();
    let store = TextLogStore::in_dir(&dir);
    fs::write(
        store.primary_path(),
        "1001|INCOME|80.00|Pay|Salary|2025-01-01|Employer\n\
         1002|EXPENSE|oops|Lunch|Food|2025-01-02|false,Card\n\
         1003|EXPENSE|30.00|Lunch|Food|2025-01-02|false,Card\n",
    )
    .unwrap();

    let (ledger, status) = Ledger::open("Personal", Box::new(store)).unwrap();
    match status {
        ledger_core::ledger::LoadStatus::Loaded(summary) => {
            assert_eq!(summary.valid, 2);
            assert_eq!(summary.skipped.len(), 1);
        }
        other => panic!("unexpected status {:?}", other),
    }
    assert_eq!(ledger.balance().unwrap(), dec("50.00"));
}

#[test]
fn oversized_amounts_are_skipped_on_load() {
    let dir = data_dir();
    let store = TextLogStore::in_dir(&dir);
    fs::write(
        store.primary_path(),
        "1001|INCOME|50000000000000000000000000000.00|Win|Other|2025-01-01|Lottery\n\
         1002|INCOME|50000000000000000000000000000.00|Win|Other|2025-01-02|Lottery\n\
         1003|INCOME|25.00|Pay|Salary|2025-01-03|Employer\n",
    )
    .unwrap();

    let (mut ledger, status) = Ledger::open("Personal", Box::new(store)).unwrap();
    match status {
        ledger_core::ledger::LoadStatus::Loaded(summary) => {
            assert_eq!(summary.valid, 1);
            assert_eq!(summary.skipped.len(), 2);
            assert!(matches!(
                summary.skipped[0].error,
                ParseError::Invalid(ValidationError::AmountTooLarge(_))
            ));
        }
        other => panic!("unexpected status {:?}", other),
    }
    assert_eq!(ledger.balance().unwrap(), dec("25.00"));
    ledger
        .add_expense_quick(dec("5"), "Coffee")
        .expect("expenses still work");
}

#[test]
fn legacy_log_without_extra_field_loads() {
    let dir = data_dir();
    let store = TextLogStore::in_dir(&dir);
    fs::write(
        store.primary_path(),
        "1001|INCOME|10.00|Gift|Other|2024-06-01\n1002|EXPENSE|4.00|Tea|Food|2024-06-02\n",
    )
    .unwrap();

    let ledger = open_ledger(&dir);
    let expense = ledger.find(1002).expect("expense loaded");
    assert_eq!(expense.is_essential(), Some(true));
    assert_eq!(expense.payment_method(), Some("Unknown"));
    assert_eq!(ledger.balance().unwrap(), dec("6.00"));
}

#[test]
fn restore_from_backup_rolls_back_last_save() {
    let dir = data_dir();
    let mut ledger = open_ledger(&dir);
    ledger.add_income_quick(dec("10"), "First").unwrap();
    let second = ledger.add_income_quick(dec("20"), "Second").unwrap();

    let summary = ledger.restore_from_backup().expect("restore");
    assert_eq!(summary.valid, 1);
    assert_eq!(ledger.record_count(), 1);
    assert_eq!(ledger.balance().unwrap(), dec("10"));

    // Ids handed out before the restore are not reused.
    let third = ledger.add_income_quick(dec("5"), "Third").unwrap();
    assert!(third > second);
}

#[test]
fn restore_without_backup_is_a_data_file_error() {
    let dir = data_dir();
    let mut ledger = open_ledger(&dir);
    let err = ledger.restore_from_backup().unwrap_err();
    assert!(matches!(
        err,
        LedgerError::DataFile(DataFileError::BackupMissing(_))
    ));
}
