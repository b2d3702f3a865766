pub mod text_log;

pub use text_log::TextLogStore;

use crate::{
    errors::{DataFileError, ParseError},
    ledger::Transaction,
};

pub type Result<T> = std::result::Result<T, DataFileError>;

/// Abstraction over backends that persist the full transaction log.
///
/// Implementations assume a single writer; callers must not share one data
/// file between processes or threads.
pub trait RecordStore: Send + Sync {
    /// Replaces the persisted log with `records`.
    fn save(&self, records: &[Transaction]) -> Result<SaveReport>;
    /// Reads every valid record, skipping lines that fail to parse.
    fn load(&self) -> Result<LoadReport>;
    /// Overwrites the log with the last backup. Never invoked implicitly.
    fn restore_from_backup(&self) -> Result<()>;
}

/// Outcome of a save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub written: usize,
    pub skipped: usize,
    pub backed_up: bool,
}

/// A log line that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_no: usize,
    pub content: String,
    pub error: ParseError,
}

/// Records recovered by a load plus diagnostics for the lines that were dropped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub records: Vec<Transaction>,
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    pub fn valid(&self) -> usize {
        self.records.len()
    }

    pub fn invalid(&self) -> usize {
        self.skipped.len()
    }
}
