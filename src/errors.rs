use std::{io, path::PathBuf};

use rust_decimal::Decimal;
use thiserror::Error;

/// Rejected record or ledger input. Aborts only the operation that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),
    #[error("amount {0} exceeds the maximum of 1000000000000.00")]
    AmountTooLarge(Decimal),
    #[error("description cannot be empty")]
    EmptyDescription,
    #[error("ledger name cannot be empty")]
    EmptyName,
    #[error("unknown transaction kind `{0}`, expected INCOME or EXPENSE")]
    UnknownKind(String),
    #[error("{field} can only be set on {expected} records")]
    KindMismatch {
        field: &'static str,
        expected: &'static str,
    },
}

/// Failure to decode a single persisted log line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected 6 or 7 fields, found {0}")]
    FieldCount(usize),
    #[error("invalid id `{0}`")]
    InvalidId(String),
    #[error("invalid amount `{0}`")]
    InvalidAmount(String),
    #[error("invalid date `{0}`, expected yyyy-MM-dd")]
    InvalidDate(String),
    #[error("unknown transaction kind `{0}`")]
    UnknownKind(String),
    #[error("invalid essential flag `{0}`, expected true or false")]
    InvalidFlag(String),
    #[error("invalid record: {0}")]
    Invalid(#[from] ValidationError),
    #[error("duplicate id {0}")]
    DuplicateId(u64),
}

/// I/O failure against the transaction log or its backup.
#[derive(Debug, Error)]
pub enum DataFileError {
    #[error("failed to write temporary file `{}`: {source}", .path.display())]
    WriteTemp {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to replace `{}`: {source}", .path.display())]
    Replace {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read `{}`: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("backup file `{}` not found", .0.display())]
    BackupMissing(PathBuf),
    #[error("failed to restore from `{}`: {source}", .path.display())]
    Restore {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Serialization error: {0}")]
    Serde(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Serde(err.to_string())
    }
}

/// Error type returned by ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Invalid transaction: {0}")]
    Validation(#[from] ValidationError),
    #[error("Insufficient funds: requested {requested:.2}, available {available:.2}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Data file error: {0}")]
    DataFile(#[from] DataFileError),
    /// The record was committed in memory but the log could not be written.
    #[error("Transaction {id} recorded but not saved: {source}")]
    Unsaved {
        id: u64,
        #[source]
        source: DataFileError,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Arithmetic overflow while computing {0}")]
    Overflow(&'static str),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
