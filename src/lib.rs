#![doc(test(attr(deny(warnings))))]

//! Ledger Core keeps a personal income/expense log with a derived balance and
//! persists it to a crash-resilient flat text file.

pub mod config;
pub mod errors;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use errors::{DataFileError, LedgerError, ParseError, ValidationError};
pub use ledger::{Ledger, Transaction, TransactionDetails, TransactionKind};
pub use storage::{RecordStore, TextLogStore};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Ledger Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
        super::init();
    }
}
