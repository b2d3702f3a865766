//! Ledger aggregate, transaction records, and the log line codec.

pub mod codec;
pub mod id_allocator;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod transaction;
pub mod validation;

pub use id_allocator::IdAllocator;
pub use ledger::{Ledger, LedgerSummary, LoadStatus, LoadSummary};
pub use transaction::{Transaction, TransactionDetails, TransactionKind};
