use std::fmt;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::{
    id_allocator::IdAllocator,
    transaction::{Transaction, TransactionKind},
    validation::round_cents,
};
use crate::{
    errors::{DataFileError, LedgerError, Result, ValidationError},
    storage::{LoadReport, RecordStore, SaveReport, SkippedLine},
};

/// Counts from a successful load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub valid: usize,
    pub skipped: Vec<SkippedLine>,
}

/// What happened when the ledger read its log on open.
#[derive(Debug)]
pub enum LoadStatus {
    Loaded(LoadSummary),
    /// The log could not be read; the ledger started empty.
    Failed(DataFileError),
}

impl LoadStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadStatus::Loaded(_))
    }
}

/// Totals reported by [`Ledger::summary`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSummary {
    pub name: String,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
    pub record_count: usize,
}

impl fmt::Display for LedgerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account: {} | Income: {:.2} | Expenses: {:.2} | Net: {:.2}",
            self.name, self.total_income, self.total_expenses, self.net
        )
    }
}

/// Append-only income/expense log with a derived balance.
///
/// Every successful add rewrites the whole log through the [`RecordStore`].
/// The balance is folded from the records on each call and never cached.
pub struct Ledger {
    name: String,
    records: Vec<Transaction>,
    ids: IdAllocator,
    storage: Box<dyn RecordStore>,
    dirty: bool,
}

impl fmt::Debug for Ledger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ledger")
            .field("name", &self.name)
            .field("records", &self.records.len())
            .field("next_id", &self.ids.peek())
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl Ledger {
    /// Opens the ledger and loads its records. A storage failure does not
    /// abort: the ledger starts empty and the failure is returned alongside.
    pub fn open(
        name: impl Into<String>,
        storage: Box<dyn RecordStore>,
    ) -> Result<(Self, LoadStatus)> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(ValidationError::EmptyName.into());
        }
        let mut ledger = Self {
            name,
            records: Vec::new(),
            ids: IdAllocator::new(),
            storage,
            dirty: false,
        };
        let status = match ledger.storage.load() {
            Ok(report) => LoadStatus::Loaded(ledger.absorb(report)),
            Err(err) => {
                warn!(ledger = %ledger.name, error = %err, "could not load data, starting empty");
                LoadStatus::Failed(err)
            }
        };
        Ok((ledger, status))
    }

    fn absorb(&mut self, report: LoadReport) -> LoadSummary {
        for txn in &report.records {
            self.ids.observe(txn.id());
        }
        let summary = LoadSummary {
            valid: report.records.len(),
            skipped: report.skipped,
        };
        self.records = report.records;
        summary
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &dyn RecordStore {
        self.storage.as_ref()
    }

    pub fn add_income(
        &mut self,
        amount: Decimal,
        description: &str,
        category: Option<&str>,
        source: Option<&str>,
    ) -> Result<u64> {
        let txn = Transaction::income(self.ids.peek(), amount, description, category, source)?;
        self.commit(txn)
    }

    /// Income filed under the default category and source.
    pub fn add_income_quick(&mut self, amount: Decimal, description: &str) -> Result<u64> {
        self.add_income(amount, description, None, None)
    }

    /// Fails with [`LedgerError::InsufficientFunds`] when the balance does not
    /// cover `amount`; nothing is appended in that case.
    pub fn add_expense(
        &mut self,
        amount: Decimal,
        description: &str,
        category: Option<&str>,
        is_essential: bool,
        payment_method: Option<&str>,
    ) -> Result<u64> {
        let requested = round_cents(amount);
        let available = self.balance()?;
        if available < requested {
            return Err(LedgerError::InsufficientFunds {
                requested,
                available,
            });
        }
        let txn = Transaction::expense(
            self.ids.peek(),
            amount,
            description,
            category,
            is_essential,
            payment_method,
        )?;
        self.commit(txn)
    }

    /// Non-essential expense under the default category and payment method.
    pub fn add_expense_quick(&mut self, amount: Decimal, description: &str) -> Result<u64> {
        self.add_expense(amount, description, None, false, None)
    }

    fn commit(&mut self, txn: Transaction) -> Result<u64> {
        let id = self.ids.next_id();
        debug_assert_eq!(id, txn.id());
        info!(id, kind = %txn.kind(), amount = %txn.amount(), "transaction added");
        self.records.push(txn);
        match self.storage.save(&self.records) {
            Ok(_) => {
                self.dirty = false;
                Ok(id)
            }
            Err(source) => {
                warn!(id, error = %source, "transaction kept in memory but not saved");
                self.dirty = true;
                Err(LedgerError::Unsaved { id, source })
            }
        }
    }

    /// Writes the full record set again, e.g. after an earlier failed save.
    pub fn persist(&mut self) -> Result<SaveReport> {
        let report = self.storage.save(&self.records)?;
        self.dirty = false;
        Ok(report)
    }

    /// True when in-memory records are ahead of the persisted log.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Replaces the log with its backup and reloads the records. Ids already
    /// handed out stay reserved.
    pub fn restore_from_backup(&mut self) -> Result<LoadSummary> {
        self.storage.restore_from_backup()?;
        let report = self.storage.load()?;
        let summary = self.absorb(report);
        self.dirty = false;
        info!(ledger = %self.name, valid = summary.valid, "ledger restored from backup");
        Ok(summary)
    }

    pub fn balance(&self) -> Result<Decimal> {
        checked_sum(self.records.iter().map(Transaction::balance_impact), "balance")
    }

    pub fn total_income(&self) -> Result<Decimal> {
        self.total_where(|txn| txn.kind() == TransactionKind::Income, "total income")
    }

    pub fn total_expenses(&self) -> Result<Decimal> {
        self.total_where(|txn| txn.kind() == TransactionKind::Expense, "total expenses")
    }

    /// Sum of expenses not marked essential.
    pub fn reducible_expenses(&self) -> Result<Decimal> {
        self.total_where(Transaction::can_be_reduced, "reducible expenses")
    }

    fn total_where(
        &self,
        keep: impl Fn(&Transaction) -> bool,
        what: &'static str,
    ) -> Result<Decimal> {
        checked_sum(
            self.records
                .iter()
                .filter(|txn| keep(*txn))
                .map(Transaction::amount),
            what,
        )
    }

    /// Records in insertion order.
    pub fn list_records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn find(&self, id: u64) -> Option<&Transaction> {
        self.records.iter().find(|txn| txn.id() == id)
    }

    pub fn summary(&self) -> Result<LedgerSummary> {
        let total_income = self.total_income()?;
        let total_expenses = self.total_expenses()?;
        let net = total_income
            .checked_sub(total_expenses)
            .ok_or(LedgerError::Overflow("net"))?;
        Ok(LedgerSummary {
            name: self.name.clone(),
            total_income,
            total_expenses,
            net,
            record_count: self.records.len(),
        })
    }
}

fn checked_sum(mut amounts: impl Iterator<Item = Decimal>, what: &'static str) -> Result<Decimal> {
    amounts.try_fold(Decimal::ZERO, |total, amount| {
        total.checked_add(amount).ok_or(LedgerError::Overflow(what))
    })
}
