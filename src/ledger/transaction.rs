//! Income and expense records.

use std::{fmt, str::FromStr};

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use super::validation::{
    or_default, validate_amount, validate_description, DEFAULT_CATEGORY, DEFAULT_PAYMENT_METHOD,
    DEFAULT_SOURCE,
};
use crate::errors::ValidationError;

/// Discriminates the two record variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "INCOME",
            TransactionKind::Expense => "EXPENSE",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case("INCOME") {
            Ok(TransactionKind::Income)
        } else if trimmed.eq_ignore_ascii_case("EXPENSE") {
            Ok(TransactionKind::Expense)
        } else {
            Err(ValidationError::UnknownKind(trimmed.to_string()))
        }
    }
}

/// Kind-specific payload of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionDetails {
    Income {
        source: String,
    },
    Expense {
        is_essential: bool,
        payment_method: String,
    },
}

impl TransactionDetails {
    pub fn income(source: Option<&str>) -> Self {
        TransactionDetails::Income {
            source: or_default(source, DEFAULT_SOURCE),
        }
    }

    pub fn expense(is_essential: bool, payment_method: Option<&str>) -> Self {
        TransactionDetails::Expense {
            is_essential,
            payment_method: or_default(payment_method, DEFAULT_PAYMENT_METHOD),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        match self {
            TransactionDetails::Income { .. } => TransactionKind::Income,
            TransactionDetails::Expense { .. } => TransactionKind::Expense,
        }
    }
}

/// A single ledger entry. Fields are private so every instance stays valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    id: u64,
    amount: Decimal,
    description: String,
    category: String,
    date: NaiveDate,
    details: TransactionDetails,
}

impl Transaction {
    /// Validates the inputs and builds a record. Amounts are stored in cents.
    pub fn new(
        id: u64,
        amount: Decimal,
        description: &str,
        category: Option<&str>,
        date: NaiveDate,
        details: TransactionDetails,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id,
            amount: validate_amount(amount)?,
            description: validate_description(description)?,
            category: or_default(category, DEFAULT_CATEGORY),
            date,
            details,
        })
    }

    /// New income dated today.
    pub fn income(
        id: u64,
        amount: Decimal,
        description: &str,
        category: Option<&str>,
        source: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            id,
            amount,
            description,
            category,
            today(),
            TransactionDetails::income(source),
        )
    }

    /// New expense dated today.
    pub fn expense(
        id: u64,
        amount: Decimal,
        description: &str,
        category: Option<&str>,
        is_essential: bool,
        payment_method: Option<&str>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            id,
            amount,
            description,
            category,
            today(),
            TransactionDetails::expense(is_essential, payment_method),
        )
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn details(&self) -> &TransactionDetails {
        &self.details
    }

    pub fn kind(&self) -> TransactionKind {
        self.details.kind()
    }

    pub fn is_income(&self) -> bool {
        self.kind() == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind() == TransactionKind::Expense
    }

    /// Signed contribution to the ledger balance.
    pub fn balance_impact(&self) -> Decimal {
        match self.details {
            TransactionDetails::Income { .. } => self.amount,
            TransactionDetails::Expense { .. } => -self.amount,
        }
    }

    pub fn display_symbol(&self) -> char {
        match self.details {
            TransactionDetails::Income { .. } => '+',
            TransactionDetails::Expense { .. } => '-',
        }
    }

    pub fn source(&self) -> Option<&str> {
        match &self.details {
            TransactionDetails::Income { source } => Some(source),
            TransactionDetails::Expense { .. } => None,
        }
    }

    pub fn is_essential(&self) -> Option<bool> {
        match &self.details {
            TransactionDetails::Expense { is_essential, .. } => Some(*is_essential),
            TransactionDetails::Income { .. } => None,
        }
    }

    pub fn payment_method(&self) -> Option<&str> {
        match &self.details {
            TransactionDetails::Expense { payment_method, .. } => Some(payment_method),
            TransactionDetails::Income { .. } => None,
        }
    }

    /// Only non-essential expenses are candidates for cutting back.
    pub fn can_be_reduced(&self) -> bool {
        matches!(
            self.details,
            TransactionDetails::Expense {
                is_essential: false,
                ..
            }
        )
    }

    pub fn set_amount(&mut self, amount: Decimal) -> Result<(), ValidationError> {
        self.amount = validate_amount(amount)?;
        Ok(())
    }

    pub fn set_description(&mut self, description: &str) -> Result<(), ValidationError> {
        self.description = validate_description(description)?;
        Ok(())
    }

    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = or_default(category, DEFAULT_CATEGORY);
    }

    pub fn set_source(&mut self, value: Option<&str>) -> Result<(), ValidationError> {
        match &mut self.details {
            TransactionDetails::Income { source } => {
                *source = or_default(value, DEFAULT_SOURCE);
                Ok(())
            }
            TransactionDetails::Expense { .. } => Err(ValidationError::KindMismatch {
                field: "source",
                expected: "INCOME",
            }),
        }
    }

    pub fn set_essential(&mut self, value: bool) -> Result<(), ValidationError> {
        match &mut self.details {
            TransactionDetails::Expense { is_essential, .. } => {
                *is_essential = value;
                Ok(())
            }
            TransactionDetails::Income { .. } => Err(ValidationError::KindMismatch {
                field: "is_essential",
                expected: "EXPENSE",
            }),
        }
    }

    pub fn set_payment_method(&mut self, value: Option<&str>) -> Result<(), ValidationError> {
        match &mut self.details {
            TransactionDetails::Expense { payment_method, .. } => {
                *payment_method = or_default(value, DEFAULT_PAYMENT_METHOD);
                Ok(())
            }
            TransactionDetails::Income { .. } => Err(ValidationError::KindMismatch {
                field: "payment_method",
                expected: "EXPENSE",
            }),
        }
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | {} | {:.2} | {} | {} | {}",
            self.id,
            self.kind(),
            self.amount,
            self.description,
            self.category,
            self.date.format("%Y-%m-%d")
        )?;
        match &self.details {
            TransactionDetails::Income { source } => write!(f, " | Source: {}", source),
            TransactionDetails::Expense {
                is_essential,
                payment_method,
            } => {
                let status = if *is_essential {
                    "Essential"
                } else {
                    "Non-essential"
                };
                write!(f, " | {} | Paid: {}", status, payment_method)
            }
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
