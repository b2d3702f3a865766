//! Line format for the transaction log.
//!
//! ```text
//! id|KIND|amount|description|category|yyyy-MM-dd|extra
//! ```
//!
//! `extra` holds the income source, or `is_essential,payment_method` for
//! expenses. Lines without `extra` are accepted and get the variant defaults.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::{
    transaction::{Transaction, TransactionDetails, TransactionKind},
    validation::{DEFAULT_PAYMENT_METHOD, DEFAULT_SOURCE},
};
use crate::errors::ParseError;

pub const DELIMITER: char = '|';
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const LEGACY_FIELD_COUNT: usize = 6;
const FIELD_COUNT: usize = 7;

/// Serializes a record to a single log line (without trailing newline).
pub fn encode(txn: &Transaction) -> String {
    let extra = match txn.details() {
        TransactionDetails::Income { source } => escape(source),
        TransactionDetails::Expense {
            is_essential,
            payment_method,
        } => format!("{},{}", is_essential, escape(payment_method)),
    };
    format!(
        "{id}{d}{kind}{d}{amount:.2}{d}{description}{d}{category}{d}{date}{d}{extra}",
        d = DELIMITER,
        id = txn.id(),
        kind = txn.kind(),
        amount = txn.amount(),
        description = escape(txn.description()),
        category = escape(txn.category()),
        date = txn.date().format(DATE_FORMAT),
        extra = extra,
    )
}

/// Parses one log line back into a validated record.
pub fn decode(line: &str) -> Result<Transaction, ParseError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() != LEGACY_FIELD_COUNT && fields.len() != FIELD_COUNT {
        return Err(ParseError::FieldCount(fields.len()));
    }

    let id = parse_id(fields[0])?;
    let kind = TransactionKind::from_str(fields[1])
        .map_err(|_| ParseError::UnknownKind(fields[1].trim().to_string()))?;
    let amount = Decimal::from_str(fields[2].trim())
        .map_err(|_| ParseError::InvalidAmount(fields[2].trim().to_string()))?;
    let description = unescape(fields[3]);
    let category = unescape(fields[4]);
    let date = NaiveDate::parse_from_str(fields[5].trim(), DATE_FORMAT)
        .map_err(|_| ParseError::InvalidDate(fields[5].trim().to_string()))?;

    let details = match (kind, fields.get(6)) {
        (TransactionKind::Income, None) => TransactionDetails::income(Some(DEFAULT_SOURCE)),
        (TransactionKind::Income, Some(extra)) => {
            TransactionDetails::income(Some(unescape(extra).as_str()))
        }
        (TransactionKind::Expense, None) => {
            TransactionDetails::expense(true, Some(DEFAULT_PAYMENT_METHOD))
        }
        (TransactionKind::Expense, Some(extra)) => parse_expense_extra(extra)?,
    };

    Ok(Transaction::new(
        id,
        amount,
        &description,
        Some(category.as_str()),
        date,
        details,
    )?)
}

fn parse_id(raw: &str) -> Result<u64, ParseError> {
    match raw.trim().parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ParseError::InvalidId(raw.trim().to_string())),
    }
}

fn parse_expense_extra(extra: &str) -> Result<TransactionDetails, ParseError> {
    let (flag, method) = match extra.split_once(',') {
        Some((flag, method)) => (flag, Some(unescape(method))),
        None => (extra, None),
    };
    let flag = flag.trim();
    let is_essential = if flag.eq_ignore_ascii_case("true") {
        true
    } else if flag.eq_ignore_ascii_case("false") {
        false
    } else {
        return Err(ParseError::InvalidFlag(flag.to_string()));
    };
    Ok(TransactionDetails::expense(is_essential, method.as_deref()))
}

/// Reversible escape that keeps the delimiter and line breaks out of a field.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            DELIMITER => out.push_str("\\p"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out
}

/// Inverse of [`escape`]. Unknown sequences are kept verbatim.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('p') => out.push(DELIMITER),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
