use rust_decimal::{Decimal, RoundingStrategy};

use crate::errors::ValidationError;

pub const DEFAULT_CATEGORY: &str = "Other";
pub const DEFAULT_SOURCE: &str = "Other";
pub const DEFAULT_PAYMENT_METHOD: &str = "Unknown";

/// Number of fractional digits kept for every amount.
pub const CENT_SCALE: u32 = 2;

/// Largest amount a single record may carry: 1,000,000,000,000.00.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_328, 232, 0, false, 0);

/// Rounds to cents; the rounded value is what gets stored and persisted.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

pub fn validate_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    let rounded = round_cents(amount);
    if rounded <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount(amount));
    }
    if rounded > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount));
    }
    Ok(rounded)
}

pub fn validate_description(description: &str) -> Result<String, ValidationError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

/// Trims `value`, falling back to `default` when absent or blank.
pub fn or_default(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        assert_eq!(validate_amount(dec("10.005")).unwrap(), dec("10.01"));
        assert_eq!(validate_amount(dec("3")).unwrap(), dec("3.00"));
    }

    #[test]
    fn amounts_that_round_to_zero_are_rejected() {
        assert_eq!(
            validate_amount(dec("0.004")),
            Err(ValidationError::NonPositiveAmount(dec("0.004")))
        );
        assert!(validate_amount(dec("-5")).is_err());
    }

    #[test]
    fn amounts_above_the_cap_are_rejected() {
        assert_eq!(MAX_AMOUNT, dec("1000000000000"));
        assert_eq!(validate_amount(MAX_AMOUNT).unwrap(), MAX_AMOUNT);
        assert_eq!(
            validate_amount(dec("1000000000000.01")),
            Err(ValidationError::AmountTooLarge(dec("1000000000000.01")))
        );
        assert!(validate_amount(dec("50000000000000000000000000000")).is_err());
    }

    #[test]
    fn blank_text_uses_default() {
        assert_eq!(or_default(None, DEFAULT_CATEGORY), "Other");
        assert_eq!(or_default(Some("   "), DEFAULT_PAYMENT_METHOD), "Unknown");
        assert_eq!(or_default(Some(" Card "), DEFAULT_PAYMENT_METHOD), "Card");
    }

    #[test]
    fn description_is_trimmed() {
        assert_eq!(validate_description("  Rent ").unwrap(), "Rent");
        assert_eq!(
            validate_description(" \t"),
            Err(ValidationError::EmptyDescription)
        );
    }
}
