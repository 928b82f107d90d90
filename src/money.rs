//! Money
//!
//! Amounts are plain [`Decimal`] values inside the engine; a currency is only
//! attached when an amount is shown to a person.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use thiserror::Error;

/// Errors converting amounts for display.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyFormatError {
    /// The currency code is not supported.
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The amount does not fit in minor units.
    #[error("Amount out of range: {0}")]
    OutOfRange(Decimal),
}

/// Look up a supported ISO currency by code.
///
/// # Errors
///
/// Returns [`MoneyFormatError::UnknownCurrency`] for anything other than `GBP`, `USD`, `EUR` or `INR`.
pub fn parse_currency(code: &str) -> Result<&'static Currency, MoneyFormatError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "GBP" => Ok(iso::GBP),
        "USD" => Ok(iso::USD),
        "EUR" => Ok(iso::EUR),
        "INR" => Ok(iso::INR),
        _ => Err(MoneyFormatError::UnknownCurrency(code.to_string())),
    }
}

/// Convert an amount into money of the given currency, rounded to minor units.
///
/// # Errors
///
/// Returns [`MoneyFormatError::OutOfRange`] if the amount cannot be represented.
pub fn to_money(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, MoneyFormatError> {
    let minor = amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| {
            value
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(MoneyFormatError::OutOfRange(amount))?;

    Ok(Money::from_minor(minor, currency))
}

/// Format an amount in the given currency, e.g. `£1,100.00`.
///
/// # Errors
///
/// Returns [`MoneyFormatError::OutOfRange`] if the amount cannot be represented.
pub fn format_amount(
    amount: Decimal,
    currency: &'static Currency,
) -> Result<String, MoneyFormatError> {
    Ok(to_money(amount, currency)?.to_string())
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_currency_accepts_supported_codes() -> TestResult {
        assert_eq!(parse_currency("gbp")?, iso::GBP);
        assert_eq!(parse_currency("USD")?, iso::USD);
        assert_eq!(parse_currency(" EUR ")?, iso::EUR);
        assert_eq!(parse_currency("inr")?, iso::INR);

        Ok(())
    }

    #[test]
    fn parse_currency_rejects_unknown_codes() {
        assert_eq!(
            parse_currency("ABC"),
            Err(MoneyFormatError::UnknownCurrency("ABC".to_string()))
        );
    }

    #[test]
    fn to_money_rounds_to_minor_units() -> TestResult {
        let money = to_money(dec!(1100.005), iso::GBP)?;

        assert_eq!(money, Money::from_minor(110_001, iso::GBP));

        Ok(())
    }

    #[test]
    fn format_amount_uses_rupee_symbol() -> TestResult {
        let formatted = format_amount(dec!(1100), iso::INR)?;

        assert!(formatted.starts_with('₹'), "got {formatted}");

        Ok(())
    }

    #[test]
    fn to_money_rejects_huge_amounts() {
        let huge = Decimal::MAX;

        assert_eq!(
            to_money(huge, iso::GBP),
            Err(MoneyFormatError::OutOfRange(huge))
        );
    }
}
