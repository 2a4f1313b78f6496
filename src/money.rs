//! Money Parsing and Formatting
//!
//! All amounts in this crate are `rust_decimal::Decimal`. User-entered amount
//! strings and fee rounding go through this module so no float ever touches a
//! monetary value.
//!
//! ## Input rules
//! - `.5` and `5.` are rejected (use `0.5` / `5`)
//! - `+` prefix, exponents and negatives are rejected
//! - zero is rejected
//! - more fractional digits than the currency allows is rejected, never truncated
//!
//! ## Usage
//! ```rust
//! use tesapay_transfers::money::{parse_amount, format_amount, FIAT_DECIMALS};
//!
//! let amount = parse_amount("102.50", FIAT_DECIMALS).unwrap();
//! assert_eq!(format_amount(amount, FIAT_DECIMALS), "102.50");
//! ```

use rust_decimal::prelude::*;
use thiserror::Error;

/// Decimal places for fiat wallets (USD, NGN, GHS, ...)
pub const FIAT_DECIMALS: u32 = 2;

/// Money conversion errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoneyError {
    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Parse a user-entered amount string into a `Decimal`.
///
/// # Errors
/// * `InvalidFormat` - empty, `.5`, `5.`, `+`, exponent, or not a number
/// * `InvalidAmount` - zero or negative
/// * `PrecisionOverflow` - more than `decimals` fractional digits
pub fn parse_amount(input: &str, decimals: u32) -> Result<Decimal, MoneyError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(MoneyError::InvalidFormat("empty string".into()));
    }
    if s.starts_with('-') {
        return Err(MoneyError::InvalidAmount);
    }
    if s.starts_with('+') {
        return Err(MoneyError::InvalidFormat("+ prefix not allowed".into()));
    }
    if s.starts_with('.') {
        return Err(MoneyError::InvalidFormat(
            "missing leading zero (use 0.5 instead of .5)".into(),
        ));
    }
    if s.ends_with('.') {
        return Err(MoneyError::InvalidFormat(
            "missing fractional part (use 5 instead of 5.)".into(),
        ));
    }
    if !s.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(MoneyError::InvalidFormat(format!("unexpected character in '{}'", s)));
    }

    let value = Decimal::from_str(s).map_err(|e| MoneyError::InvalidFormat(e.to_string()))?;

    // Trailing zeros beyond the currency precision are harmless ("1.500" for 2dp)
    let normalized = value.normalize();
    if normalized.scale() > decimals {
        return Err(MoneyError::PrecisionOverflow {
            provided: normalized.scale(),
            max: decimals,
        });
    }

    if value.is_zero() {
        return Err(MoneyError::InvalidAmount);
    }

    Ok(value)
}

/// Round a computed amount (fee) to the currency precision.
///
/// Midpoints round away from zero, the same way amounts are shown to users.
#[inline]
pub fn round_to_currency(value: Decimal, decimals: u32) -> Decimal {
    value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with exactly `display_decimals` fractional digits.
pub fn format_amount(value: Decimal, display_decimals: u32) -> String {
    let rounded = round_to_currency(value, display_decimals);
    format!("{:.prec$}", rounded, prec = display_decimals as usize)
}
