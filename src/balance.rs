//! BALANCE GATE - advisory pre-submission checks
//!
//! The backend ledger is the authority on funds. These checks only stop a
//! request from being composed when the cached wallet clearly cannot cover
//! it, or when the amount is outside the channel's limits.
//!
//! # Check order (per channel form):
//! 1. Channel min/max bounds - before any fee lookup
//! 2. Fee resolution
//! 3. `balance >= amount + fee`

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::transfer::error::TransferError;
use crate::wallet::Wallet;

/// `balance >= amount + fee`. Equality passes; a total that overflows never
/// passes.
#[inline]
pub fn can_submit(balance: Decimal, amount: Decimal, fee: Decimal) -> bool {
    amount
        .checked_add(fee)
        .is_some_and(|required| balance >= required)
}

/// Gate a debit of `amount + fee` against `wallet`.
pub fn ensure_sufficient(
    wallet: &Wallet,
    amount: Decimal,
    fee: Decimal,
) -> Result<(), TransferError> {
    let required = amount.checked_add(fee).ok_or(TransferError::Overflow)?;
    if wallet.balance >= required {
        Ok(())
    } else {
        Err(TransferError::InsufficientBalance {
            currency: wallet.currency.clone(),
            required,
            available: wallet.balance,
        })
    }
}

/// Inclusive send-amount bounds for one channel, in the channel's currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmountLimits {
    pub min: Decimal,
    pub max: Decimal,
}

impl AmountLimits {
    pub fn new(min: Decimal, max: Decimal) -> Self {
        Self { min, max }
    }

    /// MOMO limits: 5 to 1000
    pub fn momo() -> Self {
        Self::new(Decimal::from(5), Decimal::from(1000))
    }

    pub fn check(&self, amount: Decimal) -> Result<(), TransferError> {
        if amount < self.min {
            return Err(TransferError::AmountTooSmall { min: self.min });
        }
        if amount > self.max {
            return Err(TransferError::AmountTooLarge { max: self.max });
        }
        Ok(())
    }
}
