//! Wallet cache
//!
//! The authenticated user's wallets, one per currency, as last fetched by the
//! caller. Injected into the composer instead of being read from an ambient
//! context.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub currency: String,
    pub balance: Decimal,
}

impl Wallet {
    pub fn new(currency: impl Into<String>, balance: Decimal) -> Self {
        Self {
            currency: currency.into(),
            balance,
        }
    }
}

/// All wallets of one user, looked up by currency code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletBook {
    wallets: Vec<Wallet>,
}

impl WalletBook {
    pub fn new(wallets: Vec<Wallet>) -> Self {
        Self { wallets }
    }

    /// Case-insensitive lookup (`usd` finds the `USD` wallet)
    pub fn find(&self, currency: &str) -> Option<&Wallet> {
        let currency = currency.trim();
        self.wallets
            .iter()
            .find(|w| w.currency.eq_ignore_ascii_case(currency))
    }

    pub fn balance_of(&self, currency: &str) -> Option<Decimal> {
        self.find(currency).map(|w| w.balance)
    }

    /// Replace a wallet after a refresh, or add it
    pub fn upsert(&mut self, wallet: Wallet) {
        match self
            .wallets
            .iter_mut()
            .find(|w| w.currency.eq_ignore_ascii_case(&wallet.currency))
        {
            Some(existing) => *existing = wallet,
            None => self.wallets.push(wallet),
        }
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }
}

impl FromIterator<Wallet> for WalletBook {
    fn from_iter<I: IntoIterator<Item = Wallet>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
