//! TesaPay Transfers - fee pricing and confirmation workflow
//!
//! Client-side core of the TesaPay "Send" flow: pick a channel, fill the
//! form, see the fee breakdown, confirm with a 5-digit transaction PIN.
//!
//! # Modules
//!
//! - [`money`] - Strict decimal parsing and currency rounding
//! - [`fee`] - Tiered fee schedules, blockchain fees, quotes
//! - [`wallet`] - Cached per-currency balances
//! - [`balance`] - Balance gate and amount limits
//! - [`transfer`] - Composer, PIN pad and the transfer state machine
//! - [`api`] - Typed client for the PHP backend
//! - [`config`] - YAML configuration
//! - [`logging`] - tracing subscriber setup

pub mod api;
pub mod balance;
pub mod config;
pub mod fee;
pub mod logging;
pub mod money;
pub mod transfer;
pub mod wallet;

// Convenient re-exports at crate root
pub use api::{ApiClient, ApiError, Session};
pub use balance::{AmountLimits, can_submit};
pub use config::{AppConfig, TransferPolicy};
pub use fee::{BlockchainFee, FeeQuote, FeeSchedule, FeeTables, FeeTier, FeeType, resolve_fee};
pub use transfer::{
    TransferCoordinator, TransferError, TransferGateway, TransferRequest, TransferStep,
    TransferType,
};
pub use wallet::{Wallet, WalletBook};
