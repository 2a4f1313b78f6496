//! Transfer Composer
//!
//! One form per channel. Each form validates its own fields, prices the
//! transfer and gates it on the cached wallet balance before producing an
//! immutable [`TransferRequest`].
//!
//! # Check order
//! 1. Required fields present (trimmed, non-empty)
//! 2. Amount format
//! 3. Channel bounds (MOMO 5-1000) - before any fee lookup
//! 4. Fees (platform tier, plus blockchain fee for crypto)
//! 5. Wallet lookup and `balance >= amount + fees`

use rust_decimal::Decimal;
use tracing::debug;

use crate::balance::ensure_sufficient;
use crate::config::TransferPolicy;
use crate::fee::{FeeQuote, FeeSchedule, FeeTables};
use crate::money::{parse_amount, round_to_currency};
use crate::wallet::WalletBook;

use super::error::TransferError;
use super::types::{
    CryptoRecipient, InternationalBankRecipient, MomoRecipient, NigeriaBankRecipient,
    RecipientInfo, TesapayRecipient, TransferRequest, TransferType,
};

/// Injected dependencies for composing a request
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    pub wallets: &'a WalletBook,
    pub fees: &'a FeeTables,
    pub policy: &'a TransferPolicy,
}

impl<'a> ComposeContext<'a> {
    pub fn new(wallets: &'a WalletBook, fees: &'a FeeTables, policy: &'a TransferPolicy) -> Self {
        Self {
            wallets,
            fees,
            policy,
        }
    }

    fn platform_fee(&self, schedule: &FeeSchedule, amount: Decimal) -> Result<Decimal, TransferError> {
        let fee = if self.policy.reject_unmatched_fee {
            schedule.resolve_strict(amount)?
        } else {
            schedule.resolve(amount)?
        };
        Ok(round_to_currency(fee, self.policy.currency_decimals))
    }

    /// Price a MOMO send: bounds first, then the platform tier.
    pub fn quote_momo(&self, amount: Decimal) -> Result<FeeQuote, TransferError> {
        self.policy.momo_limits.check(amount)?;
        let platform_fee = self.platform_fee(&self.fees.momo, amount)?;
        Ok(FeeQuote::new(amount, platform_fee, Decimal::ZERO)?)
    }

    /// Price a crypto send. An unknown (crypto, network) pair is rejected
    /// rather than charged zero.
    pub fn quote_crypto(
        &self,
        amount: Decimal,
        crypto_type: &str,
        network_type: &str,
    ) -> Result<FeeQuote, TransferError> {
        if let Some(limits) = self.policy.crypto_limits {
            limits.check(amount)?;
        }
        let blockchain_fee = self
            .fees
            .blockchain_fee(crypto_type, network_type)
            .ok_or_else(|| TransferError::UnsupportedNetwork {
                crypto_type: crypto_type.to_string(),
                network_type: network_type.to_string(),
            })?;
        let platform_fee = self.platform_fee(&self.fees.crypto_platform, amount)?;
        Ok(FeeQuote::new(amount, platform_fee, blockchain_fee)?)
    }

    fn gate(&self, currency: &str, quote: &FeeQuote) -> Result<(), TransferError> {
        let wallet = self
            .wallets
            .find(currency)
            .ok_or_else(|| TransferError::WalletNotFound(currency.to_string()))?;
        ensure_sufficient(wallet, quote.send_amount, quote.total_fees())
    }

    fn amount(&self, input: &str) -> Result<Decimal, TransferError> {
        Ok(parse_amount(input, self.policy.currency_decimals)?)
    }
}

/// A channel-specific transfer form
pub trait ChannelForm {
    fn transfer_type(&self) -> TransferType;

    /// Validate, price and gate the form, producing the request handed to
    /// confirmation.
    fn compose(&self, ctx: &ComposeContext<'_>) -> Result<TransferRequest, TransferError>;
}

fn required(value: &str, field: &'static str) -> Result<String, TransferError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(TransferError::MissingField(field));
    }
    Ok(value.to_string())
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn finish(
    currency: String,
    recipient_info: RecipientInfo,
    description: &Option<String>,
    quote: FeeQuote,
) -> TransferRequest {
    let request = TransferRequest::new(currency, recipient_info, optional(description), quote);
    debug!(
        draft_id = %request.draft_id(),
        transfer_type = %request.transfer_type(),
        amount = %request.amount(),
        currency = request.currency(),
        "Transfer request composed"
    );
    request
}

/// Send to another TesaPay user
#[derive(Debug, Clone, Default)]
pub struct TesapayForm {
    pub recipient_email: String,
    pub recipient_name: Option<String>,
    pub amount: String,
    pub currency: String,
    pub description: Option<String>,
}

impl ChannelForm for TesapayForm {
    fn transfer_type(&self) -> TransferType {
        TransferType::Tesapay
    }

    fn compose(&self, ctx: &ComposeContext<'_>) -> Result<TransferRequest, TransferError> {
        let recipient_email = required(&self.recipient_email, "recipientEmail")?;
        let currency = required(&self.currency, "currency")?.to_uppercase();
        let amount = ctx.amount(&self.amount)?;

        let quote = FeeQuote::fee_free(amount);
        ctx.gate(&currency, &quote)?;

        let info = RecipientInfo::Tesapay(TesapayRecipient {
            recipient_email,
            recipient_name: optional(&self.recipient_name),
        });
        Ok(finish(currency, info, &self.description, quote))
    }
}

/// Send to a Nigerian bank account
#[derive(Debug, Clone, Default)]
pub struct NigeriaBankForm {
    pub bank_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
    pub amount: String,
    pub currency: String,
    pub description: Option<String>,
}

impl ChannelForm for NigeriaBankForm {
    fn transfer_type(&self) -> TransferType {
        TransferType::Nigeria
    }

    fn compose(&self, ctx: &ComposeContext<'_>) -> Result<TransferRequest, TransferError> {
        let bank_name = required(&self.bank_name, "bankName")?;
        let bank_code = required(&self.bank_code, "bankCode")?;
        let account_number = required(&self.account_number, "accountNumber")?;
        let account_name = required(&self.account_name, "accountName")?;
        let currency = required(&self.currency, "currency")?.to_uppercase();
        let amount = ctx.amount(&self.amount)?;

        let quote = FeeQuote::fee_free(amount);
        ctx.gate(&currency, &quote)?;

        let info = RecipientInfo::NigeriaBank(NigeriaBankRecipient {
            bank_name,
            bank_code,
            account_number,
            account_name,
        });
        Ok(finish(currency, info, &self.description, quote))
    }
}

/// Send to a bank account abroad
#[derive(Debug, Clone, Default)]
pub struct InternationalBankForm {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub swift_code: String,
    pub country: String,
    pub iban: Option<String>,
    pub routing_number: Option<String>,
    pub amount: String,
    pub currency: String,
    pub description: Option<String>,
}

impl ChannelForm for InternationalBankForm {
    fn transfer_type(&self) -> TransferType {
        TransferType::International
    }

    fn compose(&self, ctx: &ComposeContext<'_>) -> Result<TransferRequest, TransferError> {
        let bank_name = required(&self.bank_name, "bankName")?;
        let account_number = required(&self.account_number, "accountNumber")?;
        let account_name = required(&self.account_name, "accountName")?;
        let swift_code = required(&self.swift_code, "swiftCode")?;
        let country = required(&self.country, "country")?;
        let currency = required(&self.currency, "currency")?.to_uppercase();
        let amount = ctx.amount(&self.amount)?;

        let quote = FeeQuote::fee_free(amount);
        ctx.gate(&currency, &quote)?;

        let info = RecipientInfo::InternationalBank(InternationalBankRecipient {
            bank_name,
            account_number,
            account_name,
            swift_code,
            country,
            iban: optional(&self.iban),
            routing_number: optional(&self.routing_number),
        });
        Ok(finish(currency, info, &self.description, quote))
    }
}

/// Send to a mobile money wallet
#[derive(Debug, Clone, Default)]
pub struct MomoForm {
    pub momo_number: String,
    pub momo_name: String,
    pub amount: String,
    pub currency: String,
    pub description: Option<String>,
}

impl ChannelForm for MomoForm {
    fn transfer_type(&self) -> TransferType {
        TransferType::Momo
    }

    fn compose(&self, ctx: &ComposeContext<'_>) -> Result<TransferRequest, TransferError> {
        let momo_number = required(&self.momo_number, "momoNumber")?;
        let momo_name = required(&self.momo_name, "momoName")?;
        let currency = required(&self.currency, "currency")?.to_uppercase();
        let amount = ctx.amount(&self.amount)?;

        let quote = ctx.quote_momo(amount)?;
        ctx.gate(&currency, &quote)?;

        let info = RecipientInfo::Momo(MomoRecipient {
            momo_number,
            momo_name,
            send_amount: quote.send_amount,
            platform_fee: quote.platform_fee,
        });
        Ok(finish(currency, info, &self.description, quote))
    }
}

/// Send crypto to an on-chain address, debited from the configured wallet
#[derive(Debug, Clone, Default)]
pub struct CryptoForm {
    pub crypto_type: String,
    pub wallet_address: String,
    pub network_type: String,
    pub amount: String,
    pub description: Option<String>,
}

impl ChannelForm for CryptoForm {
    fn transfer_type(&self) -> TransferType {
        TransferType::Crypto
    }

    fn compose(&self, ctx: &ComposeContext<'_>) -> Result<TransferRequest, TransferError> {
        let crypto_type = required(&self.crypto_type, "cryptoType")?;
        let wallet_address = required(&self.wallet_address, "walletAddress")?;
        let network_type = required(&self.network_type, "networkType")?;
        let amount = ctx.amount(&self.amount)?;

        let quote = ctx.quote_crypto(amount, &crypto_type, &network_type)?;

        let currency = ctx.policy.crypto_debit_currency.clone();
        ctx.gate(&currency, &quote)?;

        let info = RecipientInfo::Crypto(CryptoRecipient {
            crypto_type,
            wallet_address,
            network_type,
            send_amount: quote.send_amount,
            platform_fee: quote.platform_fee,
            blockchain_fee: quote.blockchain_fee,
        });
        Ok(finish(currency, info, &self.description, quote))
    }
}
