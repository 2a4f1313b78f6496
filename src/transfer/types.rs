//! Transfer Core Types
//!
//! The normalized request every channel form produces, and the
//! channel-specific recipient bags it carries.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fee::FeeQuote;

/// Local draft ID - ULID used to correlate log lines of one transfer.
///
/// Never sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DraftId(ulid::Ulid);

impl DraftId {
    pub fn new() -> Self {
        Self(ulid::Ulid::new())
    }

    pub fn inner(&self) -> ulid::Ulid {
        self.0
    }
}

impl Default for DraftId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transfer channel, sent as `transfer_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferType {
    /// Another TesaPay user
    Tesapay,
    /// Nigerian bank account
    Nigeria,
    /// Bank account abroad
    International,
    /// Mobile money wallet
    Momo,
    /// On-chain crypto address
    Crypto,
}

impl TransferType {
    pub const ALL: [TransferType; 5] = [
        TransferType::Tesapay,
        TransferType::Nigeria,
        TransferType::International,
        TransferType::Momo,
        TransferType::Crypto,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransferType::Tesapay => "tesapay",
            TransferType::Nigeria => "nigeria",
            TransferType::International => "international",
            TransferType::Momo => "momo",
            TransferType::Crypto => "crypto",
        }
    }

    /// Whether the request amount includes fees (total debit)
    pub fn charges_fees(&self) -> bool {
        matches!(self, TransferType::Momo | TransferType::Crypto)
    }
}

impl fmt::Display for TransferType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransferType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tesapay" => Ok(TransferType::Tesapay),
            "nigeria" => Ok(TransferType::Nigeria),
            "international" => Ok(TransferType::International),
            "momo" => Ok(TransferType::Momo),
            "crypto" => Ok(TransferType::Crypto),
            _ => Err(format!("Invalid transfer type: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TesapayRecipient {
    pub recipient_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipient_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NigeriaBankRecipient {
    pub bank_name: String,
    pub bank_code: String,
    pub account_number: String,
    pub account_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternationalBankRecipient {
    pub bank_name: String,
    pub account_number: String,
    pub account_name: String,
    pub swift_code: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iban: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomoRecipient {
    pub momo_number: String,
    pub momo_name: String,
    pub send_amount: Decimal,
    pub platform_fee: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CryptoRecipient {
    pub crypto_type: String,
    pub wallet_address: String,
    pub network_type: String,
    pub send_amount: Decimal,
    pub platform_fee: Decimal,
    pub blockchain_fee: Decimal,
}

/// Channel-specific `recipient_info` bag (serialized without a tag)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RecipientInfo {
    Tesapay(TesapayRecipient),
    NigeriaBank(NigeriaBankRecipient),
    InternationalBank(InternationalBankRecipient),
    Momo(MomoRecipient),
    Crypto(CryptoRecipient),
}

impl RecipientInfo {
    pub fn transfer_type(&self) -> TransferType {
        match self {
            RecipientInfo::Tesapay(_) => TransferType::Tesapay,
            RecipientInfo::NigeriaBank(_) => TransferType::Nigeria,
            RecipientInfo::InternationalBank(_) => TransferType::International,
            RecipientInfo::Momo(_) => TransferType::Momo,
            RecipientInfo::Crypto(_) => TransferType::Crypto,
        }
    }
}

/// Composed transfer request.
///
/// Immutable once built: fields are private and only the composer can
/// construct it. For MOMO and crypto, `amount` is the total debit (send
/// amount plus fees), not the send amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    draft_id: DraftId,
    transfer_type: TransferType,
    amount: Decimal,
    currency: String,
    recipient_info: RecipientInfo,
    description: Option<String>,
    quote: FeeQuote,
}

impl TransferRequest {
    pub(crate) fn new(
        currency: String,
        recipient_info: RecipientInfo,
        description: Option<String>,
        quote: FeeQuote,
    ) -> Self {
        Self {
            draft_id: DraftId::new(),
            transfer_type: recipient_info.transfer_type(),
            amount: quote.total_debit,
            currency,
            recipient_info,
            description,
            quote,
        }
    }

    pub fn draft_id(&self) -> DraftId {
        self.draft_id
    }

    pub fn transfer_type(&self) -> TransferType {
        self.transfer_type
    }

    /// Total debit from the wallet
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn recipient_info(&self) -> &RecipientInfo {
        &self.recipient_info
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn quote(&self) -> &FeeQuote {
        &self.quote
    }
}
