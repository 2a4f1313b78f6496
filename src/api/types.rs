//! Wire types for the backend endpoints
//!
//! Field names match the PHP endpoints exactly. Amounts are sent as decimal
//! strings to avoid float rounding.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::fee::{BlockchainFee, FeeTier};
use crate::transfer::pin::Pin;
use crate::transfer::types::{RecipientInfo, TransferRequest, TransferType};

use super::error::{ApiError, ApiResult};

/// `type` query parameter of `get_transfer_fees.php`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeKind {
    Momo,
    Crypto,
}

impl FeeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeKind::Momo => "momo",
            FeeKind::Crypto => "crypto",
        }
    }
}

impl fmt::Display for FeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// `GET get_transfer_fees.php?type=momo`
#[derive(Debug, Clone, Deserialize)]
pub struct MomoFeesResponse {
    #[serde(default)]
    pub momo_fees: Vec<FeeTier>,
}

/// `GET get_transfer_fees.php?type=crypto`
#[derive(Debug, Clone, Deserialize)]
pub struct CryptoFeesResponse {
    #[serde(default)]
    pub crypto_fees: Vec<BlockchainFee>,
    #[serde(default)]
    pub platform_fees: Vec<FeeTier>,
}

/// `POST transfers.php`
#[derive(Debug, Serialize)]
pub struct CreateTransferBody<'a> {
    pub user_id: u64,
    pub transfer_type: TransferType,
    pub amount: Decimal,
    pub currency: &'a str,
    pub recipient_info: &'a RecipientInfo,
    pub description: Option<&'a str>,
    pub transaction_pin: &'a Pin,
}

impl<'a> CreateTransferBody<'a> {
    pub fn new(user_id: u64, request: &'a TransferRequest, pin: &'a Pin) -> Self {
        Self {
            user_id,
            transfer_type: request.transfer_type(),
            amount: request.amount(),
            currency: request.currency(),
            recipient_info: request.recipient_info(),
            description: request.description(),
            transaction_pin: pin,
        }
    }
}

/// `POST verify_pin.php`
#[derive(Debug, Serialize)]
pub struct VerifyPinBody<'a> {
    pub user_id: u64,
    pub transaction_pin: &'a Pin,
}

/// `{success, message?}` envelope of the POST endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct BackendResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl BackendResponse {
    /// `success: true` yields the optional message; `false` becomes
    /// `ApiError::Backend` with the message, or `fallback` if none was sent.
    pub fn into_result(self, fallback: &str) -> ApiResult<Option<String>> {
        if self.success {
            Ok(self.message)
        } else {
            Err(ApiError::Backend(
                self.message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| fallback.to_string()),
            ))
        }
    }
}

/// Authenticated user for the current session
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: u64,
    /// Bearer token, if the deployment requires one
    pub token: Option<String>,
}

impl Session {
    pub fn new(user_id: u64) -> Self {
        Self {
            user_id,
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}
