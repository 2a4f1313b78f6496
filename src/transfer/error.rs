//! Transfer Error Types
//!
//! Every failure in the transfer workflow is recoverable: it is reported to
//! the user at the step where it happened and control returns there.
//!
//! | Kind | Raised by | Network call made? |
//! |------------|--------------------------------|-------------------|
//! | Validation | composer, balance gate | no |
//! | Flow | state machine | no |
//! | Network | API client (transport) | attempted |
//! | Backend | API client (`success: false`) | yes |

use rust_decimal::Decimal;
use thiserror::Error;

use crate::api::ApiError;
use crate::fee::FeeError;
use crate::money::MoneyError;

/// Generic message for transport failures
pub const NETWORK_ERROR_MESSAGE: &str = "Network error, please try again";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    // === Validation Errors ===
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] MoneyError),

    #[error("Minimum amount is {min}")]
    AmountTooSmall { min: Decimal },

    #[error("Maximum amount is {max}")]
    AmountTooLarge { max: Decimal },

    #[error("No {0} wallet found")]
    WalletNotFound(String),

    #[error("Insufficient {currency} balance: {required} required, {available} available")]
    InsufficientBalance {
        currency: String,
        required: Decimal,
        available: Decimal,
    },

    #[error("{crypto_type} is not supported on {network_type}")]
    UnsupportedNetwork {
        crypto_type: String,
        network_type: String,
    },

    #[error("No fee tier covers amount {0}")]
    NoMatchingFeeTier(Decimal),

    #[error("Fee table is not available for this channel")]
    FeesUnavailable,

    #[error("Amount would cause overflow")]
    Overflow,

    // === Flow Errors ===
    #[error("Enter all 5 digits of your transaction PIN")]
    PinIncomplete,

    #[error("A transfer is already being processed")]
    SubmissionInFlight,

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    // === Network Errors ===
    #[error("Network error: {0}")]
    Network(String),

    // === Backend Errors ===
    #[error("{0}")]
    Rejected(String),
}

/// Taxonomy class of a [`TransferError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Flow,
    Network,
    Backend,
}

/// How the error is put in front of the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    /// Transient notice, the form stays editable
    Toast,
    /// Blocking dialog that must be dismissed
    Dialog,
}

impl TransferError {
    /// Stable error code for logs and UI mapping
    pub fn code(&self) -> &'static str {
        match self {
            TransferError::MissingField(_) => "MISSING_FIELD",
            TransferError::InvalidAmount(_) => "INVALID_AMOUNT",
            TransferError::AmountTooSmall { .. } => "AMOUNT_TOO_SMALL",
            TransferError::AmountTooLarge { .. } => "AMOUNT_TOO_LARGE",
            TransferError::WalletNotFound(_) => "WALLET_NOT_FOUND",
            TransferError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            TransferError::UnsupportedNetwork { .. } => "UNSUPPORTED_NETWORK",
            TransferError::NoMatchingFeeTier(_) => "NO_MATCHING_FEE_TIER",
            TransferError::FeesUnavailable => "FEES_UNAVAILABLE",
            TransferError::Overflow => "OVERFLOW",
            TransferError::PinIncomplete => "PIN_INCOMPLETE",
            TransferError::SubmissionInFlight => "SUBMISSION_IN_FLIGHT",
            TransferError::InvalidStateTransition(_) => "INVALID_STATE_TRANSITION",
            TransferError::Network(_) => "NETWORK_ERROR",
            TransferError::Rejected(_) => "REJECTED",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            TransferError::MissingField(_)
            | TransferError::InvalidAmount(_)
            | TransferError::AmountTooSmall { .. }
            | TransferError::AmountTooLarge { .. }
            | TransferError::WalletNotFound(_)
            | TransferError::InsufficientBalance { .. }
            | TransferError::UnsupportedNetwork { .. }
            | TransferError::NoMatchingFeeTier(_)
            | TransferError::FeesUnavailable
            | TransferError::Overflow => ErrorKind::Validation,
            TransferError::PinIncomplete
            | TransferError::SubmissionInFlight
            | TransferError::InvalidStateTransition(_) => ErrorKind::Flow,
            TransferError::Network(_) => ErrorKind::Network,
            TransferError::Rejected(_) => ErrorKind::Backend,
        }
    }

    /// Insufficient balance blocks with a dialog; everything else is a toast
    pub fn presentation(&self) -> Presentation {
        match self {
            TransferError::InsufficientBalance { .. } => Presentation::Dialog,
            _ => Presentation::Toast,
        }
    }

    /// Text shown to the user.
    ///
    /// Transport failures collapse to one generic message; backend messages
    /// are shown verbatim.
    pub fn user_message(&self) -> String {
        match self {
            TransferError::Network(_) => NETWORK_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ApiError> for TransferError {
    fn from(e: ApiError) -> Self {
        match e {
            ApiError::Backend(message) => TransferError::Rejected(message),
            ApiError::InvalidFeeTable(_) => TransferError::FeesUnavailable,
            other => TransferError::Network(other.to_string()),
        }
    }
}

impl From<FeeError> for TransferError {
    fn from(e: FeeError) -> Self {
        match e {
            FeeError::NoMatchingTier(amount) => TransferError::NoMatchingFeeTier(amount),
            FeeError::Overflow { .. } => TransferError::Overflow,
            _ => TransferError::FeesUnavailable,
        }
    }
}
