use thiserror::Error;

use crate::fee::FeeError;

/// Result of every backend call
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Connection refused, DNS, TLS, timeout
    #[error("Request failed: {0}")]
    Network(String),

    /// Non-2xx status without a readable backend body
    #[error("HTTP status {status}")]
    Http { status: u16 },

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid fee table: {0}")]
    InvalidFeeTable(#[from] FeeError),

    /// `success: false`, message shown verbatim
    #[error("{0}")]
    Backend(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Network(e.to_string())
        }
    }
}
