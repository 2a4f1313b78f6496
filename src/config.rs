use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

use crate::balance::AmountLimits;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    pub log: LogConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub transfer: TransferPolicy,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LogConfig {
    pub log_level: String,
    pub log_dir: String,
    pub log_file: String,
    pub use_json: bool,
    /// "hourly" | "daily" | anything else = never
    pub rotation: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: "./logs".to_string(),
            log_file: "tesapay.log".to_string(),
            use_json: false,
            rotation: "daily".to_string(),
        }
    }
}

/// Backend endpoint settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL the `*.php` endpoints hang off, e.g. `https://api.tesapay.com/api`
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Client-side transfer rules
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct TransferPolicy {
    /// MOMO send-amount bounds, checked before any fee lookup
    pub momo_limits: AmountLimits,
    /// Optional crypto send-amount bounds
    pub crypto_limits: Option<AmountLimits>,
    /// Wallet debited for crypto sends
    pub crypto_debit_currency: String,
    /// Reject amounts no fee tier covers instead of charging zero
    pub reject_unmatched_fee: bool,
    /// Fee rounding precision
    pub currency_decimals: u32,
}

impl Default for TransferPolicy {
    fn default() -> Self {
        Self {
            momo_limits: AmountLimits::momo(),
            crypto_limits: None,
            crypto_debit_currency: "USD".to_string(),
            reject_unmatched_fee: false,
            currency_decimals: crate::money::FIAT_DECIMALS,
        }
    }
}

impl AppConfig {
    /// Load `config/{env}.yaml`
    pub fn load(env: &str) -> Result<Self, ConfigError> {
        let config_path = format!("config/{}.yaml", env);
        let content = fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_app_config_deserialize() {
        let yaml = r#"
log:
  log_level: "debug"
  log_dir: "./logs"
  log_file: "quote.log"
  use_json: true
  rotation: "hourly"
api:
  base_url: "https://api.example.com/api"
  request_timeout_secs: 10
transfer:
  momo_limits:
    min: "5"
    max: "1000"
  crypto_limits:
    min: "10"
    max: "5000"
  reject_unmatched_fee: true
"#;

        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.log.log_level, "debug");
        assert!(config.log.use_json);
        assert_eq!(config.api.request_timeout_secs, 10);
        assert_eq!(
            config.transfer.crypto_limits,
            Some(AmountLimits::new(Decimal::from(10), Decimal::from(5000)))
        );
        assert!(config.transfer.reject_unmatched_fee);
        // Unset keys fall back to defaults
        assert_eq!(config.transfer.crypto_debit_currency, "USD");
        assert_eq!(config.transfer.currency_decimals, 2);
    }

    #[test]
    fn test_transfer_section_is_optional() {
        let yaml = r#"
log:
  log_level: "info"
  log_dir: "./logs"
  log_file: "app.log"
  use_json: false
  rotation: "never"
api:
  base_url: "http://localhost:8000"
"#;

        let config = AppConfig::from_yaml_str(yaml).unwrap();

        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.transfer, TransferPolicy::default());
        assert_eq!(config.transfer.momo_limits, AmountLimits::momo());
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("does-not-exist").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
