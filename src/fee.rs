//! Fee calculation
//!
//! Platform fees are tiered by amount. Each tier is either a flat fee or a
//! percentage of the send amount. Crypto transfers additionally pay a fixed
//! blockchain fee looked up by `(crypto_type, network_type)`.
//!
//! Percentage `fee_value` is expressed in percent: `1` = 1%.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Percentage denominator (`fee_value` is in percent)
pub const PERCENT_SCALE: Decimal = Decimal::ONE_HUNDRED;

/// How a tier's `fee_value` is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeeType {
    Flat,
    Percentage,
}

/// One fee tier as served by `get_transfer_fees.php`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeTier {
    pub min_amount: Decimal,
    /// `None` = unbounded
    #[serde(default)]
    pub max_amount: Option<Decimal>,
    pub fee_type: FeeType,
    pub fee_value: Decimal,
}

impl FeeTier {
    pub fn flat(min_amount: Decimal, max_amount: Option<Decimal>, fee_value: Decimal) -> Self {
        Self {
            min_amount,
            max_amount,
            fee_type: FeeType::Flat,
            fee_value,
        }
    }

    pub fn percentage(min_amount: Decimal, max_amount: Option<Decimal>, percent: Decimal) -> Self {
        Self {
            min_amount,
            max_amount,
            fee_type: FeeType::Percentage,
            fee_value: percent,
        }
    }

    /// `min_amount <= amount <= max_amount` (inclusive, max may be unbounded)
    #[inline]
    pub fn matches(&self, amount: Decimal) -> bool {
        amount >= self.min_amount && self.max_amount.is_none_or(|max| amount <= max)
    }

    /// Fee charged by this tier for `amount`. Not rounded.
    #[inline]
    pub fn fee_for(&self, amount: Decimal) -> Result<Decimal, FeeError> {
        match self.fee_type {
            FeeType::Flat => Ok(self.fee_value),
            FeeType::Percentage => amount
                .checked_mul(self.fee_value)
                .and_then(|v| v.checked_div(PERCENT_SCALE))
                .ok_or(FeeError::Overflow { amount }),
        }
    }
}

/// First tier matching `amount`, in list order.
pub fn find_tier(amount: Decimal, tiers: &[FeeTier]) -> Option<&FeeTier> {
    tiers.iter().find(|tier| tier.matches(amount))
}

/// Resolve the platform fee for `amount`.
///
/// An amount that matches no tier is charged zero. See [`FeeSchedule::resolve_strict`]
/// for the rejecting variant. Fails only when a percentage fee overflows.
///
/// # Example
/// ```
/// use rust_decimal::Decimal;
/// use tesapay_transfers::fee::{resolve_fee, FeeTier};
///
/// let tiers = vec![
///     FeeTier::flat(Decimal::ZERO, Some(Decimal::from(1000)), Decimal::from(10)),
///     FeeTier::percentage(Decimal::new(100001, 2), None, Decimal::ONE),
/// ];
/// assert_eq!(resolve_fee(Decimal::from(500), &tiers), Ok(Decimal::from(10)));
/// assert_eq!(resolve_fee(Decimal::from(5000), &tiers), Ok(Decimal::from(50)));
/// ```
pub fn resolve_fee(amount: Decimal, tiers: &[FeeTier]) -> Result<Decimal, FeeError> {
    match find_tier(amount, tiers) {
        Some(tier) => tier.fee_for(amount),
        None => {
            warn!(%amount, tiers = tiers.len(), "No fee tier matches amount, charging zero fee");
            Ok(Decimal::ZERO)
        }
    }
}

/// Fee table errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FeeError {
    #[error("Tier {index}: min_amount {min} is greater than max_amount {max}")]
    InvertedBounds {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("Tier {index}: negative amount or fee value")]
    NegativeValue { index: usize },

    #[error("Tier {index}: percentage fee {percent}% exceeds 100%")]
    PercentageTooLarge { index: usize, percent: Decimal },

    #[error("Tiers overlap at amount {at}")]
    Overlap { at: Decimal },

    #[error("No fee tier matches amount {0}")]
    NoMatchingTier(Decimal),

    #[error("Fee arithmetic overflows for amount {amount}")]
    Overflow { amount: Decimal },
}

/// Validated, non-overlapping tier list sorted by `min_amount`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeSchedule {
    tiers: Vec<FeeTier>,
}

impl FeeSchedule {
    /// Validate and sort a tier list.
    ///
    /// Rejects inverted bounds, negative values, percentages above 100 and
    /// overlapping ranges. Gaps between tiers are allowed.
    pub fn new(mut tiers: Vec<FeeTier>) -> Result<Self, FeeError> {
        for (index, tier) in tiers.iter().enumerate() {
            if tier.min_amount.is_sign_negative() || tier.fee_value.is_sign_negative() {
                return Err(FeeError::NegativeValue { index });
            }
            if let Some(max) = tier.max_amount
                && max < tier.min_amount
            {
                return Err(FeeError::InvertedBounds {
                    index,
                    min: tier.min_amount,
                    max,
                });
            }
            if tier.fee_type == FeeType::Percentage && tier.fee_value > PERCENT_SCALE {
                return Err(FeeError::PercentageTooLarge {
                    index,
                    percent: tier.fee_value,
                });
            }
        }

        tiers.sort_by(|a, b| a.min_amount.cmp(&b.min_amount));

        for pair in tiers.windows(2) {
            let (lower, upper) = (&pair[0], &pair[1]);
            match lower.max_amount {
                // An unbounded tier followed by anything overlaps
                None => return Err(FeeError::Overlap { at: upper.min_amount }),
                Some(max) if upper.min_amount <= max => {
                    return Err(FeeError::Overlap { at: upper.min_amount });
                }
                Some(_) => {}
            }
        }

        Ok(Self { tiers })
    }

    pub fn tiers(&self) -> &[FeeTier] {
        &self.tiers
    }

    /// Fee for `amount`, zero when no tier matches.
    pub fn resolve(&self, amount: Decimal) -> Result<Decimal, FeeError> {
        resolve_fee(amount, &self.tiers)
    }

    /// Fee for `amount`, or `NoMatchingTier`.
    pub fn resolve_strict(&self, amount: Decimal) -> Result<Decimal, FeeError> {
        find_tier(amount, &self.tiers)
            .ok_or(FeeError::NoMatchingTier(amount))?
            .fee_for(amount)
    }
}

/// Fixed on-chain fee for one `(crypto_type, network_type)` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockchainFee {
    pub crypto_type: String,
    pub network_type: String,
    pub blockchain_fee: Decimal,
}

/// Exact-match lookup of the blockchain fee. Matching is case-sensitive on
/// the codes the backend serves (`USDT`, `TRC20`, ...).
pub fn lookup_blockchain_fee(
    fees: &[BlockchainFee],
    crypto_type: &str,
    network_type: &str,
) -> Option<Decimal> {
    fees.iter()
        .find(|f| f.crypto_type == crypto_type && f.network_type == network_type)
        .map(|f| f.blockchain_fee)
}

/// All fee tables the composer needs, validated at load time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeeTables {
    pub momo: FeeSchedule,
    pub crypto_platform: FeeSchedule,
    pub blockchain: Vec<BlockchainFee>,
}

impl FeeTables {
    pub fn new(
        momo: Vec<FeeTier>,
        crypto_platform: Vec<FeeTier>,
        blockchain: Vec<BlockchainFee>,
    ) -> Result<Self, FeeError> {
        Ok(Self {
            momo: FeeSchedule::new(momo)?,
            crypto_platform: FeeSchedule::new(crypto_platform)?,
            blockchain,
        })
    }

    pub fn blockchain_fee(&self, crypto_type: &str, network_type: &str) -> Option<Decimal> {
        lookup_blockchain_fee(&self.blockchain, crypto_type, network_type)
    }
}

/// Composed fee breakdown for one transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    pub send_amount: Decimal,
    pub platform_fee: Decimal,
    pub blockchain_fee: Decimal,
    pub total_debit: Decimal,
}

impl FeeQuote {
    /// Sum the breakdown into `total_debit`, or `Overflow` when it does not
    /// fit in a `Decimal`.
    pub fn new(
        send_amount: Decimal,
        platform_fee: Decimal,
        blockchain_fee: Decimal,
    ) -> Result<Self, FeeError> {
        let total_debit = send_amount
            .checked_add(platform_fee)
            .and_then(|v| v.checked_add(blockchain_fee))
            .ok_or(FeeError::Overflow {
                amount: send_amount,
            })?;
        Ok(Self {
            send_amount,
            platform_fee,
            blockchain_fee,
            total_debit,
        })
    }

    /// No fees at all (TesaPay user and bank channels)
    pub fn fee_free(send_amount: Decimal) -> Self {
        Self {
            send_amount,
            platform_fee: Decimal::ZERO,
            blockchain_fee: Decimal::ZERO,
            total_debit: send_amount,
        }
    }

    /// Everything charged on top of the send amount
    pub fn total_fees(&self) -> Decimal {
        self.platform_fee.saturating_add(self.blockchain_fee)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn momo_tiers() -> Vec<FeeTier> {
        vec![
            FeeTier::flat(d("0"), Some(d("1000")), d("10")),
            FeeTier::percentage(d("1000.01"), None, d("1")),
        ]
    }

    #[test]
    fn test_resolve_fee_flat_tier() {
        let fee = resolve_fee(d("500"), &momo_tiers()).unwrap();
        assert_eq!(fee, d("10"));
        assert_eq!(d("500") + fee, d("510"));
    }

    #[test]
    fn test_resolve_fee_percentage_tier() {
        let fee = resolve_fee(d("5000"), &momo_tiers()).unwrap();
        assert_eq!(fee, d("50"));
        assert_eq!(d("5000") + fee, d("5050"));
    }

    #[test]
    fn test_resolve_fee_bounds_are_inclusive() {
        let tiers = momo_tiers();
        assert_eq!(resolve_fee(d("0"), &tiers).unwrap(), d("10"));
        assert_eq!(resolve_fee(d("1000"), &tiers).unwrap(), d("10"));
        assert_eq!(resolve_fee(d("1000.01"), &tiers).unwrap(), d("10.0001"));
    }

    #[test]
    fn test_resolve_fee_gap_falls_back_to_zero() {
        // 1000.005 sits between the two tiers
        assert_eq!(resolve_fee(d("1000.005"), &momo_tiers()).unwrap(), Decimal::ZERO);
        assert_eq!(resolve_fee(d("10"), &[]).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_resolve_fee_first_match_wins() {
        let tiers = vec![
            FeeTier::flat(d("0"), Some(d("100")), d("1")),
            FeeTier::flat(d("50"), Some(d("200")), d("2")),
        ];
        assert_eq!(resolve_fee(d("75"), &tiers).unwrap(), d("1"));
    }

    #[test]
    fn test_percentage_fee_within_amount() {
        // Contiguous tiers sorted by min_amount
        let tiers = vec![
            FeeTier::percentage(d("0"), Some(d("99.99")), d("2.5")),
            FeeTier::percentage(d("100"), Some(d("9999.99")), d("1")),
            FeeTier::percentage(d("10000"), None, d("100")),
        ];
        for amount in ["0.01", "1", "99.99", "100", "4321.09", "10000", "250000"] {
            let amount = d(amount);
            let fee = resolve_fee(amount, &tiers).unwrap();
            assert!(
                fee >= Decimal::ZERO && fee <= amount,
                "fee {} out of [0, {}]",
                fee,
                amount
            );
        }
    }

    #[test]
    fn test_flat_fee_is_fixed_value() {
        let tiers = vec![
            FeeTier::flat(d("0"), Some(d("99.99")), d("1.5")),
            FeeTier::flat(d("100"), None, d("7")),
        ];
        assert_eq!(resolve_fee(d("0.5"), &tiers).unwrap(), d("1.5"));
        assert_eq!(resolve_fee(d("99.99"), &tiers).unwrap(), d("1.5"));
        assert_eq!(resolve_fee(d("100"), &tiers).unwrap(), d("7"));
        assert_eq!(resolve_fee(d("1000000"), &tiers).unwrap(), d("7"));
    }

    #[test]
    fn test_schedule_sorts_and_accepts_gaps() {
        let schedule = FeeSchedule::new(vec![
            FeeTier::percentage(d("1000.01"), None, d("1")),
            FeeTier::flat(d("0"), Some(d("1000")), d("10")),
        ])
        .unwrap();
        assert_eq!(schedule.tiers()[0].min_amount, d("0"));
        assert_eq!(schedule.resolve(d("500")).unwrap(), d("10"));
    }

    #[test]
    fn test_schedule_rejects_overlap() {
        let err = FeeSchedule::new(vec![
            FeeTier::flat(d("0"), Some(d("1000")), d("10")),
            FeeTier::flat(d("1000"), None, d("20")),
        ])
        .unwrap_err();
        assert_eq!(err, FeeError::Overlap { at: d("1000") });

        let err = FeeSchedule::new(vec![
            FeeTier::flat(d("0"), None, d("10")),
            FeeTier::flat(d("5000"), None, d("20")),
        ])
        .unwrap_err();
        assert_eq!(err, FeeError::Overlap { at: d("5000") });
    }

    #[test]
    fn test_schedule_rejects_bad_tiers() {
        assert!(matches!(
            FeeSchedule::new(vec![FeeTier::flat(d("10"), Some(d("5")), d("1"))]),
            Err(FeeError::InvertedBounds { index: 0, .. })
        ));
        assert!(matches!(
            FeeSchedule::new(vec![FeeTier::flat(d("0"), None, d("-1"))]),
            Err(FeeError::NegativeValue { index: 0 })
        ));
        assert!(matches!(
            FeeSchedule::new(vec![FeeTier::percentage(d("0"), None, d("150"))]),
            Err(FeeError::PercentageTooLarge { index: 0, .. })
        ));
    }

    #[test]
    fn test_resolve_strict() {
        let schedule = FeeSchedule::new(momo_tiers()).unwrap();
        assert_eq!(schedule.resolve_strict(d("5000")), Ok(d("50")));
        assert_eq!(
            schedule.resolve_strict(d("1000.005")),
            Err(FeeError::NoMatchingTier(d("1000.005")))
        );
    }

    #[test]
    fn test_blockchain_fee_exact_match() {
        let fees = vec![
            BlockchainFee {
                crypto_type: "USDT".into(),
                network_type: "TRC20".into(),
                blockchain_fee: d("1.5"),
            },
            BlockchainFee {
                crypto_type: "USDT".into(),
                network_type: "ERC20".into(),
                blockchain_fee: d("8"),
            },
        ];
        assert_eq!(lookup_blockchain_fee(&fees, "USDT", "TRC20"), Some(d("1.5")));
        assert_eq!(lookup_blockchain_fee(&fees, "USDT", "ERC20"), Some(d("8")));
        assert_eq!(lookup_blockchain_fee(&fees, "USDT", "BEP20"), None);
        assert_eq!(lookup_blockchain_fee(&fees, "BTC", "TRC20"), None);
    }

    #[test]
    fn test_crypto_quote_example() {
        let platform = vec![FeeTier::percentage(d("0"), None, d("1"))];
        let platform_fee = resolve_fee(d("100"), &platform).unwrap();
        let quote = FeeQuote::new(d("100"), platform_fee, d("1.5")).unwrap();
        assert_eq!(quote.platform_fee, d("1"));
        assert_eq!(quote.total_fees(), d("2.5"));
        assert_eq!(quote.total_debit, d("102.5"));
    }

    #[test]
    fn test_huge_amount_overflows_instead_of_panicking() {
        let huge = d("79000000000000000000000000000");

        // 1% of the amount still fits, adding it back does not
        let one_percent = FeeTier::percentage(d("0"), None, d("1"));
        let fee = one_percent.fee_for(huge).unwrap();
        assert_eq!(fee, d("790000000000000000000000000"));
        assert_eq!(
            FeeQuote::new(huge, fee, d("1.5")),
            Err(FeeError::Overflow { amount: huge })
        );

        // The product itself overflows before dividing
        let schedule = FeeSchedule::new(vec![FeeTier::percentage(d("0"), None, d("2.5"))]).unwrap();
        assert_eq!(schedule.resolve(huge), Err(FeeError::Overflow { amount: huge }));
        assert_eq!(
            schedule.resolve_strict(huge),
            Err(FeeError::Overflow { amount: huge })
        );

        // Flat tiers never multiply
        let flat = FeeTier::flat(d("0"), None, d("10"));
        assert_eq!(flat.fee_for(huge), Ok(d("10")));
    }

    #[test]
    fn test_fee_free_quote() {
        let quote = FeeQuote::fee_free(Decimal::MAX);
        assert_eq!(quote.total_debit, Decimal::MAX);
        assert_eq!(quote.total_fees(), Decimal::ZERO);
    }

    #[test]
    fn test_tier_deserializes_php_payload() {
        // PHP serves numeric columns as strings and null for unbounded
        let json = r#"[
            {"min_amount": "0.00", "max_amount": "1000.00", "fee_type": "flat", "fee_value": "10.00"},
            {"min_amount": 1000.01, "max_amount": null, "fee_type": "percentage", "fee_value": 1}
        ]"#;
        let tiers: Vec<FeeTier> = serde_json::from_str(json).unwrap();
        assert_eq!(tiers[0].fee_type, FeeType::Flat);
        assert_eq!(tiers[0].max_amount, Some(d("1000")));
        assert_eq!(tiers[1].max_amount, None);
        assert_eq!(resolve_fee(d("5000"), &tiers).unwrap(), d("50"));
    }
}
