use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::engine::FinancingTerms;
use crate::error::DealerFinanceError;
use crate::types::*;
use crate::DealerFinanceResult;

pub const DEFAULT_PROCESSING_FEE: Money = dec!(8000);
pub const DEFAULT_TENURES_MONTHS: [Months; 4] = [18, 24, 30, 36];

/// A down payment of at least `min_down_payment_ratio` of the on-road price
/// earns `annual_flat_rate_pct`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTier {
    pub min_down_payment_ratio: Rate,
    pub annual_flat_rate_pct: Percent,
}

/// Maps the down-payment ratio to an annual flat rate.
///
/// The tier with the highest threshold not above the ratio wins. Thresholds
/// are inclusive: a ratio of exactly 0.30 qualifies for a 0.30 tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatePolicy {
    pub tiers: Vec<RateTier>,
}

impl Default for RatePolicy {
    /// 30% or more down: 9%. Anything less: 11%.
    fn default() -> Self {
        Self::two_tier(dec!(0.30), dec!(9), dec!(11))
    }
}

impl RatePolicy {
    pub fn two_tier(threshold: Rate, low_rate_pct: Percent, high_rate_pct: Percent) -> Self {
        Self {
            tiers: vec![
                RateTier {
                    min_down_payment_ratio: threshold,
                    annual_flat_rate_pct: low_rate_pct,
                },
                RateTier {
                    min_down_payment_ratio: Decimal::ZERO,
                    annual_flat_rate_pct: high_rate_pct,
                },
            ],
        }
    }

    /// `down_payment / on_road_price` with the down payment clamped to the
    /// price. A non-positive price gives a ratio of zero.
    pub fn down_payment_ratio(on_road_price: Money, down_payment: Money) -> Rate {
        if on_road_price <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        down_payment.max(Decimal::ZERO).min(on_road_price) / on_road_price
    }

    pub fn rate_for_ratio(&self, ratio: Rate) -> Percent {
        let qualifying = self
            .tiers
            .iter()
            .filter(|t| t.min_down_payment_ratio <= ratio)
            .max_by_key(|t| t.min_down_payment_ratio);

        // Below every threshold: fall back to the lowest tier.
        qualifying
            .or_else(|| self.tiers.iter().min_by_key(|t| t.min_down_payment_ratio))
            .map(|t| t.annual_flat_rate_pct)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn rate_for(&self, on_road_price: Money, down_payment: Money) -> Percent {
        self.rate_for_ratio(Self::down_payment_ratio(on_road_price, down_payment))
    }

    pub fn validate(&self) -> DealerFinanceResult<()> {
        if self.tiers.is_empty() {
            return Err(DealerFinanceError::InvalidPolicy(
                "rate policy needs at least one tier".into(),
            ));
        }
        for tier in &self.tiers {
            if tier.min_down_payment_ratio < Decimal::ZERO
                || tier.min_down_payment_ratio > Decimal::ONE
            {
                return Err(DealerFinanceError::InvalidPolicy(format!(
                    "tier threshold {} is outside [0, 1]",
                    tier.min_down_payment_ratio
                )));
            }
            if tier.annual_flat_rate_pct < Decimal::ZERO {
                return Err(DealerFinanceError::InvalidPolicy(format!(
                    "tier rate {}% is negative",
                    tier.annual_flat_rate_pct
                )));
            }
        }
        Ok(())
    }
}

/// Limits on a rate typed in by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateBounds {
    pub min_pct: Percent,
    pub max_pct: Percent,
    /// Input granularity for form controls; not enforced on values
    pub step_pct: Percent,
}

impl Default for RateBounds {
    fn default() -> Self {
        Self {
            min_pct: dec!(0),
            max_pct: dec!(36),
            step_pct: dec!(0.1),
        }
    }
}

impl RateBounds {
    pub fn contains(&self, rate_pct: Percent) -> bool {
        rate_pct >= self.min_pct && rate_pct <= self.max_pct
    }
}

/// Where the annual rate of a quote comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum RateSource {
    /// Derived from the down-payment ratio via [`RatePolicy`]
    #[default]
    Policy,
    /// Entered by the user, checked against [`RateBounds`]
    Manual { annual_flat_rate_pct: Percent },
}

/// Dealer loan configuration shared by the calculator, booking and quotation
/// flows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanPolicy {
    pub processing_fee: Money,
    pub tenures_months: Vec<Months>,
    pub rate_policy: RatePolicy,
    pub manual_rate_bounds: RateBounds,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            processing_fee: DEFAULT_PROCESSING_FEE,
            tenures_months: DEFAULT_TENURES_MONTHS.to_vec(),
            rate_policy: RatePolicy::default(),
            manual_rate_bounds: RateBounds::default(),
        }
    }
}

impl LoanPolicy {
    pub fn validate(&self) -> DealerFinanceResult<()> {
        if self.processing_fee < Decimal::ZERO {
            return Err(DealerFinanceError::InvalidPolicy(
                "processing fee cannot be negative".into(),
            ));
        }
        if self.tenures_months.is_empty() {
            return Err(DealerFinanceError::InvalidPolicy(
                "at least one tenure is required".into(),
            ));
        }
        if let Some(bad) = self.tenures_months.iter().find(|m| **m <= 0) {
            return Err(DealerFinanceError::InvalidPolicy(format!(
                "tenure of {bad} months must be positive"
            )));
        }
        let bounds = &self.manual_rate_bounds;
        if bounds.min_pct < Decimal::ZERO || bounds.min_pct > bounds.max_pct {
            return Err(DealerFinanceError::InvalidPolicy(format!(
                "manual rate bounds [{}, {}] are invalid",
                bounds.min_pct, bounds.max_pct
            )));
        }
        if bounds.step_pct <= Decimal::ZERO {
            return Err(DealerFinanceError::InvalidPolicy(
                "manual rate step must be positive".into(),
            ));
        }
        self.rate_policy.validate()
    }

    /// Resolve the annual rate for a price / down payment pair.
    pub fn resolve_rate(
        &self,
        source: &RateSource,
        on_road_price: Money,
        down_payment: Money,
    ) -> DealerFinanceResult<Percent> {
        let rate = match source {
            RateSource::Policy => self.rate_policy.rate_for(on_road_price, down_payment),
            RateSource::Manual {
                annual_flat_rate_pct,
            } => {
                if !self.manual_rate_bounds.contains(*annual_flat_rate_pct) {
                    return Err(DealerFinanceError::InvalidInput {
                        field: "annual_flat_rate_pct".into(),
                        reason: format!(
                            "Rate must be between {}% and {}%",
                            self.manual_rate_bounds.min_pct, self.manual_rate_bounds.max_pct
                        ),
                    });
                }
                *annual_flat_rate_pct
            }
        };
        tracing::debug!(?source, %rate, "annual flat rate resolved");
        Ok(rate)
    }

    /// Financing terms with this policy's fee and the resolved rate.
    pub fn terms(
        &self,
        source: &RateSource,
        on_road_price: Money,
        down_payment: Money,
    ) -> DealerFinanceResult<FinancingTerms> {
        Ok(FinancingTerms {
            on_road_price,
            down_payment,
            processing_fee: self.processing_fee,
            annual_flat_rate_pct: self.resolve_rate(source, on_road_price, down_payment)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_percent_down_gets_low_rate() {
        let policy = RatePolicy::default();
        assert_eq!(policy.rate_for(dec!(100000), dec!(30000)), dec!(9));
    }

    #[test]
    fn test_just_under_thirty_percent_gets_high_rate() {
        let policy = RatePolicy::default();
        assert_eq!(policy.rate_for(dec!(100000), dec!(29999)), dec!(11));
        assert_eq!(policy.rate_for_ratio(dec!(0.2999999)), dec!(11));
    }

    #[test]
    fn test_zero_price_uses_zero_ratio() {
        assert_eq!(RatePolicy::down_payment_ratio(Decimal::ZERO, dec!(5000)), Decimal::ZERO);
        assert_eq!(RatePolicy::default().rate_for(Decimal::ZERO, dec!(5000)), dec!(11));
    }

    #[test]
    fn test_ratio_clamps_down_payment() {
        assert_eq!(RatePolicy::down_payment_ratio(dec!(50000), dec!(60000)), Decimal::ONE);
        assert_eq!(RatePolicy::down_payment_ratio(dec!(50000), dec!(-10)), Decimal::ZERO);
    }

    #[test]
    fn test_three_tier_policy() {
        let policy = RatePolicy {
            tiers: vec![
                RateTier {
                    min_down_payment_ratio: dec!(0.5),
                    annual_flat_rate_pct: dec!(7.5),
                },
                RateTier {
                    min_down_payment_ratio: dec!(0.3),
                    annual_flat_rate_pct: dec!(9),
                },
                RateTier {
                    min_down_payment_ratio: dec!(0.1),
                    annual_flat_rate_pct: dec!(11),
                },
            ],
        };
        assert_eq!(policy.rate_for_ratio(dec!(0.6)), dec!(7.5));
        assert_eq!(policy.rate_for_ratio(dec!(0.35)), dec!(9));
        assert_eq!(policy.rate_for_ratio(dec!(0.1)), dec!(11));
        // Below every threshold falls back to the lowest tier
        assert_eq!(policy.rate_for_ratio(dec!(0.05)), dec!(11));
    }

    #[test]
    fn test_manual_rate_within_bounds() {
        let policy = LoanPolicy::default();
        let source = RateSource::Manual {
            annual_flat_rate_pct: dec!(12.5),
        };
        assert_eq!(
            policy.resolve_rate(&source, dec!(100000), dec!(0)).unwrap(),
            dec!(12.5)
        );
    }

    #[test]
    fn test_manual_rate_above_cap_rejected() {
        let policy = LoanPolicy::default();
        let source = RateSource::Manual {
            annual_flat_rate_pct: dec!(36.1),
        };
        let err = policy.resolve_rate(&source, dec!(100000), dec!(0)).unwrap_err();
        match err {
            DealerFinanceError::InvalidInput { field, .. } => {
                assert_eq!(field, "annual_flat_rate_pct")
            }
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_default_policy_is_valid() {
        assert!(LoanPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_policy_rejects_non_positive_tenure() {
        let policy = LoanPolicy {
            tenures_months: vec![12, 0],
            ..LoanPolicy::default()
        };
        assert!(matches!(
            policy.validate(),
            Err(DealerFinanceError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn test_policy_rejects_threshold_above_one() {
        let policy = LoanPolicy {
            rate_policy: RatePolicy::two_tier(dec!(1.5), dec!(9), dec!(11)),
            ..LoanPolicy::default()
        };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn test_partial_policy_json_fills_defaults() {
        let policy: LoanPolicy = serde_json::from_str(r#"{"processing_fee": "6500"}"#).unwrap();
        assert_eq!(policy.processing_fee, dec!(6500));
        assert_eq!(policy.tenures_months, vec![18, 24, 30, 36]);
        assert_eq!(policy.rate_policy, RatePolicy::default());
    }

    #[test]
    fn test_rate_source_tagged_json() {
        let manual: RateSource =
            serde_json::from_str(r#"{"source": "manual", "annual_flat_rate_pct": 10}"#).unwrap();
        assert_eq!(
            manual,
            RateSource::Manual {
                annual_flat_rate_pct: dec!(10)
            }
        );
        let policy: RateSource = serde_json::from_str(r#"{"source": "policy"}"#).unwrap();
        assert_eq!(policy, RateSource::Policy);
    }
}
