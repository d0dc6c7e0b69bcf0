use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::engine::{checked_quote_many, years, LoanQuoteResult};
use super::policy::{LoanPolicy, RatePolicy, RateSource};
use crate::error::DealerFinanceError;
use crate::format::format_inr;
use crate::types::*;
use crate::DealerFinanceResult;

/// Input for an EMI calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiInput {
    /// On-road price of the vehicle
    pub on_road_price: Money,
    /// Down payment; clamped to `[0, on_road_price]`
    pub down_payment: Money,
    /// Policy-derived rate by default
    #[serde(default)]
    pub rate: RateSource,
    /// Overrides the policy's tenure list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenures_months: Option<Vec<Months>>,
}

/// Figures for one tenure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenureQuote {
    pub tenure_months: Months,
    pub years: Years,
    pub financed_principal: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub monthly_installment: Money,
    /// Installment rounded to whole rupees, e.g. `₹5,490`
    pub monthly_installment_display: String,
}

impl TenureQuote {
    fn from_quote(tenure_months: Months, q: &LoanQuoteResult) -> Self {
        Self {
            tenure_months,
            years: years(tenure_months),
            financed_principal: q.financed_principal,
            total_interest: q.total_interest,
            total_payable: q.total_payable,
            monthly_installment: q.monthly_installment,
            monthly_installment_display: format_inr(q.monthly_installment),
        }
    }
}

/// Output of an EMI calculation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmiOutput {
    pub on_road_price: Money,
    /// Down payment after clamping
    pub down_payment: Money,
    pub down_payment_ratio: Rate,
    pub rate_source: RateSource,
    pub annual_flat_rate_pct: Percent,
    pub processing_fee: Money,
    pub financed_principal: Money,
    /// One entry per distinct tenure, shortest first
    pub schedules: Vec<TenureQuote>,
}

/// Quote flat-interest installments for every requested tenure.
pub fn calculate_emi(
    input: &EmiInput,
    policy: &LoanPolicy,
) -> DealerFinanceResult<ComputationOutput<EmiOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    policy.validate()?;

    if input.on_road_price < Decimal::ZERO {
        return Err(DealerFinanceError::InvalidInput {
            field: "on_road_price".into(),
            reason: "On-road price cannot be negative".into(),
        });
    }

    let tenures = input
        .tenures_months
        .as_deref()
        .unwrap_or(policy.tenures_months.as_slice());
    if tenures.is_empty() {
        return Err(DealerFinanceError::InvalidInput {
            field: "tenures_months".into(),
            reason: "At least one tenure is required".into(),
        });
    }

    if input.on_road_price.is_zero() {
        warnings.push(
            "On-road price is zero; down-payment ratio treated as 0 for rate selection.".into(),
        );
    }
    if input.down_payment < Decimal::ZERO {
        warnings.push("Down payment is negative; treated as 0.".into());
    } else if input.down_payment > input.on_road_price {
        warnings.push("Down payment exceeds on-road price; capped at the price.".into());
    }
    for months in tenures.iter().filter(|m| **m <= 0) {
        warnings.push(format!(
            "Tenure of {months} months is not positive; installment reported as 0."
        ));
    }

    let terms = policy.terms(&input.rate, input.on_road_price, input.down_payment)?;
    let quotes = checked_quote_many(&terms, tenures).ok_or_else(|| {
        DealerFinanceError::InvalidInput {
            field: "on_road_price".into(),
            reason: "Amounts are too large to quote".into(),
        }
    })?;

    let schedules: Vec<TenureQuote> = quotes
        .iter()
        .map(|(months, q)| TenureQuote::from_quote(*months, q))
        .collect();

    let output = EmiOutput {
        on_road_price: input.on_road_price,
        down_payment: terms.applied_down_payment(),
        down_payment_ratio: RatePolicy::down_payment_ratio(
            input.on_road_price,
            input.down_payment,
        ),
        rate_source: input.rate.clone(),
        annual_flat_rate_pct: terms.annual_flat_rate_pct,
        processing_fee: terms.processing_fee,
        financed_principal: terms.financed_principal(),
        schedules,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Flat-rate EMI (simple interest on financed principal for the full tenure)",
        &serde_json::json!({
            "processing_fee": policy.processing_fee.to_string(),
            "rate_policy": policy.rate_policy,
            "tenures_months": tenures,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn input(price: Money, down: Money) -> EmiInput {
        EmiInput {
            on_road_price: price,
            down_payment: down,
            rate: RateSource::Policy,
            tenures_months: None,
        }
    }

    #[test]
    fn test_default_tenures_with_policy_rate() {
        let out = calculate_emi(&input(dec!(120000), dec!(20000)), &LoanPolicy::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.annual_flat_rate_pct, dec!(11));
        assert_eq!(r.financed_principal, dec!(108000));
        let months: Vec<Months> = r.schedules.iter().map(|s| s.tenure_months).collect();
        assert_eq!(months, vec![18, 24, 30, 36]);
        let two_year = r.schedules.iter().find(|s| s.tenure_months == 24).unwrap();
        assert_eq!(two_year.monthly_installment, dec!(5490));
        assert_eq!(two_year.monthly_installment_display, "₹5,490");
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_manual_rate_overrides_policy() {
        let mut inp = input(dec!(120000), dec!(60000));
        inp.rate = RateSource::Manual {
            annual_flat_rate_pct: dec!(12),
        };
        inp.tenures_months = Some(vec![12]);
        let out = calculate_emi(&inp, &LoanPolicy::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.annual_flat_rate_pct, dec!(12));
        // (60000 + 8000) * 1.12 / 12
        assert_eq!(r.schedules[0].monthly_installment, dec!(76160) / dec!(12));
    }

    #[test]
    fn test_clamped_down_payment_warns() {
        let out = calculate_emi(&input(dec!(50000), dec!(60000)), &LoanPolicy::default()).unwrap();
        assert_eq!(out.result.down_payment, dec!(50000));
        assert_eq!(out.result.financed_principal, dec!(8000));
        assert_eq!(out.result.annual_flat_rate_pct, dec!(9));
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_negative_price_rejected() {
        let err = calculate_emi(&input(dec!(-1), dec!(0)), &LoanPolicy::default()).unwrap_err();
        match err {
            DealerFinanceError::InvalidInput { field, .. } => assert_eq!(field, "on_road_price"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_tenure_override_rejected() {
        let mut inp = input(dec!(100000), dec!(30000));
        inp.tenures_months = Some(vec![]);
        assert!(calculate_emi(&inp, &LoanPolicy::default()).is_err());
    }

    #[test]
    fn test_zero_tenure_override_warns_and_reports_zero() {
        let mut inp = input(dec!(100000), dec!(30000));
        inp.tenures_months = Some(vec![0, 18]);
        let out = calculate_emi(&inp, &LoanPolicy::default()).unwrap();
        assert_eq!(out.result.schedules[0].monthly_installment, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
    }

    #[test]
    fn test_input_deserializes_with_defaults() {
        let inp: EmiInput =
            serde_json::from_str(r#"{"on_road_price": 100000, "down_payment": "30000"}"#).unwrap();
        assert_eq!(inp.rate, RateSource::Policy);
        assert!(inp.tenures_months.is_none());
    }

    #[test]
    fn test_overflowing_amounts_rejected() {
        let mut inp = input(dec!(1000000000000000000000000), dec!(0));
        inp.tenures_months = Some(vec![1_000_000_000]);
        let err = calculate_emi(&inp, &LoanPolicy::default()).unwrap_err();
        match err {
            DealerFinanceError::InvalidInput { field, .. } => assert_eq!(field, "on_road_price"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }

        let max = input(Decimal::MAX, dec!(0));
        assert!(calculate_emi(&max, &LoanPolicy::default()).is_err());
    }
}
