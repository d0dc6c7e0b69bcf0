use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Everything a flat-interest quote needs except the tenure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancingTerms {
    pub on_road_price: Money,
    pub down_payment: Money,
    /// Fixed fee added to the financed principal
    pub processing_fee: Money,
    /// Annual flat rate as a percentage (11 = 11% p.a.)
    pub annual_flat_rate_pct: Percent,
}

impl FinancingTerms {
    /// Down payment clamped to `[0, on_road_price]`.
    pub fn applied_down_payment(&self) -> Money {
        self.down_payment
            .max(Decimal::ZERO)
            .min(self.on_road_price.max(Decimal::ZERO))
    }

    /// On-road price less the applied down payment, plus the processing fee.
    /// Saturates at `Decimal::MAX`.
    pub fn financed_principal(&self) -> Money {
        self.checked_financed_principal().unwrap_or(Decimal::MAX)
    }

    /// As [`financed_principal`](Self::financed_principal), `None` on overflow.
    pub fn checked_financed_principal(&self) -> Option<Money> {
        let base = (self.on_road_price - self.applied_down_payment()).max(Decimal::ZERO);
        base.checked_add(self.processing_fee.max(Decimal::ZERO))
    }
}

/// A single-tenure quote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuoteRequest {
    pub on_road_price: Money,
    pub down_payment: Money,
    pub annual_flat_rate_pct: Percent,
    pub tenure_months: Months,
    pub processing_fee: Money,
}

impl LoanQuoteRequest {
    pub fn terms(&self) -> FinancingTerms {
        FinancingTerms {
            on_road_price: self.on_road_price,
            down_payment: self.down_payment,
            processing_fee: self.processing_fee,
            annual_flat_rate_pct: self.annual_flat_rate_pct,
        }
    }

    pub fn quote(&self) -> LoanQuoteResult {
        quote(&self.terms(), self.tenure_months)
    }
}

/// Unrounded loan figures for one tenure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuoteResult {
    pub financed_principal: Money,
    pub total_interest: Money,
    pub total_payable: Money,
    pub monthly_installment: Money,
}

/// Tenure expressed in (fractional) years: 18 months is 1.5 years.
pub fn years(tenure_months: Months) -> Years {
    Decimal::from(tenure_months) / MONTHS_PER_YEAR
}

/// Flat-interest quote: simple interest on the full financed principal for
/// the full tenure, repaid in equal monthly installments.
///
/// Total over its domain. Negative prices, fees and rates count as zero and a
/// tenure of zero or less yields no interest and a zero installment. Figures
/// too large for a `Decimal` saturate at `Decimal::MAX`; use
/// [`checked_quote`] to detect that. Nothing is rounded here.
pub fn quote(terms: &FinancingTerms, tenure_months: Months) -> LoanQuoteResult {
    checked_quote(terms, tenure_months).unwrap_or_else(|| saturated(terms, tenure_months))
}

/// As [`quote`], but `None` when any figure overflows.
pub fn checked_quote(terms: &FinancingTerms, tenure_months: Months) -> Option<LoanQuoteResult> {
    let financed_principal = terms.checked_financed_principal()?;

    if tenure_months <= 0 {
        return Some(LoanQuoteResult {
            financed_principal,
            total_interest: Decimal::ZERO,
            total_payable: financed_principal,
            monthly_installment: Decimal::ZERO,
        });
    }

    let annual_rate = terms.annual_flat_rate_pct.max(Decimal::ZERO) / PERCENT;
    let total_interest = financed_principal
        .checked_mul(annual_rate)?
        .checked_mul(years(tenure_months))?;
    let total_payable = financed_principal.checked_add(total_interest)?;
    let monthly_installment = total_payable.checked_div(Decimal::from(tenure_months))?;

    Some(LoanQuoteResult {
        financed_principal,
        total_interest,
        total_payable,
        monthly_installment,
    })
}

fn saturated(terms: &FinancingTerms, tenure_months: Months) -> LoanQuoteResult {
    let financed_principal = terms.financed_principal();
    if tenure_months <= 0 {
        return LoanQuoteResult {
            financed_principal,
            total_interest: Decimal::ZERO,
            total_payable: financed_principal,
            monthly_installment: Decimal::ZERO,
        };
    }
    LoanQuoteResult {
        financed_principal,
        total_interest: Decimal::MAX,
        total_payable: Decimal::MAX,
        monthly_installment: Decimal::MAX / Decimal::from(tenure_months),
    }
}

/// Quote the same terms across several tenures.
pub fn quote_many(
    terms: &FinancingTerms,
    tenures_months: &[Months],
) -> BTreeMap<Months, LoanQuoteResult> {
    tenures_months
        .iter()
        .map(|&months| (months, quote(terms, months)))
        .collect()
}

/// As [`quote_many`], but `None` when any tenure overflows.
pub fn checked_quote_many(
    terms: &FinancingTerms,
    tenures_months: &[Months],
) -> Option<BTreeMap<Months, LoanQuoteResult>> {
    tenures_months
        .iter()
        .map(|&months| checked_quote(terms, months).map(|q| (months, q)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(price: Money, down: Money, rate: Percent) -> FinancingTerms {
        FinancingTerms {
            on_road_price: price,
            down_payment: down,
            processing_fee: dec!(8000),
            annual_flat_rate_pct: rate,
        }
    }

    #[test]
    fn test_two_year_quote_at_eleven_percent() {
        let q = quote(&terms(dec!(120000), dec!(20000), dec!(11)), 24);
        assert_eq!(q.financed_principal, dec!(108000));
        assert_eq!(q.total_interest, dec!(23760));
        assert_eq!(q.total_payable, dec!(131760));
        assert_eq!(q.monthly_installment, dec!(5490));
    }

    #[test]
    fn test_eighteen_months_is_one_and_a_half_years() {
        assert_eq!(years(18), dec!(1.5));
        let q = quote(&terms(dec!(100000), dec!(30000), dec!(9)), 18);
        assert_eq!(q.financed_principal, dec!(78000));
        assert_eq!(q.total_interest, dec!(10530));
        assert_eq!(q.total_payable, dec!(88530));
        assert!((q.monthly_installment - dec!(4918.3333)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_down_payment_above_price_is_clamped() {
        let q = quote(&terms(dec!(50000), dec!(60000), dec!(11)), 24);
        assert_eq!(q.financed_principal, dec!(8000));
        assert_eq!(q, quote(&terms(dec!(50000), dec!(50000), dec!(11)), 24));
    }

    #[test]
    fn test_negative_down_payment_is_clamped_to_zero() {
        let q = quote(&terms(dec!(50000), dec!(-5000), dec!(11)), 24);
        assert_eq!(q.financed_principal, dec!(58000));
    }

    #[test]
    fn test_zero_tenure_yields_zero_installment() {
        let q = quote(&terms(dec!(120000), dec!(20000), dec!(11)), 0);
        assert_eq!(q.monthly_installment, Decimal::ZERO);
        assert_eq!(q.total_interest, Decimal::ZERO);
        assert_eq!(q.total_payable, q.financed_principal);
    }

    #[test]
    fn test_negative_tenure_yields_zero_installment() {
        let q = quote(&terms(dec!(120000), dec!(20000), dec!(11)), -6);
        assert_eq!(q.monthly_installment, Decimal::ZERO);
        assert_eq!(q.total_payable, dec!(108000));
    }

    #[test]
    fn test_zero_rate_spreads_principal() {
        let q = quote(&terms(dec!(68000), dec!(20000), dec!(0)), 24);
        assert_eq!(q.total_interest, Decimal::ZERO);
        assert_eq!(q.monthly_installment, dec!(56000) / dec!(24));
    }

    #[test]
    fn test_quote_many_keys_by_tenure() {
        let t = terms(dec!(120000), dec!(20000), dec!(11));
        let all = quote_many(&t, &[36, 18, 24, 30]);
        let keys: Vec<Months> = all.keys().copied().collect();
        assert_eq!(keys, vec![18, 24, 30, 36]);
        assert_eq!(all[&24], quote(&t, 24));
    }

    #[test]
    fn test_request_quote_matches_terms_quote() {
        let req = LoanQuoteRequest {
            on_road_price: dec!(120000),
            down_payment: dec!(20000),
            annual_flat_rate_pct: dec!(11),
            tenure_months: 24,
            processing_fee: dec!(8000),
        };
        assert_eq!(req.quote().monthly_installment, dec!(5490));
    }

    #[test]
    fn test_max_price_saturates_instead_of_panicking() {
        let t = terms(Decimal::MAX, Decimal::ZERO, dec!(11));
        assert_eq!(checked_quote(&t, 24), None);

        let q = quote(&t, 24);
        assert_eq!(q.financed_principal, Decimal::MAX);
        assert_eq!(q.total_payable, Decimal::MAX);
        assert_eq!(q.monthly_installment, Decimal::MAX / dec!(24));
    }

    #[test]
    fn test_huge_tenure_saturates() {
        let t = terms(dec!(1000000000000000000000000), Decimal::ZERO, dec!(11));
        assert_eq!(checked_quote_many(&t, &[18, 1_000_000_000]), None);
        assert!(checked_quote_many(&t, &[18]).is_some());

        let q = quote(&t, 1_000_000_000);
        assert_eq!(q.total_interest, Decimal::MAX);
        assert!(q.monthly_installment > Decimal::ZERO);
    }
}
