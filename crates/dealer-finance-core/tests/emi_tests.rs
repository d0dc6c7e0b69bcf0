use dealer_finance_core::emi::{
    calculate_emi, quote, quote_many, EmiInput, FinancingTerms, LoanPolicy, RatePolicy,
    RateSource,
};
use dealer_finance_core::format::{format_inr, round_display};
use dealer_finance_core::{Money, Months};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const EPSILON: Decimal = dec!(0.000001);

fn terms(price: Money, down: Money, rate: Decimal) -> FinancingTerms {
    FinancingTerms {
        on_road_price: price,
        down_payment: down,
        processing_fee: dec!(8000),
        annual_flat_rate_pct: rate,
    }
}

// ===========================================================================
// Worked scenarios
// ===========================================================================

#[test]
fn test_scenario_two_years_high_rate() {
    let q = quote(&terms(dec!(120000), dec!(20000), dec!(11)), 24);
    assert_eq!(q.financed_principal, dec!(108000));
    // 108000 * 0.11 * 2
    assert_eq!(q.total_interest, dec!(23760));
    assert_eq!(q.total_payable, dec!(131760));
    assert_eq!(q.monthly_installment, dec!(5490));
}

#[test]
fn test_scenario_policy_rate_at_thirty_percent() {
    let policy = LoanPolicy::default();
    let rate = policy
        .resolve_rate(&RateSource::Policy, dec!(100000), dec!(30000))
        .unwrap();
    assert_eq!(rate, dec!(9));

    let q = quote(&terms(dec!(100000), dec!(30000), rate), 18);
    assert_eq!(q.financed_principal, dec!(78000));
    // 78000 * 0.09 * 1.5
    assert_eq!(q.total_interest, dec!(10530));
    assert_eq!(q.total_payable, dec!(88530));
    assert!((q.monthly_installment - dec!(4918.333333)).abs() < EPSILON);
    assert_eq!(round_display(q.monthly_installment), dec!(4918));
}

#[test]
fn test_scenario_down_payment_above_price() {
    let q = quote(&terms(dec!(50000), dec!(60000), dec!(9)), 24);
    assert_eq!(q.financed_principal, dec!(8000));
}

#[test]
fn test_scenario_zero_tenure() {
    let q = quote(&terms(dec!(120000), dec!(20000), dec!(11)), 0);
    assert_eq!(q.monthly_installment, Decimal::ZERO);
}

// ===========================================================================
// Properties
// ===========================================================================

fn sample_grid() -> Vec<(Money, Money, Decimal, Months)> {
    let mut grid = Vec::new();
    for price in [dec!(0), dec!(55000), dec!(99999), dec!(184500)] {
        for down in [dec!(-100), dec!(0), dec!(17500), dec!(60000), dec!(250000)] {
            for rate in [dec!(0), dec!(9), dec!(10.5), dec!(36)] {
                for months in [1, 7, 18, 24, 30, 36, 60] {
                    grid.push((price, down, rate, months));
                }
            }
        }
    }
    grid
}

#[test]
fn test_installments_times_tenure_equal_total() {
    for (price, down, rate, months) in sample_grid() {
        let q = quote(&terms(price, down, rate), months);
        let recomposed = q.monthly_installment * Decimal::from(months);
        assert!(
            (recomposed - q.total_payable).abs() < EPSILON,
            "price={price} down={down} rate={rate} months={months}"
        );
    }
}

#[test]
fn test_total_is_principal_plus_interest() {
    for (price, down, rate, months) in sample_grid() {
        let q = quote(&terms(price, down, rate), months);
        assert_eq!(q.total_payable, q.financed_principal + q.total_interest);
    }
}

#[test]
fn test_outputs_never_negative() {
    for (price, down, rate, months) in sample_grid() {
        let q = quote(&terms(price, down, rate), months);
        assert!(q.financed_principal >= Decimal::ZERO);
        assert!(q.total_interest >= Decimal::ZERO);
        assert!(q.monthly_installment >= Decimal::ZERO);
    }
}

#[test]
fn test_more_down_payment_never_costs_more() {
    let price = dec!(150000);
    let mut previous = quote(&terms(price, dec!(0), dec!(11)), 30);
    for step in 1..=20 {
        let down = Decimal::from(step * 10_000);
        let current = quote(&terms(price, down, dec!(11)), 30);
        assert!(current.financed_principal <= previous.financed_principal);
        assert!(current.total_interest <= previous.total_interest);
        assert!(current.monthly_installment <= previous.monthly_installment);
        previous = current;
    }
}

#[test]
fn test_quote_is_idempotent() {
    let t = terms(dec!(98765), dec!(12345), dec!(10.5));
    assert_eq!(quote(&t, 30), quote(&t, 30));
    assert_eq!(quote_many(&t, &[18, 24]), quote_many(&t, &[18, 24]));
}

#[test]
fn test_rate_policy_boundary_is_inclusive() {
    let policy = RatePolicy::default();
    assert_eq!(policy.rate_for_ratio(dec!(0.30)), dec!(9));
    assert_eq!(policy.rate_for_ratio(dec!(0.2999999999)), dec!(11));
    assert_eq!(policy.rate_for(dec!(85000), dec!(25500)), dec!(9));
    assert_eq!(policy.rate_for(dec!(85000), dec!(25499)), dec!(11));
}

#[test]
fn test_custom_policy_changes_rates_and_fee() {
    let policy = LoanPolicy {
        processing_fee: dec!(5000),
        tenures_months: vec![12, 24],
        rate_policy: RatePolicy::two_tier(dec!(0.25), dec!(8), dec!(12)),
        ..LoanPolicy::default()
    };
    let input = EmiInput {
        on_road_price: dec!(100000),
        down_payment: dec!(25000),
        rate: RateSource::Policy,
        tenures_months: None,
    };
    let out = calculate_emi(&input, &policy).unwrap();
    let r = &out.result;
    assert_eq!(r.annual_flat_rate_pct, dec!(8));
    assert_eq!(r.financed_principal, dec!(80000));
    assert_eq!(r.schedules.len(), 2);
    // 80000 * 1.08 / 12
    assert_eq!(r.schedules[0].monthly_installment, dec!(7200));
    assert_eq!(r.schedules[0].monthly_installment_display, format_inr(dec!(7200)));
}

#[test]
fn test_calculator_output_json_shape() {
    let input: EmiInput = serde_json::from_str(
        r#"{
            "on_road_price": "120000",
            "down_payment": "20000",
            "rate": {"source": "manual", "annual_flat_rate_pct": "11"},
            "tenures_months": [24]
        }"#,
    )
    .unwrap();
    let out = calculate_emi(&input, &LoanPolicy::default()).unwrap();
    let json = serde_json::to_value(&out).unwrap();
    assert_eq!(json["result"]["schedules"][0]["monthly_installment_display"], "₹5,490");
    assert_eq!(json["result"]["rate_source"]["source"], "manual");
    assert!(json["metadata"]["version"].is_string());
}
