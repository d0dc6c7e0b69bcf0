//! Printable price quotations: customer details, the chosen vehicle's
//! on-road price and, for loan purchases, the EMI grid across the dealer's
//! standard tenures.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::catalog::{Catalog, CatalogEntry};
use crate::contact::{is_valid_mobile, normalize_mobile};
use crate::emi::{checked_quote_many, LoanPolicy, RatePolicy, RateSource};
use crate::error::DealerFinanceError;
use crate::format::format_inr;
use crate::types::*;
use crate::DealerFinanceResult;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub mobile: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleChoice {
    pub company: String,
    pub model: String,
    pub variant: String,
}

/// How the customer intends to pay.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PaymentMode {
    #[default]
    Cash,
    Loan {
        down_payment: Money,
        #[serde(default)]
        rate: RateSource,
    },
}

/// Input for a quotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuotationInput {
    pub customer: CustomerDetails,
    pub vehicle: VehicleChoice,
    #[serde(default)]
    pub payment: PaymentMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentKind {
    Cash,
    Loan,
}

/// One cell of the EMI grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentLine {
    pub tenure_months: Months,
    pub monthly_installment: Money,
    pub display: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    /// Down payment after clamping to the on-road price
    pub down_payment: Money,
    pub down_payment_ratio: Rate,
    pub annual_flat_rate_pct: Percent,
    pub processing_fee: Money,
    pub financed_principal: Money,
    pub installments: Vec<InstallmentLine>,
}

/// A finished quotation, ready to print
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quotation {
    pub issued_on: NaiveDate,
    pub customer: CustomerDetails,
    pub vehicle: CatalogEntry,
    pub on_road_price_display: String,
    pub payment_mode: PaymentKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loan: Option<LoanSummary>,
}

/// Build a quotation for a catalog vehicle.
pub fn generate_quotation(
    input: &QuotationInput,
    catalog: &Catalog,
    policy: &LoanPolicy,
    issued_on: NaiveDate,
) -> DealerFinanceResult<ComputationOutput<Quotation>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let customer = validate_customer(&input.customer)?;

    let choice = &input.vehicle;
    let vehicle = catalog
        .find(&choice.company, &choice.model, &choice.variant)
        .cloned()
        .ok_or_else(|| DealerFinanceError::VehicleNotFound {
            company: choice.company.clone(),
            model: choice.model.clone(),
            variant: choice.variant.clone(),
        })?;

    if vehicle.on_road_price <= Decimal::ZERO {
        return Err(DealerFinanceError::InvalidInput {
            field: "vehicle".into(),
            reason: "Selected vehicle has no on-road price; select a priced variant first".into(),
        });
    }

    let loan = match &input.payment {
        PaymentMode::Cash => None,
        PaymentMode::Loan { down_payment, rate } => {
            policy.validate()?;
            if *down_payment > vehicle.on_road_price {
                warnings.push("Down payment exceeds on-road price; capped at the price.".into());
            } else if *down_payment < Decimal::ZERO {
                warnings.push("Down payment is negative; treated as 0.".into());
            }

            let terms = policy.terms(rate, vehicle.on_road_price, *down_payment)?;
            let installments = checked_quote_many(&terms, &policy.tenures_months)
                .ok_or_else(|| DealerFinanceError::InvalidInput {
                    field: "vehicle".into(),
                    reason: "Amounts are too large to quote".into(),
                })?
                .into_iter()
                .map(|(tenure_months, q)| InstallmentLine {
                    tenure_months,
                    monthly_installment: q.monthly_installment,
                    display: format_inr(q.monthly_installment),
                })
                .collect();

            Some(LoanSummary {
                down_payment: terms.applied_down_payment(),
                down_payment_ratio: RatePolicy::down_payment_ratio(
                    vehicle.on_road_price,
                    *down_payment,
                ),
                annual_flat_rate_pct: terms.annual_flat_rate_pct,
                processing_fee: terms.processing_fee,
                financed_principal: terms.financed_principal(),
                installments,
            })
        }
    };

    let output = Quotation {
        issued_on,
        customer,
        on_road_price_display: format_inr(vehicle.on_road_price),
        vehicle,
        payment_mode: if loan.is_some() {
            PaymentKind::Loan
        } else {
            PaymentKind::Cash
        },
        loan,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Vehicle quotation with flat-rate EMI grid",
        &serde_json::json!({
            "processing_fee": policy.processing_fee.to_string(),
            "tenures_months": policy.tenures_months,
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn validate_customer(customer: &CustomerDetails) -> DealerFinanceResult<CustomerDetails> {
    let name = customer.name.trim();
    if name.is_empty() {
        return Err(DealerFinanceError::InvalidInput {
            field: "customer.name".into(),
            reason: "Enter customer name".into(),
        });
    }

    let mobile = normalize_mobile(&customer.mobile);
    if !is_valid_mobile(&mobile) {
        return Err(DealerFinanceError::InvalidInput {
            field: "customer.mobile".into(),
            reason: "Enter a valid 10-digit Indian mobile number".into(),
        });
    }

    let address = customer.address.trim();
    if address.is_empty() {
        return Err(DealerFinanceError::InvalidInput {
            field: "customer.address".into(),
            reason: "Enter address".into(),
        });
    }

    Ok(CustomerDetails {
        name: name.to_string(),
        mobile,
        address: address.to_string(),
    })
}

/// Render a quotation as a plain-text slip for printing.
pub fn render_text(quotation: &Quotation) -> String {
    let v = &quotation.vehicle;
    let mut lines = vec![
        format!(
            "QUOTATION{:>40}",
            format!("Date: {}", quotation.issued_on.format("%d-%m-%Y"))
        ),
        "-".repeat(49),
        format!("Customer       : {}", quotation.customer.name),
        format!("Mobile         : {}", quotation.customer.mobile),
        format!("Address        : {}", quotation.customer.address),
        String::new(),
        format!("Vehicle        : {} {} ({})", v.company, v.model, v.variant),
        format!("On-road price  : {}", quotation.on_road_price_display),
    ];

    match &quotation.loan {
        None => lines.push("Payment mode   : CASH".to_string()),
        Some(loan) => {
            lines.push("Payment mode   : LOAN".to_string());
            lines.push(format!("Down payment   : {}", format_inr(loan.down_payment)));
            lines.push(format!(
                "Interest       : {}% p.a. flat",
                loan.annual_flat_rate_pct.normalize()
            ));
            lines.push(String::new());
            lines.push("Monthly EMI".to_string());
            for line in &loan.installments {
                lines.push(format!(
                    "  {:>3} months  {:>12}",
                    line.tenure_months, line.display
                ));
            }
        }
    }

    lines.join("\n")
}
