use chrono::Local;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use dealer_finance_core::emi::{LoanPolicy, RateSource};
use dealer_finance_core::quotation::{
    generate_quotation, render_text, CustomerDetails, PaymentMode, QuotationInput, VehicleChoice,
};

use crate::input;
use crate::input::catalog::load_catalog;

/// Arguments for a customer quotation
#[derive(Args)]
pub struct QuoteArgs {
    /// Catalog file (JSON array of rows or CSV)
    #[arg(long)]
    pub catalog: String,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Customer name
    #[arg(long)]
    pub name: Option<String>,

    /// Customer mobile number
    #[arg(long)]
    pub mobile: Option<String>,

    /// Customer address
    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub variant: Option<String>,

    /// Quote as a loan purchase instead of cash
    #[arg(long)]
    pub loan: bool,

    /// Down payment for a loan purchase
    #[arg(long, requires = "loan")]
    pub down_payment: Option<Decimal>,

    /// Manual annual flat rate in percent for a loan purchase
    #[arg(long, requires = "loan")]
    pub rate: Option<Decimal>,
}

pub fn run_quote(
    args: QuoteArgs,
    policy: &LoanPolicy,
    as_slip: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(&args.catalog)?;

    let request: Option<QuotationInput> = input::stdin::read_request(args.input.as_deref())?;
    let quotation_input = match request {
        Some(request) => request,
        None => QuotationInput {
            customer: CustomerDetails {
                name: args.name.ok_or("--name is required (or provide --input)")?,
                mobile: args.mobile.ok_or("--mobile is required (or provide --input)")?,
                address: args.address.ok_or("--address is required (or provide --input)")?,
            },
            vehicle: VehicleChoice {
                company: args.company.ok_or("--company is required (or provide --input)")?,
                model: args.model.ok_or("--model is required (or provide --input)")?,
                variant: args.variant.ok_or("--variant is required (or provide --input)")?,
            },
            payment: if args.loan {
                PaymentMode::Loan {
                    down_payment: args
                        .down_payment
                        .ok_or("--down-payment is required with --loan")?,
                    rate: args
                        .rate
                        .map(|annual_flat_rate_pct| RateSource::Manual {
                            annual_flat_rate_pct,
                        })
                        .unwrap_or_default(),
                }
            } else {
                PaymentMode::Cash
            },
        },
    };

    let issued_on = Local::now().date_naive();
    let result = generate_quotation(&quotation_input, &catalog, policy, issued_on)?;

    if as_slip {
        // Table output prints the slip itself rather than a field dump.
        return Ok(json!({ "slip": render_text(&result.result) }));
    }
    Ok(serde_json::to_value(result)?)
}
