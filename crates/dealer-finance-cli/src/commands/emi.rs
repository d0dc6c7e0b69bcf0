use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use dealer_finance_core::emi::{calculate_emi, EmiInput, LoanPolicy, RateSource};

use crate::input;

/// Arguments for an EMI quote
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EmiArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// On-road price
    #[arg(long, alias = "on-road-price")]
    pub price: Option<Decimal>,

    /// Down payment
    #[arg(long, alias = "dp")]
    pub down_payment: Option<Decimal>,

    /// Annual flat rate in percent; the policy rate is used when omitted
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Tenure in months; repeat for several (defaults to the policy tenures)
    #[arg(long = "tenure")]
    pub tenures: Vec<i32>,
}

pub fn run_emi(args: EmiArgs, policy: &LoanPolicy) -> Result<Value, Box<dyn std::error::Error>> {
    let emi_input: EmiInput = match input::stdin::read_request(args.input.as_deref())? {
        Some(request) => request,
        None => EmiInput {
            on_road_price: args.price.ok_or("--price is required (or provide --input)")?,
            down_payment: args
                .down_payment
                .ok_or("--down-payment is required (or provide --input)")?,
            rate: match args.rate {
                Some(annual_flat_rate_pct) => RateSource::Manual {
                    annual_flat_rate_pct,
                },
                None => RateSource::Policy,
            },
            tenures_months: if args.tenures.is_empty() {
                None
            } else {
                Some(args.tenures)
            },
        },
    };

    let result = calculate_emi(&emi_input, policy)?;
    Ok(serde_json::to_value(result)?)
}
