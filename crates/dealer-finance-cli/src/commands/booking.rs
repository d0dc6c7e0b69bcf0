use clap::Args;
use serde_json::Value;

use dealer_finance_core::booking::{validate_booking, BookingPolicy, BookingRequest};

use crate::input;

/// Arguments for booking validation
#[derive(Args)]
pub struct BookingArgs {
    /// Path to JSON booking request (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_booking(
    args: BookingArgs,
    policy: &BookingPolicy,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: BookingRequest = input::stdin::read_request(args.input.as_deref())?
        .ok_or("--input file is required for booking validation")?;

    let result = validate_booking(&request, policy)?;
    Ok(serde_json::to_value(result)?)
}
