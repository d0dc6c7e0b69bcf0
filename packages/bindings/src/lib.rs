use napi::Result as NapiResult;
use napi_derive::napi;
use serde::de::DeserializeOwned;
use serde_json::Value;

use dealer_finance_core::booking::BookingPolicy;
use dealer_finance_core::catalog::{ingest, Catalog};
use dealer_finance_core::emi::LoanPolicy;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Catalogs cross the boundary as JSON arrays of rows, either raw sheet rows
/// or the normalized entries `ingest_catalog` returns.
fn parse_catalog(catalog_json: &str) -> NapiResult<Catalog> {
    let rows: Vec<Value> = serde_json::from_str(catalog_json).map_err(to_napi_error)?;
    Ok(ingest(&rows))
}

/// Optional policy JSON; absent or empty means defaults.
fn parse_policy<T: DeserializeOwned + Default>(policy_json: Option<String>) -> NapiResult<T> {
    match policy_json.as_deref().map(str::trim) {
        None | Some("") => Ok(T::default()),
        Some(json) => serde_json::from_str(json).map_err(to_napi_error),
    }
}

fn to_json(value: &impl serde::Serialize) -> NapiResult<String> {
    serde_json::to_string(value).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[napi]
pub fn ingest_catalog(rows_json: String) -> NapiResult<String> {
    let rows: Vec<Value> = serde_json::from_str(&rows_json).map_err(to_napi_error)?;
    let (catalog, summary) = dealer_finance_core::catalog::ingest_with_summary(&rows);
    to_json(&serde_json::json!({
        "entries": catalog,
        "summary": summary,
    }))
}

#[napi]
pub fn list_companies(catalog_json: String) -> NapiResult<Vec<String>> {
    Ok(parse_catalog(&catalog_json)?.companies())
}

#[napi]
pub fn list_models(catalog_json: String, company: String) -> NapiResult<Vec<String>> {
    Ok(parse_catalog(&catalog_json)?.models(&company))
}

#[napi]
pub fn list_variants(
    catalog_json: String,
    company: String,
    model: String,
) -> NapiResult<Vec<String>> {
    Ok(parse_catalog(&catalog_json)?.variants(&company, &model))
}

/// On-road price as a decimal string; `"0"` when the variant is unknown.
#[napi]
pub fn price_of(
    catalog_json: String,
    company: String,
    model: String,
    variant: String,
) -> NapiResult<String> {
    let catalog = parse_catalog(&catalog_json)?;
    Ok(catalog.price_of(&company, &model, &variant).to_string())
}

#[napi]
pub fn select_vehicle(
    catalog_json: String,
    company: Option<String>,
    model: Option<String>,
    variant: Option<String>,
) -> NapiResult<String> {
    let catalog = parse_catalog(&catalog_json)?;
    let resolved = catalog.select(company.as_deref(), model.as_deref(), variant.as_deref());
    to_json(&resolved)
}

// ---------------------------------------------------------------------------
// EMI
// ---------------------------------------------------------------------------

#[napi]
pub fn calculate_emi(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: dealer_finance_core::emi::EmiInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy: LoanPolicy = parse_policy(policy_json)?;
    let output =
        dealer_finance_core::emi::calculate_emi(&input, &policy).map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Quotation & booking
// ---------------------------------------------------------------------------

/// `issued_on` is an ISO date (`YYYY-MM-DD`); today when omitted.
#[napi]
pub fn generate_quotation(
    input_json: String,
    catalog_json: String,
    policy_json: Option<String>,
    issued_on: Option<String>,
) -> NapiResult<String> {
    let input: dealer_finance_core::quotation::QuotationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let catalog = parse_catalog(&catalog_json)?;
    let policy: LoanPolicy = parse_policy(policy_json)?;
    let issued_on = match issued_on {
        Some(date) => date
            .parse::<chrono::NaiveDate>()
            .map_err(to_napi_error)?,
        None => chrono::Local::now().date_naive(),
    };
    let output =
        dealer_finance_core::quotation::generate_quotation(&input, &catalog, &policy, issued_on)
            .map_err(to_napi_error)?;
    to_json(&output)
}

#[napi]
pub fn validate_booking(input_json: String, policy_json: Option<String>) -> NapiResult<String> {
    let input: dealer_finance_core::booking::BookingRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let policy: BookingPolicy = parse_policy(policy_json)?;
    let output =
        dealer_finance_core::booking::validate_booking(&input, &policy).map_err(to_napi_error)?;
    to_json(&output)
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

/// Format a decimal string as whole rupees with en-IN grouping.
#[napi]
pub fn format_inr(amount: String) -> NapiResult<String> {
    let amount: rust_decimal::Decimal = amount.trim().parse().map_err(to_napi_error)?;
    Ok(dealer_finance_core::format::format_inr(amount))
}
