use clap::Args;
use serde_json::{json, Value};

use crate::input::catalog::load_catalog;

/// Arguments for listing companies
#[derive(Args)]
pub struct CompaniesArgs {
    /// Catalog file (JSON array of rows or CSV)
    #[arg(long)]
    pub catalog: String,
}

/// Arguments for listing models
#[derive(Args)]
pub struct ModelsArgs {
    /// Catalog file (JSON array of rows or CSV)
    #[arg(long)]
    pub catalog: String,

    #[arg(long)]
    pub company: String,
}

/// Arguments for listing variants
#[derive(Args)]
pub struct VariantsArgs {
    /// Catalog file (JSON array of rows or CSV)
    #[arg(long)]
    pub catalog: String,

    #[arg(long)]
    pub company: String,

    #[arg(long)]
    pub model: String,
}

/// Arguments for a price lookup
#[derive(Args)]
pub struct PriceArgs {
    /// Catalog file (JSON array of rows or CSV)
    #[arg(long)]
    pub catalog: String,

    #[arg(long)]
    pub company: String,

    #[arg(long)]
    pub model: String,

    #[arg(long)]
    pub variant: String,
}

/// Arguments for resolving a partial selection
#[derive(Args)]
pub struct SelectArgs {
    /// Catalog file (JSON array of rows or CSV)
    #[arg(long)]
    pub catalog: String,

    #[arg(long)]
    pub company: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub variant: Option<String>,
}

pub fn run_companies(args: CompaniesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(&args.catalog)?;
    Ok(json!({ "companies": catalog.companies() }))
}

pub fn run_models(args: ModelsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(&args.catalog)?;
    Ok(json!({
        "company": args.company,
        "models": catalog.models(&args.company),
    }))
}

pub fn run_variants(args: VariantsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(&args.catalog)?;
    Ok(json!({
        "company": args.company,
        "model": args.model,
        "variants": catalog.variants(&args.company, &args.model),
    }))
}

pub fn run_price(args: PriceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(&args.catalog)?;
    let found = catalog.find_price(&args.company, &args.model, &args.variant);
    let price = found.unwrap_or_default();
    Ok(json!({
        "on_road_price": price,
        "on_road_price_display": dealer_finance_core::format::format_inr(price),
        "found": found.is_some(),
        "company": args.company,
        "model": args.model,
        "variant": args.variant,
    }))
}

pub fn run_select(args: SelectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = load_catalog(&args.catalog)?;
    let resolved = catalog.select(
        args.company.as_deref(),
        args.model.as_deref(),
        args.variant.as_deref(),
    );
    Ok(serde_json::to_value(resolved)?)
}
