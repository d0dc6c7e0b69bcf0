use serde::{Deserialize, Serialize};
use std::fs;

use dealer_finance_core::booking::BookingPolicy;
use dealer_finance_core::emi::LoanPolicy;

use crate::input::file::resolve_path;

/// Dealer settings read from `--policy`.
///
/// Loan fields sit at the top level; booking rules live under `booking`.
/// Anything left out keeps its default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(flatten)]
    pub loan: LoanPolicy,
    #[serde(default)]
    pub booking: BookingPolicy,
}

/// Load settings from a YAML or JSON file, or fall back to defaults.
pub fn load(path: Option<&str>) -> Result<Settings, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Settings::default());
    };

    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read '{}': {}", canonical.display(), e))?;
    // YAML is a superset of JSON, so one parser covers both.
    let settings: Settings = serde_yaml::from_str(&contents)
        .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?;

    settings.loan.validate()?;
    tracing::debug!(path = %canonical.display(), "policy loaded");
    Ok(settings)
}
