use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resolver::{Catalog, CatalogEntry};
use crate::format::parse_amount;

// Header aliases seen in dealer price sheets, compared case-insensitively.
// The first alias with a non-blank cell wins.
const COMPANY_KEYS: &[&str] = &["company name", "company"];
const MODEL_KEYS: &[&str] = &["model name", "model"];
const VARIANT_KEYS: &[&str] = &["variant", "variant name"];
const PRICE_KEYS: &[&str] = &["on-road price", "on road price", "on_road_price", "price"];

/// Row counts from one ingestion pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub total_rows: usize,
    pub accepted: usize,
    pub dropped: usize,
}

/// Normalize loosely-typed rows into a catalog.
pub fn ingest(rows: &[Value]) -> Catalog {
    ingest_with_summary(rows).0
}

/// Normalize rows and report how many were kept.
pub fn ingest_with_summary(rows: &[Value]) -> (Catalog, IngestSummary) {
    let entries: Vec<CatalogEntry> = rows
        .iter()
        .filter_map(|row| row.as_object().and_then(normalize_row))
        .collect();

    let summary = IngestSummary {
        total_rows: rows.len(),
        accepted: entries.len(),
        dropped: rows.len() - entries.len(),
    };

    tracing::debug!(
        total_rows = summary.total_rows,
        accepted = summary.accepted,
        dropped = summary.dropped,
        "catalog ingested"
    );
    if summary.dropped > 0 {
        tracing::warn!(
            dropped = summary.dropped,
            "catalog rows without company, model or variant were skipped"
        );
    }

    (Catalog::new(entries), summary)
}

/// Extract one entry from a row, or `None` when company, model or variant
/// is blank.
pub fn normalize_row(row: &Map<String, Value>) -> Option<CatalogEntry> {
    let company = lookup(row, COMPANY_KEYS);
    let model = lookup(row, MODEL_KEYS);
    let variant = lookup(row, VARIANT_KEYS);

    if company.is_empty() || model.is_empty() || variant.is_empty() {
        tracing::trace!(?row, "dropping incomplete catalog row");
        return None;
    }

    let on_road_price = parse_amount(&lookup(row, PRICE_KEYS));

    Some(CatalogEntry {
        company,
        model,
        variant,
        on_road_price,
    })
}

impl Catalog {
    /// See [`ingest`].
    pub fn ingest(rows: &[Value]) -> Self {
        ingest(rows)
    }
}

fn lookup(row: &Map<String, Value>, aliases: &[&str]) -> String {
    aliases
        .iter()
        .filter_map(|alias| {
            row.iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(alias))
                .map(|(_, value)| cell_text(value))
        })
        .find(|text| !text.is_empty())
        .unwrap_or_default()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}
