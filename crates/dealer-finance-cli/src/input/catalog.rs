use serde_json::{Map, Value};
use std::path::Path;

use dealer_finance_core::catalog::{ingest_with_summary, Catalog};

use super::file::{read_text, resolve_path};

/// Load a catalog from a JSON array of rows or a CSV export with a header
/// row. The format follows the file extension; anything that is not `.csv`
/// is read as JSON.
pub fn load_catalog(path: &str) -> Result<Catalog, Box<dyn std::error::Error>> {
    let canonical = resolve_path(path)?;
    let contents = read_text(&canonical)?;

    let rows = if is_csv(&canonical) {
        csv_rows(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    } else {
        json_rows(&contents)
            .map_err(|e| format!("Failed to parse '{}': {}", canonical.display(), e))?
    };

    let (catalog, summary) = ingest_with_summary(&rows);
    tracing::debug!(
        path = %canonical.display(),
        accepted = summary.accepted,
        dropped = summary.dropped,
        "catalog file loaded"
    );
    Ok(catalog)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"))
}

fn json_rows(contents: &str) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    match serde_json::from_str::<Value>(contents)? {
        Value::Array(rows) => Ok(rows),
        _ => Err("expected a JSON array of catalog rows".into()),
    }
}

/// Every CSV cell becomes a JSON string keyed by its header.
fn csv_rows(contents: &str) -> Result<Vec<Value>, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.to_string(), Value::String(cell.to_string())))
            .collect();
        rows.push(Value::Object(row));
    }
    Ok(rows)
}
