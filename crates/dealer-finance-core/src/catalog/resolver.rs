use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::types::Money;

/// One priced variant of a vehicle model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub company: String,
    pub model: String,
    pub variant: String,
    /// On-road price in whole rupees
    pub on_road_price: Money,
}

impl CatalogEntry {
    pub fn new(
        company: impl Into<String>,
        model: impl Into<String>,
        variant: impl Into<String>,
        on_road_price: Money,
    ) -> Self {
        Self {
            company: company.into(),
            model: model.into(),
            variant: variant.into(),
            on_road_price,
        }
    }

    /// Company, model and variant are all non-empty after trimming.
    pub fn is_complete(&self) -> bool {
        !self.company.trim().is_empty()
            && !self.model.trim().is_empty()
            && !self.variant.trim().is_empty()
    }

    fn matches(&self, company: &str, model: &str, variant: &str) -> bool {
        self.company == company && self.model == model && self.variant == variant
    }
}

/// Read-only, ordered list of catalog entries.
///
/// Key matching is exact and case-sensitive. Duplicate
/// (company, model, variant) keys are tolerated; lookups return the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CatalogEntry>", into = "Vec<CatalogEntry>")]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Build a catalog, silently dropping incomplete entries.
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self {
            entries: entries.into_iter().filter(|e| e.is_complete()).collect(),
        }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct companies, in first-seen order.
    pub fn companies(&self) -> Vec<String> {
        distinct(self.entries.iter().map(|e| e.company.as_str()))
    }

    /// Distinct models offered by `company`.
    pub fn models(&self, company: &str) -> Vec<String> {
        distinct(
            self.entries
                .iter()
                .filter(|e| e.company == company)
                .map(|e| e.model.as_str()),
        )
    }

    /// Distinct variants of `company` / `model`.
    pub fn variants(&self, company: &str, model: &str) -> Vec<String> {
        distinct(
            self.entries
                .iter()
                .filter(|e| e.company == company && e.model == model)
                .map(|e| e.variant.as_str()),
        )
    }

    /// First entry matching all three keys.
    pub fn find(&self, company: &str, model: &str, variant: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|e| e.matches(company, model, variant))
    }

    /// On-road price, or `None` when no entry matches.
    pub fn find_price(&self, company: &str, model: &str, variant: &str) -> Option<Money> {
        self.find(company, model, variant).map(|e| e.on_road_price)
    }

    /// On-road price, or zero when no entry matches.
    ///
    /// Zero doubles as "unknown"; use [`Catalog::find_price`] to tell the two apart.
    pub fn price_of(&self, company: &str, model: &str, variant: &str) -> Money {
        self.find_price(company, model, variant)
            .unwrap_or(Decimal::ZERO)
    }
}

impl From<Vec<CatalogEntry>> for Catalog {
    fn from(entries: Vec<CatalogEntry>) -> Self {
        Catalog::new(entries)
    }
}

impl From<Catalog> for Vec<CatalogEntry> {
    fn from(catalog: Catalog) -> Self {
        catalog.entries
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
