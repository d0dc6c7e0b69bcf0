use serde::{Deserialize, Serialize};

use super::resolver::Catalog;
use crate::types::Money;

/// How far down the company -> model -> variant cascade a selection got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStage {
    Unselected,
    CompanyChosen,
    ModelChosen,
    VariantChosen,
}

/// A user's in-progress vehicle choice.
///
/// Setters clear every downstream field when the value actually changes, so a
/// new company never keeps the previous company's model or variant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_company(&mut self, company: Option<String>) {
        let company = non_blank(company);
        if company != self.company {
            self.company = company;
            self.model = None;
            self.variant = None;
        }
    }

    pub fn set_model(&mut self, model: Option<String>) {
        let model = non_blank(model);
        if model != self.model {
            self.model = model;
            self.variant = None;
        }
    }

    pub fn set_variant(&mut self, variant: Option<String>) {
        self.variant = non_blank(variant);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Resolve against a catalog; see [`Catalog::select`].
    pub fn resolve(&self, catalog: &Catalog) -> ResolvedSelection {
        catalog.select(
            self.company.as_deref(),
            self.model.as_deref(),
            self.variant.as_deref(),
        )
    }
}

/// A selection checked against the catalog, with the option lists a form
/// needs at every level and the resolved price once a variant is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSelection {
    pub selection: Selection,
    pub stage: SelectionStage,
    pub companies: Vec<String>,
    pub models: Vec<String>,
    pub variants: Vec<String>,
    pub on_road_price: Option<Money>,
}

impl Catalog {
    /// Resolve a (possibly partial) company / model / variant choice.
    ///
    /// A level is kept only when its parent is kept and the value is one of
    /// the parent's options; otherwise it and everything below it is cleared.
    pub fn select(
        &self,
        company: Option<&str>,
        model: Option<&str>,
        variant: Option<&str>,
    ) -> ResolvedSelection {
        let companies = self.companies();
        let company = company.filter(|c| companies.iter().any(|o| o.as_str() == *c));

        let models = company.map(|c| self.models(c)).unwrap_or_default();
        let model = company
            .and(model)
            .filter(|m| models.iter().any(|o| o.as_str() == *m));

        let variants = match (company, model) {
            (Some(c), Some(m)) => self.variants(c, m),
            _ => Vec::new(),
        };
        let variant = model
            .and(variant)
            .filter(|v| variants.iter().any(|o| o.as_str() == *v));

        let on_road_price = match (company, model, variant) {
            (Some(c), Some(m), Some(v)) => self.find_price(c, m, v),
            _ => None,
        };

        let stage = match (company, model, variant) {
            (Some(_), Some(_), Some(_)) => SelectionStage::VariantChosen,
            (Some(_), Some(_), None) => SelectionStage::ModelChosen,
            (Some(_), None, _) => SelectionStage::CompanyChosen,
            (None, _, _) => SelectionStage::Unselected,
        };

        ResolvedSelection {
            selection: Selection {
                company: company.map(str::to_string),
                model: model.map(str::to_string),
                variant: variant.map(str::to_string),
            },
            stage,
            companies,
            models,
            variants,
            on_road_price,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use rust_decimal_macros::dec;

    fn sample() -> Catalog {
        Catalog::new(vec![
            CatalogEntry::new("Honda", "Shine", "Standard", dec!(85000)),
            CatalogEntry::new("Honda", "Shine", "Disc", dec!(89500)),
            CatalogEntry::new("Honda", "Activa", "STD", dec!(92000)),
            CatalogEntry::new("Hero", "Splendor", "Plus", dec!(78000)),
        ])
    }

    #[test]
    fn test_changing_company_resets_model_and_variant() {
        let mut sel = Selection::new();
        sel.set_company(Some("Honda".into()));
        sel.set_model(Some("Shine".into()));
        sel.set_variant(Some("Disc".into()));

        sel.set_company(Some("Hero".into()));
        assert_eq!(sel.model, None);
        assert_eq!(sel.variant, None);
    }

    #[test]
    fn test_same_company_keeps_downstream() {
        let mut sel = Selection::new();
        sel.set_company(Some("Honda".into()));
        sel.set_model(Some("Shine".into()));
        sel.set_company(Some("Honda".into()));
        assert_eq!(sel.model.as_deref(), Some("Shine"));
    }

    #[test]
    fn test_changing_model_resets_variant() {
        let mut sel = Selection::new();
        sel.set_company(Some("Honda".into()));
        sel.set_model(Some("Shine".into()));
        sel.set_variant(Some("Disc".into()));
        sel.set_model(Some("Activa".into()));
        assert_eq!(sel.variant, None);
        assert_eq!(sel.company.as_deref(), Some("Honda"));
    }

    #[test]
    fn test_full_selection_resolves_price() {
        let resolved = sample().select(Some("Honda"), Some("Shine"), Some("Disc"));
        assert_eq!(resolved.stage, SelectionStage::VariantChosen);
        assert_eq!(resolved.on_road_price, Some(dec!(89500)));
        assert_eq!(resolved.variants, vec!["Standard", "Disc"]);
    }

    #[test]
    fn test_model_from_other_company_is_cleared() {
        let resolved = sample().select(Some("Hero"), Some("Shine"), Some("Disc"));
        assert_eq!(resolved.stage, SelectionStage::CompanyChosen);
        assert_eq!(resolved.selection.model, None);
        assert_eq!(resolved.selection.variant, None);
        assert_eq!(resolved.models, vec!["Splendor"]);
        assert!(resolved.variants.is_empty());
        assert_eq!(resolved.on_road_price, None);
    }

    #[test]
    fn test_variant_without_model_is_ignored() {
        let resolved = sample().select(Some("Honda"), None, Some("Disc"));
        assert_eq!(resolved.stage, SelectionStage::CompanyChosen);
        assert_eq!(resolved.selection.variant, None);
    }

    #[test]
    fn test_unknown_company_is_unselected() {
        let resolved = sample().select(Some("Suzuki"), Some("Access"), None);
        assert_eq!(resolved.stage, SelectionStage::Unselected);
        assert_eq!(resolved.companies, vec!["Honda", "Hero"]);
        assert!(resolved.models.is_empty());
    }

    #[test]
    fn test_selection_resolve_round_trip() {
        let mut sel = Selection::new();
        sel.set_company(Some("Honda".into()));
        sel.set_model(Some("Activa".into()));
        let resolved = sel.resolve(&sample());
        assert_eq!(resolved.stage, SelectionStage::ModelChosen);
        assert_eq!(resolved.variants, vec!["STD"]);
    }
}
