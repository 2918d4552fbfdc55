//! Local comparison engine: turns two product records into a ranked table.
//!
//! Everything in this module is pure and synchronous. The same two records
//! always produce the same rows in the same order with the same verdicts.

pub mod commentary;
pub mod divergence;
pub mod family;
pub mod models;
pub mod normalize;
pub mod numeric;

pub use commentary::generate_commentary;
pub use divergence::is_divergent;
pub use family::SpecFamily;
pub use models::{
    Commentary, ComparisonItem, ComparisonResult, Locale, NormalizedSpec, Superiority,
    MISSING_VALUE,
};
pub use numeric::compare_values;

use crate::amazon::models::ProductRecord;
use std::collections::BTreeSet;
use tracing::{debug, trace};

/// Builds comparison tables with labels and commentary in one locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonEngine {
    locale: Locale,
}

impl ComparisonEngine {
    /// Creates an engine for the given locale.
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    /// Returns the configured locale.
    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Compares two products.
    ///
    /// Row order: price, then (unless the products diverge) brand, ASIN and
    /// every specification label found on either side, A's labels first.
    pub fn compare(
        &self,
        product_a: &ProductRecord,
        product_b: &ProductRecord,
    ) -> ComparisonResult {
        let divergent = is_divergent(product_a, product_b);
        debug!(
            "Comparing '{}' with '{}' (divergent: {})",
            product_a.title, product_b.title, divergent
        );

        let mut items = vec![self.price_row(product_a, product_b)];

        if !divergent {
            items.push(ComparisonItem::unranked(
                self.locale.brand_label(),
                &product_a.brand,
                &product_b.brand,
            ));
            items.push(ComparisonItem::unranked(
                self.locale.asin_label(),
                &product_a.asin,
                &product_b.asin,
            ));

            for label in specification_labels(product_a, product_b) {
                let value_a = product_a.specification(label).unwrap_or(MISSING_VALUE);
                let value_b = product_b.specification(label).unwrap_or(MISSING_VALUE);
                items.push(compare_specification(label, value_a, value_b));
            }
        }

        let commentary = generate_commentary(&items, divergent, self.locale);

        ComparisonResult {
            product_a: product_a.clone(),
            product_b: product_b.clone(),
            comparison_items: items,
            is_divergent: divergent,
            commentary,
            advice: None,
            explanations: Vec::new(),
        }
    }

    fn price_row(&self, product_a: &ProductRecord, product_b: &ProductRecord) -> ComparisonItem {
        ComparisonItem {
            label: self.locale.price_label().to_string(),
            value_a: product_a.price.clone(),
            value_b: product_b.price.clone(),
            // cheaper is better
            superiority: compare_values(product_a.price_value, product_b.price_value, false),
        }
    }
}

/// Compares two products with Japanese labels and commentary.
pub fn compare_products(product_a: &ProductRecord, product_b: &ProductRecord) -> ComparisonResult {
    ComparisonEngine::default().compare(product_a, product_b)
}

/// Builds one specification row, ranking it when the label names a known family.
pub fn compare_specification(label: &str, value_a: &str, value_b: &str) -> ComparisonItem {
    let superiority = match SpecFamily::classify(label) {
        Some(family) => {
            let a = family.normalize(value_a);
            let b = family.normalize(value_b);
            trace!(
                "{} -> {}: {:?} vs {:?} {}",
                label,
                family,
                a.normalized_value,
                b.normalized_value,
                a.unit
            );
            compare_values(a.normalized_value, b.normalized_value, family.higher_is_better())
        }
        None => {
            trace!("{} -> unrecognized", label);
            Superiority::None
        }
    };

    ComparisonItem {
        label: label.to_string(),
        value_a: value_a.to_string(),
        value_b: value_b.to_string(),
        superiority,
    }
}

/// Union of both products' specification labels: A's in order, then B's new ones.
fn specification_labels<'a>(
    product_a: &'a ProductRecord,
    product_b: &'a ProductRecord,
) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    product_a
        .specifications
        .keys()
        .chain(product_b.specifications.keys())
        .map(String::as_str)
        .filter(|label| seen.insert(*label))
        .collect()
}
