//! Product record scraped from a product detail page.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Value written for fields that could not be found on the page.
pub const UNAVAILABLE: &str = "取得不可";

/// Returns true for the "unavailable" sentinel, in Japanese or English.
pub fn is_unavailable(value: &str) -> bool {
    let value = value.trim();
    value == UNAVAILABLE || value.eq_ignore_ascii_case("unavailable")
}

/// A product as extracted from its detail page.
///
/// JSON uses camelCase field names, so records produced by other scrapers
/// (`priceValue`, `reviewCount`, ...) load unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    /// Product title
    pub title: String,
    /// Price as displayed, including currency symbol
    #[serde(default)]
    pub price: String,
    /// Parsed numeric price without currency, `None` when unparseable
    #[serde(default)]
    pub price_value: Option<f64>,
    /// Brand or manufacturer
    #[serde(default)]
    pub brand: String,
    /// Amazon Standard Identification Number
    #[serde(default)]
    pub asin: String,
    /// Specification label to raw value; labels are not standardized
    #[serde(default)]
    pub specifications: BTreeMap<String, String>,
    /// Feature bullet points, in page order
    #[serde(default)]
    pub features: Vec<String>,
    /// ">"-delimited breadcrumb path, or [`UNAVAILABLE`]
    #[serde(default)]
    pub category: String,
    /// Free-text rating as displayed
    #[serde(default)]
    pub rating: String,
    /// Star rating (0.0 - 5.0)
    #[serde(default)]
    pub rating_value: Option<f64>,
    /// Number of customer reviews
    #[serde(default)]
    pub review_count: Option<u32>,
    /// Product page URL
    #[serde(default)]
    pub url: String,
    /// Main product image URL
    #[serde(default)]
    pub image_url: String,
}

impl ProductRecord {
    /// Creates a record with only a title; every other field is unavailable.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            price: UNAVAILABLE.to_string(),
            brand: UNAVAILABLE.to_string(),
            category: UNAVAILABLE.to_string(),
            ..Self::default()
        }
    }

    /// Returns a specification value, treating empty text as absent.
    pub fn specification(&self, label: &str) -> Option<&str> {
        self.specifications.get(label).map(String::as_str).filter(|v| !v.trim().is_empty())
    }
}
