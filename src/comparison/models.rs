//! Data models produced by the comparison engine.

use crate::advice::{Advice, TermExplanation};
use crate::amazon::models::ProductRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder shown for a specification that only one product lists.
pub const MISSING_VALUE: &str = "–";

/// A free-text specification value parsed into a canonical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedSpec {
    /// The text as it appeared on the product page
    pub raw_value: String,
    /// Value in `unit`, or `None` when no unit pattern matched
    pub normalized_value: Option<f64>,
    /// Canonical unit of the family, set even when the value is unknown
    pub unit: String,
}

/// Per-row verdict of which product is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Superiority {
    A,
    B,
    Equal,
    None,
}

/// Display arrow for a row verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Up,
    Down,
}

impl Icon {
    pub fn symbol(&self) -> &'static str {
        match self {
            Icon::Up => "▲",
            Icon::Down => "▼",
        }
    }
}

impl Superiority {
    /// Arrow from product A's point of view.
    pub fn icon(&self) -> Option<Icon> {
        match self {
            Superiority::A => Some(Icon::Up),
            Superiority::B => Some(Icon::Down),
            Superiority::Equal | Superiority::None => None,
        }
    }

    /// Short marker used in tabular output.
    pub fn marker(&self) -> &'static str {
        match self {
            Superiority::A => "A",
            Superiority::B => "B",
            Superiority::Equal => "=",
            Superiority::None => "",
        }
    }
}

impl fmt::Display for Superiority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Superiority::A => "a",
            Superiority::B => "b",
            Superiority::Equal => "equal",
            Superiority::None => "none",
        };
        write!(f, "{}", s)
    }
}

/// One row of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonItem {
    pub label: String,
    pub value_a: String,
    pub value_b: String,
    pub superiority: Superiority,
}

impl ComparisonItem {
    /// Creates a row that is never ranked (brand, identifiers, unrecognized specs).
    pub fn unranked(
        label: impl Into<String>,
        value_a: impl Into<String>,
        value_b: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            value_a: value_a.into(),
            value_b: value_b.into(),
            superiority: Superiority::None,
        }
    }
}

/// Short strengths/weaknesses summary for each product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commentary {
    pub for_a: String,
    pub for_b: String,
}

/// Full outcome of comparing two products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub product_a: ProductRecord,
    pub product_b: ProductRecord,
    pub comparison_items: Vec<ComparisonItem>,
    pub is_divergent: bool,
    pub commentary: Commentary,
    /// Recommendation from an external advisor, attached after the engine ran
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advice: Option<Advice>,
    /// Plain-language explanations of technical row labels
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub explanations: Vec<TermExplanation>,
}

impl ComparisonResult {
    /// Returns the row with the given label, if any.
    pub fn item(&self, label: &str) -> Option<&ComparisonItem> {
        self.comparison_items.iter().find(|item| item.label == label)
    }

    /// Attaches external advice to the result.
    pub fn with_advice(mut self, advice: Advice) -> Self {
        self.advice = Some(advice);
        self
    }

    pub fn with_explanations(mut self, explanations: Vec<TermExplanation>) -> Self {
        self.explanations = explanations;
        self
    }
}

/// Language of row labels and commentary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ja,
    En,
}

impl Locale {
    pub fn price_label(&self) -> &'static str {
        match self {
            Locale::Ja => "価格",
            Locale::En => "Price",
        }
    }

    pub fn brand_label(&self) -> &'static str {
        match self {
            Locale::Ja => "ブランド",
            Locale::En => "Brand",
        }
    }

    pub fn asin_label(&self) -> &'static str {
        "ASIN"
    }

    /// Separator between labels listed in commentary.
    pub fn list_separator(&self) -> &'static str {
        match self {
            Locale::Ja => "、",
            Locale::En => ", ",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ja" | "jp" | "japanese" => Ok(Locale::Ja),
            "en" | "english" => Ok(Locale::En),
            _ => Err(format!("Unknown locale: {}. Use: ja, en", s)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::Ja => write!(f, "ja"),
            Locale::En => write!(f, "en"),
        }
    }
}
