//! HTML parser for Amazon product detail pages.

use crate::amazon::models::{ProductRecord, UNAVAILABLE};
use crate::amazon::regions::Region;
use crate::amazon::selectors::{errors, product, specs};
use anyhow::{Context, Result};
use regex_lite::Regex;
use scraper::{ElementRef, Html};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, trace};

static ASIN_IN_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(?:dp|gp/product)/([A-Z0-9]{10})").unwrap());

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?").unwrap());

/// Japanese rating prefix ("5つ星のうち4.3").
const RATING_PREFIX_JA: &str = "5つ星のうち";

/// Invisible direction marks Amazon puts around detail bullet labels.
const DIRECTION_MARKS: &[char] = &['\u{200e}', '\u{200f}'];

/// Parser for Amazon product pages.
pub struct Parser {
    region: Region,
}

impl Parser {
    /// Creates a new parser for the given region.
    pub fn new(region: Region) -> Self {
        Self { region }
    }

    /// Returns the region whose number conventions this parser uses.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Parses a product detail page into a [`ProductRecord`].
    ///
    /// Only a missing title is an error; every other field falls back to
    /// [`UNAVAILABLE`], `None` or empty.
    pub fn parse_product_page(&self, html: &str, url: &str) -> Result<ProductRecord> {
        let document = Html::parse_document(html);

        // Check for error pages first
        self.check_for_errors(&document)?;

        let title = document
            .select(&product::TITLE)
            .map(element_text)
            .find(|t| !t.is_empty())
            .context("Could not find product title")?;

        let (price, price_value) = self.parse_price(&document);
        let (rating, rating_value) = self.parse_rating(&document);
        let review_count = document
            .select(&product::REVIEW_COUNT)
            .next()
            .and_then(|e| parse_review_count(&element_text(e)));

        let asin = extract_asin(url)
            .or_else(|| {
                document
                    .select(&product::ASIN_INPUT)
                    .next()
                    .and_then(|e| e.value().attr("value"))
                    .map(|v| v.trim().to_string())
            })
            .unwrap_or_default();

        let image_url = document
            .select(&product::IMAGE)
            .next()
            .and_then(|e| e.value().attr("src").or_else(|| e.value().attr("data-old-hires")))
            .map(String::from)
            .unwrap_or_default();

        let specifications = self.parse_specifications(&document);

        let features: Vec<String> = document
            .select(&product::FEATURES)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();

        let categories: Vec<String> = document
            .select(&product::BREADCRUMBS)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();
        let category =
            if categories.is_empty() { UNAVAILABLE.to_string() } else { categories.join(" > ") };

        debug!(
            "Parsed product {} ({} specs, {} features, category: {})",
            asin,
            specifications.len(),
            features.len(),
            category
        );

        Ok(ProductRecord {
            title,
            price,
            price_value,
            brand: self.parse_brand(&document),
            asin,
            specifications,
            features,
            category,
            rating,
            rating_value,
            review_count,
            url: url.to_string(),
            image_url,
        })
    }

    /// Checks for CAPTCHA, error pages, or rate limiting.
    fn check_for_errors(&self, document: &Html) -> Result<()> {
        // Check for CAPTCHA
        if document.select(&errors::CAPTCHA).next().is_some() {
            anyhow::bail!(
                "CAPTCHA detected. Amazon is blocking requests. \
                Try using a proxy or waiting before retrying."
            );
        }

        // Check for dog page (503 error page)
        if document.select(&errors::DOG_PAGE).next().is_some() {
            anyhow::bail!(
                "Amazon error page detected (503). \
                The service may be temporarily unavailable."
            );
        }

        Ok(())
    }

    /// Returns the displayed price of the first selector with text.
    fn parse_price(&self, document: &Html) -> (String, Option<f64>) {
        for selector in product::PRICES.iter() {
            let Some(text) = document.select(selector).next().map(element_text) else {
                continue;
            };
            if text.is_empty() {
                continue;
            }
            let value = self.parse_price_value(&text);
            trace!("Price '{}' parsed as {:?}", text, value);
            return (text, value);
        }
        (UNAVAILABLE.to_string(), None)
    }

    /// Parses a price value from text, handling different regional formats.
    ///
    /// Ranges yield their first price. Negative or non-finite results are
    /// rejected.
    fn parse_price_value(&self, text: &str) -> Option<f64> {
        let cleaned: String = text
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',' || *c == '-')
            .collect();

        // Handle price ranges like "10-20" or "10 - 20"
        let first = cleaned.split('-').next()?;
        self.parse_single_price(first).filter(|v| v.is_finite() && *v >= 0.0)
    }

    /// Parses a single price number.
    fn parse_single_price(&self, text: &str) -> Option<f64> {
        let cleaned = text.trim().trim_end_matches(['.', ',']);
        if cleaned.is_empty() {
            return None;
        }

        // Determine decimal separator based on region
        let normalized = if self.region.uses_comma_decimal() {
            // EU format: 1.234,56 -> 1234.56
            cleaned.replace('.', "").replace(',', ".")
        } else {
            // US/JP format: 1,234.56 -> 1234.56
            cleaned.replace(',', "")
        };

        normalized.parse().ok()
    }

    /// Returns the rating text without the Japanese prefix, and its stars.
    fn parse_rating(&self, document: &Html) -> (String, Option<f64>) {
        let text = product::RATINGS
            .iter()
            .filter_map(|selector| document.select(selector).next().map(element_text))
            .find(|t| !t.is_empty());

        match text {
            Some(text) => {
                let rating = text.replace(RATING_PREFIX_JA, "").replace('★', "").trim().to_string();
                let stars = parse_stars(&rating);
                (rating, stars)
            }
            None => (String::new(), None),
        }
    }

    /// Extracts the brand from the byline, else the overview table.
    fn parse_brand(&self, document: &Html) -> String {
        document
            .select(&product::BYLINE)
            .next()
            .map(|e| clean_byline(&element_text(e)))
            .filter(|b| !b.is_empty())
            .or_else(|| {
                document
                    .select(&product::PO_BRAND)
                    .next()
                    .map(element_text)
                    .filter(|b| !b.is_empty())
            })
            .unwrap_or_else(|| UNAVAILABLE.to_string())
    }

    /// Merges the spec tables, detail bullets and key/value blocks.
    ///
    /// Later sources overwrite earlier ones on equal labels.
    fn parse_specifications(&self, document: &Html) -> BTreeMap<String, String> {
        let mut specifications = BTreeMap::new();

        for row in document.select(&specs::TABLE_ROW) {
            let label = first_text(row, &specs::TABLE_LABEL);
            let value = first_text(row, &specs::TABLE_VALUE);
            insert_spec(&mut specifications, &label, &value);
        }

        for bullet in document.select(&specs::DETAIL_BULLET) {
            let text = element_text(bullet);
            if let Some((label, value)) = text.split_once(':') {
                insert_spec(&mut specifications, label, value);
            }
        }

        for block in document.select(&specs::KEY_VALUE) {
            let label = first_text(block, &specs::KEY);
            let value = first_text(block, &specs::VALUE);
            insert_spec(&mut specifications, &label, &value);
        }

        specifications
    }
}

/// Extracts the ASIN from a `/dp/` or `/gp/product/` URL.
pub fn extract_asin(url: &str) -> Option<String> {
    ASIN_IN_URL.captures(url).and_then(|caps| caps.get(1)).map(|m| m.as_str().to_string())
}

/// Extracts star rating from text like "4.5 out of 5 stars" or "4,5 von 5".
fn parse_stars(text: &str) -> Option<f64> {
    let number = FIRST_NUMBER.find(text)?.as_str().replace(',', ".");
    number.parse::<f64>().ok().filter(|v| (0.0..=5.0).contains(v))
}

/// Extracts review count from text like "1,234 ratings" or "1.234 Bewertungen".
fn parse_review_count(text: &str) -> Option<u32> {
    let cleaned: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    cleaned.parse().ok()
}

fn clean_byline(text: &str) -> String {
    let mut brand = text.trim();
    for prefix in ["ブランド:", "Brand:", "Visit the "] {
        if brand.len() >= prefix.len() && brand.is_char_boundary(prefix.len()) {
            let (head, tail) = brand.split_at(prefix.len());
            if head.eq_ignore_ascii_case(prefix) {
                brand = tail.trim_start();
            }
        }
    }
    for suffix in ["のストアを表示", " Store"] {
        brand = brand.strip_suffix(suffix).unwrap_or(brand).trim_end();
    }
    brand.trim().to_string()
}

fn insert_spec(specifications: &mut BTreeMap<String, String>, label: &str, value: &str) {
    let label = label.trim_matches(|c: char| c.is_whitespace() || DIRECTION_MARKS.contains(&c));
    let value = value.trim_matches(|c: char| c.is_whitespace() || DIRECTION_MARKS.contains(&c));
    if !label.is_empty() && !value.is_empty() {
        specifications.insert(label.to_string(), value.to_string());
    }
}

fn first_text(element: ElementRef, selector: &scraper::Selector) -> String {
    element.select(selector).next().map(element_text).unwrap_or_default()
}

/// Element text with runs of whitespace collapsed to single spaces.
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().split_whitespace().collect::<Vec<_>>().join(" ")
}
