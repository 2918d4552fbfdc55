//! Heuristic check for products from different genres.
//!
//! Best-effort only: false positives and negatives are expected. A result of
//! `true` means the engine stops ranking specifications and compares price
//! alone.

use crate::amazon::models::{is_unavailable, ProductRecord};
use std::collections::HashSet;
use tracing::debug;

/// Minimum number of shared title words for two products to count as the same genre.
const MIN_SHARED_TITLE_WORDS: usize = 2;

/// Shared title words must be longer than this many characters.
const MIN_WORD_CHARS: usize = 2;

/// Returns true when the two products look like different genres.
pub fn is_divergent(product_a: &ProductRecord, product_b: &ProductRecord) -> bool {
    let category_a = product_a.category.to_lowercase();
    let category_b = product_b.category.to_lowercase();

    // Without a breadcrumb there is nothing to judge
    if is_unavailable(&category_a) || is_unavailable(&category_b) {
        debug!("Category unavailable, assuming comparable products");
        return false;
    }

    let top_a = top_level_category(&category_a);
    let top_b = top_level_category(&category_b);
    if top_a != top_b {
        debug!("Top-level categories differ: '{}' vs '{}'", top_a, top_b);
        return true;
    }

    let shared = shared_title_words(&product_a.title, &product_b.title);
    debug!("{} shared title words", shared);
    shared < MIN_SHARED_TITLE_WORDS
}

/// First segment of a ">"-delimited breadcrumb, trimmed.
fn top_level_category(category: &str) -> &str {
    category.split('>').next().unwrap_or_default().trim()
}

/// Counts distinct lower-cased words longer than two characters found in both titles.
fn shared_title_words(title_a: &str, title_b: &str) -> usize {
    let title_a = title_a.to_lowercase();
    let title_b = title_b.to_lowercase();

    let words_a: HashSet<&str> = title_a.split_whitespace().collect();
    let words_b: HashSet<&str> = title_b.split_whitespace().collect();

    words_a
        .intersection(&words_b)
        .filter(|word| word.chars().count() > MIN_WORD_CHARS)
        .count()
}
