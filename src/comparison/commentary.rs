//! Deterministic strengths/weaknesses summary for each product.
//!
//! This is the local fallback; an external advisor may add a richer
//! recommendation on top of it.

use crate::comparison::models::{Commentary, ComparisonItem, Locale, Superiority};

/// At most this many strength labels are listed per product.
const MAX_STRENGTHS: usize = 3;

/// At most this many weakness labels are listed per product.
const MAX_WEAKNESSES: usize = 2;

/// Builds the commentary for both products from the comparison rows.
///
/// Divergent products are judged on the price row alone. Otherwise every
/// row won by one side is a strength for the winner and a weakness for the
/// other; `equal` and `none` rows are ignored.
pub fn generate_commentary(
    items: &[ComparisonItem],
    is_divergent: bool,
    locale: Locale,
) -> Commentary {
    if is_divergent {
        return price_only_commentary(items, locale);
    }

    let mut a_strengths = Vec::new();
    let mut b_strengths = Vec::new();

    for item in items {
        match item.superiority {
            Superiority::A => a_strengths.push(item.label.as_str()),
            Superiority::B => b_strengths.push(item.label.as_str()),
            Superiority::Equal | Superiority::None => {}
        }
    }

    // One side's strengths are exactly the other side's weaknesses
    Commentary {
        for_a: summarize(&a_strengths, &b_strengths, locale),
        for_b: summarize(&b_strengths, &a_strengths, locale),
    }
}

fn price_only_commentary(items: &[ComparisonItem], locale: Locale) -> Commentary {
    let price = items.iter().find(|item| item.label == locale.price_label());

    let (advantage, higher, comparable) = match locale {
        Locale::Ja => (
            "価格面で優位性があります（ジャンル乖離のため価格比較のみ）",
            "価格が高めです（ジャンル乖離のため価格比較のみ）",
            "価格は同等です（ジャンル乖離のため価格比較のみ）",
        ),
        Locale::En => (
            "Price advantage (different genres, price compared only)",
            "Higher price (different genres, price compared only)",
            "Comparable price (different genres, price compared only)",
        ),
    };

    let (for_a, for_b) = match price.map(|item| item.superiority) {
        Some(Superiority::A) => (advantage, higher),
        Some(Superiority::B) => (higher, advantage),
        _ => (comparable, comparable),
    };

    Commentary { for_a: for_a.to_string(), for_b: for_b.to_string() }
}

fn summarize(strengths: &[&str], weaknesses: &[&str], locale: Locale) -> String {
    let separator = locale.list_separator();
    let mut parts = Vec::new();

    if !strengths.is_empty() {
        let top = join_first(strengths, MAX_STRENGTHS, separator);
        parts.push(match locale {
            Locale::Ja => format!("{}の面が強く", top),
            Locale::En => format!("Strong in {}", top),
        });
    }

    if !weaknesses.is_empty() {
        let top = join_first(weaknesses, MAX_WEAKNESSES, separator);
        parts.push(match locale {
            Locale::Ja => format!("{}の面が弱い", top),
            Locale::En => format!("Weak in {}", top),
        });
    }

    if parts.is_empty() {
        return match locale {
            Locale::Ja => "特筆すべき差はありません".to_string(),
            Locale::En => "No notable difference".to_string(),
        };
    }

    match locale {
        Locale::Ja => parts.join("、"),
        Locale::En => parts.join("; "),
    }
}

fn join_first(labels: &[&str], limit: usize, separator: &str) -> String {
    labels.iter().take(limit).copied().collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, superiority: Superiority) -> ComparisonItem {
        ComparisonItem {
            label: label.to_string(),
            value_a: "x".to_string(),
            value_b: "y".to_string(),
            superiority,
        }
    }

    #[test]
    fn test_divergent_price_advantage_a() {
        let items = vec![row("価格", Superiority::A)];
        let commentary = generate_commentary(&items, true, Locale::Ja);
        assert_eq!(commentary.for_a, "価格面で優位性があります（ジャンル乖離のため価格比較のみ）");
        assert_eq!(commentary.for_b, "価格が高めです（ジャンル乖離のため価格比較のみ）");
    }

    #[test]
    fn test_divergent_price_advantage_b() {
        let items = vec![row("価格", Superiority::B)];
        let commentary = generate_commentary(&items, true, Locale::Ja);
        assert!(commentary.for_a.starts_with("価格が高め"));
        assert!(commentary.for_b.starts_with("価格面で優位性"));
    }

    #[test]
    fn test_divergent_comparable_price() {
        for superiority in [Superiority::Equal, Superiority::None] {
            let items = vec![row("価格", superiority)];
            let commentary = generate_commentary(&items, true, Locale::Ja);
            assert_eq!(commentary.for_a, commentary.for_b);
            assert!(commentary.for_a.starts_with("価格は同等"));
        }
    }

    #[test]
    fn test_divergent_ignores_other_rows() {
        let items = vec![row("Price", Superiority::Equal), row("Weight", Superiority::A)];
        let commentary = generate_commentary(&items, true, Locale::En);
        assert!(commentary.for_a.starts_with("Comparable price"));
    }

    #[test]
    fn test_strengths_and_weaknesses() {
        let items = vec![
            row("価格", Superiority::A),
            row("ブランド", Superiority::None),
            row("重量", Superiority::B),
            row("容量", Superiority::Equal),
        ];
        let commentary = generate_commentary(&items, false, Locale::Ja);
        assert_eq!(commentary.for_a, "価格の面が強く、重量の面が弱い");
        assert_eq!(commentary.for_b, "重量の面が強く、価格の面が弱い");
    }

    #[test]
    fn test_limits_listed_labels() {
        let items = vec![
            row("Price", Superiority::A),
            row("Weight", Superiority::A),
            row("Size", Superiority::A),
            row("Capacity", Superiority::A),
        ];
        let commentary = generate_commentary(&items, false, Locale::En);
        assert_eq!(commentary.for_a, "Strong in Price, Weight, Size");
        assert_eq!(commentary.for_b, "Weak in Price, Weight");
    }

    #[test]
    fn test_no_notable_difference() {
        let items = vec![row("価格", Superiority::Equal), row("ASIN", Superiority::None)];
        let commentary = generate_commentary(&items, false, Locale::Ja);
        assert_eq!(commentary.for_a, "特筆すべき差はありません");
        assert_eq!(commentary.for_b, "特筆すべき差はありません");

        let commentary = generate_commentary(&[], false, Locale::En);
        assert_eq!(commentary.for_a, "No notable difference");
    }
}
