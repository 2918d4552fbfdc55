//! Output formatting for comparisons and products (table, JSON, markdown, CSV).

use crate::amazon::models::ProductRecord;
use crate::comparison::models::{ComparisonItem, ComparisonResult};
use crate::config::OutputFormat;
use unicode_width::UnicodeWidthStr;

/// Maximum width of a value column in table output.
const VALUE_WIDTH: usize = 32;

/// Formats comparison results and product records for output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a full comparison result.
    pub fn format_comparison(&self, result: &ComparisonResult) -> String {
        match self.format {
            OutputFormat::Json => self.json(result),
            OutputFormat::Table => self.table_comparison(result),
            OutputFormat::Markdown => self.markdown_comparison(result),
            OutputFormat::Csv => self.csv_comparison(&result.comparison_items),
        }
    }

    /// Formats a single product record.
    pub fn format_product(&self, product: &ProductRecord) -> String {
        match self.format {
            OutputFormat::Json => self.json(product),
            OutputFormat::Table => self.table_product(product),
            OutputFormat::Markdown => self.markdown_product(product),
            OutputFormat::Csv => self.csv_product(product),
        }
    }

    // JSON formatting

    fn json<T: serde::Serialize>(&self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    // Table formatting

    fn table_comparison(&self, result: &ComparisonResult) -> String {
        let mut lines = Vec::new();

        lines.push(format!("A: {}", result.product_a.title));
        lines.push(format!("B: {}", result.product_b.title));
        if result.is_divergent {
            lines.push("Different product genres: only the price is compared.".to_string());
        }
        lines.push(String::new());

        let label_width = result
            .comparison_items
            .iter()
            .map(|item| display_width(&item.label))
            .max()
            .unwrap_or(0)
            .max(4);
        let a_width = column_width(&result.comparison_items, |item| item.value_a.as_str());
        let b_width = column_width(&result.comparison_items, |item| item.value_b.as_str());

        lines.push(format!(
            "{}  {}  {}  Winner",
            pad("Item", label_width),
            pad("A", a_width),
            pad("B", b_width)
        ));
        lines.push(format!(
            "{}  {}  {}  {}",
            "-".repeat(label_width),
            "-".repeat(a_width),
            "-".repeat(b_width),
            "-".repeat(6)
        ));

        for item in &result.comparison_items {
            let verdict = match item.superiority.icon() {
                Some(icon) => format!("{} {}", item.superiority.marker(), icon.symbol()),
                None => item.superiority.marker().to_string(),
            };
            let line = format!(
                "{}  {}  {}  {}",
                pad(&item.label, label_width),
                pad(&truncate(&item.value_a, VALUE_WIDTH), a_width),
                pad(&truncate(&item.value_b, VALUE_WIDTH), b_width),
                verdict
            );
            lines.push(line.trim_end().to_string());
        }

        lines.push(String::new());
        lines.push("Commentary:".to_string());
        lines.push(format!("  A: {}", result.commentary.for_a));
        lines.push(format!("  B: {}", result.commentary.for_b));

        if !result.explanations.is_empty() {
            lines.push(String::new());
            lines.push("Terms:".to_string());
            for explanation in &result.explanations {
                lines.push(format!("  {}: {}", explanation.term, explanation.explanation));
            }
        }

        if let Some(advice) = &result.advice {
            lines.push(String::new());
            lines.push(format!("Advice (winner: {}):", advice.winner));
            lines.push(format!("  {}", advice.reason));
            if !advice.tips.is_empty() {
                lines.push(format!("  {}", advice.tips));
            }
        }

        lines.join("\n")
    }

    fn table_product(&self, product: &ProductRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Title:    {}", product.title));
        lines.push(format!("ASIN:     {}", or_na(&product.asin)));
        lines.push(format!("URL:      {}", or_na(&product.url)));
        lines.push(format!("Price:    {}", or_na(&product.price)));
        lines.push(format!("Brand:    {}", or_na(&product.brand)));
        lines.push(format!("Category: {}", or_na(&product.category)));

        let rating = match (product.rating_value, product.review_count) {
            (Some(stars), Some(count)) => format!("{:.1}/5 ({} reviews)", stars, count),
            (Some(stars), None) => format!("{:.1}/5", stars),
            _ => or_na(&product.rating).to_string(),
        };
        lines.push(format!("Rating:   {}", rating));

        if !product.specifications.is_empty() {
            lines.push(String::new());
            lines.push("Specifications:".to_string());
            let width =
                product.specifications.keys().map(|k| display_width(k)).max().unwrap_or(0);
            for (label, value) in &product.specifications {
                lines.push(format!("  {}  {}", pad(label, width), value));
            }
        }

        if !product.features.is_empty() {
            lines.push(String::new());
            lines.push("Features:".to_string());
            for feature in &product.features {
                lines.push(format!("  - {}", feature));
            }
        }

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_comparison(&self, result: &ComparisonResult) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "## {} vs {}",
            markdown_escape(&result.product_a.title),
            markdown_escape(&result.product_b.title)
        ));
        lines.push(String::new());

        if result.is_divergent {
            lines.push("> Different product genres: only the price is compared.".to_string());
            lines.push(String::new());
        }

        lines.push("| Item | A | B | Winner |".to_string());
        lines.push("|------|---|---|--------|".to_string());
        for item in &result.comparison_items {
            lines.push(format!(
                "| {} | {} | {} | {} |",
                markdown_escape(&item.label),
                markdown_escape(&item.value_a),
                markdown_escape(&item.value_b),
                item.superiority.marker()
            ));
        }

        lines.push(String::new());
        lines.push("### Commentary".to_string());
        lines.push(String::new());
        lines.push(format!("- **A:** {}", result.commentary.for_a));
        lines.push(format!("- **B:** {}", result.commentary.for_b));

        if !result.explanations.is_empty() {
            lines.push(String::new());
            lines.push("### Terms".to_string());
            lines.push(String::new());
            for explanation in &result.explanations {
                lines.push(format!(
                    "- **{}:** {}",
                    markdown_escape(&explanation.term),
                    explanation.explanation
                ));
            }
        }

        if let Some(advice) = &result.advice {
            lines.push(String::new());
            lines.push("### Advice".to_string());
            lines.push(String::new());
            lines.push(format!("- **Winner:** {}", advice.winner));
            lines.push(format!("- **Reason:** {}", advice.reason));
            if !advice.tips.is_empty() {
                lines.push(format!("- **Tips:** {}", advice.tips));
            }
        }

        lines.join("\n")
    }

    fn markdown_product(&self, product: &ProductRecord) -> String {
        let mut lines = Vec::new();

        lines.push(format!("## {}", product.title));
        lines.push(String::new());

        if !product.asin.is_empty() {
            lines.push(format!("- **ASIN:** {}", product.asin));
        }
        if !product.url.is_empty() {
            lines.push(format!("- **URL:** [View on Amazon]({})", product.url));
        }
        lines.push(format!("- **Price:** {}", product.price));
        lines.push(format!("- **Brand:** {}", product.brand));
        lines.push(format!("- **Category:** {}", product.category));
        if let Some(stars) = product.rating_value {
            lines.push(format!(
                "- **Rating:** {:.1}/5 ({} reviews)",
                stars,
                product.review_count.unwrap_or(0)
            ));
        }

        if !product.specifications.is_empty() {
            lines.push(String::new());
            lines.push("| Specification | Value |".to_string());
            lines.push("|---------------|-------|".to_string());
            for (label, value) in &product.specifications {
                lines.push(format!("| {} | {} |", markdown_escape(label), markdown_escape(value)));
            }
        }

        if !product.features.is_empty() {
            lines.push(String::new());
            for feature in &product.features {
                lines.push(format!("- {}", feature));
            }
        }

        lines.join("\n")
    }

    // CSV formatting

    fn csv_comparison(&self, items: &[ComparisonItem]) -> String {
        let mut lines = vec!["label,value_a,value_b,superiority".to_string()];

        for item in items {
            lines.push(format!(
                "{},{},{},{}",
                Self::csv_escape(&item.label),
                Self::csv_escape(&item.value_a),
                Self::csv_escape(&item.value_b),
                item.superiority
            ));
        }

        lines.join("\n")
    }

    fn csv_product(&self, product: &ProductRecord) -> String {
        let mut rows: Vec<(String, String)> = vec![
            ("title".to_string(), product.title.clone()),
            ("asin".to_string(), product.asin.clone()),
            ("price".to_string(), product.price.clone()),
            (
                "price_value".to_string(),
                product.price_value.map(|v| v.to_string()).unwrap_or_default(),
            ),
            ("brand".to_string(), product.brand.clone()),
            ("category".to_string(), product.category.clone()),
            (
                "rating".to_string(),
                product.rating_value.map(|v| v.to_string()).unwrap_or_default(),
            ),
            (
                "reviews".to_string(),
                product.review_count.map(|v| v.to_string()).unwrap_or_default(),
            ),
            ("url".to_string(), product.url.clone()),
        ];
        rows.extend(
            product
                .specifications
                .iter()
                .map(|(label, value)| (format!("spec:{}", label), value.clone())),
        );

        let mut lines = vec!["field,value".to_string()];
        for (field, value) in rows {
            lines.push(format!("{},{}", Self::csv_escape(&field), Self::csv_escape(&value)));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

fn column_width(items: &[ComparisonItem], select: impl Fn(&ComparisonItem) -> &str) -> usize {
    items
        .iter()
        .map(|item| display_width(&truncate(select(item), VALUE_WIDTH)))
        .max()
        .unwrap_or(0)
        .max(1)
}

fn markdown_escape(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

fn or_na(s: &str) -> &str {
    if s.trim().is_empty() {
        "N/A"
    } else {
        s
    }
}

/// Terminal column width; East Asian wide characters and emoji take two.
fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

fn pad(s: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(s));
    format!("{}{}", s, " ".repeat(fill))
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::{Advice, TermExplanation, Winner};
    use crate::comparison::models::{Commentary, Superiority};

    fn make_product(title: &str, price: &str) -> ProductRecord {
        let mut product = ProductRecord::new(title);
        product.price = price.to_string();
        product.asin = "B08N5WRWNW".to_string();
        product.url = "https://www.amazon.co.jp/dp/B08N5WRWNW".to_string();
        product
    }

    fn make_result() -> ComparisonResult {
        ComparisonResult {
            product_a: make_product("Earbuds Pro", "￥9,800"),
            product_b: make_product("Earbuds Lite", "￥4,980"),
            comparison_items: vec![
                ComparisonItem {
                    label: "価格".to_string(),
                    value_a: "￥9,800".to_string(),
                    value_b: "￥4,980".to_string(),
                    superiority: Superiority::B,
                },
                ComparisonItem {
                    label: "重量".to_string(),
                    value_a: "5g".to_string(),
                    value_b: "8g".to_string(),
                    superiority: Superiority::A,
                },
                ComparisonItem::unranked("モデル", "A|1, \"pro\"", "–"),
            ],
            is_divergent: false,
            commentary: Commentary {
                for_a: "重量の面が強く、価格の面が弱い".to_string(),
                for_b: "価格の面が強く、重量の面が弱い".to_string(),
            },
            advice: None,
            explanations: Vec::new(),
        }
    }

    // Comparison output

    #[test]
    fn test_json_comparison_camel_case() {
        let formatter = Formatter::new(OutputFormat::Json);
        let output = formatter.format_comparison(&make_result());

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["comparisonItems"][0]["label"], "価格");
        assert_eq!(parsed["comparisonItems"][0]["superiority"], "b");
        assert_eq!(parsed["isDivergent"], false);
        assert_eq!(parsed["commentary"]["forA"], "重量の面が強く、価格の面が弱い");
        assert!(parsed.get("advice").is_none());
    }

    #[test]
    fn test_table_comparison() {
        let formatter = Formatter::new(OutputFormat::Table);
        let output = formatter.format_comparison(&make_result());

        assert!(output.starts_with("A: Earbuds Pro\nB: Earbuds Lite"));
        assert!(!output.contains("Different product genres"));
        assert!(output.contains("Winner"));
        let price_line = output.lines().find(|l| l.starts_with("価格")).unwrap();
        assert!(price_line.ends_with("B ▼"));
        let weight_line = output.lines().find(|l| l.starts_with("重量")).unwrap();
        assert!(weight_line.ends_with("A ▲"));
        assert!(output.contains("  A: 重量の面が強く"));
        assert!(!output.contains("Advice"));
    }

    #[test]
    fn test_table_comparison_divergent_with_advice() {
        let mut result = make_result();
        result.is_divergent = true;
        let result = result.with_advice(Advice {
            winner: Winner::B,
            reason: "Half the price".to_string(),
            tips: String::new(),
        });

        let output = Formatter::new(OutputFormat::Table).format_comparison(&result);
        assert!(output.contains("Different product genres"));
        assert!(output.contains("Advice (winner: b):"));
        assert!(output.contains("  Half the price"));
    }

    #[test]
    fn test_markdown_comparison() {
        let formatter = Formatter::new(OutputFormat::Markdown);
        let output = formatter.format_comparison(&make_result());

        assert!(output.contains("## Earbuds Pro vs Earbuds Lite"));
        assert!(output.contains("| Item | A | B | Winner |"));
        assert!(output.contains("| 価格 | ￥9,800 | ￥4,980 | B |"));
        assert!(output.contains("| モデル | A\\|1, \"pro\" | – |  |"));
        assert!(output.contains("### Commentary"));
    }

    #[test]
    fn test_csv_comparison() {
        let formatter = Formatter::new(OutputFormat::Csv);
        let output = formatter.format_comparison(&make_result());
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[0], "label,value_a,value_b,superiority");
        assert_eq!(lines[1], "価格,\"￥9,800\",\"￥4,980\",b");
        assert_eq!(lines[2], "重量,5g,8g,a");
        assert_eq!(lines[3], "モデル,\"A|1, \"\"pro\"\"\",–,none");
    }

    // Product output

    #[test]
    fn test_table_product() {
        let mut product = make_product("Earbuds Pro", "￥9,800");
        product.rating_value = Some(4.3);
        product.review_count = Some(120);
        product.specifications.insert("重量".to_string(), "5 g".to_string());
        product.features.push("ANC".to_string());

        let output = Formatter::new(OutputFormat::Table).format_product(&product);
        assert!(output.contains("Title:    Earbuds Pro"));
        assert!(output.contains("Rating:   4.3/5 (120 reviews)"));
        assert!(output.contains("  重量  5 g"));
        assert!(output.contains("  - ANC"));
    }

    #[test]
    fn test_table_product_missing_fields() {
        let product = ProductRecord::new("Bare");
        let output = Formatter::new(OutputFormat::Table).format_product(&product);
        assert!(output.contains("ASIN:     N/A"));
        assert!(output.contains("Rating:   N/A"));
        assert!(!output.contains("Specifications"));
    }

    #[test]
    fn test_json_product_roundtrip() {
        let product = make_product("Earbuds Pro", "￥9,800");
        let output = Formatter::new(OutputFormat::Json).format_product(&product);
        let parsed: ProductRecord = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, product);
    }

    #[test]
    fn test_csv_product() {
        let mut product = make_product("Earbuds, Pro", "￥9,800");
        product.price_value = Some(9800.0);
        product.specifications.insert("容量".to_string(), "128GB".to_string());

        let output = Formatter::new(OutputFormat::Csv).format_product(&product);
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "field,value");
        assert_eq!(lines[1], "title,\"Earbuds, Pro\"");
        assert!(lines.contains(&"price_value,9800"));
        assert!(lines.contains(&"spec:容量,128GB"));
    }

    #[test]
    fn test_markdown_product() {
        let product = make_product("Earbuds Pro", "￥9,800");
        let output = Formatter::new(OutputFormat::Markdown).format_product(&product);
        assert!(output.starts_with("## Earbuds Pro"));
        assert!(output.contains("- **ASIN:** B08N5WRWNW"));
        assert!(output.contains("[View on Amazon](https://www.amazon.co.jp/dp/B08N5WRWNW)"));
    }

    // Helpers

    #[test]
    fn test_display_width_and_pad() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("価格"), 4);
        assert_eq!(display_width("￥9,800"), 7);
        assert_eq!(pad("価格", 6), "価格  ");
        assert_eq!(pad("toolong", 3), "toolong");
    }

    #[test]
    fn test_display_width_emoji_and_extension_b() {
        assert_eq!(display_width("😀"), 2);
        assert_eq!(display_width("𠀋"), 2);
        assert_eq!(display_width("a😀𠀋"), 5);
        assert_eq!(display_width("–"), 1);
        assert_eq!(pad("😀", 4), "😀  ");
    }

    #[test]
    fn test_table_aligns_wide_values() {
        let mut result = make_result();
        result.comparison_items[2].value_a = "😀𠀋".to_string();

        let output = Formatter::new(OutputFormat::Table).format_comparison(&result);
        let rows: Vec<&str> = output
            .lines()
            .filter(|l| l.starts_with("価格") || l.starts_with("モデル"))
            .collect();
        // the B column starts at the same terminal column on every row
        let b_column = |line: &str, value: &str| display_width(&line[..line.find(value).unwrap()]);
        assert_eq!(b_column(rows[0], "￥4,980"), b_column(rows[1], "–"));
    }

    #[test]
    fn test_explanations_rendered() {
        let result = make_result().with_explanations(vec![TermExplanation {
            term: "LDAC".to_string(),
            explanation: "High-resolution Bluetooth codec.".to_string(),
        }]);

        let table = Formatter::new(OutputFormat::Table).format_comparison(&result);
        assert!(table.contains("Terms:\n  LDAC: High-resolution Bluetooth codec."));

        let markdown = Formatter::new(OutputFormat::Markdown).format_comparison(&result);
        assert!(markdown.contains("### Terms\n\n- **LDAC:** High-resolution Bluetooth codec."));

        let json = Formatter::new(OutputFormat::Json).format_comparison(&result);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["explanations"][0]["term"], "LDAC");

        let plain = Formatter::new(OutputFormat::Table).format_comparison(&make_result());
        assert!(!plain.contains("Terms:"));
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("短い", 10), "短い");
        assert_eq!(truncate("ノイズキャンセリング", 6), "ノイズ...");
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(Formatter::csv_escape("simple"), "simple");
        assert_eq!(Formatter::csv_escape("with,comma"), "\"with,comma\"");
        assert_eq!(Formatter::csv_escape("with\"quote"), "\"with\"\"quote\"");
        assert_eq!(Formatter::csv_escape("with\nnewline"), "\"with\nnewline\"");
    }
}
