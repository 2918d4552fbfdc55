//! Product lookup command implementation.

use crate::amazon::{AmazonClient, ProductSource};
use crate::config::Config;
use crate::format::Formatter;
use anyhow::{Context, Result};
use tracing::info;

/// Fetches a single product record.
pub struct ProductCommand {
    config: Config,
}

impl ProductCommand {
    /// Creates a new product command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Fetches a product by URL or ASIN and returns formatted output.
    pub async fn execute(&self, input: &str) -> Result<String> {
        let client =
            AmazonClient::new(&self.config).await.context("Failed to create HTTP client")?;

        self.execute_with(&client, input).await
    }

    /// Fetches a product with a provided source (for testing).
    pub async fn execute_with(&self, source: &impl ProductSource, input: &str) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            anyhow::bail!("Product URL or ASIN is required");
        }

        info!("Looking up product: {}", input);
        let product = source.fetch_product(input).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_product(&product))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::ProductRecord;
    use crate::config::OutputFormat;
    use async_trait::async_trait;

    /// Mock product source for testing.
    struct MockSource {
        should_fail: bool,
    }

    #[async_trait]
    impl ProductSource for MockSource {
        async fn fetch_product(&self, input: &str) -> Result<ProductRecord> {
            if self.should_fail {
                anyhow::bail!("Network error");
            }
            let mut record = ProductRecord::new("Test Product");
            record.asin = input.to_string();
            record.price = "$29.99".to_string();
            record.price_value = Some(29.99);
            record.specifications.insert("Item Weight".to_string(), "1.2 pounds".to_string());
            Ok(record)
        }
    }

    fn make_command(format: OutputFormat) -> ProductCommand {
        ProductCommand::new(Config { format, ..Config::default() })
    }

    #[tokio::test]
    async fn test_product_command_table() {
        let source = MockSource { should_fail: false };
        let output =
            make_command(OutputFormat::Table).execute_with(&source, " B08N5WRWNW ").await.unwrap();

        assert!(output.contains("Title:    Test Product"));
        assert!(output.contains("ASIN:     B08N5WRWNW"));
        assert!(output.contains("Price:    $29.99"));
        assert!(output.contains("Item Weight  1.2 pounds"));
    }

    #[tokio::test]
    async fn test_product_command_json_format() {
        let source = MockSource { should_fail: false };
        let output =
            make_command(OutputFormat::Json).execute_with(&source, "B08N5WRWNW").await.unwrap();

        let parsed: ProductRecord = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.asin, "B08N5WRWNW");
        assert_eq!(parsed.price_value, Some(29.99));
        assert!(output.contains("\"priceValue\""));
    }

    #[tokio::test]
    async fn test_product_command_empty_input() {
        let source = MockSource { should_fail: false };
        let result = make_command(OutputFormat::Table).execute_with(&source, "   ").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("required"));
    }

    #[tokio::test]
    async fn test_product_command_network_error() {
        let source = MockSource { should_fail: true };
        let result = make_command(OutputFormat::Table).execute_with(&source, "B08N5WRWNW").await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Network error"));
    }
}
