//! Product records loaded from JSON files instead of the network.

use crate::amazon::client::ProductSource;
use crate::amazon::models::ProductRecord;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

/// Reads a camelCase [`ProductRecord`] JSON file per input path.
///
/// Useful for comparing saved `product --format json` output, or records
/// produced by other scrapers.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonFileSource;

impl JsonFileSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProductSource for JsonFileSource {
    async fn fetch_product(&self, input: &str) -> Result<ProductRecord> {
        let path = Path::new(input);
        info!("Loading product: {}", path.display());

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read product file: {}", path.display()))?;

        let record: ProductRecord = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse product file: {}", path.display()))?;

        debug!("Loaded {} with {} specs", record.title, record.specifications.len());
        Ok(record)
    }
}
