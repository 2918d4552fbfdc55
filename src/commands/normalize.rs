//! Unit normalization command: runs one family's parser on a raw value.

use crate::comparison::models::NormalizedSpec;
use crate::comparison::SpecFamily;
use crate::config::OutputFormat;
use anyhow::{Context, Result};

/// Shows how a raw specification value is read by one family.
pub struct NormalizeCommand {
    format: OutputFormat,
}

impl NormalizeCommand {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Normalizes `text` with the named family (`size`, `weight`, ...).
    pub fn execute(&self, family: &str, text: &str) -> Result<String> {
        let family: SpecFamily = family.parse().map_err(anyhow::Error::msg)?;
        let spec = family.normalize(text);
        self.render(family, &spec)
    }

    fn render(&self, family: SpecFamily, spec: &NormalizedSpec) -> Result<String> {
        let value = spec.normalized_value.map(|v| v.to_string());

        Ok(match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(spec)
                .context("Failed to serialize normalized value")?,
            OutputFormat::Csv => format!(
                "family,raw_value,normalized_value,unit\n{},{},{},{}",
                family,
                csv_field(&spec.raw_value),
                value.unwrap_or_default(),
                spec.unit
            ),
            OutputFormat::Markdown => format!(
                "| Family | Raw | Normalized | Unit |\n|--------|-----|------------|------|\n\
                 | {} | {} | {} | {} |",
                family,
                spec.raw_value.replace('|', "\\|"),
                value.as_deref().unwrap_or("unknown"),
                spec.unit
            ),
            OutputFormat::Table => format!(
                "Family:     {}\nRaw:        {}\nNormalized: {} {}",
                family,
                spec.raw_value,
                value.as_deref().unwrap_or("unknown"),
                spec.unit
            ),
        })
    }
}

fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
