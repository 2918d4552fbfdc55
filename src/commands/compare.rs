//! Side-by-side comparison command implementation.

use crate::advice::{Advisor, Explainer, OpenAiAdvisor, OpenAiExplainer};
use crate::amazon::{AmazonClient, ProductSource};
use crate::comparison::{ComparisonEngine, ComparisonResult};
use crate::config::Config;
use crate::format::Formatter;
use crate::source::JsonFileSource;
use anyhow::{Context, Result};
use tracing::{info, warn};

/// Switches of one `compare` invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareOptions {
    /// Ask the advisor for a recommendation
    pub advice: bool,
    /// Ask for plain-language explanations of technical labels
    pub explain: bool,
    /// Inputs are `ProductRecord` JSON files
    pub from_files: bool,
}

/// Fetches two products, compares them and optionally asks for advice and
/// term explanations.
pub struct CompareCommand {
    config: Config,
}

impl CompareCommand {
    /// Creates a new compare command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Compares two products and returns formatted output.
    ///
    /// Inputs are product URLs or ASINs, or JSON record paths with
    /// `from_files`. Advice is requested when asked for or enabled in the
    /// config; explanations only when asked for.
    pub async fn execute(
        &self,
        input_a: &str,
        input_b: &str,
        options: CompareOptions,
    ) -> Result<String> {
        let advice = &self.config.advice;

        let advisor = if options.advice || advice.enabled {
            OpenAiAdvisor::from_config(advice, self.config.locale)
                .map_err(|e| warn!("Advice disabled: {}", e))
                .ok()
        } else {
            None
        };
        let explainer = if options.explain {
            OpenAiExplainer::from_config(advice, self.config.locale)
                .map_err(|e| warn!("Explanations disabled: {}", e))
                .ok()
        } else {
            None
        };
        let advisor = advisor.as_ref().map(|a| a as &dyn Advisor);
        let explainer = explainer.as_ref().map(|e| e as &dyn Explainer);

        if options.from_files {
            self.execute_with(&JsonFileSource::new(), advisor, explainer, input_a, input_b).await
        } else {
            let client =
                AmazonClient::new(&self.config).await.context("Failed to create HTTP client")?;
            self.execute_with(&client, advisor, explainer, input_a, input_b).await
        }
    }

    /// Compares with a provided source, advisor and explainer (for testing).
    pub async fn execute_with(
        &self,
        source: &impl ProductSource,
        advisor: Option<&dyn Advisor>,
        explainer: Option<&dyn Explainer>,
        input_a: &str,
        input_b: &str,
    ) -> Result<String> {
        let result = self.compare_with(source, advisor, explainer, input_a, input_b).await?;

        let formatter = Formatter::new(self.config.format);
        Ok(formatter.format_comparison(&result))
    }

    /// Runs the comparison and returns the structured result.
    ///
    /// Both products are fetched concurrently, then advice and explanations
    /// are requested concurrently. A failing advisor or explainer only logs a
    /// warning; the comparison is returned without its contribution.
    pub async fn compare_with(
        &self,
        source: &impl ProductSource,
        advisor: Option<&dyn Advisor>,
        explainer: Option<&dyn Explainer>,
        input_a: &str,
        input_b: &str,
    ) -> Result<ComparisonResult> {
        let (product_a, product_b) = tokio::try_join!(
            async {
                source
                    .fetch_product(input_a)
                    .await
                    .with_context(|| format!("Failed to fetch product A: {}", input_a))
            },
            async {
                source
                    .fetch_product(input_b)
                    .await
                    .with_context(|| format!("Failed to fetch product B: {}", input_b))
            },
        )?;

        let engine = ComparisonEngine::new(self.config.locale);
        let mut result = engine.compare(&product_a, &product_b);
        info!(
            "Compared {} rows (divergent: {})",
            result.comparison_items.len(),
            result.is_divergent
        );

        let (advice, explanations) = tokio::join!(
            async {
                match advisor {
                    Some(advisor) => Some(
                        advisor
                            .advise(&result.product_a, &result.product_b, &result.comparison_items)
                            .await,
                    ),
                    None => None,
                }
            },
            async {
                match explainer {
                    Some(explainer) => Some(explainer.explain(&result.comparison_items).await),
                    None => None,
                }
            },
        );

        match advice {
            Some(Ok(advice)) => result.advice = Some(advice),
            Some(Err(e)) => warn!("Advice unavailable: {}", e),
            None => {}
        }
        match explanations {
            Some(Ok(explanations)) => result.explanations = explanations,
            Some(Err(e)) => warn!("Explanations unavailable: {}", e),
            None => {}
        }

        Ok(result)
    }
}
