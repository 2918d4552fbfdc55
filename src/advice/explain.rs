//! Plain-language explanations of technical specification labels.

use super::chat::ChatClient;
use super::AdviceError;
use crate::amazon::models::is_unavailable;
use crate::comparison::models::{ComparisonItem, Locale, MISSING_VALUE};
use crate::config::AdviceConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// At most this many rows are sent for explanation.
pub const MAX_EXPLAINED_TERMS: usize = 15;

/// Labels everybody understands. A row whose label ends with one of these is
/// not sent.
const COMMON_TERMS: &[&str] = &[
    "サイズ",
    "寸法",
    "重量",
    "重さ",
    "ブランド",
    "メーカー",
    "asin",
    "レビュー",
    "色",
    "カラー",
    "価格",
    "保証",
    "size",
    "dimensions",
    "weight",
    "brand",
    "manufacturer",
    "reviews",
    "color",
    "colour",
    "price",
    "warranty",
];

/// Values that carry nothing to explain.
const PLACEHOLDERS: &[&str] = &[MISSING_VALUE, "－", "-", "不明", "n/a"];

/// One explained specification label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermExplanation {
    pub term: String,
    pub explanation: String,
}

/// Explains the technical labels of a comparison table.
#[async_trait]
pub trait Explainer: Send + Sync {
    async fn explain(&self, items: &[ComparisonItem])
        -> Result<Vec<TermExplanation>, AdviceError>;
}

/// Rows worth explaining: common labels and rows without any real value are
/// dropped, and at most [`MAX_EXPLAINED_TERMS`] rows are kept in table order.
pub fn explainable_terms(items: &[ComparisonItem]) -> Vec<&ComparisonItem> {
    items
        .iter()
        .filter(|item| !is_common_term(&item.label))
        .filter(|item| has_value(&item.value_a) || has_value(&item.value_b))
        .take(MAX_EXPLAINED_TERMS)
        .collect()
}

fn is_common_term(label: &str) -> bool {
    let label = label.trim().to_lowercase();
    COMMON_TERMS.iter().any(|term| label.ends_with(term))
}

fn has_value(value: &str) -> bool {
    let value = value.trim();
    !value.is_empty()
        && !is_unavailable(value)
        && !PLACEHOLDERS.iter().any(|p| value.eq_ignore_ascii_case(p))
}

/// Chat-completions explainer.
pub struct OpenAiExplainer {
    chat: ChatClient,
    locale: Locale,
}

impl OpenAiExplainer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, AdviceError> {
        Ok(Self { chat: ChatClient::new(api_key, model)?, locale: Locale::default() })
    }

    /// Builds an explainer from the `[advice]` config table, using `explain_model`.
    pub fn from_config(config: &AdviceConfig, locale: Locale) -> Result<Self, AdviceError> {
        let api_key = config.api_key.as_deref().ok_or(AdviceError::MissingApiKey)?;
        Ok(Self::new(api_key, &config.explain_model)?
            .with_base_url(&config.base_url)
            .with_locale(locale))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.chat = self.chat.with_base_url(base_url);
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }
}

#[async_trait]
impl Explainer for OpenAiExplainer {
    async fn explain(
        &self,
        items: &[ComparisonItem],
    ) -> Result<Vec<TermExplanation>, AdviceError> {
        let terms = explainable_terms(items);
        if terms.is_empty() {
            debug!("No technical terms to explain");
            return Ok(Vec::new());
        }

        let prompt = build_prompt(&terms, self.locale)?;
        let content = self
            .chat
            .complete_json(
                "You are a helpful assistant that explains technical terms in JSON format.",
                &prompt,
            )
            .await?;

        parse_explanations(&content)
    }
}

/// Parses `{"explanations": [{"term", "explanation"}]}`, dropping empty entries.
pub fn parse_explanations(content: &str) -> Result<Vec<TermExplanation>, AdviceError> {
    let raw: RawExplanations = serde_json::from_str(content)?;
    Ok(raw
        .explanations
        .into_iter()
        .filter(|e| !e.term.trim().is_empty() && !e.explanation.trim().is_empty())
        .map(|e| TermExplanation { term: e.term, explanation: e.explanation })
        .collect())
}

fn build_prompt(terms: &[&ComparisonItem], locale: Locale) -> Result<String, AdviceError> {
    let language = match locale {
        Locale::Ja => "Japanese",
        Locale::En => "English",
    };

    let input: Vec<TermInput> = terms
        .iter()
        .map(|item| TermInput { term: &item.label, value_a: &item.value_a, value_b: &item.value_b })
        .collect();

    Ok(format!(
        "You explain technical terms of electronics and gadgets to beginners.\n\
         For each specification term below, explain in one or two sentences what it \
         affects and what the given values mean in practice.\n\n\
         [Terms]\n{}\n\n\
         Leave out terms that need no explanation and values that are unknown.\n\
         Answer in {} with only this JSON object, no Markdown:\n\
         {{\"explanations\": [{{\"term\": \"term\", \"explanation\": \"text\"}}]}}\n",
        serde_json::to_string_pretty(&input)?,
        language
    ))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TermInput<'a> {
    term: &'a str,
    value_a: &'a str,
    value_b: &'a str,
}

#[derive(Debug, Deserialize)]
struct RawExplanations {
    #[serde(default)]
    explanations: Vec<RawTerm>,
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    #[serde(default)]
    term: String,
    #[serde(default)]
    explanation: String,
}
