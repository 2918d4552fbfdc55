//! Purchase advice and term explanations from an OpenAI-compatible
//! chat-completions endpoint.
//!
//! Both are additive: the comparison is complete without them, and callers
//! are expected to downgrade an [`AdviceError`] to a warning.

pub mod chat;
pub mod explain;

pub use chat::ChatClient;
pub use explain::{explainable_terms, Explainer, OpenAiExplainer, TermExplanation};

use crate::amazon::models::ProductRecord;
use crate::comparison::models::{ComparisonItem, Locale};
use crate::config::AdviceConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which product the advisor recommends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    A,
    B,
    Tie,
    #[default]
    None,
}

impl Winner {
    /// Maps the model's answer to a winner; anything unexpected is `None`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "a" => Winner::A,
            "b" => Winner::B,
            "tie" | "equal" => Winner::Tie,
            _ => Winner::None,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Winner::A => "a",
            Winner::B => "b",
            Winner::Tie => "tie",
            Winner::None => "none",
        };
        write!(f, "{}", s)
    }
}

/// A purchase recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    pub winner: Winner,
    /// Short reason for the pick
    pub reason: String,
    /// Advice depending on what the buyer cares about
    pub tips: String,
}

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("No API key configured for advice. Set OPENAI_API_KEY or [advice].api_key")]
    MissingApiKey,

    #[error("Chat request failed: {0}")]
    Http(#[from] wreq::Error),

    #[error("Chat endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Chat endpoint returned no content")]
    EmptyResponse,

    #[error("Could not parse model answer: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Produces a recommendation from two products and their comparison rows.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(
        &self,
        a: &ProductRecord,
        b: &ProductRecord,
        items: &[ComparisonItem],
    ) -> Result<Advice, AdviceError>;
}

/// Chat-completions advisor asking for a JSON-object answer.
pub struct OpenAiAdvisor {
    chat: ChatClient,
    locale: Locale,
}

impl OpenAiAdvisor {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, AdviceError> {
        Ok(Self { chat: ChatClient::new(api_key, model)?, locale: Locale::default() })
    }

    /// Builds an advisor from the `[advice]` config table.
    pub fn from_config(config: &AdviceConfig, locale: Locale) -> Result<Self, AdviceError> {
        let api_key = config.api_key.as_deref().ok_or(AdviceError::MissingApiKey)?;
        Ok(Self::new(api_key, &config.model)?
            .with_base_url(&config.base_url)
            .with_locale(locale))
    }

    /// Points the advisor at another OpenAI-compatible endpoint.
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
impl Advisor for OpenAiAdvisor {
    async fn advise(
        &self,
        a: &ProductRecord,
        b: &ProductRecord,
        items: &[ComparisonItem],
    ) -> Result<Advice, AdviceError> {
        let prompt = build_prompt(a, b, items, self.locale)?;
        let content = self
            .chat
            .complete_json("You are a helpful assistant that responds in JSON format.", &prompt)
            .await?;

        parse_advice(&content)
    }
}

/// Parses the model's JSON object into an [`Advice`].
pub fn parse_advice(content: &str) -> Result<Advice, AdviceError> {
    let raw: RawAdvice = serde_json::from_str(content)?;
    Ok(Advice {
        winner: Winner::from_str_lossy(&raw.winner),
        reason: raw.reason,
        tips: raw.tips,
    })
}

fn build_prompt(
    a: &ProductRecord,
    b: &ProductRecord,
    items: &[ComparisonItem],
    locale: Locale,
) -> Result<String, AdviceError> {
    let language = match locale {
        Locale::Ja => "Japanese",
        Locale::En => "English",
    };

    let mut prompt = String::from(
        "You are an expert in comparing Amazon products. \
         Analyze the two products below and recommend one.\n\n",
    );
    prompt.push_str(&product_summary("Product A", a)?);
    prompt.push_str(&product_summary("Product B", b)?);

    prompt.push_str("[Comparison]\n");
    for item in items {
        prompt.push_str(&format!(
            "- {}: A = {} / B = {} (winner: {})\n",
            item.label, item.value_a, item.value_b, item.superiority
        ));
    }

    prompt.push_str(&format!(
        "\nAnswer in {} with only this JSON object, no Markdown:\n\
         {{\"winner\": \"a\" | \"b\" | \"tie\", \
         \"reason\": \"why the winner wins, briefly\", \
         \"tips\": \"advice depending on the buyer's priorities\"}}\n",
        language
    ));

    Ok(prompt)
}

fn product_summary(heading: &str, product: &ProductRecord) -> Result<String, AdviceError> {
    Ok(format!(
        "[{}]\nTitle: {}\nPrice: {}\nBrand: {}\nCategory: {}\nSpecifications: {}\nFeatures: {}\n\n",
        heading,
        product.title,
        product.price,
        product.brand,
        product.category,
        serde_json::to_string(&product.specifications)?,
        serde_json::to_string(&product.features)?,
    ))
}

#[derive(Debug, Deserialize)]
struct RawAdvice {
    #[serde(default)]
    winner: String,
    #[serde(default)]
    reason: String,
    #[serde(default)]
    tips: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::models::Superiority;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn make_products() -> (ProductRecord, ProductRecord, Vec<ComparisonItem>) {
        let mut a = ProductRecord::new("Wireless Earbuds Pro");
        a.price = "￥9,800".to_string();
        a.specifications.insert("重量".to_string(), "5g".to_string());
        let mut b = ProductRecord::new("Wireless Earbuds Lite");
        b.price = "￥4,980".to_string();
        let items = vec![ComparisonItem {
            label: "価格".to_string(),
            value_a: "￥9,800".to_string(),
            value_b: "￥4,980".to_string(),
            superiority: Superiority::B,
        }];
        (a, b, items)
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
        })
    }

    async fn make_advisor(server: &MockServer) -> OpenAiAdvisor {
        OpenAiAdvisor::new("test-key", "gpt-4o").unwrap().with_base_url(server.uri())
    }

    #[test]
    fn test_winner_from_str_lossy() {
        assert_eq!(Winner::from_str_lossy("a"), Winner::A);
        assert_eq!(Winner::from_str_lossy(" B "), Winner::B);
        assert_eq!(Winner::from_str_lossy("tie"), Winner::Tie);
        assert_eq!(Winner::from_str_lossy("both"), Winner::None);
        assert_eq!(Winner::from_str_lossy(""), Winner::None);
    }

    #[test]
    fn test_parse_advice() {
        let advice =
            parse_advice(r#"{"winner": "b", "reason": "Cheaper", "tips": "Pick A for ANC"}"#)
                .unwrap();
        assert_eq!(advice.winner, Winner::B);
        assert_eq!(advice.reason, "Cheaper");
        assert_eq!(advice.tips, "Pick A for ANC");

        let advice = parse_advice(r#"{"winner": "c"}"#).unwrap();
        assert_eq!(advice.winner, Winner::None);
        assert!(advice.reason.is_empty());

        assert!(matches!(parse_advice("not json"), Err(AdviceError::Malformed(_))));
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(OpenAiAdvisor::new("  ", "gpt-4o"), Err(AdviceError::MissingApiKey)));

        let config = AdviceConfig { api_key: None, ..AdviceConfig::default() };
        assert!(matches!(
            OpenAiAdvisor::from_config(&config, Locale::Ja),
            Err(AdviceError::MissingApiKey)
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let advisor =
            OpenAiAdvisor::new("k", "gpt-4o").unwrap().with_base_url("http://localhost:9/v1/");
        assert_eq!(advisor.chat.endpoint(), "http://localhost:9/v1/chat/completions");
    }

    #[test]
    fn test_build_prompt_contains_products_and_rows() {
        let (a, b, items) = make_products();
        let prompt = build_prompt(&a, &b, &items, Locale::Ja).unwrap();
        assert!(prompt.contains("Wireless Earbuds Pro"));
        assert!(prompt.contains("Wireless Earbuds Lite"));
        assert!(prompt.contains("\"重量\":\"5g\""));
        assert!(prompt.contains("- 価格: A = ￥9,800 / B = ￥4,980 (winner: b)"));
        assert!(prompt.contains("Answer in Japanese"));

        let prompt = build_prompt(&a, &b, &items, Locale::En).unwrap();
        assert!(prompt.contains("Answer in English"));
    }

    #[tokio::test]
    async fn test_advise_success() {
        let server = MockServer::start().await;
        let content = r#"{"winner":"a","reason":"Lighter","tips":"Choose B on a budget"}"#;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o",
                "response_format": {"type": "json_object"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(content)))
            .mount(&server)
            .await;

        let (a, b, items) = make_products();
        let advice = make_advisor(&server).await.advise(&a, &b, &items).await.unwrap();
        assert_eq!(advice.winner, Winner::A);
        assert_eq!(advice.reason, "Lighter");
        assert_eq!(advice.tips, "Choose B on a budget");
    }

    #[tokio::test]
    async fn test_advise_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let (a, b, items) = make_products();
        let err = make_advisor(&server).await.advise(&a, &b, &items).await.unwrap_err();
        match err {
            AdviceError::Status { status, body } => {
                assert_eq!(status, 401);
                assert!(body.contains("invalid api key"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[tokio::test]
    async fn test_advise_empty_choices() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let (a, b, items) = make_products();
        let err = make_advisor(&server).await.advise(&a, &b, &items).await.unwrap_err();
        assert!(matches!(err, AdviceError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_advise_malformed_content() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Product A wins")))
            .mount(&server)
            .await;

        let (a, b, items) = make_products();
        let err = make_advisor(&server).await.advise(&a, &b, &items).await.unwrap_err();
        assert!(matches!(err, AdviceError::Malformed(_)));
    }

    #[test]
    fn test_advice_serde() {
        let advice =
            Advice { winner: Winner::Tie, reason: "Same".to_string(), tips: String::new() };
        let json = serde_json::to_string(&advice).unwrap();
        assert_eq!(json, r#"{"winner":"tie","reason":"Same","tips":""}"#);
    }
}
