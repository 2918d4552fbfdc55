//! Minimal OpenAI-compatible chat-completions client.

use super::AdviceError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};
use wreq::Client;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Sends one system + user exchange and returns the JSON-object answer.
pub struct ChatClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl ChatClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, AdviceError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(AdviceError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, api_key, model: model.into(), base_url: DEFAULT_BASE_URL.to_string() })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Posts the conversation with `response_format = json_object` and
    /// returns the first choice's content.
    pub async fn complete_json(&self, system: &str, prompt: &str) -> Result<String, AdviceError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: prompt },
            ],
            response_format: ResponseFormat { kind: "json_object" },
        };

        info!("Requesting completion from {} ({})", self.base_url, self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key.trim()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!("Completion response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(AdviceError::Status { status: status.as_u16(), body });
        }

        let text = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&text)?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(AdviceError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}
