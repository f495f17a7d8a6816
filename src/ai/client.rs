//! LLM (`OpenAI`) API client module
//!
//! Encapsulates the single request/response completion call used by both the
//! time-range resolver and the summarizer.

use async_trait::async_trait;
use openai_api_rs::v1::chat_completion::{ChatCompletionMessage, Content, MessageRole};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::info;

use crate::errors::TldrError;

const RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_MAX_OUTPUT_TOKENS: usize = 4_000;

#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count() / 4 + 1
}

/// Named JSON schema the model's answer must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputSchema {
    pub name: String,
    pub schema: Value,
}

#[derive(Debug)]
pub struct CompletionRequest {
    pub prompt: Vec<ChatCompletionMessage>,
    pub output_schema: Option<OutputSchema>,
    pub max_output_tokens: usize,
}

impl CompletionRequest {
    #[must_use]
    pub fn text(prompt: Vec<ChatCompletionMessage>) -> Self {
        Self {
            prompt,
            output_schema: None,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    #[must_use]
    pub fn structured(prompt: Vec<ChatCompletionMessage>, schema: OutputSchema) -> Self {
        Self {
            prompt,
            output_schema: Some(schema),
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        }
    }

    /// Text of the last user turn, which carries the request payload.
    #[must_use]
    pub fn last_user_text(&self) -> Option<&str> {
        self.prompt.iter().rev().find_map(|m| match (&m.role, &m.content) {
            (MessageRole::user, Content::Text(text)) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// A single-shot completion endpoint. Implementations make exactly one
/// attempt per call.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// # Errors
    ///
    /// Returns `OpenAIError`/`HttpError` when the call fails or yields no text.
    async fn complete(&self, request: CompletionRequest) -> Result<String, TldrError>;
}

/// LLM API client backed by the `OpenAI` Responses API
pub struct LlmClient {
    api_key: String,
    org_id: Option<String>,
    model_name: String,
    http: Client,
}

impl LlmClient {
    #[must_use]
    pub fn new(api_key: String, org_id: Option<String>, model_name: String) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            org_id,
            model_name,
            http,
        }
    }

    #[must_use]
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn headers(&self) -> Result<HeaderMap, TldrError> {
        let mut headers = HeaderMap::new();
        let auth_value = format!("Bearer {}", self.api_key)
            .parse()
            .map_err(|e| TldrError::HttpError(format!("Invalid Authorization header: {e}")))?;
        headers.insert("Authorization", auth_value);

        let content_type_value = "application/json"
            .parse()
            .map_err(|e| TldrError::HttpError(format!("Invalid Content-Type header: {e}")))?;
        headers.insert("Content-Type", content_type_value);

        if let Some(org) = &self.org_id {
            let org_value = org.parse().map_err(|e| {
                TldrError::HttpError(format!("Invalid OpenAI-Organization header: {e}"))
            })?;
            headers.insert("OpenAI-Organization", org_value);
        }

        Ok(headers)
    }

    #[must_use]
    pub fn build_request_body(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": self.model_name,
            "input": build_responses_input_from_prompt(&request.prompt),
            "max_output_tokens": request.max_output_tokens,
        });

        if let Some(schema) = &request.output_schema {
            body["text"] = json!({
                "format": {
                    "type": "json_schema",
                    "name": schema.name,
                    "schema": schema.schema,
                    "strict": true
                }
            });
        }

        body
    }
}

#[async_trait]
impl LanguageModel for LlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, TldrError> {
        #[cfg(feature = "debug-logs")]
        info!("Using prompt:\n{:?}", request.prompt);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            "Calling {} with {} prompt messages (structured: {})",
            self.model_name,
            request.prompt.len(),
            request.output_schema.is_some()
        );

        let request_body = self.build_request_body(&request);

        let response = self
            .http
            .post(RESPONSES_URL)
            .headers(self.headers()?)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| TldrError::HttpError(format!("OpenAI API request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|e| {
                format!("Failed to read error response body (status {status}): {e}")
            });
            return Err(TldrError::OpenAIError(format!(
                "status {status}: {error_text}"
            )));
        }

        let response_json: Value = response.json().await.map_err(|e| {
            TldrError::OpenAIError(format!("Failed to parse OpenAI response: {e}"))
        })?;

        extract_output_text(&response_json)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| TldrError::OpenAIError("No text in response".to_string()))
    }
}

/// Convert chat messages into Responses API `input` items.
pub(crate) fn build_responses_input_from_prompt(prompt: &[ChatCompletionMessage]) -> Vec<Value> {
    prompt
        .iter()
        .filter_map(|m| {
            let role_str = match m.role {
                MessageRole::system => "system",
                MessageRole::user | MessageRole::function | MessageRole::tool => "user",
                MessageRole::assistant => "assistant",
            };

            match &m.content {
                Content::Text(t) => Some(json!({
                    "role": role_str,
                    "content": [{ "type": "input_text", "text": t }]
                })),
                Content::ImageUrl(_) => None,
            }
        })
        .collect()
}

/// Pull the generated text out of a Responses API payload.
///
/// Prefers the aggregated `output_text`; otherwise joins every `output_text`
/// part found under `output[].content[]`.
#[must_use]
pub fn extract_output_text(response_json: &Value) -> Option<String> {
    if let Some(text) = response_json.get("output_text").and_then(|v| v.as_str()) {
        return Some(text.to_string());
    }

    let collected: Vec<String> = response_json
        .get("output")
        .and_then(|o| o.as_array())
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(|c| c.as_array()))
        .flatten()
        .filter(|p| p.get("type").and_then(|t| t.as_str()) == Some("output_text"))
        .filter_map(|p| {
            p.get("text")
                .and_then(|t| t.as_str().or_else(|| t.get("value").and_then(|v| v.as_str())))
                .map(std::string::ToString::to_string)
        })
        .collect();

    if collected.is_empty() {
        None
    } else {
        Some(collected.join("\n"))
    }
}
