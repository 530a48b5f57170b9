use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{parse_json, send_checked, CompletionPrompt, Provider};
use crate::errors::ProviderError;

const DEFAULT_API_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const PROVIDER: &str = "Anthropic";

/// Client for the Anthropic Messages API
#[derive(Debug)]
pub struct Anthropic {
    client: Client,
    api_key: String,
    /// Base URL; the public API when empty
    endpoint: String,
}

/// Messages API request
#[derive(Debug, Serialize)]
pub struct AnthropicRequest {
    model: String,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

/// One conversation turn
#[derive(Debug, Serialize, Deserialize)]
pub struct AnthropicMessage {
    /// `user` or `assistant`
    pub role: String,
    /// Turn text
    pub content: String,
}

/// Token accounting reported by the API
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub input_tokens: u32,
    /// Tokens generated
    pub output_tokens: u32,
}

/// Messages API response
#[derive(Debug, Deserialize)]
pub struct AnthropicResponse {
    /// Content blocks, in order
    pub content: Vec<AnthropicContent>,
    /// Why generation stopped, e.g. `end_turn` or `max_tokens`
    #[serde(default)]
    pub stop_reason: Option<String>,
    /// Token accounting
    pub usage: TokenUsage,
}

/// Content block; only `text` blocks carry translation output
#[derive(Debug, Deserialize)]
pub struct AnthropicContent {
    /// Block type
    #[serde(rename = "type")]
    pub content_type: String,
    /// Block text; empty for non-text blocks
    #[serde(default)]
    pub text: String,
}

impl AnthropicRequest {
    /// Empty request for `model`
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            system: None,
            temperature: None,
            max_tokens,
        }
    }

    /// Append a turn
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(AnthropicMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl Anthropic {
    /// Client with a per-request timeout
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let base = match self.endpoint.trim_end_matches('/') {
            "" => DEFAULT_API_URL,
            base => base,
        };
        format!("{}{}", base, path)
    }

    fn with_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
    }
}

#[async_trait]
impl Provider for Anthropic {
    type Request = AnthropicRequest;
    type Response = AnthropicResponse;

    async fn complete(&self, request: AnthropicRequest) -> Result<AnthropicResponse, ProviderError> {
        let builder = self.with_headers(self.client.post(self.url("/v1/messages"))).json(&request);
        let response: AnthropicResponse = parse_json(PROVIDER, send_checked(PROVIDER, builder).await?).await?;

        if response.stop_reason.as_deref() == Some("max_tokens") {
            log::warn!("Anthropic output was cut off at the token limit");
        }
        Ok(response)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let builder = self.with_headers(self.client.get(self.url("/v1/models")));
        send_checked(PROVIDER, builder).await.map(|_| ())
    }

    fn request_for(prompt: &CompletionPrompt<'_>) -> AnthropicRequest {
        AnthropicRequest::new(prompt.model, prompt.max_tokens)
            .system(prompt.system)
            .add_message("user", prompt.text)
            .temperature(prompt.temperature)
    }

    fn extract_text(response: &AnthropicResponse) -> String {
        response
            .content
            .iter()
            .filter(|block| block.content_type == "text")
            .map(|block| block.text.as_str())
            .collect()
    }

    fn token_usage(response: &AnthropicResponse) -> Option<(u64, u64)> {
        Some((
            u64::from(response.usage.input_tokens),
            u64::from(response.usage.output_tokens),
        ))
    }
}
