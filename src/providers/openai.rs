use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{parse_json, send_checked, CompletionPrompt, Provider};
use crate::errors::ProviderError;

const DEFAULT_API_URL: &str = "https://api.openai.com/v1";
const PROVIDER: &str = "OpenAI";

/// Client for the OpenAI chat completions API and compatible local servers
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key; local servers accept any value
    api_key: String,
    /// API base URL including the version segment
    endpoint: String,
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// Chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    #[serde(default)]
    pub content: String,
}

/// One completion choice
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    pub message: OpenAIMessage,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u32,
    /// Number of completion tokens
    pub completion_tokens: u32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// Completion choices, normally one
    pub choices: Vec<OpenAIChoice>,
    /// Token usage, when reported
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

impl OpenAIRequest {
    /// Create a new chat completion request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum completion length
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl OpenAI {
    /// Create a new client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn base_url(&self) -> &str {
        if self.endpoint.is_empty() {
            DEFAULT_API_URL
        } else {
            self.endpoint.trim_end_matches('/')
        }
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.api_key)
        }
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let builder = self
            .authorized(self.client.post(format!("{}/chat/completions", self.base_url())))
            .json(&request);
        parse_json(PROVIDER, send_checked(PROVIDER, builder).await?).await
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let builder = self.authorized(self.client.get(format!("{}/models", self.base_url())));
        send_checked(PROVIDER, builder).await.map(|_| ())
    }

    fn request_for(prompt: &CompletionPrompt<'_>) -> OpenAIRequest {
        OpenAIRequest::new(prompt.model)
            .add_message("system", prompt.system)
            .add_message("user", prompt.text)
            .temperature(prompt.temperature)
            .max_tokens(prompt.max_tokens)
    }

    fn extract_text(response: &OpenAIResponse) -> String {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .unwrap_or_default()
    }

    fn token_usage(response: &OpenAIResponse) -> Option<(u64, u64)> {
        response
            .usage
            .as_ref()
            .map(|usage| (u64::from(usage.prompt_tokens), u64::from(usage.completion_tokens)))
    }
}
