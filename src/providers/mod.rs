/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for various LLM providers:
 * - Ollama: Local LLM server
 * - OpenAI: OpenAI API integration (also used for LM Studio)
 * - Anthropic: Anthropic API integration
 * - Mock: scripted translator for tests and offline runs
 *
 * Every HTTP provider turns a provider-neutral `CompletionPrompt` into its own
 * wire request and reports the generated text as a `Completion`.
 */

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::errors::ProviderError;

pub mod anthropic;
pub mod mock;
pub mod ollama;
pub mod openai;

/// One system-prompted completion, independent of the provider
#[derive(Debug, Clone, Copy)]
pub struct CompletionPrompt<'a> {
    /// Model name
    pub model: &'a str,
    /// Instructions for the model
    pub system: &'a str,
    /// The text to translate
    pub text: &'a str,
    /// Sampling temperature
    pub temperature: f32,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
}

/// Generated text and token accounting of one completion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Generated text, untrimmed
    pub text: String,
    /// Prompt and completion tokens, when the provider reports them
    pub usage: Option<(u64, u64)>,
}

/// Common trait for all LLM providers
///
/// Implementations are used interchangeably by the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Build the wire request for a prompt
    fn request_for(prompt: &CompletionPrompt<'_>) -> Self::Request;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;

    /// Prompt and completion token counts, if reported
    fn token_usage(_response: &Self::Response) -> Option<(u64, u64)> {
        None
    }

    /// Run a prompt end to end
    async fn run(&self, prompt: &CompletionPrompt<'_>) -> Result<Completion, ProviderError> {
        let response = self.complete(Self::request_for(prompt)).await?;
        Ok(Completion {
            text: Self::extract_text(&response),
            usage: Self::token_usage(&response),
        })
    }
}

/// Send a request and turn any non-success status into a `ProviderError`
pub(crate) async fn send_checked(
    provider: &str,
    request: reqwest::RequestBuilder,
) -> Result<reqwest::Response, ProviderError> {
    let response = request.send().await?;
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    log::error!("{} API error ({}): {}", provider, status, body);
    Err(ProviderError::from_status(status.as_u16(), body))
}

/// Decode a successful JSON response body
pub(crate) async fn parse_json<T: DeserializeOwned>(
    provider: &str,
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ProviderError::ParseError(format!("Failed to parse {} API response: {}", provider, e)))
}
