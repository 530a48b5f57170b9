use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use super::{parse_json, send_checked, CompletionPrompt, Provider};
use crate::errors::ProviderError;

const DEFAULT_PORT: u16 = 11434;
const PROVIDER: &str = "Ollama";

/// Ollama client for interacting with Ollama API
#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Model name
    #[serde(default)]
    pub model: String,
    /// Generated text
    #[serde(default)]
    pub response: String,
    /// Whether the generation is complete
    #[serde(default)]
    pub done: bool,
    /// Number of prompt tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_eval_count: Option<u64>,
    /// Number of generated tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eval_count: Option<u64>,
}

/// Version response from the Ollama API
#[derive(Debug, Deserialize)]
pub struct VersionResponse {
    /// Server version
    pub version: String,
}

impl GenerationRequest {
    /// Create a new non-streaming generation request
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            system: None,
            options: None,
            stream: false,
        }
    }

    /// Set the system prompt
    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).temperature = Some(temperature);
        self
    }

    /// Set the maximum number of generated tokens
    pub fn num_predict(mut self, num_predict: u32) -> Self {
        self.options.get_or_insert_with(GenerationOptions::default).num_predict = Some(num_predict);
        self
    }
}

/// Normalize an endpoint such as `localhost` or `http://host:port/` to a base URL
pub fn base_url_from_endpoint(endpoint: &str) -> Result<String, ProviderError> {
    if endpoint.trim().is_empty() {
        return Err(ProviderError::ConnectionError("Endpoint cannot be empty".to_string()));
    }

    let with_scheme = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        endpoint.to_string()
    } else {
        format!("http://{}", endpoint)
    };
    let url = Url::parse(&with_scheme)
        .map_err(|e| ProviderError::ConnectionError(format!("Invalid endpoint {}: {}", endpoint, e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| ProviderError::ConnectionError(format!("Invalid host in endpoint: {}", endpoint)))?;
    let port = url.port().unwrap_or(match url.scheme() {
        "https" => 443,
        _ => DEFAULT_PORT,
    });

    Ok(format!("{}://{}:{}", url.scheme(), host, port))
}

/// Parse a generate response, tolerating servers that stream JSON lines anyway
fn parse_generation(body: &str) -> Result<GenerationResponse, ProviderError> {
    if let Ok(response) = serde_json::from_str::<GenerationResponse>(body) {
        return Ok(response);
    }

    let chunks: Vec<GenerationResponse> = body
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    if chunks.is_empty() {
        let preview: String = body.chars().take(500).collect();
        error!("Failed to parse Ollama API response. Raw response (first 500 chars): {}", preview);
        return Err(ProviderError::ParseError("Unrecognized Ollama response".to_string()));
    }

    debug!("Joined {} streamed Ollama chunks", chunks.len());
    let text: String = chunks.iter().map(|chunk| chunk.response.as_str()).collect();
    let last = chunks.last();
    Ok(GenerationResponse {
        model: last.map(|chunk| chunk.model.clone()).unwrap_or_default(),
        response: text,
        done: true,
        prompt_eval_count: last.and_then(|chunk| chunk.prompt_eval_count),
        eval_count: last.and_then(|chunk| chunk.eval_count),
    })
}

impl Ollama {
    /// Create a new Ollama client for an endpoint
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let base_url = base_url_from_endpoint(endpoint)?;
        let client = Client::builder()
            .timeout(timeout)
            // Ollama uses HTTP/1.1
            .http1_only()
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build Ollama client: {}", e)))?;
        Ok(Self { base_url, client })
    }

    /// Server version, used as a cheap connectivity check
    pub async fn version(&self) -> Result<String, ProviderError> {
        let builder = self.client.get(format!("{}/api/version", self.base_url));
        let version: VersionResponse = parse_json(PROVIDER, send_checked(PROVIDER, builder).await?).await?;
        Ok(version.version)
    }
}

#[async_trait]
impl Provider for Ollama {
    type Request = GenerationRequest;
    type Response = GenerationResponse;

    async fn complete(&self, request: GenerationRequest) -> Result<GenerationResponse, ProviderError> {
        let builder = self.client.post(format!("{}/api/generate", self.base_url)).json(&request);
        let body = send_checked(PROVIDER, builder).await?.text().await?;
        parse_generation(&body)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        let version = self.version().await?;
        debug!("Ollama server version {}", version);
        Ok(())
    }

    fn request_for(prompt: &CompletionPrompt<'_>) -> GenerationRequest {
        GenerationRequest::new(prompt.model, prompt.text)
            .system(prompt.system)
            .temperature(prompt.temperature)
            .num_predict(prompt.max_tokens)
    }

    fn extract_text(response: &GenerationResponse) -> String {
        response.response.clone()
    }

    fn token_usage(response: &GenerationResponse) -> Option<(u64, u64)> {
        response.prompt_eval_count.zip(response.eval_count)
    }
}
