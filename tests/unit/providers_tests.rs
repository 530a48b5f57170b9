/*!
 * Tests for the provider implementations
 */

use std::time::Duration;

use alertqa::errors::ProviderError;
use alertqa::providers::anthropic::{Anthropic, AnthropicRequest, AnthropicResponse};
use alertqa::providers::ollama::{base_url_from_endpoint, GenerationRequest, GenerationResponse, Ollama};
use alertqa::providers::openai::{OpenAI, OpenAIRequest, OpenAIResponse};
use alertqa::providers::{CompletionPrompt, Provider};

#[test]
fn test_openaiRequest_shouldSerializeOptionalFieldsOnlyWhenSet() {
    let bare = serde_json::to_value(OpenAIRequest::new("gpt-4o-mini").add_message("user", "태풍")).unwrap();
    assert_eq!(bare["model"], "gpt-4o-mini");
    assert_eq!(bare["messages"][0]["content"], "태풍");
    assert!(bare.get("temperature").is_none());

    let tuned = serde_json::to_value(
        OpenAIRequest::new("gpt-4o-mini")
            .add_message("system", "Translate")
            .temperature(0.2)
            .max_tokens(256),
    )
    .unwrap();
    assert_eq!(tuned["max_tokens"], 256);
    assert_eq!(tuned["messages"].as_array().unwrap().len(), 1);
    assert!((tuned["temperature"].as_f64().unwrap() - 0.2).abs() < 1e-6);
}

#[test]
fn test_openai_extractText_shouldReadFirstChoice() {
    let response: OpenAIResponse = serde_json::from_str(
        r#"{ "choices": [ { "message": { "role": "assistant", "content": "Typhoon warning" } } ] }"#,
    )
    .unwrap();
    assert_eq!(OpenAI::extract_text(&response), "Typhoon warning");

    let empty: OpenAIResponse = serde_json::from_str(r#"{ "choices": [] }"#).unwrap();
    assert_eq!(OpenAI::extract_text(&empty), "");
}

#[test]
fn test_anthropic_extractText_shouldJoinTextBlocks() {
    let response: AnthropicResponse = serde_json::from_str(
        r#"{
            "content": [ { "type": "text", "text": "Evacuate " }, { "type": "text", "text": "now" } ],
            "usage": { "input_tokens": 10, "output_tokens": 3 }
        }"#,
    )
    .unwrap();
    assert_eq!(Anthropic::extract_text(&response), "Evacuate now");
}

#[test]
fn test_anthropicRequest_shouldCarrySystemPrompt() {
    let request = AnthropicRequest::new("claude-3-haiku-20240307", 512)
        .system("You translate emergency alerts.")
        .add_message("user", "지진 발생");
    let value = serde_json::to_value(request).unwrap();
    assert_eq!(value["system"], "You translate emergency alerts.");
    assert_eq!(value["max_tokens"], 512);
}

#[test]
fn test_ollama_extractText_shouldReturnResponse() {
    let response: GenerationResponse =
        serde_json::from_str(r#"{ "model": "llama3", "response": "Heavy rain warning", "done": true }"#).unwrap();
    assert_eq!(Ollama::extract_text(&response), "Heavy rain warning");

    let request = serde_json::to_value(GenerationRequest::new("llama3", "호우 경보").system("Translate")).unwrap();
    assert_eq!(request["stream"], false);
}

#[test]
fn test_baseUrlFromEndpoint_shouldNormalize() {
    assert_eq!(base_url_from_endpoint("localhost").unwrap(), "http://localhost:11434");
    assert_eq!(base_url_from_endpoint("http://gpu-box:8080/").unwrap(), "http://gpu-box:8080");
    assert_eq!(base_url_from_endpoint("https://ollama.example.org").unwrap(), "https://ollama.example.org:443");
    assert!(base_url_from_endpoint("").is_err());
}

#[test]
fn test_providerError_fromStatus_shouldMapVariants() {
    assert!(matches!(ProviderError::from_status(401, "no"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(403, "no"), ProviderError::AuthenticationError(_)));
    assert!(matches!(ProviderError::from_status(429, "slow"), ProviderError::RateLimitExceeded(_)));
    assert!(matches!(
        ProviderError::from_status(500, "boom"),
        ProviderError::ApiError { status_code: 500, .. }
    ));
}

#[test]
fn test_providerError_isRetryable() {
    assert!(ProviderError::Timeout(Duration::from_secs(1)).is_retryable());
    assert!(ProviderError::from_status(503, "busy").is_retryable());
    assert!(ProviderError::from_status(429, "slow").is_retryable());
    assert!(!ProviderError::from_status(400, "bad").is_retryable());
    assert!(!ProviderError::from_status(401, "no").is_retryable());
    assert!(!ProviderError::EmptyResponse.is_retryable());
}

/// Test the OpenAI provider against the live API
#[tokio::test]
#[ignore]
async fn test_openai_provider_withValidApiKey_shouldComplete() {
    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        return;
    }

    let client = OpenAI::new(api_key, "https://api.openai.com/v1", Duration::from_secs(30));
    let request = OpenAIRequest::new("gpt-4o-mini")
        .add_message("system", "Translate the Korean text into English.")
        .add_message("user", "태풍 경보")
        .max_tokens(20);

    let response = client.complete(request).await.unwrap();
    assert!(!OpenAI::extract_text(&response).is_empty());
}

/// Test the Anthropic provider against the live API
#[tokio::test]
#[ignore]
async fn test_anthropic_provider_withValidApiKey_shouldComplete() {
    let api_key = std::env::var("ANTHROPIC_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        return;
    }

    let client = Anthropic::new(api_key, "https://api.anthropic.com", Duration::from_secs(60));
    let request = AnthropicRequest::new("claude-3-haiku-20240307", 64)
        .system("Translate the Korean text into English.")
        .add_message("user", "태풍 경보");

    let response = client.complete(request).await.unwrap();
    assert!(!Anthropic::extract_text(&response).is_empty());
}

/// Test the Ollama provider against a local server
#[tokio::test]
#[ignore]
async fn test_ollama_provider_withLocalServer_shouldReportVersion() {
    let client = Ollama::new("http://localhost:11434", Duration::from_secs(5)).unwrap();
    if let Ok(version) = client.version().await {
        assert!(!version.is_empty());
    }
}

#[test]
fn test_requestFor_shouldMapPromptOntoEachWireFormat() {
    let prompt = CompletionPrompt {
        model: "llama3",
        system: "Translate emergency alerts into Thai.",
        text: "산사태 주의보",
        temperature: 0.1,
        max_tokens: 200,
    };

    let ollama = serde_json::to_value(Ollama::request_for(&prompt)).unwrap();
    assert_eq!(ollama["prompt"], "산사태 주의보");
    assert_eq!(ollama["options"]["num_predict"], 200);
    assert_eq!(ollama["stream"], false);

    let anthropic = serde_json::to_value(Anthropic::request_for(&prompt)).unwrap();
    assert_eq!(anthropic["system"], "Translate emergency alerts into Thai.");
    assert_eq!(anthropic["messages"][0]["role"], "user");
}

#[test]
fn test_ollama_tokenUsage_requiresBothCounts() {
    let full: GenerationResponse =
        serde_json::from_str(r#"{"response":"Landslide advisory","done":true,"prompt_eval_count":20,"eval_count":4}"#)
            .unwrap();
    assert_eq!(Ollama::token_usage(&full), Some((20, 4)));

    let partial: GenerationResponse = serde_json::from_str(r#"{"response":"x","eval_count":4}"#).unwrap();
    assert_eq!(Ollama::token_usage(&partial), None);
}
