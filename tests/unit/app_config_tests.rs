/*!
 * Tests for application configuration functionality
 */

use std::time::Duration;

use alertqa::app_config::{Config, LogLevel, ProviderConfig, TranslationProvider};

use crate::common::{create_temp_dir, create_test_file};

fn valid_config() -> Config {
    let mut config = Config::default();
    config.translation.active_provider_config_mut().api_key = "sk-test".to_string();
    config
}

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "ko");
    assert_eq!(config.target_languages, vec!["en", "zh", "ja", "vi", "th"]);
    assert_eq!(config.lexicon_path, None);
    assert_eq!(config.translation.provider, TranslationProvider::OpenAI);
    assert_eq!(config.log_level, LogLevel::Info);

    let openai = config
        .translation
        .get_provider_config(TranslationProvider::OpenAI)
        .expect("OpenAI provider config should exist");
    assert_eq!(openai.model, "gpt-4o-mini");
    assert_eq!(openai.timeout_secs, 30);
    assert_eq!(config.translation.get_timeout(), Duration::from_secs(30));
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = valid_config();
    assert!(config.validate().is_ok());

    // Hosted provider without a key
    let mut no_key = Config::default();
    no_key.translation.active_provider_config_mut().api_key.clear();
    assert!(no_key.validate().is_err());

    // Invalid source language
    config.source_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.source_language = "ko".to_string();

    // Target equal to the source language
    config.target_languages = vec!["en".to_string(), "kor".to_string()];
    assert!(config.validate().is_err());

    // No targets
    config.target_languages.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_config_validation_localProvider_shouldNotNeedKey() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_saveAndLoad_shouldRoundTrip() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = valid_config();
    config.target_languages = vec!["en".to_string(), "th".to_string()];
    config.log_level = LogLevel::Debug;
    config.save_to_file(&path).unwrap();

    let loaded = Config::from_file(&path).unwrap();
    assert_eq!(loaded.target_languages, vec!["en", "th"]);
    assert_eq!(loaded.log_level, LogLevel::Debug);
    assert_eq!(loaded.translation.get_api_key(), "sk-test");
}

#[test]
fn test_config_loadOrCreate_missingFile_shouldWriteDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(config.source_language, "ko");
}

#[test]
fn test_config_partialFile_shouldFillDefaults() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "conf.json",
        r#"{
            "target_languages": ["vi"],
            "translation": {
                "provider": "ollama",
                "available_providers": [{ "type": "ollama", "model": "qwen2", "timeout_secs": 5 }]
            }
        }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.source_language, "ko");
    assert_eq!(config.target_languages, vec!["vi"]);
    assert_eq!(config.translation.provider, TranslationProvider::Ollama);
    assert_eq!(config.translation.get_model(), "qwen2");
    assert_eq!(config.translation.get_endpoint(), "http://localhost:11434");
    assert_eq!(config.translation.get_timeout(), Duration::from_secs(5));
    assert_eq!(config.translation.common.retry_count, 2);
}

#[test]
fn test_config_malformedFile_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "conf.json", "{ broken").unwrap();
    assert!(Config::from_file(&path).is_err());
}

#[test]
fn test_activeProviderConfigMut_missingProvider_shouldInsertDefaults() {
    let mut config = Config::default();
    config.translation.available_providers.clear();
    config.translation.provider = TranslationProvider::Anthropic;

    config.translation.active_provider_config_mut().api_key = "key".to_string();

    assert_eq!(config.translation.available_providers.len(), 1);
    assert_eq!(config.translation.get_model(), ProviderConfig::new(TranslationProvider::Anthropic).model);
    assert_eq!(config.translation.get_api_key(), "key");
}

#[test]
fn test_translationProvider_fromStr_shouldAcceptKnownNames() {
    assert_eq!("lmstudio".parse::<TranslationProvider>().unwrap(), TranslationProvider::LMStudio);
    assert_eq!("OpenAI".parse::<TranslationProvider>().unwrap(), TranslationProvider::OpenAI);
    assert!("deepl".parse::<TranslationProvider>().is_err());
    assert!("warning".parse::<LogLevel>().is_ok());
}

#[test]
fn test_callTimeout_default_shouldLeaveRoomForEveryRetry() {
    let mut config = Config::default();

    // OpenAI: 3 attempts of 30s, then 1s and 2s of backoff between them
    assert_eq!(config.translation.get_call_timeout(), Duration::from_secs(93));
    assert!(config.translation.get_call_timeout() > config.translation.get_timeout());

    config.translation.common.retry_count = 0;
    assert_eq!(config.translation.get_call_timeout(), Duration::from_secs(30));
}

#[test]
fn test_callTimeout_explicit_shouldOverrideDerivedLimit() {
    let mut config = Config::default();
    config.translation.common.call_timeout_secs = 10;
    assert_eq!(config.translation.get_call_timeout(), Duration::from_secs(10));
}
