use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings of one assessment run, stored as `conf.json`
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language code of the notices (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language codes assessed by default (ISO)
    #[serde(default = "default_target_languages")]
    pub target_languages: Vec<String>,

    /// External lexicon asset; the built-in lexicon is used when absent
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,

    /// Provider selection and call settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Verbosity of the stderr logger
    #[serde(default)]
    pub log_level: LogLevel,
}

/// LLM backend used for forward and back translation
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    Ollama,
    #[default]
    OpenAI,
    Anthropic,
    // @provider: OpenAI-compatible local server
    LMStudio,
}

/// Built-in settings of a provider
struct ProviderDefaults {
    model: &'static str,
    endpoint: &'static str,
    timeout_secs: u64,
    rate_limit: Option<u32>,
}

const GENERIC_TIMEOUT_SECS: u64 = 30;

impl TranslationProvider {
    // @returns: Human-readable name for logs and errors
    pub fn display_name(&self) -> &str {
        match self {
            Self::Ollama => "Ollama",
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::LMStudio => "LM Studio",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ollama => "ollama",
            Self::OpenAI => "openai",
            Self::Anthropic => "anthropic",
            Self::LMStudio => "lmstudio",
        }
    }

    // @returns: Whether calls go to a hosted API that needs a key
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::Anthropic)
    }

    fn defaults(&self) -> ProviderDefaults {
        match self {
            Self::Ollama => ProviderDefaults {
                model: "llama3",
                endpoint: "http://localhost:11434",
                timeout_secs: GENERIC_TIMEOUT_SECS,
                rate_limit: None,
            },
            Self::OpenAI => ProviderDefaults {
                model: "gpt-4o-mini",
                endpoint: "https://api.openai.com/v1",
                timeout_secs: GENERIC_TIMEOUT_SECS,
                rate_limit: Some(60),
            },
            Self::Anthropic => ProviderDefaults {
                model: "claude-3-haiku-20240307",
                endpoint: "https://api.anthropic.com",
                timeout_secs: 60,
                rate_limit: Some(45),
            },
            // Model name is a placeholder for whatever LM Studio has loaded
            Self::LMStudio => ProviderDefaults {
                model: "local-model",
                endpoint: "http://localhost:1234/v1",
                timeout_secs: GENERIC_TIMEOUT_SECS,
                rate_limit: None,
            },
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            "lmstudio" => Ok(Self::LMStudio),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Per-provider entry of `available_providers`; empty fields fall back to built-in defaults
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Lowercase provider identifier, e.g. `ollama`
    #[serde(rename = "type")]
    pub provider_type: String,

    #[serde(default)]
    pub model: String,

    #[serde(default)]
    pub api_key: String,

    /// Base URL of the service
    #[serde(default)]
    pub endpoint: String,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Requests per minute; also the floor for retry delays
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl ProviderConfig {
    /// Entry holding the built-in defaults of `provider_type`
    pub fn new(provider_type: TranslationProvider) -> Self {
        let defaults = provider_type.defaults();
        Self {
            provider_type: provider_type.as_str().to_string(),
            model: defaults.model.to_string(),
            api_key: String::new(),
            endpoint: defaults.endpoint.to_string(),
            timeout_secs: defaults.timeout_secs,
            rate_limit: defaults.rate_limit,
        }
    }
}

/// Which provider translates, and how each one is reached
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Settings per provider; the active one is looked up by `provider`
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Call settings shared by every provider
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Override for the forward translation prompt.
    /// Placeholders: {source_language}, {target_language}
    #[serde(default)]
    pub system_prompt: Option<String>,

    /// Override for the back-translation prompt, same placeholders
    #[serde(default)]
    pub reverse_system_prompt: Option<String>,

    /// Retries after a transient provider failure
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// First retry delay in milliseconds, doubled per attempt
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Sampling temperature; low values keep notices literal
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens generated per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Limit in seconds on one translation including its retries.
    /// Zero derives it from the provider timeout and the retry settings.
    #[serde(default)]
    pub call_timeout_secs: u64,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            system_prompt: None,
            reverse_system_prompt: None,
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            call_timeout_secs: 0,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The matching `log` filter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_source_language() -> String {
    "ko".to_string()
}

fn default_target_languages() -> Vec<String> {
    ["en", "zh", "ja", "vi", "th"].iter().map(|code| code.to_string()).collect()
}

fn default_timeout_secs() -> u64 {
    GENERIC_TIMEOUT_SECS
}

fn default_retry_count() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_temperature() -> f32 {
    0.2
}

fn default_max_tokens() -> u32 {
    1024
}

impl Config {
    /// Load the configuration from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Load the configuration, writing a default file first when none exists
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::from_file(path);
        }

        let config = Self::default();
        match config.save_to_file(path) {
            Ok(()) => info!("Created default configuration at {}", path.display()),
            Err(e) => warn!("Could not write default configuration: {}", e),
        }
        Ok(config)
    }

    /// Check language codes and the API key of hosted providers
    pub fn validate(&self) -> Result<()> {
        crate::language_utils::validate_language_code(&self.source_language)?;

        if self.target_languages.is_empty() {
            return Err(anyhow!("At least one target language is required"));
        }
        for code in &self.target_languages {
            crate::language_utils::validate_language_code(code)?;
            if crate::language_utils::language_codes_match(code, &self.source_language) {
                return Err(anyhow!(
                    "Target language '{}' is the same as the source language",
                    code
                ));
            }
        }

        let provider = self.translation.provider;
        if provider.requires_api_key() && self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                provider.display_name()
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_languages: default_target_languages(),
            lexicon_path: None,
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Entry of the selected provider, if configured
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        self.get_provider_config(self.provider)
    }

    /// Entry of `provider_type`, if configured
    pub fn get_provider_config(&self, provider_type: TranslationProvider) -> Option<&ProviderConfig> {
        self.available_providers
            .iter()
            .find(|p| p.provider_type == provider_type.as_str())
    }

    /// Entry of the selected provider, added with defaults when missing
    pub fn active_provider_config_mut(&mut self) -> &mut ProviderConfig {
        let provider = self.provider;
        let index = match self
            .available_providers
            .iter()
            .position(|p| p.provider_type == provider.as_str())
        {
            Some(index) => index,
            None => {
                self.available_providers.push(ProviderConfig::new(provider));
                self.available_providers.len() - 1
            }
        };
        &mut self.available_providers[index]
    }

    /// Non-empty configured string, else the built-in default
    fn configured_or(&self, field: impl Fn(&ProviderConfig) -> &str, fallback: &str) -> String {
        match self.get_active_provider_config().map(field) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn get_model(&self) -> String {
        self.configured_or(|config| config.model.as_str(), self.provider.defaults().model)
    }

    /// Empty when none is configured
    pub fn get_api_key(&self) -> String {
        self.configured_or(|config| config.api_key.as_str(), "")
    }

    pub fn get_endpoint(&self) -> String {
        self.configured_or(|config| config.endpoint.as_str(), self.provider.defaults().endpoint)
    }

    /// Per-call timeout; zero in the file means the provider default
    pub fn get_timeout(&self) -> Duration {
        let secs = self
            .get_active_provider_config()
            .map(|config| config.timeout_secs)
            .filter(|secs| *secs > 0)
            .unwrap_or_else(|| self.provider.defaults().timeout_secs);
        Duration::from_secs(secs)
    }

    /// Requests per minute allowed by the provider
    pub fn get_rate_limit(&self) -> Option<u32> {
        match self.get_active_provider_config() {
            Some(config) => config.rate_limit,
            None => self.provider.defaults().rate_limit,
        }
    }

    /// Delay before retry number `attempt` (zero-based): doubling backoff,
    /// never faster than the rate limit allows
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        let backoff_ms = self.common.retry_backoff_ms.saturating_mul(1u64 << attempt.min(16));
        let rate_limit_ms = self
            .get_rate_limit()
            .filter(|limit| *limit > 0)
            .map(|limit| 60_000 / u64::from(limit))
            .unwrap_or(0);
        Duration::from_millis(backoff_ms.max(rate_limit_ms))
    }

    /// Limit on one translation with all of its retries.
    ///
    /// Unless `call_timeout_secs` is set, this leaves room for every attempt to
    /// run into the provider timeout plus every retry delay.
    pub fn get_call_timeout(&self) -> Duration {
        if self.common.call_timeout_secs > 0 {
            return Duration::from_secs(self.common.call_timeout_secs);
        }

        let attempts = self.common.retry_count.saturating_add(1);
        (0..self.common.retry_count)
            .map(|attempt| self.retry_delay(attempt))
            .fold(self.get_timeout().saturating_mul(attempts), |total, delay| {
                total.saturating_add(delay)
            })
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            available_providers: vec![
                ProviderConfig::new(TranslationProvider::Ollama),
                ProviderConfig::new(TranslationProvider::OpenAI),
                ProviderConfig::new(TranslationProvider::Anthropic),
                ProviderConfig::new(TranslationProvider::LMStudio),
            ],
            common: TranslationCommonConfig::default(),
        }
    }
}
