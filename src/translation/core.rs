/*!
 * Core translation service implementation.
 *
 * This module contains the `TranslationService`, the LLM-backed `Translator`
 * used outside of tests. It dispatches to the configured provider, picks the
 * forward or reverse prompt, caches results and retries transient failures.
 */

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::cache::TranslationCache;
use super::prompts::{term_guidance, PromptTemplate};
use super::translator::Translator;
use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::errors::ProviderError;
use crate::language_utils;
use crate::lexicon::LexiconStore;
use crate::providers::anthropic::Anthropic;
use crate::providers::ollama::Ollama;
use crate::providers::openai::OpenAI;
use crate::providers::{Completion, CompletionPrompt, Provider};

/// Translation provider implementation variants
enum TranslationProviderImpl {
    /// Ollama LLM service
    Ollama {
        /// Client instance
        client: Ollama,
    },

    /// OpenAI API service
    OpenAI {
        /// Client instance
        client: OpenAI,
    },

    /// LM Studio local server (OpenAI-compatible)
    LMStudio {
        /// Client instance (OpenAI-compatible)
        client: OpenAI,
    },

    /// Anthropic API service
    Anthropic {
        /// Client instance
        client: Anthropic,
    },
}

/// LLM-backed translator for emergency notices
pub struct TranslationService {
    /// Provider implementation
    provider: TranslationProviderImpl,

    /// Configuration for the translation service
    pub config: TranslationConfig,

    /// Language the notices are written in; translating into it uses the reverse prompt
    source_language: String,

    /// Forward prompt template
    forward_prompt: PromptTemplate,

    /// Back-translation prompt template
    reverse_prompt: PromptTemplate,

    /// Lexicon whose entries are named in forward prompts
    lexicon: Option<Arc<LexiconStore>>,

    /// Translation cache for storing and retrieving translations
    pub cache: TranslationCache,
}

impl TranslationService {
    /// Create a new translation service with the given configuration
    pub fn new(config: TranslationConfig, source_language: &str) -> Result<Self> {
        let timeout = config.get_timeout();
        let provider = match config.provider {
            ConfigTranslationProvider::Ollama => TranslationProviderImpl::Ollama {
                client: Ollama::new(&config.get_endpoint(), timeout)?,
            },
            ConfigTranslationProvider::OpenAI => TranslationProviderImpl::OpenAI {
                client: OpenAI::new(config.get_api_key(), config.get_endpoint(), timeout),
            },
            ConfigTranslationProvider::LMStudio => {
                // LM Studio often doesn't require an API key; use a default if empty
                let api_key = match config.get_api_key() {
                    key if key.is_empty() => "lm-studio".to_string(),
                    key => key,
                };
                TranslationProviderImpl::LMStudio {
                    client: OpenAI::new(api_key, config.get_endpoint(), timeout),
                }
            }
            ConfigTranslationProvider::Anthropic => TranslationProviderImpl::Anthropic {
                client: Anthropic::new(config.get_api_key(), config.get_endpoint(), timeout),
            },
        };

        let forward_prompt = config
            .common
            .system_prompt
            .as_deref()
            .map(PromptTemplate::new)
            .unwrap_or_else(PromptTemplate::emergency_translator);
        let reverse_prompt = config
            .common
            .reverse_system_prompt
            .as_deref()
            .map(PromptTemplate::new)
            .unwrap_or_else(PromptTemplate::reverse_translator);

        info!(
            "Translation service ready: {} with model {}",
            config.provider.display_name(),
            config.get_model()
        );

        Ok(Self {
            provider,
            config,
            source_language: source_language.to_string(),
            forward_prompt,
            reverse_prompt,
            lexicon: None,
            cache: TranslationCache::new(true),
        })
    }

    /// Name the lexicon terms found in each notice in the forward prompt
    pub fn with_lexicon(mut self, lexicon: Arc<LexiconStore>) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    /// Test the connection to the translation provider
    pub async fn test_connection(&self) -> Result<(), ProviderError> {
        info!(
            "Testing connection to {} with model {}",
            self.config.provider.display_name(),
            self.config.get_model()
        );
        let result = match &self.provider {
            TranslationProviderImpl::Ollama { client } => client.test_connection().await,
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                client.test_connection().await
            }
            TranslationProviderImpl::Anthropic { client } => client.test_connection().await,
        };
        if let Err(e) = &result {
            warn!("Failed to connect to {}: {}", self.config.provider.display_name(), e);
        }
        result
    }

    /// The system prompt for translating `text` into `target_language`
    pub fn system_prompt_for(&self, target_language: &str, text: &str) -> String {
        if language_utils::language_codes_match(target_language, &self.source_language) {
            // Reverse call: the text is in some target language, unknown here
            return self
                .reverse_prompt
                .render("given", &language_utils::display_name(&self.source_language));
        }

        let prompt = self.forward_prompt.render(
            &language_utils::display_name(&self.source_language),
            &language_utils::display_name(target_language),
        );
        let guidance = self
            .lexicon
            .as_ref()
            .and_then(|store| term_guidance(&store.snapshot(), text, target_language));
        match guidance {
            Some(guidance) => format!("{}\n\n{}", prompt, guidance),
            None => prompt,
        }
    }

    /// One provider call without cache or retry
    async fn complete_once(&self, system_prompt: &str, text: &str) -> Result<String, ProviderError> {
        let model = self.config.get_model();
        let prompt = CompletionPrompt {
            model: &model,
            system: system_prompt,
            text,
            temperature: self.config.common.temperature,
            max_tokens: self.config.common.max_tokens,
        };

        let Completion { text, usage } = match &self.provider {
            TranslationProviderImpl::Ollama { client } => client.run(&prompt).await?,
            TranslationProviderImpl::OpenAI { client } | TranslationProviderImpl::LMStudio { client } => {
                client.run(&prompt).await?
            }
            TranslationProviderImpl::Anthropic { client } => client.run(&prompt).await?,
        };

        if let Some((prompt_tokens, completion_tokens)) = usage {
            debug!(
                "{} usage: {} prompt / {} completion tokens",
                self.config.provider.display_name(),
                prompt_tokens,
                completion_tokens
            );
        }
        Ok(text)
    }

    /// Delay before retry number `attempt` (zero-based)
    fn retry_delay(&self, attempt: u32) -> Duration {
        self.config.retry_delay(attempt)
    }
}

#[async_trait]
impl Translator for TranslationService {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        if let Some(cached) = self.cache.get(text, target_language) {
            return Ok(cached);
        }

        let system_prompt = self.system_prompt_for(target_language, text);
        let max_retries = self.config.common.retry_count;
        let start_time = Instant::now();
        let mut attempt = 0;

        loop {
            let result = self
                .complete_once(&system_prompt, text)
                .await
                .and_then(|translated| match translated.trim() {
                    "" => Err(ProviderError::EmptyResponse),
                    trimmed => Ok(trimmed.to_string()),
                });

            match result {
                Ok(translated) => {
                    debug!("Translated into {} in {:?}", target_language, start_time.elapsed());
                    self.cache.store(text, target_language, &translated);
                    return Ok(translated);
                }
                Err(e) if e.is_retryable() && attempt < max_retries => {
                    let delay = self.retry_delay(attempt);
                    warn!(
                        "Translation into {} failed ({}), retrying in {:?} ({}/{})",
                        target_language,
                        e,
                        delay,
                        attempt + 1,
                        max_retries
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
