/*!
 * Assessment pipeline for a single target language.
 *
 * Forward translation, back-translation, then scoring. A failed or timed out
 * translation call ends the run early with a degraded record; errors never
 * leave this module.
 */

use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use super::record::{RecordStatus, TranslationRecord};
use crate::errors::ProviderError;
use crate::lexicon::{Lexicon, LexiconStore};
use crate::quality;
use crate::translation::Translator;

/// Runs one assessment per call; cheap to clone into tasks
#[derive(Clone)]
pub struct AssessmentPipeline {
    /// Lexicon shared with the engine
    lexicon: Arc<LexiconStore>,
    /// Language the notices are written in, used for the reverse call
    source_language: String,
    /// Limit for each translation call
    call_timeout: Option<Duration>,
}

impl AssessmentPipeline {
    /// Create a pipeline without a call timeout
    pub fn new(lexicon: Arc<LexiconStore>, source_language: impl Into<String>) -> Self {
        Self {
            lexicon,
            source_language: source_language.into(),
            call_timeout: None,
        }
    }

    /// Treat translation calls slower than `timeout` as failed
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = Some(timeout);
        self
    }

    /// Source language of the notices
    pub fn source_language(&self) -> &str {
        &self.source_language
    }

    /// The configured call timeout
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }

    /// The lexicon store read by this pipeline
    pub fn lexicon(&self) -> &Arc<LexiconStore> {
        &self.lexicon
    }

    /// Assess `original` in `target_language`. Never fails.
    pub async fn run(&self, translator: &dyn Translator, original: &str, target_language: &str) -> TranslationRecord {
        // One snapshot for the whole run, even if a reload happens meanwhile
        let lexicon = self.lexicon.snapshot();

        let translated = match self.call(translator, original, target_language).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!("Forward translation into {} failed: {}", target_language, e);
                return TranslationRecord::degraded(
                    target_language,
                    original,
                    format!("forward translation failed: {}", e),
                );
            }
        };

        let reverse_translated = match self.call(translator, &translated, &self.source_language).await {
            Ok(reverse_translated) => reverse_translated,
            Err(e) => {
                warn!("Back-translation from {} failed: {}", target_language, e);
                return TranslationRecord::degraded(
                    target_language,
                    original,
                    format!("back-translation failed: {}", e),
                );
            }
        };

        debug!("Scoring {} translation", target_language);
        assess(original, &translated, &reverse_translated, target_language, &lexicon)
    }

    /// One translation call under the configured timeout
    async fn call(&self, translator: &dyn Translator, text: &str, target_language: &str) -> Result<String, ProviderError> {
        let call = translator.translate(text, target_language);
        let translated = match self.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ProviderError::Timeout(limit))??,
            None => call.await?,
        };

        if translated.trim().is_empty() && !text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        Ok(translated)
    }
}

/// Score already translated texts and assemble the record
pub fn assess(
    original: &str,
    translated: &str,
    reverse_translated: &str,
    target_language: &str,
    lexicon: &Lexicon,
) -> TranslationRecord {
    let score = quality::score(original, translated, reverse_translated, target_language, lexicon);
    let warnings = quality::warnings(original, lexicon);
    let suggestions = quality::suggestions(original, translated, reverse_translated, &score, target_language, lexicon);

    TranslationRecord {
        target_language: target_language.to_string(),
        original: original.to_string(),
        translated: translated.to_string(),
        reverse_translated: reverse_translated.to_string(),
        score,
        warnings,
        suggestions,
        created_at: chrono::Utc::now(),
        status: RecordStatus::Assessed,
    }
}
