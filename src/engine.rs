/*!
 * Engine API for the CLI and other front ends.
 *
 * `QualityEngine` ties the lexicon store, a translator and the fan-out
 * orchestrator together. It is built once; a lexicon load failure prevents
 * it from being built at all.
 */

use log::info;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::errors::{AppError, LexiconLoadError};
use crate::lexicon::{LexiconSource, LexiconStore};
use crate::pipeline::{AssessmentPipeline, FanOutOrchestrator, ResultMap, TranslationRecord};
use crate::quality;
use crate::translation::{TranslationService, Translator};

/// Translation quality assessment engine
pub struct QualityEngine {
    /// Shared, reloadable lexicon
    lexicon: Arc<LexiconStore>,
    /// Translator used for every assessment
    translator: Arc<dyn Translator>,
    /// Fan-out and accumulated results
    orchestrator: FanOutOrchestrator,
}

impl QualityEngine {
    /// Create an engine over a loaded lexicon and a translator
    pub fn new(lexicon: Arc<LexiconStore>, translator: Arc<dyn Translator>, source_language: &str) -> Self {
        let pipeline = AssessmentPipeline::new(Arc::clone(&lexicon), source_language);
        Self {
            lexicon,
            translator,
            orchestrator: FanOutOrchestrator::new(pipeline),
        }
    }

    /// Build the engine described by a configuration, using the LLM translator
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let source = LexiconSource::from_optional_path(config.lexicon_path.clone());
        let lexicon = Arc::new(LexiconStore::load(source)?);

        let service = TranslationService::new(config.translation.clone(), &config.source_language)?
            .with_lexicon(Arc::clone(&lexicon));
        let timeout = config.translation.get_call_timeout();
        info!(
            "Translation limits: {:?} per request, {:?} per call with retries",
            config.translation.get_timeout(),
            timeout
        );

        Ok(Self::new(lexicon, Arc::new(service), &config.source_language).with_call_timeout(timeout))
    }

    /// Limit each translation call to `timeout`
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.orchestrator = self.orchestrator.with_call_timeout(timeout);
        self
    }

    /// Report each record as soon as its language completes
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TranslationRecord) + Send + Sync + 'static,
    {
        self.orchestrator = self.orchestrator.with_progress(callback);
        self
    }

    /// Assess `original` in every requested language
    pub async fn assess<S: AsRef<str>>(&self, original: &str, target_languages: &[S]) -> ResultMap {
        self.orchestrator
            .run_all(original, target_languages, Arc::clone(&self.translator))
            .await
    }

    /// Like `assess`, but stops when `cancel` resolves and keeps completed languages
    pub async fn assess_until<S, C>(&self, original: &str, target_languages: &[S], cancel: C) -> ResultMap
    where
        S: AsRef<str>,
        C: Future<Output = ()>,
    {
        self.orchestrator
            .run_all_until(original, target_languages, Arc::clone(&self.translator), cancel)
            .await
    }

    /// Term warnings for live input hints; no translation involved
    pub fn warnings_for(&self, original: &str) -> Vec<String> {
        quality::warnings(original, &self.lexicon.snapshot())
    }

    /// All records accumulated so far
    pub fn results(&self) -> ResultMap {
        self.orchestrator.results()
    }

    /// Re-read the lexicon source; the current lexicon stays on failure
    pub fn reload_lexicon(&self) -> Result<(), LexiconLoadError> {
        self.lexicon.reload().map(|_| ())
    }

    /// The lexicon store
    pub fn lexicon(&self) -> &Arc<LexiconStore> {
        &self.lexicon
    }

    /// Source language of the notices
    pub fn source_language(&self) -> &str {
        self.orchestrator.pipeline().source_language()
    }
}
