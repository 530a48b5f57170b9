/*!
 * Fan-out orchestrator for multi-language assessment.
 *
 * One task per requested language, each behind its own panic boundary. Tasks
 * write only their own key into the shared result map, so a slow or failing
 * language never holds back the others. The map accumulates across calls:
 * languages that are not requested keep their previous records.
 */

use futures::FutureExt;
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

use super::assessment::AssessmentPipeline;
use super::record::TranslationRecord;
use crate::translation::Translator;

/// Called once per language as soon as its record is stored
pub type ProgressCallback = Arc<dyn Fn(&TranslationRecord) + Send + Sync>;

/// Result map keyed by language code
pub type ResultMap = HashMap<String, TranslationRecord>;

/// Runs one assessment pipeline per target language concurrently
#[derive(Clone)]
pub struct FanOutOrchestrator {
    /// Pipeline cloned into each task
    pipeline: AssessmentPipeline,
    /// Accumulated records; each task writes only its own key
    results: Arc<Mutex<ResultMap>>,
    /// Optional per-language completion hook
    progress: Option<ProgressCallback>,
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl FanOutOrchestrator {
    /// Create an orchestrator with an empty result map
    pub fn new(pipeline: AssessmentPipeline) -> Self {
        Self {
            pipeline,
            results: Arc::new(Mutex::new(HashMap::new())),
            progress: None,
        }
    }

    /// Report each record as soon as its language completes
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&TranslationRecord) + Send + Sync + 'static,
    {
        self.progress = Some(Arc::new(callback));
        self
    }

    /// Limit each translation call to `timeout`
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.pipeline = self.pipeline.with_call_timeout(timeout);
        self
    }

    /// The pipeline run for each language
    pub fn pipeline(&self) -> &AssessmentPipeline {
        &self.pipeline
    }

    /// Assess `original` in every requested language and wait for all of them.
    ///
    /// Returns the accumulated result map. Dropping the returned future
    /// aborts the languages still in flight.
    pub async fn run_all<S: AsRef<str>>(
        &self,
        original: &str,
        target_languages: &[S],
        translator: Arc<dyn Translator>,
    ) -> ResultMap {
        self.run_all_until(original, target_languages, translator, std::future::pending::<()>())
            .await
    }

    /// Like `run_all`, but stops when `cancel` resolves.
    ///
    /// In-flight languages are aborted; records already stored are kept and
    /// returned.
    pub async fn run_all_until<S, C>(
        &self,
        original: &str,
        target_languages: &[S],
        translator: Arc<dyn Translator>,
        cancel: C,
    ) -> ResultMap
    where
        S: AsRef<str>,
        C: Future<Output = ()>,
    {
        let mut tasks = JoinSet::new();
        let mut requested = HashSet::new();

        for code in target_languages {
            let code = code.as_ref().trim().to_string();
            if code.is_empty() || !requested.insert(code.clone()) {
                continue;
            }

            let pipeline = self.pipeline.clone();
            let translator = Arc::clone(&translator);
            let results = Arc::clone(&self.results);
            let progress = self.progress.clone();
            let original = original.to_string();

            tasks.spawn(async move {
                let record = AssertUnwindSafe(pipeline.run(translator.as_ref(), &original, &code))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|panic| {
                        let reason = panic_message(&*panic);
                        error!("Assessment for {} panicked: {}", code, reason);
                        TranslationRecord::degraded(&code, &original, format!("assessment panicked: {}", reason))
                    });

                debug!("{} finished with score {}", code, record.final_score());
                if let Some(progress) = &progress {
                    progress(&record);
                }
                results.lock().insert(code, record);
            });
        }

        info!("Assessing {} language(s)", requested.len());

        tokio::pin!(cancel);
        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok(())) => {}
                    Some(Err(e)) => error!("Assessment task failed: {}", e),
                    None => break,
                },
                _ = &mut cancel => {
                    warn!("Assessment cancelled with {} language(s) still running", tasks.len());
                    tasks.abort_all();
                    break;
                }
            }
        }

        self.results()
    }

    /// Snapshot of all accumulated records
    pub fn results(&self) -> ResultMap {
        self.results.lock().clone()
    }

    /// The stored record for one language
    pub fn result(&self, language: &str) -> Option<TranslationRecord> {
        self.results.lock().get(language).cloned()
    }

    /// Forget all accumulated records
    pub fn clear(&self) {
        self.results.lock().clear();
    }
}
