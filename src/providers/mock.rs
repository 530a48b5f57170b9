/*!
 * Mock translator implementations for testing.
 *
 * This module provides a scripted translator that simulates different behaviors:
 * - `MockTranslator::working()` - Always succeeds with a tagged translation
 * - `MockTranslator::failing()` - Always fails with an API error
 * - `MockTranslator::empty()` - Answers with an empty string
 * - `MockTranslator::panicking()` - Panics inside the call
 *
 * Behaviors can be narrowed per language with `fail_for`, `panic_for` and
 * `with_delay`, and the produced text can be scripted with `with_responder`.
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::translation::Translator;

/// A recorded translation call
#[derive(Debug, Clone, PartialEq)]
pub struct MockRequest {
    /// The text to translate
    pub text: String,
    /// Target language
    pub target_language: String,
}

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds
    Working,
    /// Always fails with an error
    Failing,
    /// Returns an empty response
    Empty,
    /// Panics inside the call
    Panicking,
}

type Responder = Arc<dyn Fn(&MockRequest) -> String + Send + Sync>;

/// Scripted translator for testing pipelines and the orchestrator
#[derive(Clone)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Languages whose calls fail regardless of behavior
    failing_languages: HashSet<String>,
    /// Languages whose calls panic regardless of behavior
    panicking_languages: HashSet<String>,
    /// Simulated latency per target language
    delays: HashMap<String, Duration>,
    /// Custom response generator (optional)
    responder: Option<Responder>,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Every call, in arrival order
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            failing_languages: HashSet::new(),
            panicking_languages: HashSet::new(),
            delays: HashMap::new(),
            responder: None,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a working mock translator that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock translator that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock translator that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    /// Create a mock translator that panics on every call
    pub fn panicking() -> Self {
        Self::new(MockBehavior::Panicking)
    }

    /// Fail every call whose target is one of `languages`
    pub fn fail_for<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.failing_languages.extend(languages.into_iter().map(Into::into));
        self
    }

    /// Panic on every call whose target is one of `languages`
    pub fn panic_for<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.panicking_languages.extend(languages.into_iter().map(Into::into));
        self
    }

    /// Delay every call whose target is `language`
    pub fn with_delay(mut self, language: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(language.into(), delay);
        self
    }

    /// Set a custom response generator
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&MockRequest) -> String + Send + Sync + 'static,
    {
        self.responder = Some(Arc::new(responder));
        self
    }

    /// Number of calls received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// All calls received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    /// Default rendering when no responder is set
    pub fn tagged(request: &MockRequest) -> String {
        format!("[{}] {}", request.target_language, request.text)
    }
}

impl fmt::Debug for MockTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockTranslator")
            .field("behavior", &self.behavior)
            .field("failing_languages", &self.failing_languages)
            .field("panicking_languages", &self.panicking_languages)
            .field("delays", &self.delays)
            .field("request_count", &self.request_count())
            .finish()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        let request = MockRequest {
            text: text.to_string(),
            target_language: target_language.to_string(),
        };
        self.requests.lock().push(request.clone());

        if let Some(delay) = self.delays.get(target_language) {
            tokio::time::sleep(*delay).await;
        }

        if self.behavior == MockBehavior::Panicking || self.panicking_languages.contains(target_language) {
            panic!("mock translator panicked for {}", target_language);
        }

        if self.behavior == MockBehavior::Failing || self.failing_languages.contains(target_language) {
            return Err(ProviderError::ApiError {
                status_code: 503,
                message: format!("mock failure for {}", target_language),
            });
        }

        if self.behavior == MockBehavior::Empty {
            return Ok(String::new());
        }

        Ok(match &self.responder {
            Some(responder) => responder(&request),
            None => Self::tagged(&request),
        })
    }
}
