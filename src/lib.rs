/*!
 * # alertqa - translation quality assessment for emergency notices
 *
 * Translates a Korean emergency notice into several languages through an
 * LLM provider, back-translates each result and scores how well the
 * meaning, urgency and disaster terminology survived.
 *
 * ## Features
 *
 * - Lexicon of disaster terminology, ambiguous terms and cultural references
 * - Weighted 0 to 100 quality score per language with a component breakdown
 * - Human-readable warnings and improvement suggestions
 * - Concurrent per-language assessment; one failing language never blocks the others
 * - Translation through Ollama, OpenAI, Anthropic or LM Studio
 *
 * ## Architecture
 *
 * - `lexicon`: lexicon entries and the reloadable `LexiconStore`
 * - `quality`: similarity primitives, the scorer and feedback generation
 * - `translation`: the `Translator` seam and the LLM-backed `TranslationService`
 * - `providers`: API clients for each LLM provider, plus a scriptable mock
 * - `pipeline`: per-language assessment and the fan-out orchestrator
 * - `engine`: `QualityEngine`, the API front ends talk to
 * - `report`: text and JSON rendering of result maps
 * - `app_config`, `app_controller`: configuration and the CLI controller
 * - `errors`: error types
 *
 * ## Example
 *
 * ```no_run
 * use std::sync::Arc;
 * use alertqa::{LexiconSource, LexiconStore, QualityEngine};
 * use alertqa::providers::mock::MockTranslator;
 *
 * # async fn run() -> anyhow::Result<()> {
 * let lexicon = Arc::new(LexiconStore::load(LexiconSource::Builtin)?);
 * let engine = QualityEngine::new(lexicon, Arc::new(MockTranslator::working()), "ko");
 * let results = engine.assess("태풍 경보, 즉시 대피하세요", &["en", "th"]).await;
 * println!("{}", results["en"].final_score());
 * # Ok(())
 * # }
 * ```
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod engine;
pub mod errors;
pub mod language_utils;
pub mod lexicon;
pub mod pipeline;
pub mod providers;
pub mod quality;
pub mod report;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use engine::QualityEngine;
pub use errors::{AppError, LexiconLoadError, ProviderError};
pub use language_utils::{get_language_name, language_codes_match, normalize_language_code};
pub use lexicon::{Lexicon, LexiconSource, LexiconStore};
pub use pipeline::{AssessmentPipeline, FanOutOrchestrator, ResultMap, TranslationRecord};
pub use quality::{QualityGrade, ScoreBreakdown};
pub use translation::{TranslationService, Translator};
