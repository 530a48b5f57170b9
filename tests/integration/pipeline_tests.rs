/*!
 * Integration tests for the per-language assessment pipeline.
 *
 * Uses scripted translators so every run is deterministic and offline.
 */

use std::time::{Duration, Instant};

use alertqa::app_config::{Config, TranslationProvider};
use alertqa::lexicon::Lexicon;
use alertqa::pipeline::record::{FAILURE_SUGGESTION, FAILURE_WARNING};
use alertqa::pipeline::{AssessmentPipeline, RecordStatus, FAILURE_MARKER};
use alertqa::providers::mock::MockTranslator;
use alertqa::translation::TranslationService;

use crate::common::{builtin_store, typhoon_responder, SMALL_LEXICON_JSON, TYPHOON_NOTICE};

fn pipeline() -> AssessmentPipeline {
    AssessmentPipeline::new(builtin_store(), "ko")
}

fn assert_degraded(record: &alertqa::TranslationRecord, reason_prefix: &str) {
    assert!(record.is_degraded());
    assert_eq!(record.translated, FAILURE_MARKER);
    assert_eq!(record.reverse_translated, FAILURE_MARKER);
    assert_eq!(record.final_score(), 0);
    assert_eq!(record.warnings, vec![FAILURE_WARNING.to_string()]);
    assert_eq!(record.suggestions, vec![FAILURE_SUGGESTION.to_string()]);
    let reason = record.failure_reason().unwrap();
    assert!(reason.starts_with(reason_prefix), "unexpected reason: {}", reason);
}

#[tokio::test]
async fn test_run_withWorkingTranslator_shouldTranslateThenBackTranslate() {
    let translator = MockTranslator::working().with_responder(typhoon_responder);
    let record = pipeline().run(&translator, TYPHOON_NOTICE, "en").await;

    assert_eq!(record.status, RecordStatus::Assessed);
    assert_eq!(record.target_language, "en");
    assert_eq!(record.original, TYPHOON_NOTICE);
    assert_eq!(record.translated, "Typhoon warning, evacuate immediately");
    assert_eq!(record.reverse_translated, TYPHOON_NOTICE);

    // Forward call first, then the back-translation into the source language
    let requests = translator.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].text, TYPHOON_NOTICE);
    assert_eq!(requests[0].target_language, "en");
    assert_eq!(requests[1].text, "Typhoon warning, evacuate immediately");
    assert_eq!(requests[1].target_language, "ko");

    assert_eq!(record.score.terminology_score, 100.0);
    assert_eq!(record.score.reverse_translation_score, 100.0);
    assert_eq!(record.final_score(), 100);
    assert_eq!(record.warnings.len(), 2);
    assert!(!record.suggestions.is_empty());
}

#[tokio::test]
async fn test_run_forwardFailure_shouldProduceDegradedRecord() {
    let translator = MockTranslator::failing();
    let record = pipeline().run(&translator, TYPHOON_NOTICE, "th").await;

    assert_degraded(&record, "forward translation failed");
    // The back-translation is never attempted
    assert_eq!(translator.request_count(), 1);
}

#[tokio::test]
async fn test_run_reverseFailure_shouldProduceDegradedRecord() {
    let translator = MockTranslator::working().fail_for(["ko"]);
    let record = pipeline().run(&translator, TYPHOON_NOTICE, "vi").await;

    assert_degraded(&record, "back-translation failed");
    assert_eq!(translator.request_count(), 2);
}

#[tokio::test]
async fn test_run_emptyResponse_shouldBeTreatedAsFailure() {
    let record = pipeline().run(&MockTranslator::empty(), TYPHOON_NOTICE, "ja").await;

    assert_degraded(&record, "forward translation failed");
    assert!(record.failure_reason().unwrap().contains("empty response"));
}

#[tokio::test]
async fn test_run_slowProvider_shouldTimeOutIntoDegradedRecord() {
    let translator = MockTranslator::working().with_delay("zh", Duration::from_secs(5));
    let pipeline = pipeline().with_call_timeout(Duration::from_millis(50));
    assert_eq!(pipeline.call_timeout(), Some(Duration::from_millis(50)));

    let start = Instant::now();
    let record = pipeline.run(&translator, TYPHOON_NOTICE, "zh").await;

    assert!(start.elapsed() < Duration::from_secs(2));
    assert_degraded(&record, "forward translation failed");
    assert!(record.failure_reason().unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_run_shouldUseCurrentLexiconSnapshot() {
    let store = builtin_store();
    let pipeline = AssessmentPipeline::new(store.clone(), "ko");
    let translator = MockTranslator::working();

    let before = pipeline.run(&translator, TYPHOON_NOTICE, "en").await;
    assert_eq!(before.warnings.len(), 2);

    // 태풍 and 대피 are not part of the small lexicon
    store.replace(Lexicon::from_json_str(SMALL_LEXICON_JSON).unwrap()).unwrap();
    let after = pipeline.run(&translator, TYPHOON_NOTICE, "en").await;
    assert!(after.warnings.is_empty());
    assert_eq!(after.score.terminology_score, 100.0);
}

#[tokio::test]
async fn test_run_unreachableProvider_shouldProduceDegradedRecord() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.translation.active_provider_config_mut().endpoint = "http://127.0.0.1:9".to_string();
    config.translation.common.retry_count = 0;

    let service = TranslationService::new(config.translation, "ko").unwrap();
    let pipeline = pipeline().with_call_timeout(Duration::from_secs(10));
    let record = pipeline.run(&service, TYPHOON_NOTICE, "en").await;

    assert_degraded(&record, "forward translation failed");
}

#[test]
fn test_assess_shouldScoreGivenTexts() {
    let lexicon = Lexicon::builtin().unwrap();
    let record = alertqa::pipeline::assess(
        "전주에 호우 경보",
        "Heavy rain warning in the region",
        "지역에 호우 경보",
        "en",
        &lexicon,
    );

    assert_eq!(record.status, RecordStatus::Assessed);
    assert_eq!(record.score.ambiguous_term_score, 80.0);
    assert_eq!(record.score.terminology_score, 100.0);
    assert_eq!(record.warnings.len(), 2);
}
