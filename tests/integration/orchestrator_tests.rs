/*!
 * Integration tests for the fan-out orchestrator.
 *
 * Covers failure isolation between languages, accumulation across runs,
 * streaming progress and cancellation.
 */

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

use alertqa::pipeline::{AssessmentPipeline, FanOutOrchestrator, FAILURE_MARKER};
use alertqa::providers::mock::MockTranslator;
use alertqa::translation::Translator;

use crate::common::{builtin_store, init_test_logging, typhoon_responder, ALERT_TARGETS, TYPHOON_NOTICE};

fn orchestrator() -> FanOutOrchestrator {
    FanOutOrchestrator::new(AssessmentPipeline::new(builtin_store(), "ko"))
}

#[tokio::test]
async fn test_runAll_oneLanguageFails_shouldKeepAllOthers() {
    init_test_logging();
    let translator = MockTranslator::working().with_responder(typhoon_responder).fail_for(["th"]);
    let results = orchestrator()
        .run_all(TYPHOON_NOTICE, &ALERT_TARGETS, Arc::new(translator))
        .await;

    assert_eq!(results.len(), 5);
    let th = &results["th"];
    assert_eq!(th.translated, FAILURE_MARKER);
    assert_eq!(th.final_score(), 0);
    assert!(th.is_degraded());

    for code in ["en", "zh", "ja", "vi"] {
        let record = &results[code];
        assert!(!record.is_degraded(), "{} should be assessed", code);
        assert_eq!(record.target_language, code);
        assert!(record.final_score() > 0);
        assert!(!record.suggestions.is_empty());
    }
}

#[tokio::test]
async fn test_runAll_slowFailingLanguage_shouldNotDelayOthers() {
    let finished: Arc<Mutex<Vec<(String, Duration)>>> = Arc::new(Mutex::new(Vec::new()));
    let start = Instant::now();
    let sink = Arc::clone(&finished);
    let orchestrator = orchestrator().with_progress(move |record| {
        sink.lock().push((record.target_language.clone(), start.elapsed()));
    });

    let translator = MockTranslator::working()
        .fail_for(["th"])
        .with_delay("th", Duration::from_millis(800));
    let results = orchestrator
        .run_all(TYPHOON_NOTICE, &ALERT_TARGETS, Arc::new(translator))
        .await;

    assert_eq!(results.len(), 5);
    let finished = finished.lock().clone();
    assert_eq!(finished.len(), 5);

    // The slow language completes last; everything else is already done
    assert_eq!(finished.last().map(|(code, _)| code.as_str()), Some("th"));
    for (code, elapsed) in &finished {
        if code != "th" {
            assert!(*elapsed < Duration::from_millis(500), "{} took {:?}", code, elapsed);
        }
    }
}

#[tokio::test]
async fn test_runAll_otherLanguages_shouldMatchRunWithoutFailure() {
    let with_failure = orchestrator()
        .run_all(
            TYPHOON_NOTICE,
            &ALERT_TARGETS,
            Arc::new(MockTranslator::working().fail_for(["th"])),
        )
        .await;
    let without = orchestrator()
        .run_all(TYPHOON_NOTICE, &["en", "zh", "ja", "vi"], Arc::new(MockTranslator::working()))
        .await;

    for code in ["en", "zh", "ja", "vi"] {
        assert_eq!(with_failure[code].translated, without[code].translated);
        assert_eq!(with_failure[code].score, without[code].score);
        assert_eq!(with_failure[code].suggestions, without[code].suggestions);
    }
}

#[tokio::test]
async fn test_runAll_repeatedCalls_shouldAccumulateResults() {
    let orchestrator = orchestrator();
    let translator: Arc<dyn Translator> = Arc::new(MockTranslator::working());

    let first = orchestrator.run_all(TYPHOON_NOTICE, &["en"], Arc::clone(&translator)).await;
    assert_eq!(first.len(), 1);
    let first_en = first["en"].clone();

    let second = orchestrator.run_all(TYPHOON_NOTICE, &["th", "vi"], Arc::clone(&translator)).await;
    assert_eq!(second.len(), 3);
    assert_eq!(second["en"], first_en);

    // Re-running a language replaces only that record
    let third = orchestrator.run_all("지진 발생", &["en"], translator).await;
    assert_eq!(third.len(), 3);
    assert_eq!(third["en"].original, "지진 발생");
    assert_eq!(third["th"].original, TYPHOON_NOTICE);

    assert_eq!(orchestrator.result("vi").map(|r| r.target_language), Some("vi".to_string()));
    orchestrator.clear();
    assert!(orchestrator.results().is_empty());
}

#[tokio::test]
async fn test_runAll_duplicateAndBlankCodes_shouldRunOncePerLanguage() {
    let translator = MockTranslator::working();
    let results = orchestrator()
        .run_all(TYPHOON_NOTICE, &["en", " en ", "", "en"], Arc::new(translator.clone()))
        .await;

    assert_eq!(results.len(), 1);
    assert!(results.contains_key("en"));
    assert_eq!(translator.request_count(), 2);
}

#[tokio::test]
async fn test_runAll_emptyRequest_shouldReturnEmptyMap() {
    let translator = MockTranslator::working();
    let results = orchestrator()
        .run_all::<&str>(TYPHOON_NOTICE, &[], Arc::new(translator.clone()))
        .await;

    assert!(results.is_empty());
    assert_eq!(translator.request_count(), 0);
}

#[tokio::test]
async fn test_runAll_panickingLanguage_shouldBeIsolated() {
    let translator = MockTranslator::working().panic_for(["ja"]);
    let results = orchestrator()
        .run_all(TYPHOON_NOTICE, &ALERT_TARGETS, Arc::new(translator))
        .await;

    assert_eq!(results.len(), 5);
    assert!(results["ja"].is_degraded());
    assert!(results["ja"].failure_reason().unwrap().contains("panicked"));
    assert!(!results["en"].is_degraded());
}

#[tokio::test]
async fn test_runAllUntil_cancel_shouldKeepCompletedLanguages() {
    init_test_logging();
    let orchestrator = orchestrator();
    let translator = MockTranslator::working().with_delay("th", Duration::from_secs(5));

    let start = Instant::now();
    let results = orchestrator
        .run_all_until(
            TYPHOON_NOTICE,
            &ALERT_TARGETS,
            Arc::new(translator),
            tokio::time::sleep(Duration::from_millis(200)),
        )
        .await;

    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(results.len(), 4);
    assert!(!results.contains_key("th"));
    assert!(orchestrator.result("th").is_none());
}

#[tokio::test]
async fn test_runAll_withCallTimeout_shouldDegradeOnlySlowLanguage() {
    let orchestrator = orchestrator().with_call_timeout(Duration::from_millis(100));
    let translator = MockTranslator::working().with_delay("vi", Duration::from_secs(5));

    let results = orchestrator
        .run_all(TYPHOON_NOTICE, &ALERT_TARGETS, Arc::new(translator))
        .await;

    assert_eq!(results.len(), 5);
    assert!(results["vi"].is_degraded());
    assert!(results.values().filter(|r| r.is_degraded()).count() == 1);
}
