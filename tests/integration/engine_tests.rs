/*!
 * Integration tests for the engine API, the controller and report rendering.
 */

use std::sync::Arc;

use alertqa::app_config::{Config, TranslationProvider};
use alertqa::app_controller::Controller;
use alertqa::errors::AppError;
use alertqa::lexicon::{Lexicon, LexiconSource, LexiconStore};
use alertqa::providers::mock::MockTranslator;
use alertqa::report::{self, ReportFormat};
use alertqa::QualityEngine;

use crate::common::{
    builtin_store, create_temp_dir, create_test_file, typhoon_responder, ALERT_TARGETS, SMALL_LEXICON_JSON,
    TYPHOON_NOTICE,
};

fn engine(translator: MockTranslator) -> QualityEngine {
    QualityEngine::new(builtin_store(), Arc::new(translator), "ko")
}

#[tokio::test]
async fn test_assess_shouldReturnOneRecordPerLanguage() {
    let engine = engine(MockTranslator::working().with_responder(typhoon_responder).fail_for(["th"]));
    let results = engine.assess(TYPHOON_NOTICE, &ALERT_TARGETS).await;

    assert_eq!(results.len(), 5);
    assert_eq!(results["en"].final_score(), 100);
    assert_eq!(results["th"].final_score(), 0);
    assert_eq!(engine.results(), results);
    assert_eq!(engine.source_language(), "ko");
}

#[test]
fn test_warningsFor_shouldNotTranslate() {
    let translator = MockTranslator::working();
    let engine = engine(translator.clone());

    let warnings = engine.warnings_for("전주 일대 호우 경보");
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("호우"));
    assert!(warnings[1].contains("전주"));
    assert_eq!(translator.request_count(), 0);
}

#[test]
fn test_reloadLexicon_shouldPickUpFileChanges() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "lexicon.json", SMALL_LEXICON_JSON).unwrap();
    let store = Arc::new(LexiconStore::load(LexiconSource::File(path.clone())).unwrap());
    let engine = QualityEngine::new(store, Arc::new(MockTranslator::working()), "ko");

    assert!(engine.warnings_for("태풍 북상").is_empty());

    std::fs::write(&path, r#"{ "terminology": { "태풍": ["typhoon"] } }"#).unwrap();
    engine.reload_lexicon().unwrap();
    assert_eq!(engine.warnings_for("태풍 북상").len(), 1);

    // A broken file leaves the loaded lexicon in place
    std::fs::write(&path, "{").unwrap();
    assert!(engine.reload_lexicon().is_err());
    assert_eq!(engine.warnings_for("태풍 북상").len(), 1);
    assert_eq!(engine.lexicon().snapshot().terminology.len(), 1);
}

#[test]
fn test_reloadLexicon_inMemoryStore_shouldNotSwapInBuiltin() {
    let small = Lexicon::from_json_str(SMALL_LEXICON_JSON).unwrap();
    let store = Arc::new(LexiconStore::from_lexicon(small.clone()).unwrap());
    let engine = QualityEngine::new(store, Arc::new(MockTranslator::working()), "ko");

    engine.reload_lexicon().unwrap();

    assert_eq!(*engine.lexicon().snapshot(), small);
    assert!(engine.warnings_for("태풍 북상").is_empty());
}

#[test]
fn test_fromConfig_brokenLexicon_shouldNotBuildEngine() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(dir.path(), "lexicon.json", r#"{ "terminology": { "지진": [] } }"#).unwrap();

    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;
    config.lexicon_path = Some(path);

    assert!(matches!(QualityEngine::from_config(&config), Err(AppError::Lexicon(_))));
}

#[test]
fn test_fromConfig_localProvider_shouldBuildWithoutNetwork() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::Ollama;

    let engine = QualityEngine::from_config(&config).unwrap();
    assert_eq!(engine.source_language(), "ko");
    assert_eq!(engine.lexicon().snapshot().terminology.len(), 40);
}

#[tokio::test]
async fn test_report_shouldRenderEngineResults() {
    let engine = engine(MockTranslator::working().with_responder(typhoon_responder).fail_for(["th"]));
    let results = engine.assess(TYPHOON_NOTICE, &["en", "th"]).await;

    let text = report::render(&results, ReportFormat::Text).unwrap();
    assert!(text.contains("== en (English) == 100/100 [good]"));
    assert!(text.contains("== th (Thai) == FAILED"));
    assert!(text.find("== en").unwrap() < text.find("== th").unwrap());

    let json: serde_json::Value = serde_json::from_str(&report::render(&results, ReportFormat::Json).unwrap()).unwrap();
    assert_eq!(json["en"]["status"]["state"], "assessed");
    assert_eq!(json["en"]["score"]["final_score"], 100);
    assert_eq!(json["th"]["translated"], "[translation failed]");
}

#[test]
fn test_assess_fromSyncCode_shouldWorkWithBlockOn() {
    let engine = engine(MockTranslator::working());

    let results = tokio_test::block_on(async { engine.assess("지진 발생, 여진에 주의", &["ja"]).await });

    assert_eq!(results.len(), 1);
    assert_eq!(results["ja"].warnings.len(), 2);
    assert!(!results["ja"].is_degraded());
}

#[test]
fn test_controller_warningsAndLexiconSummary() {
    let controller = Controller::with_config(Config::default()).unwrap();

    let warnings = controller.warnings(TYPHOON_NOTICE).unwrap();
    assert!(warnings.starts_with("- "));
    assert_eq!(warnings.lines().count(), 2);

    let summary = controller.lexicon_summary(None).unwrap();
    assert!(summary.contains("built-in lexicon"));
    assert!(summary.contains("40 terminology, 7 ambiguous, 4 cultural-context entries"));

    assert!(controller.lexicon_summary(Some("/nonexistent/lexicon.json".into())).is_err());
}
