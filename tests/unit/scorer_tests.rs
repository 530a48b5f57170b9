/*!
 * Tests for the quality scorer
 */

use alertqa::lexicon::Lexicon;
use alertqa::quality::scorer::{action_clarity, urgency_match};
use alertqa::quality::{score, QualityGrade, QualityScorer, UrgencyLevel, REVIEW_THRESHOLD};

use crate::common::TYPHOON_NOTICE;

fn lexicon() -> Lexicon {
    Lexicon::builtin().unwrap()
}

#[test]
fn test_score_finalScore_shouldStayInRangeForAnyInput() {
    let lexicon = lexicon();
    let texts = ["", " ", TYPHOON_NOTICE, "Typhoon warning", "119 아파트단지 전주 광주", "!!!"];

    for original in texts {
        for translated in texts {
            for reverse in texts {
                let breakdown = score(original, translated, reverse, "en", &lexicon);
                assert!(breakdown.final_score <= 100);
                for component in [
                    breakdown.reverse_translation_score,
                    breakdown.cultural_context_score,
                    breakdown.ambiguous_term_score,
                    breakdown.terminology_score,
                ] {
                    assert!(component.is_finite());
                    assert!((0.0..=100.0).contains(&component));
                }
            }
        }
    }
}

#[test]
fn test_score_noLexiconTerms_shouldBeNeutral() {
    let lexicon = lexicon();
    let breakdown = score("Hello there", "Bonjour", "Hello", "fr", &lexicon);

    assert_eq!(breakdown.terminology_score, 100.0);
    assert_eq!(breakdown.ambiguous_term_score, 100.0);
    assert_eq!(breakdown.cultural_context_score, 100.0);
}

#[test]
fn test_score_typhoonNotice_shouldMatchTerminologyAndUrgency() {
    let lexicon = lexicon();
    let reverse = "Typhoon warning, evacuate immediately";
    let translated = "Typhoon warning, evacuate immediately";

    let breakdown = score(TYPHOON_NOTICE, translated, reverse, "en", &lexicon);

    assert_eq!(breakdown.terminology_score, 100.0);
    assert_eq!(breakdown.ambiguous_term_score, 100.0);
    assert_eq!(UrgencyLevel::classify(TYPHOON_NOTICE), UrgencyLevel::High);
    assert_eq!(UrgencyLevel::classify(reverse), UrgencyLevel::High);
    assert_eq!(urgency_match(TYPHOON_NOTICE, reverse), 100.0);
}

#[test]
fn test_score_terminologyMissing_shouldLowerTerminologyScore() {
    let lexicon = lexicon();
    // 태풍 rendered, 대피 not
    let breakdown = score(TYPHOON_NOTICE, "Typhoon warning, leave now", "", "en", &lexicon);
    assert_eq!(breakdown.terminology_score, 50.0);
}

#[test]
fn test_ambiguousTermScore_noClue_shouldUseDefaultContext() {
    let lexicon = lexicon();
    let scorer = QualityScorer::new(&lexicon);
    let original = "전주에 호우 경보";

    let entry = lexicon.ambiguous_entry("전주").unwrap();
    assert_eq!(scorer.resolve_context(entry, original), Some("지명"));

    assert_eq!(scorer.ambiguous_term_score(original, "Heavy rain warning in the region"), 80.0);
    assert_eq!(scorer.ambiguous_term_score(original, "Heavy rain warning for Jeonju City"), 100.0);
}

#[test]
fn test_ambiguousTermScore_singleClue_shouldResolveThatContext() {
    let lexicon = lexicon();
    let scorer = QualityScorer::new(&lexicon);
    let original = "전주 대비 강수량 증가";

    let entry = lexicon.ambiguous_entry("전주").unwrap();
    assert_eq!(scorer.resolve_context(entry, original), Some("시간"));
    assert_eq!(scorer.ambiguous_term_score(original, "Rainfall up compared to last week"), 100.0);
    assert_eq!(scorer.ambiguous_term_score(original, "Rainfall up in Jeonju City"), 80.0);
}

#[test]
fn test_ambiguousTermScore_noDefault_shouldSkipCheck() {
    let lexicon = lexicon();
    // 부산 has no default context and no clue fires here
    assert_eq!(QualityScorer::new(&lexicon).ambiguous_term_score("부산 경보", "Warning"), 100.0);
}

#[test]
fn test_culturalContextScore_shouldDeduct15PerMissingRendering() {
    let lexicon = lexicon();
    let scorer = QualityScorer::new(&lexicon);
    let original = "아파트단지 주민은 119에 신고하세요";

    assert_eq!(scorer.cultural_context_score(original, "Residents should call", "en"), 70.0);
    assert_eq!(
        scorer.cultural_context_score(original, "apartment complex residents call 119 (Fire/Emergency)", "en"),
        100.0
    );
    // No rendering registered for this language: nothing to check
    assert_eq!(scorer.cultural_context_score(original, "", "de"), 100.0);
}

#[test]
fn test_actionClarity_shouldCountPreservedActions() {
    assert_eq!(action_clarity("대피소로 이동하세요", "피난소로 옮기세요"), 100.0);
    assert_eq!(action_clarity("대피소로 이동하세요", "집에 계세요"), 0.0);
    assert_eq!(action_clarity("날씨 정보", "anything"), 100.0);
}

#[test]
fn test_urgencyMatch_differentBuckets_shouldBe60() {
    assert_eq!(urgency_match("즉시 대피", "Please be careful"), 60.0);
    assert_eq!(urgency_match("주의 바랍니다", "Caution advised"), 100.0);
}

#[test]
fn test_score_shouldBeDeterministic() {
    let lexicon = lexicon();
    let first = score(TYPHOON_NOTICE, "Typhoon alert", "태풍 경보 대피", "en", &lexicon);
    let second = score(TYPHOON_NOTICE, "Typhoon alert", "태풍 경보 대피", "en", &lexicon);
    assert_eq!(first, second);
}

#[test]
fn test_grade_shouldFollowFinalScore() {
    assert_eq!(QualityGrade::from_score(95), QualityGrade::Good);
    assert_eq!(QualityGrade::from_score(80), QualityGrade::Good);
    assert_eq!(QualityGrade::from_score(79), QualityGrade::Fair);
    assert_eq!(QualityGrade::from_score(60), QualityGrade::Fair);
    assert_eq!(QualityGrade::from_score(59), QualityGrade::Poor);
    assert_eq!(REVIEW_THRESHOLD, 70);
}
