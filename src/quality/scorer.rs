/*!
 * Quality scorer for back-translation based assessment.
 *
 * Combines four sub-scores into a final 0-100 score:
 * - Reverse-translation score (40%): information preservation, semantic
 *   consistency and disaster-specific fidelity of the back-translation
 * - Cultural-context score (25%): locale-specific renderings
 * - Ambiguous-term score (20%): context-resolved renderings of homonyms
 * - Terminology score (15%): canonical renderings of disaster terms
 *
 * Matching is heuristic substring matching. Scoring is pure and never fails:
 * empty texts and unknown languages resolve to neutral or zero contributions.
 */

use serde::{Deserialize, Serialize};

use super::keywords::{self, UrgencyLevel};
use super::similarity::{edit_similarity, semantic_preserved, structural_similarity};
use crate::lexicon::{AmbiguousEntry, Lexicon, LexiconEntry};

/// Weight of the reverse-translation score
pub const REVERSE_WEIGHT: f64 = 0.40;
/// Weight of the cultural-context score
pub const CULTURAL_WEIGHT: f64 = 0.25;
/// Weight of the ambiguous-term score
pub const AMBIGUOUS_WEIGHT: f64 = 0.20;
/// Weight of the terminology score
pub const TERMINOLOGY_WEIGHT: f64 = 0.15;

/// Deduction per cultural term rendered incorrectly
pub const CULTURAL_PENALTY: f64 = 15.0;
/// Deduction per ambiguous term rendered in the wrong sense
pub const AMBIGUOUS_PENALTY: f64 = 20.0;
/// Urgency-match score when the buckets differ
pub const URGENCY_MISMATCH_SCORE: f64 = 60.0;

/// Final scores below this need human review
pub const REVIEW_THRESHOLD: u8 = 70;

/// Coarse quality band for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityGrade {
    /// 80 and above
    Good,
    /// 60 to 79
    Fair,
    /// Below 60
    Poor,
}

impl QualityGrade {
    /// Band a final score
    pub fn from_score(score: u8) -> Self {
        match score {
            s if s >= 80 => Self::Good,
            s if s >= 60 => Self::Fair,
            _ => Self::Poor,
        }
    }
}

impl std::fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        };
        f.write_str(label)
    }
}

/// Sub-scores and the weighted final score of one assessment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Back-translation fidelity (0-100)
    pub reverse_translation_score: f64,
    /// Cultural-context renderings (0-100)
    pub cultural_context_score: f64,
    /// Ambiguous-term renderings (0-100)
    pub ambiguous_term_score: f64,
    /// Terminology renderings (0-100)
    pub terminology_score: f64,
    /// Rounded weighted sum (0-100)
    pub final_score: u8,
}

impl ScoreBreakdown {
    /// Build a breakdown and compute the weighted final score
    pub fn from_components(reverse: f64, cultural: f64, ambiguous: f64, terminology: f64) -> Self {
        let reverse = bounded(reverse);
        let cultural = bounded(cultural);
        let ambiguous = bounded(ambiguous);
        let terminology = bounded(terminology);

        let weighted = REVERSE_WEIGHT * reverse
            + CULTURAL_WEIGHT * cultural
            + AMBIGUOUS_WEIGHT * ambiguous
            + TERMINOLOGY_WEIGHT * terminology;

        Self {
            reverse_translation_score: reverse,
            cultural_context_score: cultural,
            ambiguous_term_score: ambiguous,
            terminology_score: terminology,
            final_score: weighted.round().clamp(0.0, 100.0) as u8,
        }
    }

    /// All-zero breakdown used for failed assessments
    pub fn zero() -> Self {
        Self::from_components(0.0, 0.0, 0.0, 0.0)
    }

    /// Quality band of the final score
    pub fn grade(&self) -> QualityGrade {
        QualityGrade::from_score(self.final_score)
    }

    /// Whether the final score calls for human review
    pub fn needs_review(&self) -> bool {
        self.final_score < REVIEW_THRESHOLD
    }

    /// Name of the lowest sub-score
    pub fn weakest_component(&self) -> &'static str {
        let scores = [
            (self.reverse_translation_score, "reverse translation"),
            (self.cultural_context_score, "cultural context"),
            (self.ambiguous_term_score, "ambiguous terms"),
            (self.terminology_score, "terminology"),
        ];

        scores
            .iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }
}

/// Clamp to [0, 100], mapping non-finite values to 0
fn bounded(value: f64) -> f64 {
    if value.is_finite() { value.clamp(0.0, 100.0) } else { 0.0 }
}

/// Percentage of `hits` over `total`, 100 when there is nothing to check
fn ratio_or_neutral(hits: usize, total: usize) -> f64 {
    if total == 0 {
        100.0
    } else {
        100.0 * hits as f64 / total as f64
    }
}

/// Semantic consistency between the original and its back-translation
pub fn semantic_consistency(original: &str, reverse_translated: &str) -> f64 {
    0.6 * edit_similarity(original, reverse_translated) + 0.4 * structural_similarity(original, reverse_translated)
}

/// 100 when both texts fall in the same urgency bucket, 60 otherwise
pub fn urgency_match(original: &str, reverse_translated: &str) -> f64 {
    if UrgencyLevel::classify(original) == UrgencyLevel::classify(reverse_translated) {
        100.0
    } else {
        URGENCY_MISMATCH_SCORE
    }
}

/// Share of the original's action verbs that recur in the back-translation
pub fn action_clarity(original: &str, reverse_translated: &str) -> f64 {
    let present: Vec<&str> = keywords::ACTION_MARKERS
        .iter()
        .copied()
        .filter(|pattern| original.contains(pattern))
        .collect();

    let kept = present
        .iter()
        .filter(|pattern| reverse_translated.contains(*pattern) || semantic_preserved(pattern, reverse_translated))
        .count();

    ratio_or_neutral(kept, present.len())
}

/// Disaster-specific fidelity: urgency match (60%) and action clarity (40%)
pub fn disaster_fidelity(original: &str, reverse_translated: &str) -> f64 {
    0.6 * urgency_match(original, reverse_translated) + 0.4 * action_clarity(original, reverse_translated)
}

/// Quality scorer bound to one lexicon snapshot
pub struct QualityScorer<'a> {
    lexicon: &'a Lexicon,
}

impl<'a> QualityScorer<'a> {
    /// Create a scorer for the given lexicon
    pub fn new(lexicon: &'a Lexicon) -> Self {
        Self { lexicon }
    }

    /// Score one translation against its back-translation
    pub fn score(
        &self,
        original: &str,
        translated: &str,
        reverse_translated: &str,
        target_language: &str,
    ) -> ScoreBreakdown {
        ScoreBreakdown::from_components(
            self.reverse_translation_score(original, reverse_translated),
            self.cultural_context_score(original, translated, target_language),
            self.ambiguous_term_score(original, translated),
            self.terminology_score(original, translated),
        )
    }

    /// Reverse-translation score: preservation 50%, consistency 30%, fidelity 20%
    pub fn reverse_translation_score(&self, original: &str, reverse_translated: &str) -> f64 {
        0.5 * self.information_preservation(original, reverse_translated)
            + 0.3 * semantic_consistency(original, reverse_translated)
            + 0.2 * disaster_fidelity(original, reverse_translated)
    }

    /// Share of the original's key expressions preserved in the back-translation.
    ///
    /// Keywords come from four categories: temporal, locative, terminology
    /// and action markers. A keyword listed in several categories counts once
    /// per category.
    pub fn information_preservation(&self, original: &str, reverse_translated: &str) -> f64 {
        let categories = [
            keywords::TEMPORAL_MARKERS.to_vec(),
            keywords::LOCATIVE_MARKERS.to_vec(),
            self.lexicon.terminology_terms().collect::<Vec<_>>(),
            keywords::ACTION_MARKERS.to_vec(),
        ];

        let mut total = 0;
        let mut preserved = 0;
        for keyword in categories.iter().flatten() {
            if keyword.is_empty() || !original.contains(keyword) {
                continue;
            }
            total += 1;
            if semantic_preserved(keyword, reverse_translated) {
                preserved += 1;
            }
        }

        ratio_or_neutral(preserved, total)
    }

    /// Cultural-context score: 100 minus 15 per cultural term whose expected
    /// rendering for the target language is missing from the translation
    pub fn cultural_context_score(&self, original: &str, translated: &str, target_language: &str) -> f64 {
        let misses = self
            .lexicon
            .cultural
            .iter()
            .filter(|entry| entry.occurs_in(original) && entry.is_missing_from(target_language, translated))
            .count();

        (100.0 - CULTURAL_PENALTY * misses as f64).max(0.0)
    }

    /// Sense of an ambiguous term selected by the context clues in `original`.
    ///
    /// Exactly one firing context resolves the sense; otherwise the term's
    /// default context applies, and `None` means the check is skipped.
    pub fn resolve_context(&self, entry: &AmbiguousEntry, original: &str) -> Option<&'static str> {
        let firing: Vec<&'static str> = keywords::firing_contexts(&entry.source_term, original)
            .into_iter()
            .filter(|context| entry.has_context(context))
            .collect();

        match firing.as_slice() {
            [single] => Some(*single),
            _ => keywords::default_context(&entry.source_term).filter(|context| entry.has_context(context)),
        }
    }

    /// Ambiguous-term score: 100 minus 20 per resolved term rendered in the
    /// wrong sense
    pub fn ambiguous_term_score(&self, original: &str, translated: &str) -> f64 {
        let misses = self
            .lexicon
            .ambiguous
            .iter()
            .filter(|entry| entry.occurs_in(original))
            .filter_map(|entry| {
                let context = self.resolve_context(entry, original)?;
                entry.is_rendered_in(context, translated)
            })
            .filter(|rendered| !rendered)
            .count();

        (100.0 - AMBIGUOUS_PENALTY * misses as f64).max(0.0)
    }

    /// Terminology score: share of terms present in the original whose
    /// translation contains a canonical rendering
    pub fn terminology_score(&self, original: &str, translated: &str) -> f64 {
        let present: Vec<_> = self.lexicon.terminology.iter().filter(|e| e.occurs_in(original)).collect();
        let accurate = present.iter().filter(|e| e.is_rendered_in(translated)).count();
        ratio_or_neutral(accurate, present.len())
    }
}

/// Score a translation against the given lexicon snapshot
pub fn score(
    original: &str,
    translated: &str,
    reverse_translated: &str,
    target_language: &str,
    lexicon: &Lexicon,
) -> ScoreBreakdown {
    QualityScorer::new(lexicon).score(original, translated, reverse_translated, target_language)
}
