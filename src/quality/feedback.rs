/*!
 * Warnings and improvement suggestions.
 *
 * Warnings only depend on the original text, so they can be shown as live
 * hints before anything is translated. Suggestions are derived from the same
 * evidence the scorer uses and are never empty.
 */

use super::keywords::URGENCY_KEYWORDS;
use super::scorer::ScoreBreakdown;
use crate::lexicon::{Lexicon, LexiconEntry, TermCategory};

/// Returned when no other suggestion applies
pub const ACCEPTABLE_MESSAGE: &str = "Translation quality is acceptable; no changes suggested.";

/// Emitted when urgency wording is lost in the back-translation
pub const URGENCY_SUGGESTION: &str =
    "Urgency wording was weakened in the back-translation; use direct imperative phrasing for required actions.";

/// Emitted when the final score is below the review threshold
pub const REVIEW_SUGGESTION: &str =
    "Overall quality is below 70; human review is recommended before sending this notice.";

fn term_warning(category: TermCategory, term: &str) -> String {
    match category {
        TermCategory::Terminology => format!(
            "Disaster terminology \"{}\" detected ({}); verify it uses the standard rendering.",
            term, category
        ),
        TermCategory::Ambiguous => format!(
            "Ambiguous term \"{}\" detected ({}); confirm the intended meaning is translated.",
            term, category
        ),
        TermCategory::Cultural => format!("Cultural-context term \"{}\" detected ({}).", term, category),
    }
}

/// Warnings for every terminology and ambiguous term found in `original`.
///
/// Terminology matches come first in lexicon order, then ambiguous matches.
/// Each matching term yields one warning however often it occurs.
pub fn warnings(original: &str, lexicon: &Lexicon) -> Vec<String> {
    let terminology = lexicon.terminology.iter().map(|e| e as &dyn LexiconEntry);
    let ambiguous = lexicon.ambiguous.iter().map(|e| e as &dyn LexiconEntry);

    terminology
        .chain(ambiguous)
        .filter(|entry| entry.occurs_in(original))
        .map(|entry| term_warning(entry.category(), entry.source_term()))
        .collect()
}

/// Improvement suggestions for one assessed translation.
///
/// Order: cultural renderings, terminology renderings, lost urgency wording,
/// then the review recommendation. Never returns an empty list.
pub fn suggestions(
    original: &str,
    translated: &str,
    reverse_translated: &str,
    score: &ScoreBreakdown,
    target_language: &str,
    lexicon: &Lexicon,
) -> Vec<String> {
    let mut suggestions = Vec::new();

    for entry in lexicon.cultural.iter().filter(|e| e.occurs_in(original)) {
        if let Some(expected) = entry.rendering_for(target_language) {
            if !translated.contains(expected) {
                suggestions.push(format!(
                    "Render \"{}\" as \"{}\" ({}).",
                    entry.source_term, expected, entry.explanation
                ));
            }
        }
    }

    for entry in lexicon.terminology.iter().filter(|e| e.occurs_in(original)) {
        if entry.is_rendered_in(translated) {
            continue;
        }
        if let Some(preferred) = entry.preferred_rendering() {
            suggestions.push(format!(
                "Use the standard rendering \"{}\" for \"{}\".",
                preferred, entry.source_term
            ));
        }
    }

    let urgency_lost = URGENCY_KEYWORDS
        .iter()
        .any(|keyword| original.contains(keyword) && !reverse_translated.contains(keyword));
    if urgency_lost {
        suggestions.push(URGENCY_SUGGESTION.to_string());
    }

    if score.needs_review() {
        suggestions.push(REVIEW_SUGGESTION.to_string());
    }

    if suggestions.is_empty() {
        suggestions.push(ACCEPTABLE_MESSAGE.to_string());
    }

    suggestions
}
