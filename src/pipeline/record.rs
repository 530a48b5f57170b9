/*!
 * Assessment results.
 */

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::quality::{QualityGrade, ScoreBreakdown};

/// Text stored in place of a translation that could not be produced
pub const FAILURE_MARKER: &str = "[translation failed]";

/// Warning carried by a degraded record
pub const FAILURE_WARNING: &str = "Translation failed for this language; no assessment was performed.";

/// Suggestion carried by a degraded record
pub const FAILURE_SUGGESTION: &str =
    "Retry the translation or have a human translator prepare this language version.";

/// Whether a record holds a real assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RecordStatus {
    /// Both translations succeeded and the texts were scored
    Assessed,
    /// A translation call failed, timed out or panicked
    Degraded {
        /// What went wrong, for display
        reason: String,
    },
}

/// The assessment of one notice in one target language.
///
/// Immutable once built; re-running a language replaces the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Language code this record is keyed by
    pub target_language: String,
    /// The notice as written
    pub original: String,
    /// Forward translation, or `FAILURE_MARKER`
    pub translated: String,
    /// Back-translation, or `FAILURE_MARKER`
    pub reverse_translated: String,
    /// Score breakdown; all zero for degraded records
    pub score: ScoreBreakdown,
    /// Term warnings
    pub warnings: Vec<String>,
    /// Improvement suggestions, never empty
    pub suggestions: Vec<String>,
    /// When the assessment finished
    pub created_at: DateTime<Utc>,
    /// Assessed or degraded
    pub status: RecordStatus,
}

impl TranslationRecord {
    /// Placeholder record for a language whose translation failed
    pub fn degraded(target_language: &str, original: &str, reason: impl Into<String>) -> Self {
        Self {
            target_language: target_language.to_string(),
            original: original.to_string(),
            translated: FAILURE_MARKER.to_string(),
            reverse_translated: FAILURE_MARKER.to_string(),
            score: ScoreBreakdown::zero(),
            warnings: vec![FAILURE_WARNING.to_string()],
            suggestions: vec![FAILURE_SUGGESTION.to_string()],
            created_at: Utc::now(),
            status: RecordStatus::Degraded { reason: reason.into() },
        }
    }

    /// Whether this record stands in for a failed translation
    pub fn is_degraded(&self) -> bool {
        matches!(self.status, RecordStatus::Degraded { .. })
    }

    /// The failure reason of a degraded record
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            RecordStatus::Degraded { reason } => Some(reason),
            RecordStatus::Assessed => None,
        }
    }

    /// Final score shorthand
    pub fn final_score(&self) -> u8 {
        self.score.final_score
    }

    /// Quality band of the final score
    pub fn grade(&self) -> QualityGrade {
        self.score.grade()
    }
}
