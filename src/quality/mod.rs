/*!
 * Translation quality assessment.
 *
 * This module scores a translation using its back-translation:
 * - **Similarity**: edit-distance, token-overlap and synonym primitives
 * - **Keywords**: fixed marker, urgency and context-clue tables
 * - **Scorer**: the weighted `ScoreBreakdown`
 * - **Feedback**: term warnings and improvement suggestions
 *
 * Everything here is pure: no I/O, no shared state.
 */

pub mod feedback;
pub mod keywords;
pub mod scorer;
pub mod similarity;

// Re-export main types
pub use feedback::{suggestions, warnings};
pub use keywords::UrgencyLevel;
pub use scorer::{score, QualityGrade, QualityScorer, ScoreBreakdown, REVIEW_THRESHOLD};
pub use similarity::{edit_similarity, semantic_preserved, structural_similarity};
