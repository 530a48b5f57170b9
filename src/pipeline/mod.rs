/*!
 * Assessment pipeline and multi-language fan-out.
 *
 * - `record`: `TranslationRecord` and its degraded form
 * - `assessment`: translate, back-translate and score one language
 * - `orchestrator`: run one pipeline per language concurrently
 */

pub mod assessment;
pub mod orchestrator;
pub mod record;

// Re-export main types
pub use assessment::{assess, AssessmentPipeline};
pub use orchestrator::{FanOutOrchestrator, ProgressCallback, ResultMap};
pub use record::{RecordStatus, TranslationRecord, FAILURE_MARKER};
