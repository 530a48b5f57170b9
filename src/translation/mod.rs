/*!
 * Translation layer for emergency notices.
 *
 * The assessment pipeline only depends on the `Translator` trait. The rest of
 * this module is the LLM-backed implementation:
 *
 * - `translator`: the `Translator` contract
 * - `core`: `TranslationService`, provider dispatch with retry
 * - `cache`: in-memory cache of previous translations
 * - `prompts`: forward and reverse system prompts
 */

// Re-export main types for easier usage
pub use self::cache::{CacheStats, TranslationCache};
pub use self::core::TranslationService;
pub use self::prompts::PromptTemplate;
pub use self::translator::Translator;

// Submodules
pub mod cache;
pub mod core;
pub mod prompts;
pub mod translator;
